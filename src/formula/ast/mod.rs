// Abstract Syntax Tree for arithmetic expressions
//
// The tree covers integers, the four arithmetic operators, unary minus,
// simple and mixed fractions. Parenthesized groups leave no node behind;
// grouping is implied by the tree shape.

mod node;
mod path;
mod types;

pub use node::{AstKind, AstNode};
pub use path::{
    augment_with_ids, enumerate_integers, enumerate_mixed, enumerate_operators, find_by_path,
    is_valid_path, operand_paths, term_path, ROOT_PATH,
};
pub use types::*;
