// Formula Module - Expression Parsing and Instrumentation
//
// This module turns arithmetic LaTeX into a structural tree and back:
//
// - **parser**: tokenizer and recursive-descent parser
// - **ast**: the expression tree, structural paths and ordered enumeration
// - **latex**: instrumented re-serialization carrying paths to the renderer
//
// # Example
//
// ```
// use mathtap::formula::{ast, instrument_latex, parse};
//
// let mut tree = parse("2+3").expect("parses");
// ast::augment_with_ids(&mut tree);
// let ints = ast::enumerate_integers(&tree);
// assert_eq!(ints[0].node_id, "term[0]");
//
// let result = instrument_latex("2+3");
// assert!(result.success);
// ```

/// Expression tree, structural paths and ordered enumeration.
pub mod ast;
/// Instrumented LaTeX serialization
///
/// Wraps each number, operator, fraction and mixed number in an `\htmlData`
/// annotation carrying its structural path.
pub mod latex;
/// LaTeX tokenizer and recursive-descent parser.
pub mod parser;

pub use ast::{AstKind, AstNode, IntegerDescriptor, MixedDescriptor, Operator, OperatorDescriptor};
pub use latex::{instrument_latex, strip_annotations, to_instrumented_latex, InstrumentationResult};
pub use parser::parse;

/// Everything a rebuild needs from the expression side.
#[derive(Debug, Clone)]
pub struct AnalyzedExpression {
    pub ast: AstNode,
    pub integers: Vec<IntegerDescriptor>,
    pub operators: Vec<OperatorDescriptor>,
    pub mixed: Vec<MixedDescriptor>,
}

impl AnalyzedExpression {
    /// Parse and augment `latex`, then enumerate its descriptors.
    pub fn analyze(latex: &str) -> Option<Self> {
        let mut ast = parse(latex)?;
        ast::augment_with_ids(&mut ast);
        Some(Self::from_augmented(ast))
    }

    /// Enumerate descriptors of an already augmented tree.
    pub fn from_augmented(ast: AstNode) -> Self {
        Self {
            integers: ast::enumerate_integers(&ast),
            operators: ast::enumerate_operators(&ast),
            mixed: ast::enumerate_mixed(&ast),
            ast,
        }
    }
}
