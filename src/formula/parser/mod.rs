//! LaTeX arithmetic parser.
//!
//! Supports integers and decimals, `+ - * /` in their LaTeX and unicode
//! spellings, unary minus, parentheses, `\frac` and mixed numbers (`1 2/3`,
//! `1\frac{2}{3}`). Everything else is skipped by the tokenizer.
//!
//! Failure is never an error: [`parse`] returns `None` when no tree can be
//! built, and callers treat that as "no correlation for this expression".

mod expr;
mod token;

pub use token::{is_operator_char, preprocess_mixed_numbers, tokenize, Token, TokenKind};

use crate::formula::ast::AstNode;
use expr::ExprParser;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Tokenize `latex` and run the mixed-number pre-pass.
pub fn tokenize_latex(latex: &str) -> Vec<Token> {
    preprocess_mixed_numbers(tokenize(latex))
}

/// Parse a preprocessed token list.
///
/// Returns `None` for an empty list or a primary that cannot be parsed.
/// Tokens left over after the outermost expression are ignored, except for
/// an integer followed by a fraction that could not be folded into a mixed
/// number (`2\frac{x+1}{3}`), which is ambiguous and rejected.
pub fn parse_tokens(tokens: &[Token]) -> Option<AstNode> {
    if tokens.is_empty() {
        return None;
    }

    let mut parser = ExprParser::new(tokens);
    let node = parser.parse_add_sub()?;
    if !parser.at_end() {
        let consumed = parser.position();
        let unfolded = consumed > 0
            && tokens[consumed - 1].is(TokenKind::Number)
            && tokens[consumed].is(TokenKind::Frac);
        if unfolded {
            tracing::debug!(consumed, "integer before an unfoldable fraction");
            return None;
        }
        tracing::debug!(
            consumed,
            total = tokens.len(),
            "ignoring trailing tokens after expression"
        );
    }
    Some(node)
}

/// Parse a LaTeX expression into an (unaugmented) tree.
///
/// Any panic raised during the descent is downgraded to `None`.
pub fn parse(latex: &str) -> Option<AstNode> {
    match catch_unwind(AssertUnwindSafe(|| parse_tokens(&tokenize_latex(latex)))) {
        Ok(node) => {
            if node.is_none() {
                tracing::debug!(latex, "expression did not parse");
            }
            node
        },
        Err(_) => {
            tracing::warn!(latex, "parser panicked; treating expression as unparseable");
            None
        },
    }
}
