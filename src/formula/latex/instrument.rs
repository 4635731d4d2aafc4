// Instrumented LaTeX serialization
//
// Re-serializes an augmented tree, wrapping numbers, operators, fractions
// and mixed numbers in `\htmlData{ast-id=..., role=...}{...}` so the renderer
// carries each structural path onto the element it typesets.

use super::operators::{operator_to_latex, AnnotationRole};
use super::utils::{sanitize_path, ANNOTATION_COMMAND};
use crate::formula::ast::{augment_with_ids, AstKind, AstNode, Operator};
use crate::formula::parser::parse;
use serde::{Deserialize, Serialize};

/// Outcome of [`instrument_latex`].
///
/// On failure `latex` is empty; callers choose their own fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentationResult {
    pub success: bool,
    pub latex: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl InstrumentationResult {
    fn ok(latex: String) -> Self {
        Self {
            success: true,
            latex,
            reason: None,
        }
    }

    fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            latex: String::new(),
            reason: Some(reason.into()),
        }
    }

    /// Convert into a `Result`, mapping failure to [`crate::Error::Instrumentation`].
    pub fn into_result(self) -> crate::Result<String> {
        if self.success {
            Ok(self.latex)
        } else {
            Err(crate::Error::Instrumentation(
                self.reason.unwrap_or_else(|| "unknown failure".to_string()),
            ))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Serializer for augmented expression trees.
///
/// Holds its output buffer so repeated conversions reuse the allocation.
#[derive(Debug, Default)]
pub struct LatexInstrumenter {
    buffer: String,
}

impl LatexInstrumenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize `ast`; paths must already be assigned.
    pub fn instrument(&mut self, ast: &AstNode) -> &str {
        self.buffer.clear();
        self.write_node(ast);
        &self.buffer
    }

    fn write_node(&mut self, node: &AstNode) {
        match &node.kind {
            AstKind::Integer(value) => {
                self.annotated(node, AnnotationRole::Number, None, |this| {
                    this.buffer.push_str(value);
                });
            },
            AstKind::BinaryOp { op, left, right } => {
                self.write_operand(left, *op, Side::Left);
                self.buffer.push(' ');
                self.annotated(node, AnnotationRole::Operator, Some(*op), |this| {
                    this.buffer.push_str(operator_to_latex(*op));
                });
                self.buffer.push(' ');
                self.write_operand(right, *op, Side::Right);
            },
            AstKind::UnaryOp { arg, .. } => {
                // The sign itself carries no annotation.
                self.buffer.push('-');
                let wrap = match &arg.kind {
                    AstKind::BinaryOp { .. } | AstKind::UnaryOp { .. } => true,
                    AstKind::Integer(value) => value.starts_with('-'),
                    _ => false,
                };
                self.write_wrapped(arg, wrap);
            },
            AstKind::Fraction {
                numerator,
                denominator,
            } => {
                self.annotated(node, AnnotationRole::Fraction, None, |this| {
                    this.buffer.push_str("\\frac{");
                    this.write_node(numerator);
                    this.buffer.push_str("}{");
                    this.write_node(denominator);
                    this.buffer.push('}');
                });
            },
            AstKind::Mixed {
                whole,
                numerator,
                denominator,
            } => {
                self.annotated(node, AnnotationRole::Mixed, None, |this| {
                    this.buffer.push_str(whole);
                    this.buffer.push_str("\\frac{");
                    this.buffer.push_str(numerator);
                    this.buffer.push_str("}{");
                    this.buffer.push_str(denominator);
                    this.buffer.push('}');
                });
            },
        }
    }

    fn write_operand(&mut self, child: &AstNode, parent: Operator, side: Side) {
        self.write_wrapped(child, needs_parens(child, parent, side));
    }

    fn write_wrapped(&mut self, node: &AstNode, wrap: bool) {
        if wrap {
            self.buffer.push('(');
        }
        self.write_node(node);
        if wrap {
            self.buffer.push(')');
        }
    }

    fn annotated(
        &mut self,
        node: &AstNode,
        role: AnnotationRole,
        op: Option<Operator>,
        body: impl FnOnce(&mut Self),
    ) {
        self.buffer.push_str(ANNOTATION_COMMAND);
        self.buffer.push_str("{ast-id=");
        sanitize_path(node.path(), &mut self.buffer);
        self.buffer.push_str(", role=");
        self.buffer.push_str(role.as_str());
        if let Some(op) = op {
            self.buffer.push_str(", operator=");
            self.buffer.push_str(op.symbol());
        }
        self.buffer.push_str("}{");
        body(self);
        self.buffer.push('}');
    }
}

/// Whether `child` must be parenthesized under the binary operator `parent`.
///
/// Operators are left-associative, so a right operand of equal precedence
/// needs parentheses to keep its grouping.
fn needs_parens(child: &AstNode, parent: Operator, side: Side) -> bool {
    let AstKind::BinaryOp { op, .. } = &child.kind else {
        return false;
    };
    match side {
        Side::Left => op.precedence() < parent.precedence(),
        Side::Right => op.precedence() <= parent.precedence(),
    }
}

/// Serialize an augmented tree into annotated LaTeX.
pub fn to_instrumented_latex(ast: &AstNode) -> String {
    let mut instrumenter = LatexInstrumenter::new();
    instrumenter.instrument(ast).to_string()
}

/// Parse, augment and serialize `latex` in one step.
pub fn instrument_latex(latex: &str) -> InstrumentationResult {
    let Some(mut ast) = parse(latex) else {
        tracing::warn!(latex, "instrumentation failed: expression did not parse");
        return InstrumentationResult::failed(format!("could not parse expression `{latex}`"));
    };
    augment_with_ids(&mut ast);

    let out = to_instrumented_latex(&ast);
    if out.trim().is_empty() {
        tracing::warn!(latex, "instrumentation failed: empty output");
        return InstrumentationResult::failed("instrumented output was empty");
    }
    InstrumentationResult::ok(out)
}
