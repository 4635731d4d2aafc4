// Operator and annotation-role conversion to LaTeX

use crate::formula::ast::Operator;

/// Display LaTeX for an arithmetic operator.
pub fn operator_to_latex(op: Operator) -> &'static str {
    match op {
        Operator::Plus => "+",
        Operator::Minus => "-",
        Operator::Multiply => "\\cdot",
        Operator::Divide => "\\div",
    }
}

/// Role tag embedded in each annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationRole {
    Number,
    Operator,
    Fraction,
    Mixed,
}

impl AnnotationRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            AnnotationRole::Number => "number",
            AnnotationRole::Operator => "operator",
            AnnotationRole::Fraction => "fraction",
            AnnotationRole::Mixed => "mixed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "number" => Some(AnnotationRole::Number),
            "operator" => Some(AnnotationRole::Operator),
            "fraction" => Some(AnnotationRole::Fraction),
            "mixed" => Some(AnnotationRole::Mixed),
            _ => None,
        }
    }
}
