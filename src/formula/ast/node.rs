// Expression node definitions

use super::types::Operator;

/// Shape of an expression node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstKind {
    /// Integer (or decimal) literal. A folded unary minus is part of the value.
    Integer(String),

    /// Binary arithmetic operation
    BinaryOp {
        op: Operator,
        left: Box<AstNode>,
        right: Box<AstNode>,
    },

    /// Unary operation; the parser only produces negation
    UnaryOp { op: Operator, arg: Box<AstNode> },

    /// Simple fraction: numerator over denominator
    Fraction {
        numerator: Box<AstNode>,
        denominator: Box<AstNode>,
    },

    /// Mixed number such as `1 2/3` or `1\frac{2}{3}`
    Mixed {
        whole: String,
        numerator: String,
        denominator: String,
    },
}

/// Expression tree node.
///
/// `path` is `None` until [`augment_with_ids`](super::augment_with_ids) runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstNode {
    pub kind: AstKind,
    pub path: Option<String>,
}

impl AstNode {
    pub fn integer(value: impl Into<String>) -> Self {
        Self::from_kind(AstKind::Integer(value.into()))
    }

    pub fn binary(op: Operator, left: AstNode, right: AstNode) -> Self {
        Self::from_kind(AstKind::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn unary(op: Operator, arg: AstNode) -> Self {
        Self::from_kind(AstKind::UnaryOp {
            op,
            arg: Box::new(arg),
        })
    }

    pub fn fraction(numerator: AstNode, denominator: AstNode) -> Self {
        Self::from_kind(AstKind::Fraction {
            numerator: Box::new(numerator),
            denominator: Box::new(denominator),
        })
    }

    pub fn mixed(
        whole: impl Into<String>,
        numerator: impl Into<String>,
        denominator: impl Into<String>,
    ) -> Self {
        Self::from_kind(AstKind::Mixed {
            whole: whole.into(),
            numerator: numerator.into(),
            denominator: denominator.into(),
        })
    }

    #[inline]
    fn from_kind(kind: AstKind) -> Self {
        Self { kind, path: None }
    }

    /// Structural path, or an empty string before augmentation.
    #[inline]
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or("")
    }

    /// Whether this node is an integer literal.
    #[inline]
    pub fn is_integer(&self) -> bool {
        matches!(self.kind, AstKind::Integer(_))
    }

    /// Structural equality that ignores assigned paths.
    pub fn same_shape(&self, other: &AstNode) -> bool {
        match (&self.kind, &other.kind) {
            (AstKind::Integer(a), AstKind::Integer(b)) => a == b,
            (
                AstKind::BinaryOp { op: oa, left: la, right: ra },
                AstKind::BinaryOp { op: ob, left: lb, right: rb },
            ) => oa == ob && la.same_shape(lb) && ra.same_shape(rb),
            (AstKind::UnaryOp { op: oa, arg: aa }, AstKind::UnaryOp { op: ob, arg: ab }) => {
                oa == ob && aa.same_shape(ab)
            },
            (
                AstKind::Fraction { numerator: na, denominator: da },
                AstKind::Fraction { numerator: nb, denominator: db },
            ) => na.same_shape(nb) && da.same_shape(db),
            (
                AstKind::Mixed { whole: wa, numerator: na, denominator: da },
                AstKind::Mixed { whole: wb, numerator: nb, denominator: db },
            ) => wa == wb && na == nb && da == db,
            _ => false,
        }
    }
}

impl std::fmt::Display for AstNode {
    /// Compact s-expression form, handy in test failure messages.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            AstKind::Integer(value) => f.write_str(value),
            AstKind::BinaryOp { op, left, right } => write!(f, "({op} {left} {right})"),
            AstKind::UnaryOp { op, arg } => write!(f, "({op} {arg})"),
            AstKind::Fraction {
                numerator,
                denominator,
            } => write!(f, "(frac {numerator} {denominator})"),
            AstKind::Mixed {
                whole,
                numerator,
                denominator,
            } => write!(f, "(mixed {whole} {numerator} {denominator})"),
        }
    }
}
