use serde::{Deserialize, Serialize};

/// Arithmetic operators understood by the expression parser.
///
/// Every glyph variant the tokenizer accepts collapses onto one of these
/// four during parsing, so `\cdot`, `×` and `*` all become [`Operator::Multiply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Plus,
    Minus,
    Multiply,
    Divide,
}

impl Operator {
    /// Normalize a raw operator glyph.
    ///
    /// Returns `None` for glyphs outside the arithmetic operator set.
    pub fn from_glyph(glyph: &str) -> Option<Self> {
        match glyph {
            "+" => Some(Operator::Plus),
            "-" | "\u{2212}" => Some(Operator::Minus),
            "*" | "\u{00D7}" | "\u{00B7}" | "\u{22C5}" | "\u{2217}" => Some(Operator::Multiply),
            "/" | "\u{00F7}" | ":" => Some(Operator::Divide),
            _ => None,
        }
    }

    /// The normalized ASCII symbol (`+`, `-`, `*`, `/`).
    #[inline]
    pub const fn symbol(self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }

    /// Binding strength used by the parser and by parenthesis re-emission.
    #[inline]
    pub const fn precedence(self) -> u8 {
        match self {
            Operator::Plus | Operator::Minus => 1,
            Operator::Multiply | Operator::Divide => 2,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Normalize any operator glyph (ASCII, unicode or relation) to its bucket key.
///
/// Arithmetic glyphs map onto `+ - * /`; anything else (relations such as `=`)
/// is returned unchanged so that each relation glyph forms its own bucket.
pub fn normalize_symbol(glyph: &str) -> &str {
    match Operator::from_glyph(glyph.trim()) {
        Some(op) => op.symbol(),
        None => glyph.trim(),
    }
}

/// Descriptor for one operator node, in left-to-right reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorDescriptor {
    /// Structural path of the operator node.
    pub node_id: String,
    /// Normalized operator symbol.
    pub operator: String,
    /// Zero-based position among all operators.
    pub position: usize,
}

/// Descriptor for one integer leaf, in left-to-right reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegerDescriptor {
    pub node_id: String,
    /// Literal text of the integer, including a folded sign.
    pub value: String,
    pub position: usize,
}

/// Descriptor for one mixed-number node, in left-to-right reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixedDescriptor {
    pub node_id: String,
    pub whole: String,
    pub numerator: String,
    pub denominator: String,
    pub position: usize,
}
