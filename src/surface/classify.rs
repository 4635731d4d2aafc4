//! Element classification.
//!
//! Maps one visual element (its class tags and own text) onto a semantic
//! surface kind. The checks run in a fixed order; the first match wins.

use super::element::ClassTags;
use super::node::{NodeKind, Role};
use crate::formula::parser::is_operator_char;

/// Result of classifying one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: NodeKind,
    pub role: Role,
    /// Prefix for generated surface ids (`num-0`, `op-3`, ...)
    pub id_prefix: &'static str,
    /// Whether the node is an interactive leaf candidate
    pub atomic: bool,
}

impl Classification {
    const fn atomic(kind: NodeKind) -> Self {
        Self {
            kind,
            role: kind.role(),
            id_prefix: kind.id_prefix(),
            atomic: true,
        }
    }

    const fn container(kind: NodeKind) -> Self {
        Self {
            kind,
            role: kind.role(),
            id_prefix: kind.id_prefix(),
            atomic: false,
        }
    }
}

/// Classify an element by its tags and own text.
pub fn classify(tags: ClassTags, text: &str) -> Classification {
    let text = text.trim();

    if is_bare_number(text) {
        return Classification::atomic(NodeKind::Num);
    }
    if is_single_letter(text) {
        return Classification::atomic(NodeKind::Var);
    }
    if is_single_operator(text) || tags.contains(ClassTags::BIN) {
        return Classification::atomic(NodeKind::BinaryOp);
    }
    if tags.contains(ClassTags::REL) {
        return Classification::atomic(NodeKind::Relation);
    }
    match text {
        "(" | "[" => return Classification::atomic(NodeKind::ParenOpen),
        ")" | "]" => return Classification::atomic(NodeKind::ParenClose),
        _ => {},
    }
    if tags.contains(ClassTags::OPEN) {
        return Classification::atomic(NodeKind::ParenOpen);
    }
    if tags.contains(ClassTags::CLOSE) {
        return Classification::atomic(NodeKind::ParenClose);
    }
    if tags.contains(ClassTags::FRAC_LINE) {
        return Classification::atomic(NodeKind::FracBar);
    }
    if tags.contains(ClassTags::FRAC) {
        return Classification::container(NodeKind::Fraction);
    }

    let has_digit = text.bytes().any(|b| b.is_ascii_digit());
    if has_digit && !text.chars().any(|c| c.is_alphabetic() || is_operator_char(c)) {
        return Classification::atomic(NodeKind::Num);
    }
    if text.chars().any(is_greek) {
        return Classification::atomic(NodeKind::Var);
    }
    Classification::container(NodeKind::Other)
}

/// Layout wrappers that are walked through without creating nodes.
#[inline]
pub fn is_structural(tags: ClassTags) -> bool {
    tags.intersects(ClassTags::STRUCTURAL)
}

/// Text that needs segmentation: a digit and an operator glyph in one run.
pub fn is_mixed_content(text: &str) -> bool {
    let text = text.trim();
    text.chars().count() > 1
        && text.bytes().any(|b| b.is_ascii_digit())
        && text.chars().any(is_operator_char)
}

/// Greek letters, including the variant forms the renderer emits.
#[inline]
pub fn is_greek(ch: char) -> bool {
    matches!(
        ch,
        '\u{0391}'..='\u{03A9}' | '\u{03B1}'..='\u{03C9}' | 'ϑ' | 'ϕ' | 'ϖ' | 'ϵ' | 'ϱ'
    )
}

/// `123` or `12.5`.
pub fn is_bare_number(text: &str) -> bool {
    let mut parts = text.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    match parts.next() {
        None => all_digits(whole),
        Some(fraction) => all_digits(whole) && all_digits(fraction),
    }
}

/// `1.5` but not `15`.
pub fn is_decimal(text: &str) -> bool {
    text.contains('.') && is_bare_number(text)
}

fn is_single_letter(text: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_ascii_alphabetic() || is_greek(c),
        _ => false,
    }
}

fn is_single_operator(text: &str) -> bool {
    let mut chars = text.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if is_operator_char(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(classes: &[&str], text: &str) -> NodeKind {
        classify(ClassTags::from_class_names(classes.iter().copied()), text).kind
    }

    #[test]
    fn test_text_precedence() {
        assert_eq!(kind(&["mord"], "42"), NodeKind::Num);
        assert_eq!(kind(&["mord"], "4.2"), NodeKind::Num);
        assert_eq!(kind(&["mord", "mathnormal"], "x"), NodeKind::Var);
        assert_eq!(kind(&["mord"], "α"), NodeKind::Var);
        assert_eq!(kind(&["mord"], "−"), NodeKind::BinaryOp);
        assert_eq!(kind(&["mbin"], "±"), NodeKind::BinaryOp);
        assert_eq!(kind(&["mrel"], "="), NodeKind::Relation);
        assert_eq!(kind(&["mopen"], "("), NodeKind::ParenOpen);
        assert_eq!(kind(&[], "]"), NodeKind::ParenClose);
    }

    #[test]
    fn test_tag_kinds() {
        let bar = classify(ClassTags::FRAC_LINE, "");
        assert_eq!(bar.kind, NodeKind::FracBar);
        assert!(bar.atomic);

        let frac = classify(ClassTags::FRAC, "");
        assert_eq!(frac.kind, NodeKind::Fraction);
        assert!(!frac.atomic);
        assert_eq!(frac.role, Role::Container);
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(kind(&["mord"], "1,000"), NodeKind::Num);
        assert_eq!(kind(&["mord"], "2α"), NodeKind::Var);
        let other = classify(ClassTags::empty(), "sin");
        assert_eq!(other.kind, NodeKind::Other);
        assert!(!other.atomic);
    }

    #[test]
    fn test_number_predicates() {
        assert!(is_bare_number("007"));
        assert!(!is_bare_number("1."));
        assert!(!is_bare_number(".5"));
        assert!(is_decimal("0.25"));
        assert!(!is_decimal("25"));
        assert!(is_mixed_content("2+3"));
        assert!(!is_mixed_content("+"));
        assert!(!is_mixed_content("23"));
    }

    #[test]
    fn test_structural() {
        assert!(is_structural(ClassTags::from_class_names(["vlist-t", "vlist-t2"])));
        assert!(is_structural(ClassTags::from_class_names(["pstrut"])));
        assert!(!is_structural(ClassTags::from_class_names(["mord"])));
    }
}
