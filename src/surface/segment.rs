//! Splitting of merged text runs.
//!
//! Renderers occasionally merge adjacent symbols into one text node
//! (`"2+3"`). The segmenter recovers the individual tokens so each gets its
//! own surface node.

use super::classify::is_greek;
use crate::formula::parser::is_operator_char;
use serde::Serialize;
use smallvec::SmallVec;

/// Token class of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Num,
    Op,
    Var,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
}

impl Segment {
    fn new(kind: SegmentKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Split `text` into numeric runs, single operators and single letters.
///
/// Digits and `.` accumulate into one `num` run; whitespace and any other
/// character end the run and are dropped.
pub fn segment(text: &str) -> SmallVec<[Segment; 4]> {
    let mut out = SmallVec::new();
    let mut number = String::new();

    let flush = |number: &mut String, out: &mut SmallVec<[Segment; 4]>| {
        if !number.is_empty() {
            out.push(Segment::new(SegmentKind::Num, std::mem::take(number)));
        }
    };

    for ch in text.chars() {
        if ch.is_ascii_digit() || (ch == '.' && !number.is_empty()) {
            number.push(ch);
            continue;
        }
        flush(&mut number, &mut out);
        if is_operator_char(ch) {
            out.push(Segment::new(SegmentKind::Op, ch));
        } else if ch.is_ascii_alphabetic() || is_greek(ch) {
            out.push(Segment::new(SegmentKind::Var, ch));
        }
    }
    flush(&mut number, &mut out);
    out
}
