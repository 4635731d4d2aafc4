// Helpers for writing and removing `\htmlData` annotations

use memchr::memmem;

/// The annotation command emitted around every instrumented element.
pub const ANNOTATION_COMMAND: &str = "\\htmlData";

/// Strip characters that would break out of an annotation argument.
#[inline]
pub fn sanitize_path(path: &str, buffer: &mut String) {
    buffer.extend(path.chars().filter(|c| !matches!(c, '{' | '}' | '\\')));
}

/// Byte index just past the brace group opening at `start`, if balanced.
fn skip_group(bytes: &[u8], start: usize) -> Option<usize> {
    if bytes.get(start) != Some(&b'{') {
        return None;
    }
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            },
            _ => {},
        }
    }
    None
}

/// Remove every `\htmlData{...}{body}` wrapper, keeping `body`.
///
/// Unbalanced annotations are left untouched.
pub fn strip_annotations(latex: &str) -> String {
    let bytes = latex.as_bytes();
    let finder = memmem::Finder::new(ANNOTATION_COMMAND.as_bytes());
    // Byte ranges to drop: the command with its head group and the body's
    // opening brace, and separately the body's closing brace.
    let mut removed: Vec<(usize, usize)> = Vec::new();
    let mut i = 0;

    while let Some(rel) = finder.find(&bytes[i..]) {
        let at = i + rel;
        let head_start = at + ANNOTATION_COMMAND.len();
        let body = skip_group(bytes, head_start)
            .and_then(|body_start| skip_group(bytes, body_start).map(|end| (body_start, end)));
        match body {
            Some((body_start, body_end)) => {
                removed.push((at, body_start + 1));
                removed.push((body_end - 1, body_end));
                // Continue inside the body to catch nested annotations.
                i = body_start + 1;
            },
            None => i = head_start,
        }
    }

    removed.sort_unstable();
    let mut out = String::with_capacity(latex.len());
    let mut cursor = 0;
    for (start, end) in removed {
        out.push_str(&latex[cursor..start]);
        cursor = end;
    }
    out.push_str(&latex[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        let mut buf = String::new();
        sanitize_path("term[0].{num}\\", &mut buf);
        assert_eq!(buf, "term[0].num");
    }

    #[test]
    fn test_strip_flat() {
        let latex = concat!(
            "\\htmlData{ast-id=term[0], role=number}{2} ",
            "\\htmlData{ast-id=root, role=operator, operator=+}{+} 3",
        );
        assert_eq!(strip_annotations(latex), "2 + 3");
    }

    #[test]
    fn test_strip_nested() {
        let latex = concat!(
            "\\htmlData{ast-id=root, role=fraction}",
            "{\\frac{\\htmlData{ast-id=root.num, role=number}{1}}{2}}",
        );
        assert_eq!(strip_annotations(latex), "\\frac{1}{2}");
    }

    #[test]
    fn test_strip_leaves_plain_latex() {
        assert_eq!(strip_annotations("\\frac{1}{2}+3"), "\\frac{1}{2}+3");
        assert_eq!(strip_annotations("\\htmlData{broken"), "\\htmlData{broken");
    }
}
