// Structural path assignment and ordered enumeration
//
// Paths are the join key between the expression tree and the rendered
// surface, and the address the tutoring backend uses to target a step.
// The scheme must stay stable across releases:
//
// - the root is `root`
// - binary children are `<path>.term[0]` / `<path>.term[1]`, or plain
//   `term[0]` / `term[1]` when the parent is the root
// - fraction children are `<path>.num` / `<path>.den`
// - the unary argument is `<path>.arg`

use super::node::{AstKind, AstNode};
use super::types::{IntegerDescriptor, MixedDescriptor, OperatorDescriptor};

/// Path of the tree root.
pub const ROOT_PATH: &str = "root";

/// Path of a binary operand (`index` is 0 for left, 1 for right).
pub fn term_path(parent: &str, index: usize) -> String {
    let segment = if index == 0 { "term[0]" } else { "term[1]" };
    if parent == ROOT_PATH {
        segment.to_string()
    } else {
        let mut path = String::with_capacity(parent.len() + segment.len() + 1);
        path.push_str(parent);
        path.push('.');
        path.push_str(segment);
        path
    }
}

/// Expected operand paths of the binary operator at `operator_path`.
#[inline]
pub fn operand_paths(operator_path: &str) -> [String; 2] {
    [term_path(operator_path, 0), term_path(operator_path, 1)]
}

fn child_path(parent: &str, segment: &str) -> String {
    let mut path = String::with_capacity(parent.len() + segment.len() + 1);
    path.push_str(parent);
    path.push('.');
    path.push_str(segment);
    path
}

/// Assign a structural path to every node, top-down.
///
/// Paths depend only on tree shape, so running this twice is a no-op.
pub fn augment_with_ids(root: &mut AstNode) -> &mut AstNode {
    assign(root, ROOT_PATH.to_string());
    root
}

fn assign(node: &mut AstNode, path: String) {
    match &mut node.kind {
        AstKind::BinaryOp { left, right, .. } => {
            assign(left, term_path(&path, 0));
            assign(right, term_path(&path, 1));
        },
        AstKind::Fraction {
            numerator,
            denominator,
        } => {
            assign(numerator, child_path(&path, "num"));
            assign(denominator, child_path(&path, "den"));
        },
        AstKind::UnaryOp { arg, .. } => {
            assign(arg, child_path(&path, "arg"));
        },
        AstKind::Integer(_) | AstKind::Mixed { .. } => {},
    }
    node.path = Some(path);
}

/// Visit nodes in reading order: binary left, self, right; fraction
/// numerator then denominator; unary self then argument.
fn walk_in_order<'a>(node: &'a AstNode, visit: &mut impl FnMut(&'a AstNode)) {
    match &node.kind {
        AstKind::BinaryOp { left, right, .. } => {
            walk_in_order(left, visit);
            visit(node);
            walk_in_order(right, visit);
        },
        AstKind::Fraction {
            numerator,
            denominator,
        } => {
            walk_in_order(numerator, visit);
            walk_in_order(denominator, visit);
            visit(node);
        },
        AstKind::UnaryOp { arg, .. } => {
            visit(node);
            walk_in_order(arg, visit);
        },
        AstKind::Integer(_) | AstKind::Mixed { .. } => visit(node),
    }
}

/// All binary and unary operator nodes in reading order.
///
/// Call after [`augment_with_ids`]; the descriptors carry node paths.
pub fn enumerate_operators(ast: &AstNode) -> Vec<OperatorDescriptor> {
    let mut out = Vec::new();
    walk_in_order(ast, &mut |node| {
        if let AstKind::BinaryOp { op, .. } | AstKind::UnaryOp { op, .. } = &node.kind {
            out.push(OperatorDescriptor {
                node_id: node.path().to_string(),
                operator: op.symbol().to_string(),
                position: out.len(),
            });
        }
    });
    out
}

/// All integer leaves in reading order.
pub fn enumerate_integers(ast: &AstNode) -> Vec<IntegerDescriptor> {
    let mut out = Vec::new();
    walk_in_order(ast, &mut |node| {
        if let AstKind::Integer(value) = &node.kind {
            out.push(IntegerDescriptor {
                node_id: node.path().to_string(),
                value: value.clone(),
                position: out.len(),
            });
        }
    });
    out
}

/// All mixed-number nodes in reading order.
pub fn enumerate_mixed(ast: &AstNode) -> Vec<MixedDescriptor> {
    let mut out = Vec::new();
    walk_in_order(ast, &mut |node| {
        if let AstKind::Mixed {
            whole,
            numerator,
            denominator,
        } = &node.kind
        {
            out.push(MixedDescriptor {
                node_id: node.path().to_string(),
                whole: whole.clone(),
                numerator: numerator.clone(),
                denominator: denominator.clone(),
                position: out.len(),
            });
        }
    });
    out
}

/// Find the node at `path`.
pub fn find_by_path<'a>(ast: &'a AstNode, path: &str) -> Option<&'a AstNode> {
    if ast.path() == path {
        return Some(ast);
    }
    match &ast.kind {
        AstKind::BinaryOp { left, right, .. } => {
            find_by_path(left, path).or_else(|| find_by_path(right, path))
        },
        AstKind::Fraction {
            numerator,
            denominator,
        } => find_by_path(numerator, path).or_else(|| find_by_path(denominator, path)),
        AstKind::UnaryOp { arg, .. } => find_by_path(arg, path),
        AstKind::Integer(_) | AstKind::Mixed { .. } => None,
    }
}

/// Check that `path` is well-formed under the path scheme.
///
/// Accepts `root` alone, or a dot-separated sequence of `term[0]`, `term[1]`,
/// `num`, `den` and `arg` segments. A leading `root.` is only allowed before
/// non-term segments (`root.num`, `root.arg`).
pub fn is_valid_path(path: &str) -> bool {
    if path == ROOT_PATH {
        return true;
    }
    let mut segments = path.split('.').peekable();
    if segments.peek() == Some(&ROOT_PATH) {
        segments.next();
        match segments.peek() {
            Some(&"num") | Some(&"den") | Some(&"arg") => {},
            _ => return false,
        }
    }
    let mut any = false;
    for segment in segments {
        if !matches!(segment, "term[0]" | "term[1]" | "num" | "den" | "arg") {
            return false;
        }
        any = true;
    }
    any
}
