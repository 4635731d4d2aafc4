//! Pixel and structural queries against a finished surface map.

use super::node::{NodeKind, Role, SurfaceMap, SurfaceNodeId};
use crate::formula::ast::operand_paths;

/// Smallest-area atom under the viewport point `(x, y)`.
///
/// Operator atoms are hit within `operator_hit_padding` above and below
/// their box. Fraction bars are excluded: their box already carries
/// `frac_bar_margin`. Ties keep the atom that comes first in spatial order.
pub fn hit_test_point(map: &SurfaceMap, x: f64, y: f64) -> Option<SurfaceNodeId> {
    let (x, y) = (x - map.origin.0, y - map.origin.1);
    let padding = map.config.operator_hit_padding;

    let mut best: Option<(SurfaceNodeId, f64)> = None;
    for &id in &map.atoms {
        let node = map.node(id);
        let bbox = if node.role == Role::Operator && node.kind != NodeKind::FracBar {
            node.bbox.expand_vertical(padding)
        } else {
            node.bbox
        };
        if !bbox.contains(x, y) {
            continue;
        }
        let area = node.bbox.area();
        if best.is_none_or(|(_, smallest)| area < smallest) {
            best = Some((id, area));
        }
    }
    best.map(|(id, _)| id)
}

/// Surface nodes standing for the two operands of a binary operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Operands {
    pub left: Option<SurfaceNodeId>,
    pub right: Option<SurfaceNodeId>,
}

impl Operands {
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}

/// Locate the operands of the operator at `operator_path`.
///
/// Atoms linked to the expected child paths are preferred (exact id first,
/// then the first atom inside the child's subtree). Sides still missing are
/// filled geometrically around the operator's own atom, which must have
/// been paired with an AST operator. A sign folded into a negative integer
/// shares the integer's path but is not an anchor.
pub fn find_operands(map: &SurfaceMap, operator_path: &str) -> Operands {
    let [left_path, right_path] = operand_paths(operator_path);
    let mut operands = Operands {
        left: find_linked(map, &left_path),
        right: find_linked(map, &right_path),
    };
    if operands.is_complete() {
        return operands;
    }

    let Some(operator) = map
        .atoms
        .iter()
        .copied()
        .find(|&id| {
            let node = map.node(id);
            node.role == Role::Operator
                && node.ast_operator.is_some()
                && node.ast_node_id.as_deref() == Some(operator_path)
        })
    else {
        tracing::trace!(operator_path, "operator has no linked atom");
        return operands;
    };

    let center = map.node(operator).bbox;
    let (cx, cy) = (center.center_x(), center.center_y());
    let tolerance = map.config.operand_vertical_tolerance;
    let candidates: Vec<SurfaceNodeId> = map
        .atoms
        .iter()
        .copied()
        .filter(|&id| {
            let node = map.node(id);
            node.kind.is_operand() && (node.bbox.center_y() - cy).abs() <= tolerance
        })
        .collect();

    if operands.left.is_none() {
        operands.left = candidates
            .iter()
            .copied()
            .filter(|&id| map.node(id).bbox.right <= cx)
            .max_by(|&a, &b| map.node(a).bbox.right.total_cmp(&map.node(b).bbox.right));
    }
    if operands.right.is_none() {
        operands.right = candidates
            .iter()
            .copied()
            .filter(|&id| map.node(id).bbox.left >= cx)
            .min_by(|&a, &b| map.node(a).bbox.left.total_cmp(&map.node(b).bbox.left));
    }
    operands
}

fn find_linked(map: &SurfaceMap, path: &str) -> Option<SurfaceNodeId> {
    let linked = |id: SurfaceNodeId| map.node(id).ast_node_id.as_deref();
    map.atoms
        .iter()
        .find(|&&id| linked(id) == Some(path))
        .or_else(|| {
            let inside =
                |ast: &str| ast.strip_prefix(path).is_some_and(|rest| rest.starts_with('.'));
            map.atoms.iter().find(|&&id| linked(id).is_some_and(inside))
        })
        .copied()
}
