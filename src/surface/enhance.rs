//! Post-processing passes over the atoms of a freshly built map.
//!
//! The passes run in a fixed order: later passes rely on the spatial order
//! and kinds established by earlier ones.

use super::classify::{is_decimal, is_greek};
use super::node::{MixedPart, NodeKind, NodeMeta, SurfaceMap, SurfaceNodeId};

/// Run every pass once. Calling it again on the same map is a no-op.
pub fn enhance(map: &mut SurfaceMap) {
    if map.enhanced {
        return;
    }
    widen_fraction_bars(map);
    sort_and_reclassify(map);
    disambiguate_minus(map);
    detect_mixed_numbers(map);
    assign_operator_indices(map);
    map.enhanced = true;
}

fn widen_fraction_bars(map: &mut SurfaceMap) {
    let margin = map.config.frac_bar_margin;
    for id in map.atoms.clone() {
        let node = map.node_mut(id);
        if node.kind == NodeKind::FracBar {
            node.bbox = node.bbox.expand_vertical(margin);
        }
    }
}

fn sort_and_reclassify(map: &mut SurfaceMap) {
    let mut atoms = std::mem::take(&mut map.atoms);
    atoms.sort_by(|a, b| {
        let (a, b) = (&map.node(*a).bbox, &map.node(*b).bbox);
        a.left.total_cmp(&b.left).then(a.top.total_cmp(&b.top))
    });

    for &id in &atoms {
        let node = map.node_mut(id);
        if !node.text.is_empty() && node.text.chars().all(is_greek) {
            node.set_kind(NodeKind::Var);
        } else if is_decimal(&node.text) {
            node.set_kind(NodeKind::Decimal);
        }
    }
    map.atoms = atoms;
}

/// A minus is unary unless its nearest same-line predecessor is an operand.
fn disambiguate_minus(map: &mut SurfaceMap) {
    let ratio = map.config.minus_overlap_ratio;
    for index in 0..map.atoms.len() {
        let id = map.atoms[index];
        let minus = map.node(id);
        if minus.kind != NodeKind::BinaryOp || !minus.is_minus() {
            continue;
        }
        let bbox = minus.bbox;

        let predecessor = map.atoms[..index]
            .iter()
            .map(|&other| map.node(other))
            .filter(|other| other.bbox.center_x() < bbox.center_x())
            .filter(|other| other.bbox.vertical_overlap_ratio(&bbox) >= ratio)
            .max_by(|a, b| a.bbox.right.total_cmp(&b.bbox.right));

        let unary = match predecessor {
            None => true,
            Some(node) => matches!(
                node.kind,
                NodeKind::BinaryOp
                    | NodeKind::MinusBinary
                    | NodeKind::MinusUnary
                    | NodeKind::Relation
                    | NodeKind::ParenOpen
                    | NodeKind::FracBar
            ),
        };
        map.node_mut(id)
            .set_kind(if unary { NodeKind::MinusUnary } else { NodeKind::MinusBinary });
    }
}

/// Num atoms directly followed by a fraction bar become mixed numbers.
///
/// The bar must sit inside the whole number's next sibling (or be that
/// sibling), so bars of unrelated fractions that happen to be close by are
/// never taken.
fn detect_mixed_numbers(map: &mut SurfaceMap) {
    let gap = map.config.mixed_number_gap;
    let bars: Vec<SurfaceNodeId> = map
        .atoms
        .iter()
        .copied()
        .filter(|&id| map.node(id).kind == NodeKind::FracBar)
        .collect();

    for index in 0..map.atoms.len() {
        let id = map.atoms[index];
        let whole = map.node(id);
        if !whole.kind.is_numeric() || whole.is_mixed_part() {
            continue;
        }
        let (right, mid_y) = (whole.bbox.right, whole.bbox.center_y());
        let Some(sibling) = next_sibling(map, id) else {
            continue;
        };

        let Some(bar) = bars.iter().copied().find(|&bar| {
            let b = map.node(bar).bbox;
            let distance = b.left - right;
            (0.0..=gap).contains(&distance)
                && b.top <= mid_y
                && mid_y <= b.bottom
                && is_within(map, bar, sibling)
        }) else {
            continue;
        };

        let scope = (sibling != bar).then_some(sibling);
        let numerator = fraction_part(map, bar, id, scope, MixedPart::Numerator);
        let denominator = fraction_part(map, bar, id, scope, MixedPart::Denominator);
        let parts = [
            (numerator, MixedPart::Numerator),
            (denominator, MixedPart::Denominator),
        ];
        for (part, which) in parts {
            if let Some(part) = part {
                map.node_mut(part).meta = Some(NodeMeta::MixedPart { whole: id, part: which });
            }
        }

        let node = map.node_mut(id);
        node.set_kind(NodeKind::MixedNumber);
        node.meta = Some(NodeMeta::MixedWhole {
            bar,
            numerator,
            denominator,
        });
    }
}

/// The sibling laid out immediately to the right of `id`.
fn next_sibling(map: &SurfaceMap, id: SurfaceNodeId) -> Option<SurfaceNodeId> {
    let node = map.node(id);
    let right = node.bbox.right;
    map.node(node.parent?)
        .children
        .iter()
        .copied()
        .filter(|&child| child != id && map.node(child).bbox.left >= right)
        .min_by(|&a, &b| map.node(a).bbox.left.total_cmp(&map.node(b).bbox.left))
}

/// Whether `id` is `ancestor` or lies in its subtree.
fn is_within(map: &SurfaceMap, id: SurfaceNodeId, ancestor: SurfaceNodeId) -> bool {
    let mut current = Some(id);
    while let Some(node) = current {
        if node == ancestor {
            return true;
        }
        current = map.node(node).parent;
    }
    false
}

/// Closest Num atom above (numerator) or below (denominator) `bar`,
/// horizontally centered within it and inside `scope` when given.
fn fraction_part(
    map: &SurfaceMap,
    bar: SurfaceNodeId,
    whole: SurfaceNodeId,
    scope: Option<SurfaceNodeId>,
    part: MixedPart,
) -> Option<SurfaceNodeId> {
    let span = map.node(bar).bbox;
    let axis = span.center_y();
    let candidates = map.atoms.iter().copied().filter(|&id| {
        let node = map.node(id);
        id != whole
            && node.kind == NodeKind::Num
            && !node.is_mixed_part()
            && (span.left..=span.right).contains(&node.bbox.center_x())
            && scope.is_none_or(|scope| is_within(map, id, scope))
    });
    let bottom = |id: SurfaceNodeId| map.node(id).bbox.bottom;
    let top = |id: SurfaceNodeId| map.node(id).bbox.top;
    match part {
        MixedPart::Numerator => candidates
            .filter(|&id| map.node(id).bbox.center_y() < axis)
            .max_by(|&a, &b| bottom(a).total_cmp(&bottom(b))),
        MixedPart::Denominator => candidates
            .filter(|&id| map.node(id).bbox.center_y() > axis)
            .min_by(|&a, &b| top(a).total_cmp(&top(b))),
    }
}

fn assign_operator_indices(map: &mut SurfaceMap) {
    let mut next = 0;
    for id in map.atoms.clone() {
        let node = map.node_mut(id);
        if node.kind.is_operator_slot() {
            node.operator_index = Some(next);
            next += 1;
        }
    }
}
