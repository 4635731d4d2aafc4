//! AST ↔ surface correlation.
//!
//! Both sides are flattened into reading order and paired positionally.
//! Operators are first bucketed by symbol so that a missing or extra glyph
//! in one bucket does not shift the pairing of the others.

use super::node::{LinkSource, NodeKind, NodeMeta, SurfaceMap, SurfaceNodeId};
use crate::formula::ast::{normalize_symbol, IntegerDescriptor, MixedDescriptor, OperatorDescriptor};
use crate::formula::AnalyzedExpression;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Surface nodes in reading order.
///
/// Children are ordered by their left edge. Consecutive children that share
/// at least `column_overlap_ratio` of the narrower width stack into a column
/// read top to bottom, which puts numerators before denominators.
pub fn linearize(map: &SurfaceMap) -> Vec<SurfaceNodeId> {
    let mut out = Vec::with_capacity(map.nodes.len());
    linearize_into(map, map.root, &mut out);
    out
}

fn linearize_into(map: &SurfaceMap, id: SurfaceNodeId, out: &mut Vec<SurfaceNodeId>) {
    out.push(id);
    for child in reading_order(map, &map.node(id).children) {
        linearize_into(map, child, out);
    }
}

fn reading_order(map: &SurfaceMap, children: &[SurfaceNodeId]) -> Vec<SurfaceNodeId> {
    let ratio = map.config.column_overlap_ratio;
    let mut sorted = children.to_vec();
    sorted.sort_by(|a, b| map.node(*a).bbox.left.total_cmp(&map.node(*b).bbox.left));

    let mut out = Vec::with_capacity(sorted.len());
    let mut column: Vec<SurfaceNodeId> = Vec::new();
    for id in sorted {
        if let Some(&last) = column.last() {
            let stacked = map.node(last).bbox.horizontal_overlap_ratio(&map.node(id).bbox) >= ratio;
            if !stacked {
                flush_column(map, &mut column, &mut out);
            }
        }
        column.push(id);
    }
    flush_column(map, &mut column, &mut out);
    out
}

fn flush_column(map: &SurfaceMap, column: &mut Vec<SurfaceNodeId>, out: &mut Vec<SurfaceNodeId>) {
    column.sort_by(|a, b| map.node(*a).bbox.top.total_cmp(&map.node(*b).bbox.top));
    out.append(column);
}

/// Run every correlation step for `expression`.
pub fn correlate(map: &mut SurfaceMap, expression: &AnalyzedExpression) {
    let order = linearize(map);
    correlate_integers_in(map, &order, &expression.integers);
    correlate_mixed_in(map, &order, &expression.mixed);
    correlate_operators_in(map, &order, &expression.operators, &expression.integers);
}

pub fn correlate_integers(map: &mut SurfaceMap, integers: &[IntegerDescriptor]) {
    let order = linearize(map);
    correlate_integers_in(map, &order, integers);
}

pub fn correlate_mixed(map: &mut SurfaceMap, mixed: &[MixedDescriptor]) {
    let order = linearize(map);
    correlate_mixed_in(map, &order, mixed);
}

/// Pair operator atoms with `operators`.
///
/// `integers` decides which minus signs were folded into a negative integer
/// by the parser; their pairing with numeric leaves is recomputed here, so
/// the integer pass does not have to run first.
pub fn correlate_operators(
    map: &mut SurfaceMap,
    operators: &[OperatorDescriptor],
    integers: &[IntegerDescriptor],
) {
    let order = linearize(map);
    correlate_operators_in(map, &order, operators, integers);
}

/// Numeric nodes with no numeric child, excluding mixed-number fraction parts.
fn numeric_leaves(map: &SurfaceMap, order: &[SurfaceNodeId]) -> Vec<SurfaceNodeId> {
    order
        .iter()
        .copied()
        .filter(|&id| {
            let node = map.node(id);
            node.kind.is_numeric()
                && !node.is_mixed_part()
                && !node.children.iter().any(|&c| map.node(c).kind.is_numeric())
        })
        .collect()
}

fn correlate_integers_in(
    map: &mut SurfaceMap,
    order: &[SurfaceNodeId],
    integers: &[IntegerDescriptor],
) {
    let leaves = numeric_leaves(map, order);
    if leaves.len() != integers.len() {
        tracing::debug!(
            surface = leaves.len(),
            ast = integers.len(),
            "integer correlation shortfall, pairing the common prefix"
        );
    }

    for (&leaf, descriptor) in leaves.iter().zip(integers) {
        link(map, leaf, &descriptor.node_id);
        map.node_mut(leaf).ast_integer_value = Some(descriptor.value.clone());

        let mut current = map.node(leaf).parent;
        while let Some(parent) = current {
            let node = map.node_mut(parent);
            if !node.kind.is_numeric() || node.ast_node_id.is_some() {
                break;
            }
            node.ast_node_id = Some(descriptor.node_id.clone());
            node.ast_integer_value = Some(descriptor.value.clone());
            node.link_source = Some(LinkSource::Correlation);
            current = node.parent;
        }
    }
}

fn correlate_mixed_in(map: &mut SurfaceMap, order: &[SurfaceNodeId], mixed: &[MixedDescriptor]) {
    let wholes: Vec<_> = order
        .iter()
        .copied()
        .filter(|&id| map.node(id).kind == NodeKind::MixedNumber)
        .collect();
    if wholes.len() != mixed.len() {
        tracing::debug!(
            surface = wholes.len(),
            ast = mixed.len(),
            "mixed-number correlation shortfall, pairing the common prefix"
        );
    }

    for (&whole, descriptor) in wholes.iter().zip(mixed) {
        link(map, whole, &descriptor.node_id);
        map.node_mut(whole).ast_integer_value = Some(descriptor.whole.clone());
        if let Some(NodeMeta::MixedWhole {
            numerator, denominator, ..
        }) = map.node(whole).meta.clone()
        {
            let parts = [
                (numerator, &descriptor.numerator),
                (denominator, &descriptor.denominator),
            ];
            for (part, value) in parts {
                if let Some(part) = part {
                    link(map, part, &descriptor.node_id);
                    map.node_mut(part).ast_integer_value = Some(value.clone());
                }
            }
        }
    }
}

/// Bucket key of a surface operator: normalized arithmetic symbol or the
/// relation glyph itself.
fn surface_symbol(map: &SurfaceMap, id: SurfaceNodeId) -> String {
    let node = map.node(id);
    match node.kind {
        NodeKind::Relation => node.text.trim().to_string(),
        _ => normalize_symbol(&node.text).to_string(),
    }
}

fn correlate_operators_in(
    map: &mut SurfaceMap,
    order: &[SurfaceNodeId],
    operators: &[OperatorDescriptor],
    integers: &[IntegerDescriptor],
) {
    let atoms: HashSet<SurfaceNodeId> = map.atoms.iter().copied().collect();
    let atom_order: Vec<SurfaceNodeId> =
        order.iter().copied().filter(|id| atoms.contains(id)).collect();
    let negative: HashMap<SurfaceNodeId, &str> = numeric_leaves(map, order)
        .into_iter()
        .zip(integers)
        .filter(|(_, descriptor)| descriptor.value.starts_with('-'))
        .map(|(leaf, descriptor)| (leaf, descriptor.node_id.as_str()))
        .collect();

    let mut surface: BTreeMap<String, Vec<SurfaceNodeId>> = BTreeMap::new();
    for (position, &id) in atom_order.iter().enumerate() {
        let node = map.node(id);
        if !node.kind.is_correlated_operator() || !node.children.is_empty() {
            continue;
        }
        // A sign right before the digits of a negative integer was folded into
        // it by the parser. Only a sign glyph can sit there, so signs misread
        // as binary are covered too.
        let folded = atom_order.get(position + 1).and_then(|next| negative.get(next));
        if let Some(&node_id) = folded.filter(|_| node.is_minus()) {
            link(map, id, node_id);
            continue;
        }
        surface.entry(surface_symbol(map, id)).or_default().push(id);
    }

    let mut ast: BTreeMap<&str, Vec<&OperatorDescriptor>> = BTreeMap::new();
    for descriptor in operators {
        ast.entry(descriptor.operator.as_str()).or_default().push(descriptor);
    }

    for (symbol, nodes) in &surface {
        let descriptors = ast.get(symbol.as_str()).map(Vec::as_slice).unwrap_or_default();
        if nodes.len() != descriptors.len() {
            tracing::debug!(
                symbol = symbol.as_str(),
                surface = nodes.len(),
                ast = descriptors.len(),
                "operator correlation shortfall, pairing the common prefix"
            );
        }
        for (index, (&id, descriptor)) in nodes.iter().zip(descriptors).enumerate() {
            let earlier = descriptors[..index]
                .iter()
                .filter(|d| d.node_id == descriptor.node_id)
                .count();
            link(map, id, &descriptor.node_id);
            let node = map.node_mut(id);
            node.ast_operator = Some(descriptor.operator.clone());
            node.ast_operator_index = Some(earlier);
        }
    }
    for (symbol, descriptors) in &ast {
        if !surface.contains_key(*symbol) {
            tracing::debug!(symbol, ast = descriptors.len(), "no surface operators for symbol");
        }
    }
}

fn link(map: &mut SurfaceMap, id: SurfaceNodeId, ast_id: &str) {
    let node = map.node_mut(id);
    node.ast_node_id = Some(ast_id.to_string());
    node.link_source = Some(LinkSource::Correlation);
}
