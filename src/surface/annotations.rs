//! Links read back from rendered `\htmlData` attributes.
//!
//! Positional correlation can leave atoms unlinked when the renderer drops or
//! merges glyphs. The instrumented LaTeX also carries every path as
//! `data-ast-id` on the element that wraps the typeset body, so an unlinked
//! atom can still borrow the path of its nearest annotated ancestor, as long
//! as the annotation's role fits the atom's kind.

use super::element::VisualTree;
use super::node::{LinkSource, NodeKind, SurfaceMap, SurfaceNode};
use crate::formula::latex::{attrs, AnnotationRole};

fn role_fits(role: AnnotationRole, node: &SurfaceNode) -> bool {
    match role {
        AnnotationRole::Number => node.kind.is_numeric(),
        AnnotationRole::Operator => node.kind.is_correlated_operator(),
        AnnotationRole::Fraction => matches!(node.kind, NodeKind::FracBar | NodeKind::Fraction),
        AnnotationRole::Mixed => node.kind == NodeKind::MixedNumber || node.is_mixed_part(),
    }
}

/// Fill missing `ast_node_id`s from annotation attributes.
///
/// Returns the number of atoms that gained a link.
pub fn recover_annotations(map: &mut SurfaceMap, tree: &VisualTree) -> usize {
    let mut recovered = 0;
    for id in map.atoms.clone() {
        let node = map.node(id);
        if node.ast_node_id.is_some() {
            continue;
        }
        let Some(mut current) = node.source_element else {
            continue;
        };

        // Nearest annotated ancestor, the element itself included.
        let annotated = loop {
            let Some(element) = tree.get(current) else {
                break None;
            };
            if element.attribute(attrs::AST_ID).is_some() {
                break Some(element);
            }
            match element.parent {
                Some(parent) => current = parent,
                None => break None,
            }
        };
        let Some(element) = annotated else {
            continue;
        };

        let Some(role) = element.attribute(attrs::ROLE).and_then(AnnotationRole::parse) else {
            continue;
        };
        if !role_fits(role, node) {
            continue;
        }
        let ast_id = element.attribute(attrs::AST_ID).map(str::to_string);
        let operator = element.attribute(attrs::OPERATOR).map(str::to_string);

        let node = map.node_mut(id);
        node.ast_node_id = ast_id;
        node.link_source = Some(LinkSource::Annotation);
        if role == AnnotationRole::Operator && node.ast_operator.is_none() {
            node.ast_operator = operator;
        }
        recovered += 1;
    }

    tracing::trace!(recovered, "annotation links recovered");
    recovered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::builder::build;
    use crate::surface::element::VisualElement;
    use crate::surface::geometry::BBox;
    use crate::surface::SurfaceConfig;

    fn annotated(ast_id: &str, role: &str) -> VisualElement {
        VisualElement::new(&["enclosing"], BBox::from_xywh(0.0, 0.0, 20.0, 20.0))
            .with_attribute(attrs::AST_ID, ast_id)
            .with_attribute(attrs::ROLE, role)
    }

    #[test]
    fn test_recovers_from_wrapper() {
        let mut tree = VisualTree::new(
            VisualElement::new(&["katex-html"], BBox::new(0.0, 0.0, 100.0, 40.0)),
        );
        let base = tree.push(
            tree.root(),
            VisualElement::new(&["base"], BBox::new(0.0, 0.0, 100.0, 40.0)),
        );
        let wrapper = tree.push(base, annotated("term[1]", "number"));
        tree.push(
            wrapper,
            VisualElement::new(&["mord"], BBox::from_xywh(2.0, 2.0, 10.0, 16.0)).with_text("3"),
        );
        let op = tree.push(
            base,
            annotated("root", "operator").with_attribute(attrs::OPERATOR, "+"),
        );
        tree.push(
            op,
            VisualElement::new(&["mbin"], BBox::from_xywh(30.0, 2.0, 10.0, 16.0)).with_text("+"),
        );

        let mut map = build(&tree, &SurfaceConfig::default());
        assert_eq!(recover_annotations(&mut map, &tree), 2);

        let three = map.atoms().find(|n| n.text == "3").unwrap();
        assert_eq!(three.ast_node_id.as_deref(), Some("term[1]"));
        assert_eq!(three.link_source, Some(LinkSource::Annotation));
        let plus = map.atoms().find(|n| n.text == "+").unwrap();
        assert_eq!(plus.ast_operator.as_deref(), Some("+"));
    }

    #[test]
    fn test_role_mismatch_is_ignored() {
        let mut tree = VisualTree::new(
            VisualElement::new(&["katex-html"], BBox::new(0.0, 0.0, 100.0, 40.0)),
        );
        let base = tree.push(
            tree.root(),
            VisualElement::new(&["base"], BBox::new(0.0, 0.0, 100.0, 40.0)),
        );
        let frac = tree.push(base, annotated("root", "fraction"));
        tree.push(
            frac,
            VisualElement::new(&["mord"], BBox::from_xywh(2.0, 2.0, 10.0, 16.0)).with_text("−"),
        );

        let mut map = build(&tree, &SurfaceConfig::default());
        assert_eq!(recover_annotations(&mut map, &tree), 0);
        assert!(map.atoms().all(|n| n.ast_node_id.is_none()));
    }
}
