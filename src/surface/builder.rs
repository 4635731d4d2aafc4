//! Surface-map construction from a rendered visual tree.

use super::classify::{classify, is_mixed_content, is_structural};
use super::config::SurfaceConfig;
use super::element::{ElementId, VisualTree};
use super::node::{NodeKind, Role, SurfaceMap, SurfaceNode, SurfaceNodeId};
use super::geometry::BBox;
use super::segment::{segment, SegmentKind};
use std::collections::HashMap;

/// Single-pass builder over one visual tree.
pub struct SurfaceMapBuilder<'t> {
    tree: &'t VisualTree,
    config: SurfaceConfig,
    map: SurfaceMap,
    counters: HashMap<&'static str, usize>,
}

impl<'t> SurfaceMapBuilder<'t> {
    pub fn new(tree: &'t VisualTree, config: SurfaceConfig) -> Self {
        let container = tree.element(tree.root()).bbox;
        let origin = (container.left, container.top);

        let mut root = SurfaceNode::new(
            "root".to_string(),
            NodeKind::Other,
            container.relative_to(origin.0, origin.1),
        );
        root.role = Role::Container;
        root.source_element = Some(tree.root());

        let mut element_index = HashMap::new();
        element_index.insert(tree.root(), SurfaceNodeId(0));

        Self {
            tree,
            map: SurfaceMap {
                nodes: vec![root],
                root: SurfaceNodeId(0),
                atoms: Vec::new(),
                element_index,
                origin,
                config: config.clone(),
                enhanced: false,
            },
            config,
            counters: HashMap::new(),
        }
    }

    /// Walk the tree from its `base` groups and return the raw map.
    pub fn build(mut self) -> SurfaceMap {
        let root = self.map.root;
        let bases = self.tree.base_groups();
        if bases.is_empty() {
            for &child in &self.tree.element(self.tree.root()).children {
                self.visit(child, root);
            }
        } else {
            for base in bases {
                self.visit(base, root);
            }
        }

        tracing::debug!(
            nodes = self.map.nodes.len(),
            atoms = self.map.atoms.len(),
            "surface map built"
        );
        self.map
    }

    fn visit(&mut self, id: ElementId, parent: SurfaceNodeId) {
        let tree = self.tree;
        let element = tree.element(id);

        if is_structural(element.tags) {
            for &child in &element.children {
                self.visit(child, parent);
            }
            return;
        }

        let text = element.text.as_deref().unwrap_or_default().trim();
        if element.is_leaf() && is_mixed_content(text) {
            self.push_segments(id, text, parent);
            return;
        }

        let class = classify(element.tags, text);
        let negligible = element.bbox.area() < self.config.min_element_area;
        if class.kind == NodeKind::Other && text.is_empty() && negligible {
            for &child in &element.children {
                self.visit(child, parent);
            }
            return;
        }

        let mut node = SurfaceNode::new(
            self.next_id(class.id_prefix),
            class.kind,
            self.relative(element.bbox),
        );
        node.role = class.role;
        node.text = text.to_string();
        node.source_element = Some(id);

        let atom = class.atomic && (!text.is_empty() || class.kind == NodeKind::FracBar);
        let node_id = self.insert(id, parent, node, atom);
        for &child in &element.children {
            self.visit(child, node_id);
        }
    }

    /// One synthetic node per segment, each taking an equal horizontal slice.
    fn push_segments(&mut self, id: ElementId, text: &str, parent: SurfaceNodeId) {
        let bbox = self.relative(self.tree.element(id).bbox);
        let segments = segment(text);
        let count = segments.len();
        for (index, seg) in segments.into_iter().enumerate() {
            let kind = match seg.kind {
                SegmentKind::Num => NodeKind::Num,
                SegmentKind::Op => NodeKind::BinaryOp,
                SegmentKind::Var => NodeKind::Var,
            };
            let mut node = SurfaceNode::new(
                self.next_id(kind.id_prefix()),
                kind,
                bbox.horizontal_slice(index, count),
            );
            node.text = seg.text;
            node.source_element = Some(id);
            node.synthetic = true;
            self.insert(id, parent, node, true);
        }
    }

    fn insert(
        &mut self,
        element: ElementId,
        parent: SurfaceNodeId,
        node: SurfaceNode,
        atom: bool,
    ) -> SurfaceNodeId {
        let node_id = self.map.push(parent, node);
        self.map.element_index.insert(element, node_id);
        if atom {
            self.map.atoms.push(node_id);
        }
        node_id
    }

    fn next_id(&mut self, prefix: &'static str) -> String {
        let counter = self.counters.entry(prefix).or_default();
        let mut buffer = itoa::Buffer::new();
        let digits = buffer.format(*counter);
        *counter += 1;

        let mut id = String::with_capacity(prefix.len() + 1 + digits.len());
        id.push_str(prefix);
        id.push('-');
        id.push_str(digits);
        id
    }

    #[inline]
    fn relative(&self, bbox: BBox) -> BBox {
        bbox.relative_to(self.map.origin.0, self.map.origin.1)
    }
}

/// Build the raw surface map of `tree` (no enhancement or correlation).
pub fn build(tree: &VisualTree, config: &SurfaceConfig) -> SurfaceMap {
    SurfaceMapBuilder::new(tree, config.clone()).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::element::VisualElement;

    fn leaf(classes: &[&str], text: &str, x: f64, w: f64) -> VisualElement {
        VisualElement::new(classes, BBox::from_xywh(x, 60.0, w, 20.0)).with_text(text)
    }

    fn tree_with(children: Vec<VisualElement>) -> VisualTree {
        let mut tree = VisualTree::new(
            VisualElement::new(&["katex-html"], BBox::new(100.0, 50.0, 300.0, 90.0)),
        );
        let base = tree.push(
            tree.root(),
            VisualElement::new(&["base"], BBox::new(100.0, 50.0, 300.0, 90.0)),
        );
        tree.push(base, VisualElement::new(&["strut"], BBox::from_xywh(100.0, 50.0, 0.0, 40.0)));
        for child in children {
            tree.push(base, child);
        }
        tree
    }

    #[test]
    fn test_atoms_and_relative_boxes() {
        let tree = tree_with(vec![
            leaf(&["mord"], "2", 110.0, 10.0),
            leaf(&["mbin"], "+", 125.0, 12.0),
            leaf(&["mord"], "3", 142.0, 10.0),
        ]);
        let map = build(&tree, &SurfaceConfig::default());

        let ids: Vec<_> = map.atoms().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["num-0", "op-0", "num-1"]);
        let first = map.atoms().next().unwrap();
        assert_eq!(first.bbox, BBox::new(10.0, 10.0, 20.0, 30.0));
        assert_eq!(first.parent, Some(map.root()));
        assert_eq!(map.origin(), (100.0, 50.0));
    }

    #[test]
    fn test_merged_text_is_segmented() {
        let tree = tree_with(vec![leaf(&["mord"], "12+3", 100.0, 30.0)]);
        let map = build(&tree, &SurfaceConfig::default());

        let atoms: Vec<_> = map.atoms().collect();
        assert_eq!(atoms.len(), 3);
        assert!(atoms.iter().all(|n| n.synthetic));
        assert_eq!(atoms[1].kind, NodeKind::BinaryOp);
        assert_eq!(atoms[1].bbox.left, atoms[0].bbox.right);
        assert_eq!(atoms[2].bbox.right, 30.0);
        // Last segment wins the element index.
        let element = atoms[2].source_element.unwrap();
        assert_eq!(map.node_for_element(element), Some(map.atom_ids()[2]));
    }

    #[test]
    fn test_empty_other_elements_are_skipped() {
        let mut tree = tree_with(vec![]);
        let base = tree.base_groups()[0];
        let wrapper = tree.push(
            base,
            VisualElement::new(&[], BBox::from_xywh(110.0, 60.0, 0.0, 0.0)),
        );
        tree.push(wrapper, leaf(&["mord"], "7", 110.0, 10.0));
        let map = build(&tree, &SurfaceConfig::default());

        assert_eq!(map.nodes().len(), 2);
        assert_eq!(map.atoms().next().unwrap().parent, Some(map.root()));
    }

    #[test]
    fn test_fraction_container_and_bar() {
        let mut tree = tree_with(vec![]);
        let base = tree.base_groups()[0];
        let frac = tree.push(
            base,
            VisualElement::new(&["mord"], BBox::from_xywh(110.0, 50.0, 20.0, 40.0)),
        );
        let inner = tree.push(
            frac,
            VisualElement::new(&["mfrac"], BBox::from_xywh(110.0, 50.0, 20.0, 40.0)),
        );
        let vlist = tree.push(
            inner,
            VisualElement::new(&["vlist-t", "vlist-t2"], BBox::from_xywh(110.0, 50.0, 20.0, 40.0)),
        );
        tree.push(vlist, leaf(&["mord"], "1", 115.0, 10.0));
        tree.push(
            vlist,
            VisualElement::new(&["frac-line"], BBox::from_xywh(110.0, 70.0, 20.0, 1.0)),
        );
        let map = build(&tree, &SurfaceConfig::default());

        let kinds: Vec<_> = map.nodes().iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            [NodeKind::Other, NodeKind::Other, NodeKind::Fraction, NodeKind::Num, NodeKind::FracBar]
        );
        assert_eq!(map.atoms().count(), 2);
        assert_eq!(map.nodes()[3].parent, Some(SurfaceNodeId(2)));
    }
}
