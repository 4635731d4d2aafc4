//! Plain-object projection of a surface map for diagnostics.

use super::geometry::BBox;
use super::node::{NodeKind, Role, SurfaceMap, SurfaceNodeId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeExport {
    pub id: String,
    pub kind: NodeKind,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_index: Option<usize>,
    pub bbox: BBox,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ast_node_id: Option<String>,
    pub children: Vec<NodeExport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceExport {
    pub root: NodeExport,
    pub atoms: Vec<NodeExport>,
}

/// Project `id` and its subtree.
pub fn export_node(map: &SurfaceMap, id: SurfaceNodeId) -> NodeExport {
    let node = map.node(id);
    NodeExport {
        id: node.id.clone(),
        kind: node.kind,
        role: node.role,
        operator_index: node.operator_index,
        bbox: node.bbox,
        text: node.text.clone(),
        ast_node_id: node.ast_node_id.clone(),
        children: node.children.iter().map(|&child| export_node(map, child)).collect(),
    }
}

pub fn export(map: &SurfaceMap) -> SurfaceExport {
    SurfaceExport {
        root: export_node(map, map.root()),
        atoms: map.atom_ids().iter().map(|&id| export_node(map, id)).collect(),
    }
}

/// Serialize the projection as pretty-printed JSON.
pub fn to_json(map: &SurfaceMap) -> crate::Result<String> {
    Ok(serde_json::to_string_pretty(&export(map))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::builder::build;
    use crate::surface::element::{VisualElement, VisualTree};
    use crate::surface::SurfaceConfig;

    #[test]
    fn test_json_shape() {
        let mut tree = VisualTree::new(
            VisualElement::new(&["katex-html"], BBox::new(0.0, 0.0, 50.0, 20.0)),
        );
        let base = tree.push(
            tree.root(),
            VisualElement::new(&["base"], BBox::new(0.0, 0.0, 50.0, 20.0)),
        );
        tree.push(
            base,
            VisualElement::new(&["mord"], BBox::new(0.0, 0.0, 10.0, 20.0)).with_text("4"),
        );
        let map = build(&tree, &SurfaceConfig::default());

        let value: serde_json::Value = serde_json::from_str(&to_json(&map).unwrap()).unwrap();
        let atom = &value["atoms"][0];
        assert_eq!(atom["id"], "num-0");
        assert_eq!(atom["kind"], "Num");
        assert_eq!(atom["role"], "operand");
        assert_eq!(atom["bbox"]["right"], 10.0);
        assert!(atom.get("operatorIndex").is_none());
        assert_eq!(value["root"]["children"][0]["text"], "4");
    }
}
