// Surface Module - Rendered Geometry to Expression Structure
//
// Turns the renderer's positioned element tree into a surface map and links
// it back to the expression tree:
//
// - **element**: the renderer-side visual tree and class tags
// - **classify** / **segment**: per-element semantic kinds
// - **builder**: one walk over the visual tree producing nodes and atoms
// - **enhance**: fraction bars, minus signs, mixed numbers, operator indices
// - **correlate**: positional pairing with AST descriptors
// - **hit**: point and operand queries
//
// A map is rebuilt from scratch for every rendered expression and is not
// modified by queries.

mod annotations;
mod builder;
mod classify;
mod config;
mod correlate;
mod element;
mod enhance;
mod export;
mod geometry;
mod hit;
mod node;
mod segment;

pub use annotations::recover_annotations;
pub use builder::{build, SurfaceMapBuilder};
pub use classify::{classify, is_mixed_content, is_structural, Classification};
pub use config::SurfaceConfig;
pub use correlate::{correlate, correlate_integers, correlate_mixed, correlate_operators, linearize};
pub use element::{ClassTags, ElementId, VisualElement, VisualTree};
pub use enhance::enhance;
pub use export::{export, export_node, to_json, NodeExport, SurfaceExport};
pub use geometry::BBox;
pub use hit::{find_operands, hit_test_point, Operands};
pub use node::{
    LinkSource, MixedPart, NodeKind, NodeMeta, Role, SurfaceMap, SurfaceNode, SurfaceNodeId,
};
pub use segment::{segment, Segment, SegmentKind};
