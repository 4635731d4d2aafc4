use super::config::SurfaceConfig;
use super::element::ElementId;
use super::geometry::BBox;
use serde::Serialize;
use std::collections::HashMap;

/// Semantic kind of a surface node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Num,
    Var,
    BinaryOp,
    Relation,
    ParenOpen,
    ParenClose,
    FracBar,
    Fraction,
    Other,
    // Assigned by the enhancer
    Decimal,
    MinusUnary,
    MinusBinary,
    MixedNumber,
}

impl NodeKind {
    pub const fn role(self) -> Role {
        match self {
            NodeKind::Num | NodeKind::Var | NodeKind::Decimal | NodeKind::MixedNumber => {
                Role::Operand
            },
            NodeKind::BinaryOp
            | NodeKind::Relation
            | NodeKind::MinusUnary
            | NodeKind::MinusBinary
            | NodeKind::FracBar => Role::Operator,
            NodeKind::ParenOpen | NodeKind::ParenClose => Role::Bracket,
            NodeKind::Fraction => Role::Container,
            NodeKind::Other => Role::Other,
        }
    }

    pub const fn id_prefix(self) -> &'static str {
        match self {
            NodeKind::Num | NodeKind::Decimal | NodeKind::MixedNumber => "num",
            NodeKind::Var => "var",
            NodeKind::BinaryOp | NodeKind::MinusUnary | NodeKind::MinusBinary => "op",
            NodeKind::Relation => "rel",
            NodeKind::ParenOpen | NodeKind::ParenClose => "paren",
            NodeKind::FracBar => "fracbar",
            NodeKind::Fraction => "frac",
            NodeKind::Other => "node",
        }
    }

    /// Kinds paired with AST integers.
    #[inline]
    pub const fn is_numeric(self) -> bool {
        matches!(self, NodeKind::Num | NodeKind::Decimal)
    }

    /// Kinds that receive a left-to-right `operator_index`.
    #[inline]
    pub const fn is_operator_slot(self) -> bool {
        matches!(
            self,
            NodeKind::BinaryOp
                | NodeKind::MinusBinary
                | NodeKind::MinusUnary
                | NodeKind::Relation
                | NodeKind::Fraction
                | NodeKind::FracBar
        )
    }

    /// Kinds paired with AST operators.
    #[inline]
    pub const fn is_correlated_operator(self) -> bool {
        matches!(
            self,
            NodeKind::BinaryOp | NodeKind::MinusBinary | NodeKind::MinusUnary | NodeKind::Relation
        )
    }

    /// Kinds the geometric operand search considers.
    #[inline]
    pub const fn is_operand(self) -> bool {
        matches!(
            self,
            NodeKind::Num
                | NodeKind::Var
                | NodeKind::Fraction
                | NodeKind::Decimal
                | NodeKind::MixedNumber
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Operand,
    Operator,
    Bracket,
    Container,
    Other,
}

/// How a node's AST link was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkSource {
    /// Positional pairing after linearization
    Correlation,
    /// Read back from a rendered `data-ast-id` attribute
    Annotation,
}

/// Index of a node in its [`SurfaceMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceNodeId(pub usize);

/// Side of a mixed number's fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixedPart {
    Numerator,
    Denominator,
}

/// Extra structure recorded by the enhancer.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeMeta {
    /// Whole-number part of a mixed number
    MixedWhole {
        bar: SurfaceNodeId,
        numerator: Option<SurfaceNodeId>,
        denominator: Option<SurfaceNodeId>,
    },
    /// Numerator or denominator of a mixed number
    MixedPart {
        whole: SurfaceNodeId,
        part: MixedPart,
    },
}

#[derive(Debug, Clone)]
pub struct SurfaceNode {
    /// Generated id, `<prefix>-<counter>`
    pub id: String,
    pub kind: NodeKind,
    pub role: Role,
    /// Box relative to the rendered container
    pub bbox: BBox,
    pub source_element: Option<ElementId>,
    pub text: String,
    pub children: Vec<SurfaceNodeId>,
    pub parent: Option<SurfaceNodeId>,
    /// Manufactured by segmenting a merged text run
    pub synthetic: bool,
    pub ast_node_id: Option<String>,
    pub ast_integer_value: Option<String>,
    /// Normalized operator symbol of the paired AST operator
    pub ast_operator: Option<String>,
    pub ast_operator_index: Option<usize>,
    /// Left-to-right index among operator-slot atoms
    pub operator_index: Option<usize>,
    pub meta: Option<NodeMeta>,
    pub link_source: Option<LinkSource>,
}

impl SurfaceNode {
    pub fn new(id: String, kind: NodeKind, bbox: BBox) -> Self {
        Self {
            id,
            kind,
            role: kind.role(),
            bbox,
            source_element: None,
            text: String::new(),
            children: Vec::new(),
            parent: None,
            synthetic: false,
            ast_node_id: None,
            ast_integer_value: None,
            ast_operator: None,
            ast_operator_index: None,
            operator_index: None,
            meta: None,
            link_source: None,
        }
    }

    /// Change the kind, keeping the role in step.
    #[inline]
    pub fn set_kind(&mut self, kind: NodeKind) {
        self.kind = kind;
        self.role = kind.role();
    }

    #[inline]
    pub fn is_mixed_part(&self) -> bool {
        matches!(self.meta, Some(NodeMeta::MixedPart { .. }))
    }

    #[inline]
    pub fn is_minus(&self) -> bool {
        matches!(self.text.trim(), "-" | "\u{2212}")
    }
}

/// Surface tree of one rendered expression plus its interactive atoms.
///
/// Nodes live in an arena; `parent`/`children` hold [`SurfaceNodeId`]s.
#[derive(Debug, Clone)]
pub struct SurfaceMap {
    pub(crate) nodes: Vec<SurfaceNode>,
    pub(crate) root: SurfaceNodeId,
    /// Interactive leaves; spatially sorted after enhancement
    pub(crate) atoms: Vec<SurfaceNodeId>,
    pub(crate) element_index: HashMap<ElementId, SurfaceNodeId>,
    /// Absolute top-left of the rendered container
    pub(crate) origin: (f64, f64),
    pub(crate) config: SurfaceConfig,
    pub(crate) enhanced: bool,
}

impl SurfaceMap {
    #[inline]
    pub fn root(&self) -> SurfaceNodeId {
        self.root
    }

    #[inline]
    pub fn node(&self, id: SurfaceNodeId) -> &SurfaceNode {
        &self.nodes[id.0]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: SurfaceNodeId) -> &mut SurfaceNode {
        &mut self.nodes[id.0]
    }

    #[inline]
    pub fn get(&self, id: SurfaceNodeId) -> Option<&SurfaceNode> {
        self.nodes.get(id.0)
    }

    #[inline]
    pub fn nodes(&self) -> &[SurfaceNode] {
        &self.nodes
    }

    #[inline]
    pub fn atom_ids(&self) -> &[SurfaceNodeId] {
        &self.atoms
    }

    /// Atoms in their current order.
    pub fn atoms(&self) -> impl Iterator<Item = &SurfaceNode> + '_ {
        self.atoms.iter().map(|id| self.node(*id))
    }

    #[inline]
    pub fn origin(&self) -> (f64, f64) {
        self.origin
    }

    #[inline]
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Surface node created last for `element`.
    #[inline]
    pub fn node_for_element(&self, element: ElementId) -> Option<SurfaceNodeId> {
        self.element_index.get(&element).copied()
    }

    /// First node, in arena order, linked to `ast_id`.
    pub fn find_by_ast_id(&self, ast_id: &str) -> Option<SurfaceNodeId> {
        self.nodes
            .iter()
            .position(|n| n.ast_node_id.as_deref() == Some(ast_id))
            .map(SurfaceNodeId)
    }

    pub fn find_by_id(&self, id: &str) -> Option<SurfaceNodeId> {
        self.nodes.iter().position(|n| n.id == id).map(SurfaceNodeId)
    }

    pub(crate) fn push(&mut self, parent: SurfaceNodeId, mut node: SurfaceNode) -> SurfaceNodeId {
        let id = SurfaceNodeId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }
}
