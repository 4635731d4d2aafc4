//! Test renderer laying expressions out as KaTeX-shaped element trees.
//!
//! Glyph metrics are fixed (digits 10px, operators 12px, rows 20px) so
//! tests can reason about exact coordinates.

use crate::formula::ast::{augment_with_ids, AstKind, AstNode, Operator};
use crate::formula::latex::{attrs, strip_annotations, ANNOTATION_COMMAND};
use crate::formula::parse;
use crate::pipeline::{RenderError, Renderer};
use crate::surface::{BBox, ElementId, VisualElement, VisualTree};

pub const DIGIT_WIDTH: f64 = 10.0;
pub const OPERATOR_WIDTH: f64 = 12.0;
pub const PAREN_WIDTH: f64 = 6.0;
pub const SPACE_WIDTH: f64 = 4.0;
pub const ROW_HEIGHT: f64 = 20.0;
/// Minimum vertical offset of numerator and denominator rows from the main row.
pub const FRACTION_SHIFT: f64 = 14.0;
pub const FRACTION_PAD: f64 = 2.0;
pub const MIXED_GAP: f64 = 2.0;
/// Top of the main row below the container's top edge.
pub const ROW_OFFSET: f64 = 40.0;

#[derive(Debug, Clone)]
pub struct StubRenderer {
    /// Absolute top-left of the rendered container
    pub origin: (f64, f64),
    /// Emit `data-*` wrappers for annotated input
    pub annotations: bool,
}

impl Default for StubRenderer {
    fn default() -> Self {
        Self {
            origin: (100.0, 200.0),
            annotations: true,
        }
    }
}

impl StubRenderer {
    /// Renderer that drops every annotation wrapper.
    pub fn plain() -> Self {
        Self {
            annotations: false,
            ..Self::default()
        }
    }

    /// Absolute y of the main row's vertical center.
    pub fn axis(&self) -> f64 {
        self.origin.1 + ROW_OFFSET + ROW_HEIGHT / 2.0
    }
}

pub struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(&self, _latex: &str) -> Result<VisualTree, RenderError> {
        Err(RenderError::new("renderer unavailable"))
    }
}

impl Renderer for StubRenderer {
    fn render(&self, latex: &str) -> Result<VisualTree, RenderError> {
        let (left, top) = self.origin;
        let container = BBox::new(left, top, left, top + 100.0);
        let mut tree = VisualTree::new(VisualElement::new(&["katex-html"], container));
        let base = tree.push(tree.root(), VisualElement::new(&["base"], container));
        tree.push(base, VisualElement::new(&["strut"], BBox::from_xywh(left, top, 0.0, 100.0)));

        let annotated = self.annotations && latex.contains(ANNOTATION_COMMAND);
        let Some(mut ast) = parse(&strip_annotations(latex)) else {
            return Ok(tree);
        };
        augment_with_ids(&mut ast);

        let mut layout = Layout {
            tree: &mut tree,
            annotated,
        };
        let extent = layout.emit(&ast, left, top + ROW_OFFSET, base);

        let bounds = BBox::new(left, top, extent.right, top + 100.0);
        tree.element_mut(tree.root()).bbox = bounds;
        tree.element_mut(base).bbox = bounds;
        Ok(tree)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Widths of the two rows of a fraction and their offsets from the main row.
#[derive(Clone, Copy)]
struct Rows {
    numerator_width: f64,
    denominator_width: f64,
    raise: f64,
    lower: f64,
}

struct Layout<'t> {
    tree: &'t mut VisualTree,
    annotated: bool,
}

impl Layout<'_> {
    fn emit(&mut self, node: &AstNode, x: f64, top: f64, parent: ElementId) -> BBox {
        match &node.kind {
            AstKind::Integer(value) => {
                let host = self.wrapper(node, "number", None, parent, x, top);
                let mut cursor = x;
                let mut digits = value.as_str();
                if let Some(rest) = value.strip_prefix('-') {
                    let sign = self.glyph(host, &["mord"], "\u{2212}", cursor, top, OPERATOR_WIDTH);
                    cursor = sign.right;
                    digits = rest;
                }
                let width = DIGIT_WIDTH * digits.len() as f64;
                let last = self.glyph(host, &["mord"], digits, cursor, top, width);
                self.finish(host, parent, BBox::new(x, top, last.right, last.bottom))
            },
            AstKind::BinaryOp { op, left, right } => {
                let l = self.operand(left, *op, Side::Left, x, top, parent);
                let mut cursor = self.space(parent, l.right, top);
                let host = self.wrapper(node, "operator", Some(op.symbol()), parent, cursor, top);
                let glyph = match op {
                    Operator::Plus => "+",
                    Operator::Minus => "\u{2212}",
                    Operator::Multiply => "\u{22C5}",
                    Operator::Divide => "\u{00F7}",
                };
                let g = self.glyph(host, &["mbin"], glyph, cursor, top, OPERATOR_WIDTH);
                self.finish(host, parent, g);
                cursor = self.space(parent, g.right, top);
                let r = self.operand(right, *op, Side::Right, cursor, top, parent);
                l.union(&r)
            },
            AstKind::UnaryOp { arg, .. } => {
                let sign = self.glyph(parent, &["mord"], "\u{2212}", x, top, OPERATOR_WIDTH);
                let wrap = match &arg.kind {
                    AstKind::BinaryOp { .. } | AstKind::UnaryOp { .. } => true,
                    AstKind::Integer(value) => value.starts_with('-'),
                    _ => false,
                };
                let body = self.wrapped(arg, wrap, sign.right, top, parent);
                sign.union(&body)
            },
            AstKind::Fraction {
                numerator,
                denominator,
            } => {
                let host = self.wrapper(node, "fraction", None, parent, x, top);
                let rows = Rows {
                    numerator_width: width(numerator),
                    denominator_width: width(denominator),
                    raise: FRACTION_SHIFT + extent(numerator).1,
                    lower: FRACTION_SHIFT + extent(denominator).0,
                };
                let bbox = self.fraction(
                    host,
                    x,
                    top,
                    rows,
                    |layout, x, top, vlist| layout.emit(numerator, x, top, vlist),
                    |layout, x, top, vlist| layout.emit(denominator, x, top, vlist),
                );
                self.finish(host, parent, bbox)
            },
            AstKind::Mixed {
                whole,
                numerator,
                denominator,
            } => {
                let host = self.wrapper(node, "mixed", None, parent, x, top);
                let whole_width = DIGIT_WIDTH * whole.len() as f64;
                let w = self.glyph(host, &["mord"], whole, x, top, whole_width);
                let rows = Rows {
                    numerator_width: DIGIT_WIDTH * numerator.len() as f64,
                    denominator_width: DIGIT_WIDTH * denominator.len() as f64,
                    raise: FRACTION_SHIFT,
                    lower: FRACTION_SHIFT,
                };
                let frac = self.fraction(
                    host,
                    w.right + MIXED_GAP,
                    top,
                    rows,
                    |layout, x, top, vlist| {
                        layout.glyph(vlist, &["mord"], numerator, x, top, rows.numerator_width)
                    },
                    |layout, x, top, vlist| {
                        layout.glyph(vlist, &["mord"], denominator, x, top, rows.denominator_width)
                    },
                );
                self.finish(host, parent, w.union(&frac))
            },
        }
    }

    /// Lay out `numerator / bar / denominator` with the bar on the row axis.
    ///
    /// Rows are offset by their own extent so nested stacks never overlap:
    /// the numerator ends above the bar and the denominator starts below it.
    fn fraction(
        &mut self,
        parent: ElementId,
        x: f64,
        top: f64,
        rows: Rows,
        numerator: impl FnOnce(&mut Self, f64, f64, ElementId) -> BBox,
        denominator: impl FnOnce(&mut Self, f64, f64, ElementId) -> BBox,
    ) -> BBox {
        let (wn, wd) = (rows.numerator_width, rows.denominator_width);
        let total = wn.max(wd) + 2.0 * FRACTION_PAD;
        let row = BBox::from_xywh(x, top, total, ROW_HEIGHT);
        let outer = self.tree.push(parent, VisualElement::new(&["mord"], row));
        let open = BBox::from_xywh(x, top, 0.0, ROW_HEIGHT);
        self.tree.push(outer, VisualElement::new(&["mopen", "nulldelimiter"], open));
        let frac = self.tree.push(outer, VisualElement::new(&["mfrac"], row));
        let vlist = self.tree.push(frac, VisualElement::new(&["vlist-t", "vlist-t2"], row));

        // Each row's content is grouped the way KaTeX wraps it in `mord mtight`.
        let row_class = ["mord", "mtight"];
        let num_row = self.tree.push(vlist, VisualElement::new(&row_class, BBox::default()));
        let num = numerator(self, x + (total - wn) / 2.0, top - rows.raise, num_row);
        self.tree.element_mut(num_row).bbox = num;
        let bar = BBox::from_xywh(x, top + ROW_HEIGHT / 2.0, total, 1.0);
        self.tree.push(vlist, VisualElement::new(&["frac-line"], bar));
        let den_row = self.tree.push(vlist, VisualElement::new(&row_class, BBox::default()));
        let den = denominator(self, x + (total - wd) / 2.0, top + rows.lower, den_row);
        self.tree.element_mut(den_row).bbox = den;
        let close = BBox::from_xywh(x + total, top, 0.0, ROW_HEIGHT);
        self.tree.push(outer, VisualElement::new(&["mclose", "nulldelimiter"], close));

        let bbox = num.union(&bar).union(&den);
        for id in [outer, frac, vlist] {
            self.tree.element_mut(id).bbox = bbox;
        }
        bbox
    }

    fn operand(
        &mut self,
        child: &AstNode,
        parent_op: Operator,
        side: Side,
        x: f64,
        top: f64,
        parent: ElementId,
    ) -> BBox {
        self.wrapped(child, needs_parens(child, parent_op, side), x, top, parent)
    }

    fn wrapped(&mut self, node: &AstNode, wrap: bool, x: f64, top: f64, parent: ElementId) -> BBox {
        if !wrap {
            return self.emit(node, x, top, parent);
        }
        let open = self.glyph(parent, &["mopen"], "(", x, top, PAREN_WIDTH);
        let body = self.emit(node, open.right, top, parent);
        let close = self.glyph(parent, &["mclose"], ")", body.right, top, PAREN_WIDTH);
        open.union(&body).union(&close)
    }

    fn glyph(
        &mut self,
        parent: ElementId,
        classes: &[&str],
        text: &str,
        x: f64,
        top: f64,
        width: f64,
    ) -> BBox {
        let bbox = BBox::from_xywh(x, top, width, ROW_HEIGHT);
        self.tree.push(parent, VisualElement::new(classes, bbox).with_text(text));
        bbox
    }

    fn space(&mut self, parent: ElementId, x: f64, top: f64) -> f64 {
        let bbox = BBox::from_xywh(x, top, SPACE_WIDTH, ROW_HEIGHT);
        self.tree.push(parent, VisualElement::new(&["mspace"], bbox));
        x + SPACE_WIDTH
    }

    /// Annotation wrapper for `node`, or `parent` itself when not annotating.
    fn wrapper(
        &mut self,
        node: &AstNode,
        role: &str,
        op: Option<&str>,
        parent: ElementId,
        x: f64,
        top: f64,
    ) -> ElementId {
        if !self.annotated {
            return parent;
        }
        let bbox = BBox::from_xywh(x, top, 0.0, ROW_HEIGHT);
        let mut element = VisualElement::new(&["enclosing"], bbox)
            .with_attribute(attrs::AST_ID, node.path())
            .with_attribute(attrs::ROLE, role);
        if let Some(op) = op {
            element = element.with_attribute(attrs::OPERATOR, op);
        }
        self.tree.push(parent, element)
    }

    fn finish(&mut self, host: ElementId, parent: ElementId, bbox: BBox) -> BBox {
        if host != parent {
            self.tree.element_mut(host).bbox = bbox;
        }
        bbox
    }
}

fn needs_parens(child: &AstNode, parent: Operator, side: Side) -> bool {
    let AstKind::BinaryOp { op, .. } = &child.kind else {
        return false;
    };
    match side {
        Side::Left => op.precedence() < parent.precedence(),
        Side::Right => op.precedence() <= parent.precedence(),
    }
}

/// Laid-out width of `node` at the top level of a row.
fn width(node: &AstNode) -> f64 {
    let wrapped = |node: &AstNode, wrap: bool| {
        width(node) + if wrap { 2.0 * PAREN_WIDTH } else { 0.0 }
    };
    match &node.kind {
        AstKind::Integer(value) => match value.strip_prefix('-') {
            Some(rest) => OPERATOR_WIDTH + DIGIT_WIDTH * rest.len() as f64,
            None => DIGIT_WIDTH * value.len() as f64,
        },
        AstKind::BinaryOp { op, left, right } => {
            wrapped(left, needs_parens(left, *op, Side::Left))
                + 2.0 * SPACE_WIDTH
                + OPERATOR_WIDTH
                + wrapped(right, needs_parens(right, *op, Side::Right))
        },
        AstKind::UnaryOp { arg, .. } => {
            let wrap = match &arg.kind {
                AstKind::BinaryOp { .. } | AstKind::UnaryOp { .. } => true,
                AstKind::Integer(value) => value.starts_with('-'),
                _ => false,
            };
            OPERATOR_WIDTH + wrapped(arg, wrap)
        },
        AstKind::Fraction {
            numerator,
            denominator,
        } => width(numerator).max(width(denominator)) + 2.0 * FRACTION_PAD,
        AstKind::Mixed {
            whole,
            numerator,
            denominator,
        } => {
            DIGIT_WIDTH * whole.len() as f64
                + MIXED_GAP
                + DIGIT_WIDTH * numerator.len().max(denominator.len()) as f64
                + 2.0 * FRACTION_PAD
        },
    }
}

/// Height of `node` above and below its main row.
fn extent(node: &AstNode) -> (f64, f64) {
    match &node.kind {
        AstKind::Integer(_) => (0.0, 0.0),
        AstKind::BinaryOp { left, right, .. } => {
            let ((la, lb), (ra, rb)) = (extent(left), extent(right));
            (la.max(ra), lb.max(rb))
        },
        AstKind::UnaryOp { arg, .. } => extent(arg),
        AstKind::Fraction {
            numerator,
            denominator,
        } => {
            let ((na, nb), (da, db)) = (extent(numerator), extent(denominator));
            (FRACTION_SHIFT + na + nb, FRACTION_SHIFT + da + db)
        },
        AstKind::Mixed { .. } => (FRACTION_SHIFT, FRACTION_SHIFT),
    }
}
