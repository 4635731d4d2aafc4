//! Rebuild pipeline: expression → instrumented LaTeX → render → surface map.
//!
//! The renderer is the only external step and is modeled as a trait so that
//! embedders can plug in their typesetter (and tests a layout stub).

use crate::formula::{to_instrumented_latex, AnalyzedExpression};
use crate::surface::{
    self, Operands, SurfaceConfig, SurfaceMap, SurfaceNode, VisualTree,
};
use thiserror::Error;

/// Failure reported by a [`Renderer`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Typesetter producing positioned elements for a LaTeX string.
///
/// Annotations written by the instrumenter are expected to surface as
/// `data-ast-id`, `data-role` and `data-operator` element attributes.
pub trait Renderer {
    fn render(&self, latex: &str) -> Result<VisualTree, RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn render(&self, latex: &str) -> Result<VisualTree, RenderError> {
        (**self).render(latex)
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&self, latex: &str) -> Result<VisualTree, RenderError> {
        (**self).render(latex)
    }
}

/// Everything produced by one rebuild.
#[derive(Debug, Clone)]
pub struct Rebuild {
    /// Expression as requested
    pub latex: String,
    /// What was handed to the renderer
    pub rendered_latex: String,
    /// `None` when the expression did not parse; the map is then uncorrelated
    pub expression: Option<AnalyzedExpression>,
    pub tree: VisualTree,
    pub map: SurfaceMap,
}

impl Rebuild {
    #[inline]
    pub fn is_correlated(&self) -> bool {
        self.expression.is_some()
    }

    pub fn hit_test(&self, x: f64, y: f64) -> Option<&SurfaceNode> {
        surface::hit_test_point(&self.map, x, y).map(|id| self.map.node(id))
    }

    pub fn find_operands(&self, operator_path: &str) -> Operands {
        surface::find_operands(&self.map, operator_path)
    }
}

/// Run the full pipeline for `latex`.
///
/// An expression that does not parse is still rendered (without
/// annotations) so the caller can display it; its map carries no AST links.
pub fn rebuild<R: Renderer + ?Sized>(
    latex: &str,
    renderer: &R,
    config: &SurfaceConfig,
) -> crate::Result<Rebuild> {
    let expression = AnalyzedExpression::analyze(latex);
    let rendered_latex = match &expression {
        Some(expression) => to_instrumented_latex(&expression.ast),
        None => {
            tracing::warn!(latex, "expression did not parse, rendering without annotations");
            latex.to_string()
        },
    };

    let tree = renderer.render(&rendered_latex)?;
    let mut map = surface::build(&tree, config);
    surface::enhance(&mut map);
    if let Some(expression) = &expression {
        surface::correlate(&mut map, expression);
        surface::recover_annotations(&mut map, &tree);
    }

    Ok(Rebuild {
        latex: latex.to_string(),
        rendered_latex,
        expression,
        tree,
        map,
    })
}
