//! Mathtap - clickable arithmetic over typeset LaTeX
//!
//! This library keeps two views of one arithmetic expression in step: the
//! logical tree parsed from the LaTeX source and the geometric tree of the
//! typeset output. A click on a rendered glyph resolves to a stable
//! structural path such as `term[1].term[0]`, which a tutoring backend uses
//! to target a step.
//!
//! # Features
//!
//! - **Formula**: tokenizer, recursive-descent parser, path augmentation and
//!   annotated LaTeX output
//! - **Surface**: element classification, surface map building, minus and
//!   mixed-number disambiguation, AST correlation
//! - **Queries**: hit-testing and operand lookup for operator selection
//! - **Session**: last-rebuild-wins installation of surface maps
//!
//! # Example - Instrumenting an expression
//!
//! ```
//! use mathtap::formula::{instrument_latex, AnalyzedExpression};
//!
//! let result = instrument_latex("2+3");
//! assert!(result.success);
//! assert!(result.latex.contains("ast-id=term[0]"));
//!
//! let expression = AnalyzedExpression::analyze("2*3+4").unwrap();
//! let paths: Vec<_> = expression.integers.iter().map(|d| d.node_id.as_str()).collect();
//! assert_eq!(paths, ["term[0].term[0]", "term[0].term[1]", "term[1]"]);
//! ```
//!
//! # Example - Rebuilding with a renderer
//!
//! ```no_run
//! use mathtap::pipeline::{RenderError, Renderer};
//! use mathtap::session::SurfaceSession;
//! use mathtap::surface::VisualTree;
//!
//! struct Katex;
//!
//! impl Renderer for Katex {
//!     fn render(&self, latex: &str) -> Result<VisualTree, RenderError> {
//!         // Typeset `latex` and collect the positioned elements.
//!         # let _ = latex;
//!         # unimplemented!()
//!     }
//! }
//!
//! # fn main() -> mathtap::Result<()> {
//! let mut session = SurfaceSession::default();
//! session.refresh("2+3", &Katex)?;
//! if let Some(node) = session.hit_test(105.0, 250.0) {
//!     println!("clicked {:?}", node.ast_node_id);
//! }
//! # Ok(())
//! # }
//! ```

/// Shared error type
pub mod common;

/// Expression parsing and annotated LaTeX
///
/// Everything on the logical side: tokens, the AST and its structural
/// paths, and the instrumenter that embeds those paths for the renderer.
pub mod formula;

pub mod pipeline;

pub mod session;

/// Surface map engine
///
/// Builds the geometric tree from renderer output and links it to the AST.
pub mod surface;

pub mod tutor;

#[cfg(test)]
pub(crate) mod testing;

pub use common::{Error, Result};
pub use pipeline::{rebuild, Rebuild, RenderError, Renderer};
pub use session::{SurfaceSession, Ticket};
