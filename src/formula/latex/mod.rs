mod instrument;
mod operators;
mod utils;

pub use instrument::{
    instrument_latex, to_instrumented_latex, InstrumentationResult, LatexInstrumenter,
};
pub use operators::{operator_to_latex, AnnotationRole};
pub use utils::{strip_annotations, ANNOTATION_COMMAND};

/// Annotation keys as they appear on rendered elements.
///
/// `\htmlData{ast-id=...}` surfaces as a `data-ast-id` attribute.
pub mod attrs {
    pub const AST_ID: &str = "data-ast-id";
    pub const ROLE: &str = "data-role";
    pub const OPERATOR: &str = "data-operator";
}
