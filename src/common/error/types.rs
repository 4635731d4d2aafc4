//! Unified error types for mathtap.
//!
//! The parsing and surface-map algorithms report failure through `Option`
//! and tagged results. This type is only used where work crosses the crate
//! boundary: rendering, configuration loading, and backend requests.
use thiserror::Error;

/// Main error type for mathtap operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The external renderer could not typeset the expression
    #[error("Render error: {0}")]
    Render(#[from] crate::pipeline::RenderError),

    /// Instrumented LaTeX could not be produced
    #[error("Instrumentation failed: {0}")]
    Instrumentation(String),

    /// A structural path does not follow the path scheme
    #[error("Invalid structural path: {0}")]
    InvalidPath(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for mathtap operations.
pub type Result<T> = std::result::Result<T, Error>;
