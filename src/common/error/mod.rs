//! Unified error types for mathtap.

// Submodule declarations
pub mod types;

// Re-exports
pub use types::{Error, Result};
