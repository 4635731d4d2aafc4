//! Common types shared by the formula and surface modules.

// Submodule declarations
pub mod error;

// Re-exports for convenience
pub use error::{Error, Result};
