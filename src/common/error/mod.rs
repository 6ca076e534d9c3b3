//! Unified error types for the inspector.
//!
//! Archive and XML failures are fatal for an analysis; a missing or too deeply
//! nested organization is reported as a [`Error::StructureError`] that the
//! analyzer downgrades to a partial result.

// Submodule declarations
pub mod types;
pub mod conversions;

// Re-exports
pub use types::{Error, Result};
