//! Common types and utilities shared across the crate.
//!
//! Error handling, the "not available" field sentinel, and BOM handling for
//! manifest bytes live here so every extractor reports failures the same way.

// Submodule declarations
pub mod bom;
pub mod error;
pub mod field;

// Re-exports for convenience
pub use bom::{BomKind, decode_text, detect_bom, to_utf8_xml};
pub use error::{Error, Result};
pub use field::{Field, NOT_AVAILABLE};
