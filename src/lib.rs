//! scorm-inspector - parse and health-check SCORM e-learning packages
//!
//! A SCORM package is a ZIP archive whose root holds an `imsmanifest.xml`
//! describing the course: its resources (files), the nested outline of items
//! that reference them, descriptive metadata and, for SCORM 2004, sequencing
//! rules. This library opens such a package and reports what it finds.
//!
//! # Features
//!
//! - **Namespace-aware manifest parsing**: the content-packaging namespace is
//!   taken from the manifest root, so every IMS CP version is handled alike
//! - **Health checks**: broken item references and files missing from the archive
//! - **Metadata extraction**: description, keywords, passing score, launch file,
//!   SCO/asset counts and sequencing rules, with `N/A` for anything absent
//! - **Course outline**: the organization's item tree and a flat content map
//! - **Export**: JSON, YAML and CSV renderings of the analysis
//!
//! # Example
//!
//! ```no_run
//! use scorm_inspector::{Analyzer, export};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let result = Analyzer::new().analyze_path("course.zip")?;
//!
//! println!("Course: {}", result.course_title);
//! for finding in result.validation.iter() {
//!     println!("{}", finding);
//! }
//!
//! let json = export::to_json(&result)?;
//! println!("{}", json);
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Analyzing bytes already in memory
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("course.zip")?;
//! let result = scorm_inspector::analyze_bytes(&bytes, "course.zip")?;
//!
//! for row in result.content_map() {
//!     println!("{} | {} | {}", row.path, row.file, row.identifier);
//! }
//! # Ok(())
//! # }
//! ```

/// Errors, field sentinels and byte-order-mark handling
pub mod common;

/// Namespace-resolved XML tree
pub mod xml;

/// SCORM package analysis
///
/// Opening packages, resolving the manifest's namespaces, validation,
/// metadata extraction and outline construction.
pub mod scorm;

/// JSON, YAML and CSV renderings of an analysis
pub mod export;

// Re-export commonly used types for convenience
pub use common::{Error, Field, Result};
pub use scorm::{
    AnalysisResult, Analyzer, AnalyzerOptions, ContentMapRow, Finding, Item, Metadata, Severity,
    analyze_bytes,
};
