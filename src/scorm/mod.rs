//! SCORM package analysis.
//!
//! A package is a ZIP archive with an `imsmanifest.xml` at its root. The
//! manifest declares resources (files), organizations (course outlines built
//! from nested items) and optional metadata and sequencing rules. Analysis
//! runs in fixed phases: the archive is opened, the manifest parsed into a
//! namespace-resolved tree, and then validation, metadata extraction and
//! outline construction each query that tree independently.
//!
//! # Example
//!
//! ```rust,no_run
//! use scorm_inspector::scorm::Analyzer;
//!
//! let result = Analyzer::new().analyze_path("course.zip")?;
//! println!("{} ({})", result.course_title, result.metadata.launch_file);
//! for row in result.content_map() {
//!     println!("{} -> {}", row.path, row.file);
//! }
//! # Ok::<(), scorm_inspector::Error>(())
//! ```

/// Archive access and entry listing
pub mod archive;

/// Whole-package analysis pipeline
pub mod analysis;

/// Content map rows
pub mod flatten;

/// Manifest element helpers shared by the analysis phases
pub mod manifest;

/// Course metadata
pub mod metadata;

/// Namespace map used by every manifest query
pub mod namespace;

/// Analyzer configuration
pub mod options;

/// Course outline
pub mod structure;

/// Health checks
pub mod validate;


pub use analysis::{AnalysisResult, Analyzer, analyze_bytes};
pub use archive::{FileListing, MANIFEST_NAME, PackageArchive};
pub use flatten::{ContentMapRow, PATH_SEPARATOR, flatten};
pub use manifest::{Resource, ScormType, ScormVersion};
pub use metadata::{FlowMode, Metadata, SequencingRules, extract_metadata};
pub use namespace::{NamespaceMap, Prefix};
pub use options::{AnalyzerOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_ELEMENT_DEPTH};
pub use structure::{CourseOutline, Item, StructureBuilder};
pub use validate::{Finding, Severity, ValidationReport, validate_package};
