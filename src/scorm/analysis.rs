//! End-to-end package analysis.

use crate::common::{Result, to_utf8_xml};
use crate::scorm::archive::{FileListing, PackageArchive};
use crate::scorm::flatten::{ContentMapRow, flatten};
use crate::scorm::manifest;
use crate::scorm::metadata::{Metadata, extract_metadata};
use crate::scorm::namespace::{NamespaceMap, Prefix};
use crate::scorm::options::AnalyzerOptions;
use crate::scorm::structure::{Item, StructureBuilder, UNKNOWN_COURSE};
use crate::scorm::validate::{ValidationReport, validate_package};
use crate::xml::Element;
use serde::Serialize;
use std::io::{Read, Seek};
use std::path::Path;

/// Everything learned about one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// Label of the analyzed input, usually its file name
    pub source: String,
    pub course_title: String,
    pub structure: Vec<Item>,
    pub metadata: Metadata,
    pub validation: ValidationReport,
    /// Manifest text with invalid UTF-8 replaced
    pub raw_manifest: String,
    pub namespaces: NamespaceMap,
    /// Set when the outline could not be built; the rest is still valid
    pub structure_error: Option<String>,
}

impl AnalysisResult {
    /// False for a degraded result without a course outline.
    pub fn is_complete(&self) -> bool {
        self.structure_error.is_none()
    }

    /// Flat rows of every launchable item.
    pub fn content_map(&self) -> Vec<ContentMapRow> {
        flatten(&self.structure)
    }
}

/// Stateless package analyzer.
///
/// # Examples
///
/// ```rust,no_run
/// use scorm_inspector::{Analyzer, AnalyzerOptions};
///
/// let analyzer = Analyzer::with_options(AnalyzerOptions::new().with_max_depth(64));
/// let result = analyzer.analyze_path("course.zip")?;
/// for finding in &result.validation {
///     println!("{}", finding);
/// }
/// # Ok::<(), scorm_inspector::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    options: AnalyzerOptions,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: AnalyzerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Analyze a package file; the source label is the file name.
    pub fn analyze_path<P: AsRef<Path>>(&self, path: P) -> Result<AnalysisResult> {
        let path = path.as_ref();
        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let archive = PackageArchive::open(path)?;
        self.analyze_archive(&archive, source)
    }

    pub fn analyze_reader<R: Read + Seek>(
        &self,
        reader: R,
        source: impl Into<String>,
    ) -> Result<AnalysisResult> {
        let archive = PackageArchive::from_reader(reader)?;
        self.analyze_archive(&archive, source)
    }

    pub fn analyze_bytes(&self, bytes: &[u8], source: impl Into<String>) -> Result<AnalysisResult> {
        let archive = PackageArchive::from_bytes(bytes)?;
        self.analyze_archive(&archive, source)
    }

    /// Analyze an already opened package.
    ///
    /// Malformed XML, including element nesting beyond the configured limit,
    /// is fatal. A missing organization or an over-deep outline
    /// produces a result with an empty structure and `structure_error` set.
    pub fn analyze_archive(
        &self,
        archive: &PackageArchive,
        source: impl Into<String>,
    ) -> Result<AnalysisResult> {
        let source = source.into();
        let raw_manifest = archive.manifest_text();
        let root = Element::parse_with_max_depth(
            &to_utf8_xml(archive.manifest_bytes()),
            self.options.max_element_depth,
        )?;
        self.analyze_manifest(archive.files(), &root, source, raw_manifest)
    }

    fn analyze_manifest(
        &self,
        files: &FileListing,
        root: &Element,
        source: String,
        raw_manifest: String,
    ) -> Result<AnalysisResult> {
        let ns = NamespaceMap::resolve(root);
        log::debug!("Resolved imscp namespace: '{}'", ns.uri(Prefix::Imscp));

        let validation = validate_package(files, root, &ns);
        let metadata = extract_metadata(root, &ns);
        log::debug!(
            "{} findings, {} SCOs, {} assets",
            validation.len(),
            metadata.sco_count,
            metadata.asset_count
        );

        let hrefs = manifest::resource_hrefs(&manifest::resources(root, &ns));
        let builder = StructureBuilder::new(&ns, &hrefs, self.options.max_depth);
        let (course_title, structure, structure_error) =
            match builder.build(root, self.options.prefer_default_organization) {
                Ok(outline) => (outline.title, outline.items, None),
                Err(err) if err.is_degraded() => {
                    log::warn!("{}: {}", source, err);
                    (UNKNOWN_COURSE.to_string(), Vec::new(), Some(err.to_string()))
                },
                Err(err) => return Err(err),
            };

        log::info!(
            "Analyzed '{}': {} top-level items, {} errors",
            source,
            structure.len(),
            validation.errors().count()
        );

        Ok(AnalysisResult {
            source,
            course_title,
            structure,
            metadata,
            validation,
            raw_manifest,
            namespaces: ns,
            structure_error,
        })
    }
}

/// Analyze an in-memory package with default options.
pub fn analyze_bytes(bytes: &[u8], source: impl Into<String>) -> Result<AnalysisResult> {
    Analyzer::new().analyze_bytes(bytes, source)
}
