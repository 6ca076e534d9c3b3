//! Package health checks.
//!
//! Structural and referential checks only; the manifest is never validated
//! against an XML schema. Validation cannot fail: on a partially malformed
//! manifest it reports whatever it can.

use crate::scorm::archive::FileListing;
use crate::scorm::manifest::{self, Resource, ScormVersion};
use crate::scorm::namespace::NamespaceMap;
use crate::xml::Element;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    /// Reserved; no current check emits warnings
    Warning,
    Error,
}

impl Severity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub level: Severity,
    pub message: String,
}

impl Finding {
    pub fn new(level: Severity, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Ordered findings of one validation run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// All findings in emission order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Messages of one severity, in emission order.
    pub fn messages(&self, level: Severity) -> impl Iterator<Item = &str> {
        self.findings
            .iter()
            .filter(move |finding| finding.level == level)
            .map(|finding| finding.message.as_str())
    }

    pub fn count(&self, level: Severity) -> usize {
        self.messages(level).count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.messages(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.messages(Severity::Warning)
    }

    pub fn infos(&self) -> impl Iterator<Item = &str> {
        self.messages(Severity::Info)
    }

    /// No errors and no warnings.
    pub fn is_healthy(&self) -> bool {
        !self
            .findings
            .iter()
            .any(|finding| matches!(finding.level, Severity::Error | Severity::Warning))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Finding> {
        self.findings.iter()
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a Finding;
    type IntoIter = std::slice::Iter<'a, Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.iter()
    }
}

impl FromIterator<Finding> for ValidationReport {
    fn from_iter<I: IntoIterator<Item = Finding>>(iter: I) -> Self {
        Self {
            findings: iter.into_iter().collect(),
        }
    }
}

/// Run every check against a parsed manifest and the archive listing.
pub fn validate_package(files: &FileListing, root: &Element, ns: &NamespaceMap) -> ValidationReport {
    let mut report = ValidationReport::new();

    let version = ScormVersion::detect(root, ns);
    report.push(Finding::info(format!("Detected Version: {}.", version)));

    let resources = manifest::resources(root, ns);
    check_item_references(root, ns, &resources, &mut report);
    check_resource_files(files, &resources, &mut report);

    report
}

/// Every item reference must name a declared resource.
fn check_item_references(
    root: &Element,
    ns: &NamespaceMap,
    resources: &[Resource],
    report: &mut ValidationReport,
) {
    let resource_ids: HashSet<&str> = resources
        .iter()
        .map(|resource| resource.identifier.as_str())
        .collect();

    for item in root.find_all(ns.imscp("item")) {
        if let Some(reference) = manifest::item_reference(item)
            && !resource_ids.contains(reference)
        {
            report.push(Finding::error(format!(
                "Broken Link: Item '{}' references non-existent resource '{}'.",
                item.attribute("identifier").unwrap_or_default(),
                reference
            )));
        }
    }
}

/// Every resource href must exist in the archive.
fn check_resource_files(files: &FileListing, resources: &[Resource], report: &mut ValidationReport) {
    for resource in resources {
        if let (Some(href), Some(path)) = (&resource.href, resource.archive_path())
            && !files.contains(&path)
        {
            report.push(Finding::error(format!(
                "Missing File: Resource '{}' points to '{}' which is missing from the zip.",
                resource.identifier, href
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(xml: &str, files: &[&str]) -> ValidationReport {
        let root = Element::parse(xml.as_bytes()).unwrap();
        let ns = NamespaceMap::resolve(&root);
        let listing: FileListing = files.iter().map(|path| path.to_string()).collect();
        validate_package(&listing, &root, &ns)
    }

    const MANIFEST: &str = r#"<manifest xmlns="http://www.imsglobal.org/xsd/imscp_v1p1">
  <organizations>
    <organization identifier="ORG">
      <item identifier="I1" identifierref="R1"><title>One</title></item>
      <item identifier="I2" identifierref="R9"><title>Two</title></item>
      <item identifier="I3"><title>Folder</title>
        <item identifier="I4" identifierref="R8"/>
      </item>
    </organization>
  </organizations>
  <resources>
    <resource identifier="R1" href="content/index.html"/>
    <resource identifier="R2" href="content\page2.html"/>
    <resource identifier="R3" href="content/missing.html"/>
    <resource identifier="R4"/>
  </resources>
</manifest>"#;

    #[test]
    fn test_version_finding_comes_first() {
        let report = run(MANIFEST, &["content/index.html", "content/page2.html"]);
        assert_eq!(report.findings()[0], Finding::info("Detected Version: SCORM 1.2."));
    }

    #[test]
    fn test_one_error_per_broken_reference() {
        let report = run(MANIFEST, &["content/index.html", "content/page2.html", "content/missing.html"]);
        let errors: Vec<_> = report.errors().collect();
        assert_eq!(
            errors,
            vec![
                "Broken Link: Item 'I2' references non-existent resource 'R9'.",
                "Broken Link: Item 'I4' references non-existent resource 'R8'.",
            ]
        );
    }

    #[test]
    fn test_backslash_hrefs_are_normalized() {
        let report = run(MANIFEST, &["content/index.html", "content/page2.html"]);
        let missing: Vec<_> = report
            .errors()
            .filter(|message| message.starts_with("Missing File"))
            .collect();
        assert_eq!(
            missing,
            vec!["Missing File: Resource 'R3' points to 'content/missing.html' which is missing from the zip."]
        );
    }

    #[test]
    fn test_missing_backslash_href_reported_as_written() {
        let report = run(MANIFEST, &["content/index.html", "content/missing.html"]);
        assert!(
            report
                .errors()
                .any(|message| message == "Missing File: Resource 'R2' points to 'content\\page2.html' which is missing from the zip.")
        );
    }

    #[test]
    fn test_sequencing_means_scorm_2004() {
        let report = run(
            r#"<manifest xmlns:imsss="http://www.imsglobal.org/xsd/imsss_v1p0"><imsss:sequencing/></manifest>"#,
            &[],
        );
        assert_eq!(report.len(), 1);
        assert_eq!(report.infos().next(), Some("Detected Version: SCORM 2004."));
        assert!(report.is_healthy());
    }

    #[test]
    fn test_sequencing_in_wrong_namespace_is_ignored() {
        let report = run(r#"<manifest xmlns:x="urn:other"><x:sequencing/></manifest>"#, &[]);
        assert_eq!(report.infos().next(), Some("Detected Version: SCORM 1.2."));
    }

    #[test]
    fn test_report_partitions() {
        let report: ValidationReport = vec![
            Finding::info("a"),
            Finding::error("b"),
            Finding::warning("c"),
            Finding::error("d"),
        ]
        .into_iter()
        .collect();

        assert_eq!(report.count(Severity::Error), 2);
        assert_eq!(report.warnings().collect::<Vec<_>>(), vec!["c"]);
        assert!(!report.is_healthy());
        assert_eq!(serde_json::to_value(&report).unwrap()[2]["level"], "WARNING");
    }
}
