//! Export of analysis results.
//!
//! The full analysis is rendered as pretty-printed JSON or as YAML, and the
//! content map as CSV. Suggested file names follow the course title.

pub mod delimited;

pub use delimited::{CONTENT_MAP_HEADER, DelimitedConfig, write_content_map};

use crate::common::{Error, Result};
use crate::scorm::AnalysisResult;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Output artifact kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Full analysis as JSON
    Json,
    /// Full analysis as YAML
    Yaml,
    /// Content map as CSV
    Csv,
}

impl ExportFormat {
    pub const fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
            ExportFormat::Csv => "csv",
        }
    }

    const fn suffix(&self) -> &'static str {
        match self {
            ExportFormat::Json | ExportFormat::Yaml => "full_analysis",
            ExportFormat::Csv => "content_map",
        }
    }

    /// Suggested file name, e.g. `Fire Safety_full_analysis.json`.
    ///
    /// Path separators in the title are replaced so the name stays a single
    /// path component.
    pub fn file_name(&self, course_title: &str) -> String {
        let title: String = course_title
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        format!("{}_{}.{}", title, self.suffix(), self.extension())
    }

    /// Render a result in this format.
    pub fn render(&self, result: &AnalysisResult) -> Result<String> {
        match self {
            ExportFormat::Json => to_json(result),
            ExportFormat::Yaml => to_yaml(result),
            ExportFormat::Csv => to_csv(result),
        }
    }

    /// Write a result into `dir` under its suggested name.
    pub fn export_to_dir(&self, result: &AnalysisResult, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name(&result.course_title));
        std::fs::write(&path, self.render(result)?)?;
        log::info!("Wrote {}", path.display());
        Ok(path)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Full analysis as JSON with two-space indentation.
pub fn to_json(result: &AnalysisResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Stream the full analysis as JSON, formatted like [`to_json`].
pub fn write_json<W: Write>(result: &AnalysisResult, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, result)?;
    Ok(())
}

/// Full analysis as YAML.
pub fn to_yaml(result: &AnalysisResult) -> Result<String> {
    serde_saphyr::to_string(result)
        .map_err(|e| Error::ExportError(format!("Failed to serialize analysis to YAML: {}", e)))
}

/// Content map as CSV with a `Path,File,Identifier` header.
pub fn to_csv(result: &AnalysisResult) -> Result<String> {
    let mut out = Vec::new();
    write_content_map(&result.content_map(), &mut out, &DelimitedConfig::csv())?;
    String::from_utf8(out).map_err(|e| Error::ExportError(e.to_string()))
}
