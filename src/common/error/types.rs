//! Error enum and result alias shared by every module of the crate.
use thiserror::Error;

/// Main error type for package inspection.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not a readable ZIP container
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// No `imsmanifest.xml` at the archive root
    #[error("'imsmanifest.xml' not found at the package root")]
    MissingManifest,

    /// Malformed XML in the manifest
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The manifest does not define a usable organization tree
    #[error("Structure error: {0}")]
    StructureError(String),

    /// Serializing an export failed
    #[error("Export error: {0}")]
    ExportError(String),
}

impl Error {
    /// Whether the error still allows a partial analysis result.
    #[inline]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Error::StructureError(_))
    }
}

/// Result type for inspector operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_structure_errors_are_degraded() {
        assert!(Error::StructureError("no organization".to_string()).is_degraded());
        assert!(!Error::MissingManifest.is_degraded());
        assert!(!Error::ParseError("bad".to_string()).is_degraded());
        assert!(!Error::InvalidFormat("bad".to_string()).is_degraded());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            Error::MissingManifest.to_string(),
            "'imsmanifest.xml' not found at the package root"
        );
        assert_eq!(
            Error::ParseError("unexpected end".to_string()).to_string(),
            "Parse error: unexpected end"
        );
    }
}
