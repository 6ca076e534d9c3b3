//! SCORM package (ZIP archive) access.
//!
//! A package is opened once: the entry listing is captured for reference
//! checks and the manifest bytes are read eagerly, so the archive handle is
//! not kept around after construction.

use crate::common::{Error, Result, decode_text};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

/// File name of the package manifest, always at the archive root.
pub const MANIFEST_NAME: &str = "imsmanifest.xml";

/// Normalized entry paths of an archive.
///
/// Backslashes are converted to forward slashes on insertion so that lookups
/// match manifest hrefs written with either separator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileListing {
    entries: BTreeSet<String>,
}

impl FileListing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str) {
        self.entries.insert(path.replace('\\', "/"));
    }

    /// Exact, case-sensitive membership test on a normalized path.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

impl FromIterator<String> for FileListing {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut listing = FileListing::new();
        for path in iter {
            listing.insert(&path);
        }
        listing
    }
}

impl<'a> FromIterator<&'a str> for FileListing {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut listing = FileListing::new();
        for path in iter {
            listing.insert(path);
        }
        listing
    }
}

/// An opened SCORM package.
#[derive(Debug, Clone)]
pub struct PackageArchive {
    files: FileListing,
    manifest: Vec<u8>,
}

impl PackageArchive {
    /// Open a package from a file on disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    /// Open a package held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Open a package from any seekable reader.
    ///
    /// Fails with [`Error::InvalidFormat`] when the data is not a ZIP archive
    /// and with [`Error::MissingManifest`] when no `imsmanifest.xml` sits at
    /// the archive root.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(reader)
            .map_err(|e| Error::InvalidFormat(format!("Invalid ZIP archive: {}", e)))?;

        let files: FileListing = archive.file_names().collect();
        log::debug!("Package contains {} entries", files.len());

        // The stored name may use a backslash separator or none at all; look it
        // up by its normalized form and read it under the name the archive uses.
        let stored_name = archive
            .file_names()
            .find(|name| name.replace('\\', "/") == MANIFEST_NAME)
            .map(str::to_owned)
            .ok_or(Error::MissingManifest)?;

        let mut manifest = Vec::new();
        archive.by_name(&stored_name)?.read_to_end(&mut manifest)?;
        log::debug!("Read {} ({} bytes)", MANIFEST_NAME, manifest.len());

        Ok(Self { files, manifest })
    }

    pub fn files(&self) -> &FileListing {
        &self.files
    }

    /// Whether the archive holds an entry at the given href.
    pub fn contains(&self, path: &str) -> bool {
        self.files.contains(&path.replace('\\', "/"))
    }

    /// Raw manifest bytes as stored in the archive.
    pub fn manifest_bytes(&self) -> &[u8] {
        &self.manifest
    }

    /// Manifest decoded to text, with invalid UTF-8 replaced.
    pub fn manifest_text(&self) -> String {
        decode_text(&self.manifest)
    }
}
