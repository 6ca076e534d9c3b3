//! Namespace resolution for manifest queries.
//!
//! The mastery-scoring (`adlcp`), sequencing (`imsss`), and metadata (`lom`)
//! vocabularies have stable URIs. The content-packaging (`imscp`) URI varies
//! between authoring tools, so it is taken from the root element of each
//! manifest. A query built against any other `imscp` URI silently matches
//! nothing, which is why every query receives the resolved [`NamespaceMap`]
//! explicitly.

use crate::xml::{Element, ExpandedName};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// ADL content packaging extensions (mastery score, SCORM type).
pub const ADLCP_NS: &str = "http://www.adlnet.org/xsd/adlcp_v1p3";
/// IMS Simple Sequencing.
pub const IMSSS_NS: &str = "http://www.imsglobal.org/xsd/imsss_v1p0";
/// IEEE Learning Object Metadata.
pub const LOM_NS: &str = "http://ltsc.ieee.org/xsd/LOM";

/// Short prefixes used by the extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prefix {
    Imscp,
    Adlcp,
    Imsss,
    Lom,
}

impl Prefix {
    pub const ALL: [Prefix; 4] = [Prefix::Imscp, Prefix::Adlcp, Prefix::Imsss, Prefix::Lom];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Prefix::Imscp => "imscp",
            Prefix::Adlcp => "adlcp",
            Prefix::Imsss => "imsss",
            Prefix::Lom => "lom",
        }
    }

    pub fn from_name(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.as_str() == prefix)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prefix to URI mapping for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceMap {
    imscp: String,
}

impl NamespaceMap {
    /// Derive the map from a parsed manifest root.
    ///
    /// The `imscp` URI is exactly the root element's namespace; an unqualified
    /// root yields the empty namespace so unqualified manifests still match.
    pub fn resolve(root: &Element) -> Self {
        Self::with_imscp(root.namespace())
    }

    /// Build a map with an explicit content-packaging URI.
    pub fn with_imscp(uri: impl Into<String>) -> Self {
        Self { imscp: uri.into() }
    }

    /// Namespace URI bound to a prefix.
    #[inline]
    pub fn uri(&self, prefix: Prefix) -> &str {
        match prefix {
            Prefix::Imscp => &self.imscp,
            Prefix::Adlcp => ADLCP_NS,
            Prefix::Imsss => IMSSS_NS,
            Prefix::Lom => LOM_NS,
        }
    }

    /// Namespace URI for a prefix given as text.
    pub fn get(&self, prefix: &str) -> Option<&str> {
        Prefix::from_name(prefix).map(|prefix| self.uri(prefix))
    }

    /// All `(prefix, uri)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Prefix, &str)> {
        Prefix::ALL.into_iter().map(move |prefix| (prefix, self.uri(prefix)))
    }

    /// Expanded name for `prefix:local_name`.
    #[inline]
    pub fn name<'a>(&'a self, prefix: Prefix, local_name: &'a str) -> ExpandedName<'a> {
        ExpandedName::new(self.uri(prefix), local_name)
    }

    #[inline]
    pub fn imscp<'a>(&'a self, local_name: &'a str) -> ExpandedName<'a> {
        self.name(Prefix::Imscp, local_name)
    }

    #[inline]
    pub fn adlcp<'a>(&'a self, local_name: &'a str) -> ExpandedName<'a> {
        self.name(Prefix::Adlcp, local_name)
    }

    #[inline]
    pub fn imsss<'a>(&'a self, local_name: &'a str) -> ExpandedName<'a> {
        self.name(Prefix::Imsss, local_name)
    }

    #[inline]
    pub fn lom<'a>(&'a self, local_name: &'a str) -> ExpandedName<'a> {
        self.name(Prefix::Lom, local_name)
    }
}

impl Serialize for NamespaceMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Prefix::ALL.len()))?;
        for (prefix, uri) in self.iter() {
            map.serialize_entry(prefix.as_str(), uri)?;
        }
        map.end()
    }
}
