//! Typed views over manifest elements.
//!
//! Shared lookups used by the metadata extractor, the validator, and the
//! structure builder: resources, items, the organization, and the sequencing
//! node. Every function takes the [`NamespaceMap`] resolved for the manifest.

use crate::scorm::namespace::NamespaceMap;
use crate::xml::Element;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Attribute linking an item to a resource.
pub const IDENTIFIER_REF: &str = "identifierref";

/// Kind of a resource: a trackable SCO or a static asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScormType {
    Sco,
    #[default]
    Asset,
}

impl ScormType {
    /// Interpret a `scormType` attribute value; anything but `sco` is an asset.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some(value) if value.trim().eq_ignore_ascii_case("sco") => ScormType::Sco,
            _ => ScormType::Asset,
        }
    }

    /// Read the type of a resource element.
    ///
    /// SCORM 2004 spells the attribute `scormType`; SCORM 1.2 tools write
    /// `scormtype`.
    pub fn of_resource(resource: &Element, ns: &NamespaceMap) -> Self {
        let value = resource
            .attribute_ns(ns.adlcp("scormType"))
            .or_else(|| resource.attribute_ns(ns.adlcp("scormtype")));
        Self::from_attribute(value)
    }

    /// Lower-case form as written in manifests.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ScormType::Sco => "sco",
            ScormType::Asset => "asset",
        }
    }

    /// Upper-case form used for display.
    pub const fn label(&self) -> &'static str {
        match self {
            ScormType::Sco => "SCO",
            ScormType::Asset => "ASSET",
        }
    }
}

impl fmt::Display for ScormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ScormType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A `<resource>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub identifier: String,
    /// Launch path relative to the package root; `None` when absent or empty
    pub href: Option<String>,
    pub scorm_type: ScormType,
}

impl Resource {
    pub fn from_element(element: &Element, ns: &NamespaceMap) -> Self {
        Self {
            identifier: element.attribute("identifier").unwrap_or_default().to_string(),
            href: non_empty(element.attribute("href")).map(str::to_string),
            scorm_type: ScormType::of_resource(element, ns),
        }
    }

    /// The href as it should appear in the archive listing.
    pub fn archive_path(&self) -> Option<String> {
        self.href.as_deref().map(normalize_path)
    }
}

/// SCORM version inferred from the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScormVersion {
    #[serde(rename = "SCORM 1.2")]
    Scorm12,
    #[serde(rename = "SCORM 2004")]
    Scorm2004,
}

impl ScormVersion {
    /// Sequencing and navigation first appeared in SCORM 2004, so any
    /// `imsss:sequencing` node marks a 2004 package.
    pub fn detect(root: &Element, ns: &NamespaceMap) -> Self {
        if sequencing(root, ns).is_some() {
            ScormVersion::Scorm2004
        } else {
            ScormVersion::Scorm12
        }
    }
}

impl fmt::Display for ScormVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScormVersion::Scorm12 => f.write_str("SCORM 1.2"),
            ScormVersion::Scorm2004 => f.write_str("SCORM 2004"),
        }
    }
}

/// Replace backslashes with forward slashes.
#[inline]
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

#[inline]
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// All resources anywhere in the manifest, in document order.
pub fn resources(root: &Element, ns: &NamespaceMap) -> Vec<Resource> {
    root.find_all(ns.imscp("resource"))
        .map(|element| Resource::from_element(element, ns))
        .collect()
}

/// Identifier to href mapping; a later duplicate identifier wins.
pub fn resource_hrefs(resources: &[Resource]) -> HashMap<String, String> {
    resources
        .iter()
        .filter_map(|resource| {
            resource
                .href
                .as_ref()
                .map(|href| (resource.identifier.clone(), href.clone()))
        })
        .collect()
}

/// First resource element with the given identifier.
pub fn find_resource<'a>(root: &'a Element, ns: &NamespaceMap, identifier: &str) -> Option<&'a Element> {
    root.find_all(ns.imscp("resource"))
        .find(|resource| resource.attribute("identifier") == Some(identifier))
}

/// First `imsss:sequencing` node anywhere in the document.
pub fn sequencing<'a>(root: &'a Element, ns: &NamespaceMap) -> Option<&'a Element> {
    root.find(ns.imsss("sequencing"))
}

/// The item's resource reference, if any.
#[inline]
pub fn item_reference(item: &Element) -> Option<&str> {
    non_empty(item.attribute(IDENTIFIER_REF))
}

/// The organization that defines the course outline.
///
/// With `prefer_default`, the organization named by
/// `<organizations default="...">` is used when it exists; otherwise the
/// first organization in the document.
pub fn organization<'a>(root: &'a Element, ns: &NamespaceMap, prefer_default: bool) -> Option<&'a Element> {
    if prefer_default
        && let Some(default_id) = root
            .find(ns.imscp("organizations"))
            .and_then(|organizations| non_empty(organizations.attribute("default")))
        && let Some(named) = root
            .find_all(ns.imscp("organization"))
            .find(|organization| organization.attribute("identifier") == Some(default_id))
    {
        return Some(named);
    }

    root.find(ns.imscp("organization"))
}
