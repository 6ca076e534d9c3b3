//! Course outline construction from the organization's item tree.

use crate::common::{Error, Result};
use crate::scorm::manifest::{self, non_empty};
use crate::scorm::namespace::NamespaceMap;
use crate::xml::Element;
use serde::Serialize;
use std::collections::HashMap;

/// Title used when an item has no `<title>` child.
pub const NO_TITLE: &str = "No Title";
/// Course title used when the organization has no `<title>` child.
pub const UNTITLED_COURSE: &str = "Untitled Course";
/// Course title reported when no organization exists.
pub const UNKNOWN_COURSE: &str = "Unknown";

/// One node of the course outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub identifier: String,
    pub title: String,
    /// Href of the referenced resource; `None` for folders and broken references
    pub resource_href: Option<String>,
    pub sub_items: Vec<Item>,
}

impl Item {
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            resource_href: None,
            sub_items: Vec::new(),
        }
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.resource_href = Some(href.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Item>) -> Self {
        self.sub_items = children;
        self
    }

    /// Number of nodes in this subtree, including self.
    pub fn node_count(&self) -> usize {
        1 + self.sub_items.iter().map(Item::node_count).sum::<usize>()
    }
}

/// The course title together with its top-level items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseOutline {
    pub title: String,
    pub items: Vec<Item>,
}

/// Builds the outline of one organization.
pub struct StructureBuilder<'a> {
    ns: &'a NamespaceMap,
    hrefs: &'a HashMap<String, String>,
    max_depth: usize,
}

impl<'a> StructureBuilder<'a> {
    pub fn new(ns: &'a NamespaceMap, hrefs: &'a HashMap<String, String>, max_depth: usize) -> Self {
        Self { ns, hrefs, max_depth }
    }

    /// Locate the organization under `root` and build its outline.
    ///
    /// A missing organization or an item tree deeper than the configured
    /// limit is reported as [`Error::StructureError`].
    pub fn build(&self, root: &Element, prefer_default: bool) -> Result<CourseOutline> {
        let organization = manifest::organization(root, self.ns, prefer_default).ok_or_else(|| {
            Error::StructureError(
                "Could not find the <organization> element. The manifest might be malformed."
                    .to_string(),
            )
        })?;
        self.build_organization(organization)
    }

    pub fn build_organization(&self, organization: &Element) -> Result<CourseOutline> {
        let title = self
            .title_of(organization)
            .unwrap_or(UNTITLED_COURSE)
            .to_string();
        let items = self.items(organization, 1)?;
        Ok(CourseOutline { title, items })
    }

    fn items(&self, parent: &Element, depth: usize) -> Result<Vec<Item>> {
        let mut children = parent.children_named(self.ns.imscp("item")).peekable();
        if depth > self.max_depth && children.peek().is_some() {
            return Err(Error::StructureError(format!(
                "Item nesting exceeds the maximum depth of {}",
                self.max_depth
            )));
        }

        children
            .map(|element| {
                Ok(Item {
                    identifier: element.attribute("identifier").unwrap_or_default().to_string(),
                    title: self.title_of(element).unwrap_or(NO_TITLE).to_string(),
                    resource_href: manifest::item_reference(element)
                        .and_then(|reference| self.hrefs.get(reference))
                        .cloned(),
                    sub_items: self.items(element, depth + 1)?,
                })
            })
            .collect()
    }

    fn title_of<'e>(&self, element: &'e Element) -> Option<&'e str> {
        non_empty(element.child_text(self.ns.imscp("title")).map(str::trim))
    }
}
