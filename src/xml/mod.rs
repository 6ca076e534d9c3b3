//! Namespace-aware XML element tree.
//!
//! A small DOM tailored to manifest inspection: elements carry expanded
//! names, and lookups mirror the handful of path forms the extractors need
//! (`child`, `.//name`, `.//parent/child`).

pub mod element;
pub mod namespace;

pub use element::{Attribute, DEFAULT_MAX_ELEMENT_DEPTH, Descendants, Element};
pub use namespace::{ExpandedName, NamespaceStack, QualifiedName, XML_NS};
