//! Namespace handling for the manifest element tree.
//!
//! Element and attribute names are resolved against the `xmlns` declarations
//! in scope while the tree is built, so every node carries its expanded name
//! (namespace URI plus local name). Queries then compare expanded names and
//! never depend on the prefixes a particular authoring tool chose.

use smallvec::SmallVec;
use std::fmt;

/// The namespace bound to the reserved `xml` prefix.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Expanded name of an element or attribute.
///
/// An empty `namespace` means the name is not in any namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Namespace URI (empty when unqualified)
    pub namespace: String,
    /// Local name (without prefix)
    pub local_name: String,
}

impl QualifiedName {
    /// Create a new qualified name.
    pub fn new(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local_name: local_name.into(),
        }
    }

    /// Check whether this name has a namespace.
    #[inline]
    pub fn is_qualified(&self) -> bool {
        !self.namespace.is_empty()
    }

    /// Check if this name matches a borrowed expanded name.
    #[inline]
    pub fn matches(&self, name: ExpandedName<'_>) -> bool {
        self.local_name == name.local_name && self.namespace == name.namespace
    }

    /// Parse Clark notation (`{uri}local` or `local`).
    pub fn from_clark(name: &str) -> Self {
        if let Some(rest) = name.strip_prefix('{')
            && let Some(end) = memchr::memchr(b'}', rest.as_bytes())
        {
            return Self::new(&rest[..end], &rest[end + 1..]);
        }
        Self::new("", name)
    }
}

impl fmt::Display for QualifiedName {
    /// Formats the name in Clark notation, e.g. `{http://example.com/ns}item`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_qualified() {
            write!(f, "{{{}}}{}", self.namespace, self.local_name)
        } else {
            f.write_str(&self.local_name)
        }
    }
}

/// Borrowed expanded name used for queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandedName<'a> {
    pub namespace: &'a str,
    pub local_name: &'a str,
}

impl<'a> ExpandedName<'a> {
    #[inline]
    pub const fn new(namespace: &'a str, local_name: &'a str) -> Self {
        Self {
            namespace,
            local_name,
        }
    }

    /// A name in no namespace.
    #[inline]
    pub const fn unqualified(local_name: &'a str) -> Self {
        Self::new("", local_name)
    }
}

/// Split a raw `prefix:local` name.
#[inline]
pub fn split_prefixed(name: &str) -> (Option<&str>, &str) {
    match memchr::memchr(b':', name.as_bytes()) {
        Some(colon_pos) => (Some(&name[..colon_pos]), &name[colon_pos + 1..]),
        None => (None, name),
    }
}

/// A single `xmlns` / `xmlns:prefix` declaration.
#[derive(Debug, Clone)]
struct Binding {
    prefix: Option<String>,
    uri: String,
}

/// Declarations made on one element; most elements declare none.
type Scope = SmallVec<[Binding; 4]>;

/// Stack of namespace declarations for the elements currently open.
#[derive(Debug, Default)]
pub struct NamespaceStack {
    scopes: Vec<Scope>,
}

impl NamespaceStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a scope for a new element.
    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Close the innermost scope.
    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Record a declaration from a raw attribute key, if it is one.
    ///
    /// Returns `true` when the attribute was a namespace declaration.
    pub fn declare(&mut self, raw_key: &str, uri: &str) -> bool {
        let prefix = if raw_key == "xmlns" {
            None
        } else if let Some(prefix) = raw_key.strip_prefix("xmlns:") {
            Some(prefix.to_string())
        } else {
            return false;
        };

        if let Some(scope) = self.scopes.last_mut() {
            scope.push(Binding {
                prefix,
                uri: uri.to_string(),
            });
        }
        true
    }

    /// Resolve a prefix to its namespace URI.
    ///
    /// `None` resolves the default namespace, which is the empty string when
    /// undeclared. An unbound named prefix yields `None`.
    pub fn resolve(&self, prefix: Option<&str>) -> Option<&str> {
        if prefix == Some("xml") {
            return Some(XML_NS);
        }

        for scope in self.scopes.iter().rev() {
            for binding in scope.iter().rev() {
                if binding.prefix.as_deref() == prefix {
                    return Some(binding.uri.as_str());
                }
            }
        }

        match prefix {
            None => Some(""),
            Some(_) => None,
        }
    }
}
