//! In-memory element tree for manifest XML.
//!
//! The tree is built in a single streaming pass with `quick-xml`; names are
//! resolved to [`QualifiedName`]s as elements open, so lookups compare
//! namespace URIs rather than prefixes. Building uses an explicit stack and the
//! query helpers walk the tree iteratively. Dropping, cloning and comparing a
//! tree still recurse once per level, so [`Element::parse_with_max_depth`]
//! rejects documents nested deeper than a fixed limit.

use crate::common::{Error, Result};
use crate::xml::namespace::{ExpandedName, NamespaceStack, QualifiedName, split_prefixed};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Default element nesting limit for [`Element::parse`].
pub const DEFAULT_MAX_ELEMENT_DEPTH: usize = 1024;

/// Attribute with a resolved name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QualifiedName,
    pub value: String,
}

/// XML element with namespace-resolved names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: QualifiedName,
    attributes: Vec<Attribute>,
    text_content: String,
    children: Vec<Element>,
}

impl Element {
    /// Create a new, empty element.
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            text_content: String::new(),
            children: Vec::new(),
        }
    }

    /// Get the expanded name.
    #[inline]
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// Get the namespace URI (empty when unqualified).
    #[inline]
    pub fn namespace(&self) -> &str {
        &self.name.namespace
    }

    /// Get the local name (without namespace).
    #[inline]
    pub fn local_name(&self) -> &str {
        &self.name.local_name
    }

    /// Check whether this element has the given expanded name.
    #[inline]
    pub fn is(&self, name: ExpandedName<'_>) -> bool {
        self.name.matches(name)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Get an attribute that is not in any namespace, such as `identifier`.
    pub fn attribute(&self, local_name: &str) -> Option<&str> {
        self.attribute_ns(ExpandedName::unqualified(local_name))
    }

    /// Get a namespaced attribute, such as `adlcp:scormType`.
    pub fn attribute_ns(&self, name: ExpandedName<'_>) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name.matches(name))
            .map(|attr| attr.value.as_str())
    }

    /// Text and CDATA before the first child element.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text_content
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First direct child with the given name.
    pub fn child(&self, name: ExpandedName<'_>) -> Option<&Element> {
        self.children.iter().find(|child| child.is(name))
    }

    /// Direct children with the given name, in document order.
    pub fn children_named<'e, 'n>(
        &'e self,
        name: ExpandedName<'n>,
    ) -> impl Iterator<Item = &'e Element> {
        self.children.iter().filter(move |child| child.is(name))
    }

    /// Text of the first direct child with the given name.
    pub fn child_text(&self, name: ExpandedName<'_>) -> Option<&str> {
        self.child(name).map(Element::text)
    }

    /// All descendants (not including `self`) in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// First descendant with the given name, in document order.
    pub fn find(&self, name: ExpandedName<'_>) -> Option<&Element> {
        self.descendants().find(|element| element.is(name))
    }

    /// All descendants with the given name, in document order.
    pub fn find_all<'e, 'n>(&'e self, name: ExpandedName<'n>) -> impl Iterator<Item = &'e Element> {
        self.descendants().filter(move |element| element.is(name))
    }

    /// First `child` element directly under any `parent` descendant.
    ///
    /// Equivalent to the path `.//parent/child`.
    pub fn find_child_of(&self, parent: ExpandedName<'_>, child: ExpandedName<'_>) -> Option<&Element> {
        self.find_all(parent).find_map(|element| element.child(child))
    }

    /// Count of this element and all its descendants.
    pub fn len_subtree(&self) -> usize {
        1 + self.descendants().count()
    }

    /// Parse a document with the default nesting limit.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Self::parse_with_max_depth(bytes, DEFAULT_MAX_ELEMENT_DEPTH)
    }

    /// Parse a document and return its root element.
    ///
    /// The input must be UTF-8 without a BOM; see [`crate::common::to_utf8_xml`].
    /// DTDs are skipped. Only the predefined entities and character references
    /// are expanded. An element nested deeper than `max_depth` (the root is
    /// depth 1) is a parse error.
    pub fn parse_with_max_depth(bytes: &[u8], max_depth: usize) -> Result<Self> {
        let mut reader = Reader::from_reader(bytes);
        let mut buf = Vec::new();
        let mut namespaces = NamespaceStack::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(Error::ParseError(
                            "Junk after document element".to_string(),
                        ));
                    }
                    check_depth(stack.len() + 1, max_depth)?;
                    let element = Self::open_element(e, &mut namespaces)?;
                    stack.push(element);
                },
                Ok(Event::Empty(ref e)) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(Error::ParseError(
                            "Junk after document element".to_string(),
                        ));
                    }
                    check_depth(stack.len() + 1, max_depth)?;
                    let element = Self::open_element(e, &mut namespaces)?;
                    namespaces.pop_scope();
                    Self::close_element(element, &mut stack, &mut root);
                },
                Ok(Event::End(_)) => {
                    namespaces.pop_scope();
                    match stack.pop() {
                        Some(element) => Self::close_element(element, &mut stack, &mut root),
                        None => {
                            return Err(Error::ParseError("Unexpected closing tag".to_string()));
                        },
                    }
                },
                Ok(Event::Text(ref t)) => {
                    if let Some(current) = leading_text_target(&mut stack) {
                        current.text_content.push_str(&String::from_utf8_lossy(t));
                    }
                },
                Ok(Event::CData(ref c)) => {
                    if let Some(current) = leading_text_target(&mut stack) {
                        current.text_content.push_str(&String::from_utf8_lossy(c));
                    }
                },
                Ok(Event::GeneralRef(ref r)) => {
                    let entity = String::from_utf8_lossy(r);
                    let resolved = resolve_entity(&entity).ok_or_else(|| {
                        Error::ParseError(format!("Undefined entity: &{};", entity))
                    })?;
                    if let Some(current) = leading_text_target(&mut stack) {
                        current.text_content.push(resolved);
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::ParseError(format!(
                        "XML parsing error at position {}: {}",
                        reader.buffer_position(),
                        e
                    )));
                },
                _ => {},
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(Error::ParseError(format!(
                "Unexpected end of document: element '{}' is not closed",
                open.name()
            )));
        }

        root.ok_or_else(|| Error::ParseError("No root element found".to_string()))
    }

    /// Build an element from a start tag, opening its namespace scope.
    fn open_element(e: &BytesStart<'_>, namespaces: &mut NamespaceStack) -> Result<Self> {
        namespaces.push_scope();

        // First pass: namespace declarations, which also apply to the element's own name
        let mut plain_attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            if !namespaces.declare(&key, &value) {
                plain_attributes.push((key, value));
            }
        }

        let raw_name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let mut element = Element::new(resolve_name(&raw_name, namespaces, true)?);

        // Second pass: regular attributes; unprefixed ones are in no namespace
        for (key, value) in plain_attributes {
            let name = resolve_name(&key, namespaces, false)?;
            element.attributes.push(Attribute { name, value });
        }

        Ok(element)
    }

    fn close_element(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None => *root = Some(element),
        }
    }
}

/// Depth-first, document-order iterator over an element's descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

/// The open element, while no child element has been closed inside it yet.
fn leading_text_target(stack: &mut [Element]) -> Option<&mut Element> {
    stack.last_mut().filter(|current| current.children.is_empty())
}

fn check_depth(depth: usize, max_depth: usize) -> Result<()> {
    if depth > max_depth {
        return Err(Error::ParseError(format!(
            "Element nesting exceeds the maximum depth of {}",
            max_depth
        )));
    }
    Ok(())
}

fn resolve_name(raw: &str, namespaces: &NamespaceStack, is_element: bool) -> Result<QualifiedName> {
    let (prefix, local_name) = split_prefixed(raw);
    if prefix.is_none() && !is_element {
        return Ok(QualifiedName::new("", local_name));
    }

    namespaces
        .resolve(prefix)
        .map(|uri| QualifiedName::new(uri, local_name))
        .ok_or_else(|| Error::ParseError(format!("Unbound namespace prefix in '{}'", raw)))
}

/// Expand a predefined entity or character reference (name without `&`/`;`).
fn resolve_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => {
            let reference = entity.strip_prefix('#')?;
            let code = match reference.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => reference.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CP: &str = "http://www.imsglobal.org/xsd/imscp_v1p1";
    const ADLCP: &str = "http://www.adlnet.org/xsd/adlcp_v1p3";

    fn cp(local_name: &str) -> ExpandedName<'_> {
        ExpandedName::new(CP, local_name)
    }

    #[test]
    fn test_default_namespace_applies_to_elements_not_attributes() {
        let root = Element::parse(
            br#"<manifest xmlns="http://www.imsglobal.org/xsd/imscp_v1p1" identifier="M1"/>"#,
        )
        .unwrap();

        assert_eq!(root.namespace(), CP);
        assert_eq!(root.local_name(), "manifest");
        assert_eq!(root.attribute("identifier"), Some("M1"));
        assert_eq!(root.name().to_string(), format!("{{{}}}manifest", CP));
    }

    #[test]
    fn test_prefixed_attributes_resolve() {
        let root = Element::parse(
            br#"<manifest xmlns="http://www.imsglobal.org/xsd/imscp_v1p1"
                          xmlns:adlcp="http://www.adlnet.org/xsd/adlcp_v1p3">
                  <resources>
                    <resource identifier="R1" adlcp:scormType="sco" href="a.html"/>
                  </resources>
                </manifest>"#,
        )
        .unwrap();

        let resource = root.find(cp("resource")).unwrap();
        assert_eq!(resource.attribute_ns(ExpandedName::new(ADLCP, "scormType")), Some("sco"));
        assert_eq!(resource.attribute("scormType"), None);
        assert_eq!(resource.attribute("href"), Some("a.html"));
    }

    #[test]
    fn test_unqualified_document() {
        let root = Element::parse(b"<manifest><organizations><organization/></organizations></manifest>")
            .unwrap();
        assert_eq!(root.namespace(), "");
        assert!(root.find(ExpandedName::unqualified("organization")).is_some());
        assert!(root.find(cp("organization")).is_none());
    }

    #[test]
    fn test_descendants_in_document_order() {
        let root = Element::parse(
            b"<r><item id='1'><item id='2'/></item><item id='3'/><other><item id='4'/></other></r>",
        )
        .unwrap();
        let ids: Vec<_> = root
            .find_all(ExpandedName::unqualified("item"))
            .filter_map(|item| item.attribute("id"))
            .collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);

        let direct: Vec<_> = root
            .children_named(ExpandedName::unqualified("item"))
            .filter_map(|item| item.attribute("id"))
            .collect();
        assert_eq!(direct, vec!["1", "3"]);
        assert_eq!(root.len_subtree(), 6);
    }

    #[test]
    fn test_find_excludes_self() {
        let root = Element::parse(b"<item><title>T</title></item>").unwrap();
        assert!(root.find(ExpandedName::unqualified("item")).is_none());
    }

    #[test]
    fn test_find_child_of() {
        let root = Element::parse(
            b"<m><description/><description><string>First</string><string>Second</string></description></m>",
        )
        .unwrap();
        let found = root
            .find_child_of(
                ExpandedName::unqualified("description"),
                ExpandedName::unqualified("string"),
            )
            .unwrap();
        assert_eq!(found.text(), "First");
    }

    #[test]
    fn test_text_entities_and_cdata() {
        let root = Element::parse(b"<t>Fish &amp; Chips &#x41;&#66; <![CDATA[<raw>]]></t>").unwrap();
        assert_eq!(root.text(), "Fish & Chips AB <raw>");
    }

    #[test]
    fn test_attribute_entities_are_unescaped() {
        let root = Element::parse(br#"<r href="a&amp;b.html"/>"#).unwrap();
        assert_eq!(root.attribute("href"), Some("a&b.html"));
    }

    #[test]
    fn test_malformed_documents_fail() {
        assert!(matches!(Element::parse(b"<a><b></a>"), Err(Error::ParseError(_))));
        assert!(matches!(Element::parse(b"<a><b>"), Err(Error::ParseError(_))));
        assert!(matches!(Element::parse(b""), Err(Error::ParseError(_))));
        assert!(matches!(Element::parse(b"<x:a/>"), Err(Error::ParseError(_))));
        assert!(matches!(Element::parse(b"<a/><b/>"), Err(Error::ParseError(_))));
    }

    #[test]
    fn test_text_stops_at_first_child() {
        let root = Element::parse(b"<title>Intro <b>bold</b> tail &amp; more</title>").unwrap();
        assert_eq!(root.text(), "Intro ");
        assert_eq!(root.children()[0].text(), "bold");
    }

    fn nested(depth: usize) -> Vec<u8> {
        let mut xml = Vec::with_capacity(depth * 7);
        for _ in 0..depth {
            xml.extend_from_slice(b"<x>");
        }
        for _ in 0..depth {
            xml.extend_from_slice(b"</x>");
        }
        xml
    }

    #[test]
    fn test_nesting_limit() {
        assert!(Element::parse_with_max_depth(&nested(3), 3).is_ok());
        assert!(matches!(
            Element::parse_with_max_depth(&nested(4), 3),
            Err(Error::ParseError(_))
        ));
        assert!(matches!(
            Element::parse_with_max_depth(b"<a><b><c/></b></a>", 2),
            Err(Error::ParseError(_))
        ));
    }

    #[test]
    fn test_deep_document_is_rejected_not_overflowed() {
        let err = Element::parse(&nested(DEFAULT_MAX_ELEMENT_DEPTH + 20_000)).unwrap_err();
        assert!(err.to_string().contains("maximum depth"));
        assert!(Element::parse(&nested(DEFAULT_MAX_ELEMENT_DEPTH)).is_ok());
    }

    #[test]
    fn test_prolog_and_comments_are_skipped() {
        let root = Element::parse(
            b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- generated --><manifest/>",
        )
        .unwrap();
        assert_eq!(root.local_name(), "manifest");
    }
}
