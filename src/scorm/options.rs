/// Tunables for package analysis.
///
/// # Examples
///
/// ```rust
/// use scorm_inspector::AnalyzerOptions;
///
/// let options = AnalyzerOptions::new().with_max_element_depth(512);
/// assert_eq!(options.max_element_depth, 512);
///
/// let options = AnalyzerOptions::new()
///     .with_max_depth(32)
///     .with_prefer_default_organization(false);
/// assert_eq!(options.max_depth, 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerOptions {
    /// Deepest item nesting level accepted by the structure builder
    pub max_depth: usize,
    /// Build the outline from `<organizations default="...">` when it names
    /// an existing organization, instead of the first one in the document
    pub prefer_default_organization: bool,
    /// Deepest element nesting accepted by the manifest parser
    pub max_element_depth: usize,
}

/// Default item nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 256;

pub use crate::xml::DEFAULT_MAX_ELEMENT_DEPTH;

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            prefer_default_organization: true,
            max_element_depth: DEFAULT_MAX_ELEMENT_DEPTH,
        }
    }
}

impl AnalyzerOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the item nesting limit. Deeper outlines are reported as a
    /// structure error and analysis continues without an outline.
    #[inline]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the element nesting limit of the manifest parser. Deeper
    /// manifests fail with a parse error.
    #[inline]
    pub fn with_max_element_depth(mut self, max_depth: usize) -> Self {
        self.max_element_depth = max_depth;
        self
    }

    #[inline]
    pub fn with_prefer_default_organization(mut self, prefer: bool) -> Self {
        self.prefer_default_organization = prefer;
        self
    }
}
