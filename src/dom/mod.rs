//! Element-tree capability the analyzers run against.
//!
//! The analyzers only need selector-based lookups (`closest`, descendant
//! queries), attribute access, a visible-text rendering and a few layout facts.
//! [`html::HtmlPage`] provides these over a parsed HTML document; any other
//! tree representation can be plugged in by implementing the two traits.

pub mod html;

pub use html::{HtmlElement, HtmlPage};

use thiserror::Error;

/// Errors raised while querying an element tree
#[derive(Debug, Error)]
pub enum DomError {
    #[error("invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("document has no body element")]
    MissingBody,
}

/// Layout facts about an element, as far as the tree knows them
///
/// A live browser snapshot fills every field; a static document only knows
/// what its attributes and inline styles say.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElementLayout {
    /// Intrinsic width of the image resource in pixels
    pub natural_width: Option<u32>,
    /// Intrinsic height of the image resource in pixels
    pub natural_height: Option<u32>,
    /// Width of the rendered box in CSS pixels
    pub rendered_width: Option<f64>,
    /// Height of the rendered box in CSS pixels
    pub rendered_height: Option<f64>,
    /// Hidden by `display:none`, `visibility:hidden` or the `hidden` attribute,
    /// on the element itself or an ancestor
    pub hidden: bool,
}

impl ElementLayout {
    /// Visible means not hidden and, when the box size is known, non-zero
    pub fn is_visible(&self) -> bool {
        if self.hidden {
            return false;
        }
        let zero_width = self.rendered_width.is_some_and(|w| w <= 0.0);
        let zero_height = self.rendered_height.is_some_and(|h| h <= 0.0);
        !(zero_width || zero_height)
    }
}

/// An element in a page tree
pub trait PageElement: Sized {
    /// Lower-case tag name
    fn tag_name(&self) -> &str;

    /// Attribute value, if present
    fn attr(&self, name: &str) -> Option<&str>;

    /// The element itself or its nearest ancestor matching `selector`
    fn closest(&self, selector: &str) -> Result<Option<Self>, DomError>;

    /// Whether any descendant matches `selector`
    fn contains(&self, selector: &str) -> Result<bool, DomError>;

    /// Text as it would be rendered, with subtrees matching `excluded` left out
    ///
    /// The element tree itself is never modified.
    fn visible_text(&self, excluded: Option<&str>) -> Result<String, DomError>;

    /// Size and visibility facts
    fn layout(&self) -> ElementLayout;
}

/// A whole page
pub trait PageDocument {
    type Element<'a>: PageElement
    where
        Self: 'a;

    /// First element in document order matching `selector`
    fn query_first(&self, selector: &str) -> Result<Option<Self::Element<'_>>, DomError>;

    /// All elements in document order matching `selector`
    fn query_all(&self, selector: &str) -> Result<Vec<Self::Element<'_>>, DomError>;

    /// The `<body>` element
    fn body(&self) -> Result<Self::Element<'_>, DomError>;

    /// Unfiltered text of the body, used when filtered extraction fails
    fn raw_text(&self) -> String;
}
