use super::{DomError, ElementLayout, PageDocument, PageElement};
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

/// Natural width captured by the browser snapshot script
pub const NATURAL_WIDTH_ATTR: &str = "data-pm-natural-width";
/// Natural height captured by the browser snapshot script
pub const NATURAL_HEIGHT_ATTR: &str = "data-pm-natural-height";
/// Rendered box width captured by the browser snapshot script
pub const RENDERED_WIDTH_ATTR: &str = "data-pm-rendered-width";
/// Rendered box height captured by the browser snapshot script
pub const RENDERED_HEIGHT_ATTR: &str = "data-pm-rendered-height";
/// Computed visibility captured by the browser snapshot script
pub const VISIBLE_ATTR: &str = "data-pm-visible";

static HIDDEN_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|;)\s*(?:display\s*:\s*none|visibility\s*:\s*hidden)\s*(?:!important\s*)?(?:;|$)")
        .unwrap()
});

/// Elements that never render text
const NON_RENDERED_TAGS: &[&str] = &["script", "style", "noscript", "template", "head", "title"];

/// Elements that break words apart when rendered
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot", "th", "thead", "tr",
    "ul",
];

/// Parses a CSS selector, keeping the error message
fn parse_selector(selector: &str) -> Result<Selector, DomError> {
    Selector::parse(selector).map_err(|e| DomError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Parses a pixel value such as `300`, `300px` or `299.5`
fn parse_pixels(value: &str) -> Option<f64> {
    value
        .trim()
        .trim_end_matches("px")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// A parsed HTML document
///
/// Static pages are analyzed as-is. Pages captured from a live browser carry
/// the `data-pm-*` snapshot attributes, which take precedence over the
/// `width`/`height` attributes and inline styles.
pub struct HtmlPage {
    html: Html,
}

impl HtmlPage {
    /// Parses a full HTML document
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }
}

impl PageDocument for HtmlPage {
    type Element<'a> = HtmlElement<'a>;

    fn query_first(&self, selector: &str) -> Result<Option<HtmlElement<'_>>, DomError> {
        let selector = parse_selector(selector)?;
        Ok(self.html.select(&selector).next().map(HtmlElement::new))
    }

    fn query_all(&self, selector: &str) -> Result<Vec<HtmlElement<'_>>, DomError> {
        let selector = parse_selector(selector)?;
        Ok(self.html.select(&selector).map(HtmlElement::new).collect())
    }

    fn body(&self) -> Result<HtmlElement<'_>, DomError> {
        self.query_first("body")?.ok_or(DomError::MissingBody)
    }

    fn raw_text(&self) -> String {
        match self.body() {
            Ok(body) => body.element.text().collect::<Vec<_>>().join(" "),
            Err(_) => String::new(),
        }
    }
}

/// An element of an [`HtmlPage`]
#[derive(Debug, Clone, Copy)]
pub struct HtmlElement<'a> {
    element: ElementRef<'a>,
}

impl<'a> HtmlElement<'a> {
    fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    /// Whether this element alone hides itself (ancestors not considered)
    fn hides_itself(&self) -> bool {
        if let Some(visible) = self.attr(VISIBLE_ATTR) {
            return visible.eq_ignore_ascii_case("false");
        }
        if self.attr("hidden").is_some() {
            return true;
        }
        self.attr("style")
            .is_some_and(|style| HIDDEN_STYLE_RE.is_match(style))
    }

    fn pixels(&self, snapshot_attr: &str, fallback_attr: &str) -> Option<f64> {
        self.attr(snapshot_attr)
            .and_then(parse_pixels)
            .or_else(|| self.attr(fallback_attr).and_then(parse_pixels))
    }

    fn ancestors(&self) -> impl Iterator<Item = HtmlElement<'a>> {
        std::iter::successors(self.element.parent(), |node| node.parent())
            .filter_map(ElementRef::wrap)
            .map(HtmlElement::new)
    }

    fn collect_text(&self, excluded: Option<&Selector>, out: &mut String) {
        for child in self.element.children() {
            match child.value() {
                Node::Text(text) => out.push_str(text),
                Node::Element(_) => {
                    let Some(child) = ElementRef::wrap(child).map(HtmlElement::new) else {
                        continue;
                    };
                    if NON_RENDERED_TAGS.contains(&child.tag_name()) || child.hides_itself() {
                        continue;
                    }
                    if excluded.is_some_and(|sel| sel.matches(&child.element)) {
                        continue;
                    }
                    let block = BLOCK_TAGS.contains(&child.tag_name());
                    if block {
                        out.push(' ');
                    }
                    child.collect_text(excluded, out);
                    if block {
                        out.push(' ');
                    }
                }
                _ => {}
            }
        }
    }
}

impl<'a> PageElement for HtmlElement<'a> {
    fn tag_name(&self) -> &str {
        self.element.value().name()
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }

    fn closest(&self, selector: &str) -> Result<Option<Self>, DomError> {
        let selector = parse_selector(selector)?;
        if selector.matches(&self.element) {
            return Ok(Some(*self));
        }
        Ok(self.ancestors().find(|a| selector.matches(&a.element)))
    }

    fn contains(&self, selector: &str) -> Result<bool, DomError> {
        let selector = parse_selector(selector)?;
        Ok(self
            .element
            .select(&selector)
            .any(|found| found.id() != self.element.id()))
    }

    fn visible_text(&self, excluded: Option<&str>) -> Result<String, DomError> {
        let excluded = excluded.map(parse_selector).transpose()?;
        let mut out = String::new();
        self.collect_text(excluded.as_ref(), &mut out);
        Ok(out)
    }

    fn layout(&self) -> ElementLayout {
        let natural_width = self.pixels(NATURAL_WIDTH_ATTR, "width").map(|w| w as u32);
        let natural_height = self.pixels(NATURAL_HEIGHT_ATTR, "height").map(|h| h as u32);

        // The snapshot's computed style already accounts for ancestors
        let hidden = if self.attr(VISIBLE_ATTR).is_some() {
            self.hides_itself()
        } else {
            self.hides_itself() || self.ancestors().any(|a| a.hides_itself())
        };

        ElementLayout {
            natural_width,
            natural_height,
            rendered_width: self.pixels(RENDERED_WIDTH_ATTR, "width"),
            rendered_height: self.pixels(RENDERED_HEIGHT_ATTR, "height"),
            hidden,
        }
    }
}
