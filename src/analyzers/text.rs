use super::{CONTENT_SELECTORS, NON_CONTENT_SELECTOR};
use crate::dom::{DomError, PageDocument, PageElement};
use regex::Regex;
use std::sync::LazyLock;

static NON_LETTER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\s]+").unwrap());
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{L}+").unwrap());

/// Counts the words in the page's main content
///
/// Never fails: if filtered extraction goes wrong the unfiltered body text is
/// counted instead, and an empty page counts as zero.
pub fn count_content_words<D: PageDocument>(doc: &D) -> usize {
    match content_text(doc) {
        Ok(text) => count_words(&text),
        Err(e) => {
            ::log::debug!("Falling back to raw body text for word count: {}", e);
            doc.raw_text().split_whitespace().count()
        }
    }
}

/// Visible text of the main content region with boilerplate left out
pub fn content_text<D: PageDocument>(doc: &D) -> Result<String, DomError> {
    let root = match find_content_root(doc)? {
        Some(root) => root,
        None => doc.body()?,
    };
    root.visible_text(Some(NON_CONTENT_SELECTOR))
}

/// First element matching one of the content selectors, in selector order
fn find_content_root<D: PageDocument>(doc: &D) -> Result<Option<D::Element<'_>>, DomError> {
    for selector in CONTENT_SELECTORS {
        if let Some(element) = doc.query_first(selector)? {
            ::log::trace!("Main content matched {}", selector);
            return Ok(Some(element));
        }
    }
    Ok(None)
}

/// Keeps only letters and whitespace, collapsing whitespace runs
pub fn letters_only(text: &str) -> String {
    NON_LETTER_RE
        .replace_all(text, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Counts maximal runs of Unicode letters
pub fn count_words(text: &str) -> usize {
    WORD_RE.find_iter(&letters_only(text)).count()
}
