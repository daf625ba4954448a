use super::LINK_REGION_SELECTOR;
use crate::dom::{DomError, PageDocument, PageElement};
use crate::results::LinkCounts;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Text made only of symbols, arrows, bullets and punctuation
static SYMBOL_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{S}\p{P}\s]+$").unwrap());

/// Targets that never lead to another document
const NON_NAVIGATING_PREFIXES: &[&str] = &["#", "javascript:", "tel:", "mailto:", "data:"];

/// Where a link points, relative to the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    /// Same host, a subdomain of it, or a relative path
    Internal,
    /// Some other host
    External,
    /// Absolute URL that could not be parsed
    Unclassified,
}

/// Counts the meaningful links on a page, split by target
///
/// Returns all zeros if the page URL has no host or the tree can't be queried.
pub fn count_content_links<D: PageDocument>(doc: &D, page_url: &str) -> LinkCounts {
    let page_host = match Url::parse(page_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
    {
        Some(host) => host,
        None => {
            ::log::debug!("No host in page URL {}, skipping link analysis", page_url);
            return LinkCounts::default();
        }
    };

    match try_count_links(doc, &page_host) {
        Ok(counts) => counts,
        Err(e) => {
            ::log::debug!("Link analysis failed for {}: {}", page_url, e);
            LinkCounts::default()
        }
    }
}

fn try_count_links<D: PageDocument>(doc: &D, page_host: &str) -> Result<LinkCounts, DomError> {
    let mut counts = LinkCounts::default();

    for link in doc.query_all("a")? {
        if link.closest(LINK_REGION_SELECTOR)?.is_some() {
            continue;
        }

        let text = link.visible_text(None)?;
        if !has_meaningful_text(&text) && !link.contains("img")? {
            continue;
        }

        let href = link.attr("href").unwrap_or_default();
        if !is_meaningful_href(href) {
            continue;
        }

        counts.total += 1;
        match classify_target(href, page_host) {
            LinkTarget::Internal => counts.internal += 1,
            LinkTarget::External => counts.external += 1,
            LinkTarget::Unclassified => {
                ::log::trace!("Could not classify link target {}", href);
            }
        }
    }

    ::log::debug!(
        "Found {} content links ({} internal, {} external)",
        counts.total,
        counts.internal,
        counts.external
    );
    Ok(counts)
}

/// Link text worth counting: more than one character and not just symbols
pub fn has_meaningful_text(text: &str) -> bool {
    let text = text.trim();
    text.chars().count() > 1 && !SYMBOL_ONLY_RE.is_match(text)
}

/// Whether a link target leads somewhere other than the current view
pub fn is_meaningful_href(href: &str) -> bool {
    let href = href.trim().to_ascii_lowercase();
    if href.is_empty() || href == "about:blank" {
        return false;
    }
    !NON_NAVIGATING_PREFIXES
        .iter()
        .any(|prefix| href.starts_with(prefix))
}

/// Classifies a link target against the page host
///
/// Anything that does not look like an absolute http(s) or protocol-relative
/// URL is treated as a relative path, hence internal.
pub fn classify_target(href: &str, page_host: &str) -> LinkTarget {
    let href = href.trim();
    let lower = href.to_ascii_lowercase();

    let parsed = if lower.starts_with("http://") || lower.starts_with("https://") {
        Url::parse(href)
    } else if lower.starts_with("//") {
        Url::parse(&format!("https:{}", href))
    } else {
        return LinkTarget::Internal;
    };

    match parsed.ok().and_then(|u| u.host_str().map(str::to_ascii_lowercase)) {
        Some(host) if is_same_site(&host, page_host) => LinkTarget::Internal,
        Some(_) => LinkTarget::External,
        None => LinkTarget::Unclassified,
    }
}

/// Host equals the page host or is a subdomain of it
fn is_same_site(host: &str, page_host: &str) -> bool {
    host == page_host
        || host
            .strip_suffix(page_host)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
