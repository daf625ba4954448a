//! Content heuristics behind a page-metrics record.
//!
//! Each analyzer is a single pass over a [`PageDocument`](crate::dom::PageDocument)
//! and is total: internal failures are logged and turn into the analyzer's
//! zero value so one analyzer can never keep the others from contributing.

pub mod images;
pub mod links;
pub mod text;

#[cfg(test)]
mod tests;

pub use images::count_content_images;
pub use links::count_content_links;
pub use text::count_content_words;

/// Candidates for the main content region, in priority order
pub const CONTENT_SELECTORS: &[&str] = &[
    "main",
    "[role=\"main\"]",
    "article",
    ".main-content",
    "#main-content",
    ".post-content",
    ".entry-content",
    ".article-body",
    ".content",
    "#content",
];

/// Boilerplate removed before counting words
pub const NON_CONTENT_SELECTOR: &str = "nav, header, footer, aside, script, style, noscript, \
    iframe, [role=\"navigation\"], [role=\"banner\"], [role=\"contentinfo\"], \
    [role=\"complementary\"], .nav, .navbar, .navigation, .menu, .sidebar, .breadcrumb, \
    .ad, .ads, .advert, .advertisement, .banner-ad, .cookie-banner, .social-share";

/// Regions whose links are navigation rather than content
pub const LINK_REGION_SELECTOR: &str = "nav, header, footer, [role=\"navigation\"], \
    [role=\"banner\"], [role=\"contentinfo\"], .nav, .navbar, .navigation, .menu, \
    .breadcrumb";

/// Regions whose images are chrome rather than content
pub const IMAGE_REGION_SELECTOR: &str = "nav, header, [role=\"navigation\"], \
    [role=\"banner\"], .nav, .navbar, .navigation, .menu, .icon, .icons, .logo";
