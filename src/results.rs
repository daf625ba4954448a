use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metrics recorded for one accepted page visit
///
/// This is the record sent to the backend's `POST /visits` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMetrics {
    /// Normalized URL of the page
    pub url: String,

    /// Meaningful links in the page content
    pub link_count: usize,

    /// Links pointing at the page's own host (or a subdomain of it)
    pub internal_links: usize,

    /// Links pointing at other hosts
    pub external_links: usize,

    /// All images on the page
    pub image_count: usize,

    /// Images that carry content
    pub content_images: usize,

    /// Icons, spacers, hidden and other decorative images
    pub decorative_images: usize,

    /// Words in the main content region
    pub word_count: usize,

    /// When the visit was recorded
    pub datetime_visited: DateTime<Utc>,
}

impl PageMetrics {
    /// Assemble a record from the analyzer results
    pub fn new(
        url: String,
        links: LinkCounts,
        images: ImageCounts,
        word_count: usize,
        datetime_visited: DateTime<Utc>,
    ) -> Self {
        Self {
            url,
            link_count: links.total,
            internal_links: links.internal,
            external_links: links.external,
            image_count: images.total,
            content_images: images.content,
            decorative_images: images.decorative,
            word_count,
            datetime_visited,
        }
    }
}

/// Link counts produced by a single extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkCounts {
    pub total: usize,
    pub internal: usize,
    pub external: usize,
}

/// Image counts produced by a single extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageCounts {
    pub total: usize,
    pub content: usize,
    pub decorative: usize,
}
