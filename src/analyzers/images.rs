use super::IMAGE_REGION_SELECTOR;
use crate::dom::{DomError, PageDocument, PageElement};
use crate::results::ImageCounts;
use regex::Regex;
use std::sync::LazyLock;

/// Below this natural size (either side) an image is an icon
pub const MIN_NATURAL_SIZE: u32 = 50;
/// Alt text longer than this marks an image as described content
pub const MIN_ALT_LENGTH: usize = 10;
/// Rendered wider than this, an image is prominent enough to be content
pub const PROMINENT_WIDTH: f64 = 200.0;

static MEDIA_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(media|image|upload)").unwrap());

/// Counts the images on a page, split into content and decorative
///
/// Returns all zeros if the tree can't be queried.
pub fn count_content_images<D: PageDocument>(doc: &D) -> ImageCounts {
    match try_count_images(doc) {
        Ok(counts) => counts,
        Err(e) => {
            ::log::debug!("Image analysis failed: {}", e);
            ImageCounts::default()
        }
    }
}

fn try_count_images<D: PageDocument>(doc: &D) -> Result<ImageCounts, DomError> {
    let mut counts = ImageCounts::default();

    for image in doc.query_all("img")? {
        counts.total += 1;
        if is_content_image(&image)? {
            counts.content += 1;
        } else {
            counts.decorative += 1;
        }
    }

    ::log::debug!(
        "Found {} images ({} content, {} decorative)",
        counts.total,
        counts.content,
        counts.decorative
    );
    Ok(counts)
}

/// Applies the size, region, visibility and relevance gates in turn
pub fn is_content_image<E: PageElement>(image: &E) -> Result<bool, DomError> {
    let layout = image.layout();

    let natural_width = layout.natural_width.unwrap_or(0);
    let natural_height = layout.natural_height.unwrap_or(0);
    if natural_width < MIN_NATURAL_SIZE || natural_height < MIN_NATURAL_SIZE {
        return Ok(false);
    }

    if image.closest(IMAGE_REGION_SELECTOR)?.is_some() {
        return Ok(false);
    }

    if !layout.is_visible() {
        return Ok(false);
    }

    let described = image
        .attr("alt")
        .is_some_and(|alt| alt.trim().chars().count() > MIN_ALT_LENGTH);
    let media_source = image.attr("src").is_some_and(|src| MEDIA_PATH_RE.is_match(src));
    let prominent = layout.rendered_width.unwrap_or(0.0) > PROMINENT_WIDTH;

    Ok(described || media_source || prominent)
}
