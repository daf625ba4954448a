use crate::analyzers::{count_content_images, count_content_links, count_content_words};
use crate::dom::{HtmlPage, PageDocument};
use crate::results::PageMetrics;
use crate::urls::normalize_url;
use chrono::{DateTime, Utc};

/// Composes the analyzers into one [`PageMetrics`] record
pub struct MetricsExtractor;

impl MetricsExtractor {
    /// Runs the word, link and image analyzers over a page
    ///
    /// `page_url` is the address the page was loaded from; the record carries
    /// its normalized form.
    pub fn extract<D: PageDocument>(
        doc: &D,
        page_url: &str,
        visited_at: DateTime<Utc>,
    ) -> PageMetrics {
        let word_count = count_content_words(doc);
        let links = count_content_links(doc, page_url);
        let images = count_content_images(doc);

        ::log::debug!(
            "Extracted {}: {} words, {} links, {} images",
            page_url,
            word_count,
            links.total,
            images.total
        );

        PageMetrics::new(normalize_url(page_url), links, images, word_count, visited_at)
    }

    /// Parses page source and extracts its metrics, stamped with the current time
    pub fn extract_html(source: &str, page_url: &str) -> PageMetrics {
        let page = HtmlPage::parse(source);
        Self::extract(&page, page_url, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ARTICLE: &str = r##"<html><head><title>Post</title></head><body>
        <header><a href="/">Home</a><img src="/logo.png" width="120" height="40"></header>
        <nav><a href="/blog">Blog</a><a href="/about">About</a></nav>
        <main>
            <h1>Measuring pages</h1>
            <p>Counting words is simple enough.</p>
            <p>See <a href="/docs/guide">the guide</a> or <a href="https://other.org/ref">a reference</a>.</p>
            <img src="/media/chart.png" width="640" height="480" alt="Chart of page sizes over time">
        </main>
        <footer><a href="#">•</a></footer>
    </body></html>"##;

    #[test]
    fn test_extract_composes_all_analyzers() {
        let visited_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let page = HtmlPage::parse(ARTICLE);
        let metrics = MetricsExtractor::extract(&page, "https://www.Blog.example.com/post?utm=x", visited_at);

        assert_eq!(metrics.url, "https://blog.example.com/post");
        assert_eq!(metrics.word_count, 13);
        assert_eq!(metrics.link_count, 2);
        assert_eq!(metrics.internal_links, 1);
        assert_eq!(metrics.external_links, 1);
        assert_eq!(metrics.image_count, 2);
        assert_eq!(metrics.content_images, 1);
        assert_eq!(metrics.decorative_images, 1);
        assert_eq!(metrics.datetime_visited, visited_at);
    }

    #[test]
    fn test_empty_document_gives_zero_record() {
        let metrics = MetricsExtractor::extract_html("", "https://example.com/");
        assert_eq!(metrics.word_count, 0);
        assert_eq!(metrics.link_count, 0);
        assert_eq!(metrics.image_count, 0);
        assert_eq!(metrics.url, "https://example.com/");
    }

    #[test]
    fn test_record_serializes_with_backend_field_names() {
        let visited_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let page = HtmlPage::parse(ARTICLE);
        let metrics = MetricsExtractor::extract(&page, "https://example.com/post", visited_at);
        let json = serde_json::to_value(&metrics).unwrap();

        for key in [
            "url",
            "link_count",
            "internal_links",
            "external_links",
            "image_count",
            "content_images",
            "decorative_images",
            "word_count",
            "datetime_visited",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(json["datetime_visited"], "2024-05-01T12:00:00Z");
    }
}
