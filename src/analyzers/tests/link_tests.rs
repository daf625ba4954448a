use crate::analyzers::links::{self, LinkTarget, count_content_links};
use crate::dom::HtmlPage;
use crate::results::LinkCounts;

const PAGE_URL: &str = "https://example.com/articles/1";

fn counts(body: &str) -> LinkCounts {
    let page = HtmlPage::parse(&format!("<html><body>{}</body></html>", body));
    count_content_links(&page, PAGE_URL)
}

#[cfg(test)]
mod counting_tests {
    use super::*;

    #[test]
    fn test_internal_external_and_footer_links() {
        let result = counts(
            r##"<main>
                <a href="/about">About Us</a>
                <a href="https://other.org/page">Visit</a>
            </main>
            <footer><a href="#">•</a></footer>"##,
        );
        assert_eq!(
            result,
            LinkCounts {
                total: 2,
                internal: 1,
                external: 1
            }
        );
    }

    #[test]
    fn test_navigation_regions_are_skipped() {
        let result = counts(
            r#"<header><a href="/home">Home page</a></header>
            <nav><a href="/docs">Documentation</a></nav>
            <div class="menu"><a href="/pricing">Pricing</a></div>
            <footer><a href="https://twitter.com/x">Follow us</a></footer>
            <p><a href="/guide">Read the guide</a></p>"#,
        );
        assert_eq!(result.total, 1);
        assert_eq!(result.internal, 1);
    }

    #[test]
    fn test_non_navigating_targets_are_skipped() {
        let result = counts(
            r##"<p>
                <a href="#top">Back to top</a>
                <a href="javascript:void(0)">Open dialog</a>
                <a href="mailto:team@example.com">Email us</a>
                <a href="tel:+15551234">Call us</a>
                <a href="data:text/plain,hello">Download</a>
                <a href="about:blank">Blank page</a>
                <a href="">Nowhere</a>
                <a>No target</a>
            </p>"##,
        );
        assert_eq!(result, LinkCounts::default());
    }

    #[test]
    fn test_symbol_text_needs_an_image() {
        let result = counts(
            r#"<p>
                <a href="/next">»</a>
                <a href="/prev">&larr; &larr;</a>
                <a href="/gallery"><img src="/thumb.png"></a>
                <a href="/x">Go</a>
            </p>"#,
        );
        assert_eq!(result.total, 2);
        assert_eq!(result.internal, 2);
    }

    #[test]
    fn test_subdomains_are_internal() {
        let result = counts(
            r#"<p>
                <a href="https://blog.example.com/post">Blog post</a>
                <a href="https://EXAMPLE.com/upper">Same host</a>
                <a href="https://notexample.com/">Look-alike</a>
                <a href="//cdn.other.net/file">CDN file</a>
            </p>"#,
        );
        assert_eq!(result.total, 4);
        assert_eq!(result.internal, 2);
        assert_eq!(result.external, 2);
    }

    #[test]
    fn test_malformed_absolute_links_count_only_toward_total() {
        let result = counts(r#"<p><a href="http://[broken">Broken link</a><a href="/ok">Fine link</a></p>"#);
        assert_eq!(result.total, 2);
        assert_eq!(result.internal, 1);
        assert_eq!(result.external, 0);
        assert!(result.internal + result.external <= result.total);
    }

    #[test]
    fn test_unknown_schemes_count_as_internal() {
        let result = counts(r#"<p><a href="ftp://files.other.org/x">Files</a></p>"#);
        assert_eq!(result.internal, 1);
    }

    #[test]
    fn test_invalid_page_url_yields_zero() {
        let page = HtmlPage::parse(r#"<html><body><a href="/a">A link</a></body></html>"#);
        assert_eq!(count_content_links(&page, "not a url"), LinkCounts::default());
    }

    #[test]
    fn test_page_without_links_yields_zero() {
        assert_eq!(counts("<p>No links here</p>"), LinkCounts::default());
    }

    #[test]
    fn test_buckets_never_exceed_total() {
        let result = counts(
            r##"<main>
                <a href="/a">Alpha</a><a href="https://b.org/">Beta</a>
                <a href="https://[x">Gamma</a><a href="#c">Delta</a>
                <a href="sub/page">Epsilon</a>
            </main>"##,
        );
        assert!(result.internal + result.external <= result.total);
        assert_eq!(result.total, 4);
    }
}

#[cfg(test)]
mod helper_tests {
    use super::*;

    #[test]
    fn test_has_meaningful_text() {
        assert!(links::has_meaningful_text("Read more"));
        assert!(links::has_meaningful_text("  Go  "));
        assert!(!links::has_meaningful_text("•"));
        assert!(!links::has_meaningful_text("→"));
        assert!(!links::has_meaningful_text("»»"));
        assert!(!links::has_meaningful_text(""));
        assert!(!links::has_meaningful_text("x"));
    }

    #[test]
    fn test_is_meaningful_href() {
        assert!(links::is_meaningful_href("/about"));
        assert!(links::is_meaningful_href("https://example.com/"));
        assert!(!links::is_meaningful_href("#"));
        assert!(!links::is_meaningful_href("JavaScript:alert(1)"));
        assert!(!links::is_meaningful_href("   "));
    }

    #[test]
    fn test_classify_target() {
        let host = "example.com";
        assert_eq!(links::classify_target("/about", host), LinkTarget::Internal);
        assert_eq!(links::classify_target("about.html", host), LinkTarget::Internal);
        assert_eq!(
            links::classify_target("https://shop.example.com/", host),
            LinkTarget::Internal
        );
        assert_eq!(
            links::classify_target("http://other.org", host),
            LinkTarget::External
        );
        assert_eq!(links::classify_target("https://", host), LinkTarget::Unclassified);
    }
}
