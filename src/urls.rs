//! URL canonicalization used to decide when a navigation is a new visit.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static SCHEME_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").unwrap());

/// Host without its leading `www.` labels
///
/// A host made only of `www.` labels is kept as-is.
fn bare_host(url: &Url) -> Option<&str> {
    url.host_str().map(|host| match host.trim_start_matches("www.") {
        "" => host,
        bare => bare,
    })
}

/// Canonical form of a URL: `scheme://host/path`, lower-cased
///
/// Leading `www.` labels are stripped and the query, fragment, port and credentials
/// are dropped. Input that does not parse, or has no host, comes back
/// unchanged.
pub fn normalize_url(url: &str) -> String {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return url.to_string(),
    };
    match bare_host(&parsed) {
        Some(host) => format!("{}://{}{}", parsed.scheme(), host, parsed.path()).to_lowercase(),
        None => url.to_string(),
    }
}

/// A navigation is a new visit when the normalized URLs differ
pub fn should_record_new_visit(old_url: &str, new_url: &str) -> bool {
    normalize_url(old_url) != normalize_url(new_url)
}

/// Short form for presentation: host (without `www.`) followed by the path
pub fn get_display_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match bare_host(&parsed) {
            Some(host) => format!("{}{}", host, parsed.path()),
            None => SCHEME_PREFIX_RE.replace(url, "").into_owned(),
        },
        Err(_) => SCHEME_PREFIX_RE.replace(url, "").into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("https://www.a.com/x?q=1"), "https://a.com/x");
        assert_eq!(normalize_url("https://a.com/x#frag"), "https://a.com/x");
        assert_eq!(
            normalize_url("https://www.A.com:8080/Path?q#f"),
            "https://a.com/path"
        );
        assert_eq!(normalize_url("http://user:pw@Example.org"), "http://example.org/");
        assert_eq!(normalize_url("https://www.www.a.com/x"), "https://a.com/x");
        assert_eq!(normalize_url("https://www./x"), "https://www./x");
        // Only leading www. labels are stripped
        assert_eq!(normalize_url("https://wwwx.com/"), "https://wwwx.com/");
        assert_eq!(
            normalize_url("https://docs.www.example.com/"),
            "https://docs.www.example.com/"
        );
    }

    #[test]
    fn test_normalize_url_falls_back_to_identity() {
        assert_eq!(normalize_url("not a url"), "not a url");
        assert_eq!(normalize_url("https://[bad"), "https://[bad");
        assert_eq!(normalize_url("mailto:Someone@Example.com"), "mailto:Someone@Example.com");
        assert_eq!(normalize_url(""), "");
    }

    #[test]
    fn test_normalize_url_is_idempotent() {
        let urls = [
            "https://www.Example.com/A/b/?x=1#top",
            "http://example.com",
            "https://example.com/caf%C3%A9",
            "https://münchen.de/straße",
            "not a url",
            "about:blank",
            "file:///tmp/Page.html",
            "https://www.www.a.com/x",
            "https://www./x",
            "https://www.www./x",
        ];
        for url in urls {
            let once = normalize_url(url);
            assert_eq!(normalize_url(&once), once, "normalizing {} twice", url);
        }
    }

    #[test]
    fn test_should_record_new_visit() {
        assert!(!should_record_new_visit(
            "https://www.a.com/x?q=1",
            "https://a.com/x#frag"
        ));
        assert!(should_record_new_visit("https://a.com/x", "https://a.com/y"));
        assert!(should_record_new_visit("https://a.com/x", "https://b.com/x"));
        for url in ["https://a.com/", "https://a.com/x?y=1", "http://localhost:3000/app"] {
            assert!(!should_record_new_visit(url, url));
        }
    }

    #[test]
    fn test_get_display_url() {
        assert_eq!(get_display_url("https://www.a.com/x?y"), "a.com/x");
        assert_eq!(get_display_url("https://a.com"), "a.com/");
        assert_eq!(get_display_url("https://[bad"), "[bad");
        assert_eq!(get_display_url("example.com/page"), "example.com/page");
    }
}
