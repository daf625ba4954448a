use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for deciding which pages get tracked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitFilterConfig {
    /// URL schemes worth tracking (browser-internal pages are not)
    #[serde(default = "default_allowed_schemes")]
    pub allowed_schemes: Vec<String>,

    /// Only track this host and its subdomains (if None, every host is tracked)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_domain: Option<String>,

    /// Regex patterns for URLs to track (if empty, all URLs are tracked unless excluded)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for URLs to ignore (these take precedence over include patterns)
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

fn default_allowed_schemes() -> Vec<String> {
    vec!["http".to_string(), "https".to_string()]
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        // Direct links to assets rather than pages
        r"\.(jpg|jpeg|png|gif|webp|svg|ico|css|js|woff|woff2|ttf|eot|pdf|zip)$".to_string(),
    ]
}

impl Default for VisitFilterConfig {
    fn default() -> Self {
        Self {
            allowed_schemes: default_allowed_schemes(),
            required_domain: None,
            include_patterns: Vec::new(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

/// Decides whether a page URL should produce visit records at all
#[derive(Debug)]
pub struct VisitFilter {
    config: VisitFilterConfig,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl Default for VisitFilter {
    fn default() -> Self {
        Self::new(VisitFilterConfig::default()).expect("Default regex patterns should be valid")
    }
}

impl VisitFilter {
    /// Create a new visit filter from configuration
    pub fn new(config: VisitFilterConfig) -> Result<Self, regex::Error> {
        let include_regexes = config
            .include_patterns
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;
        let exclude_regexes = config
            .exclude_patterns
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            include_regexes,
            exclude_regexes,
        })
    }

    /// Determine if a page should be tracked based on all filtering rules
    pub fn should_track(&self, url: &Url) -> bool {
        if !self
            .config
            .allowed_schemes
            .iter()
            .any(|scheme| scheme.eq_ignore_ascii_case(url.scheme()))
        {
            return false;
        }

        if !self.is_in_domain_scope(url) {
            return false;
        }

        // Exclusions take precedence
        let url_str = url.as_str();
        if self.exclude_regexes.iter().any(|re| re.is_match(url_str)) {
            return false;
        }

        // If include patterns are specified, at least one must match
        self.include_regexes.is_empty() || self.include_regexes.iter().any(|re| re.is_match(url_str))
    }

    /// Same as [`should_track`](Self::should_track) for an unparsed URL; unparseable URLs are never tracked
    pub fn should_track_str(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => self.should_track(&parsed),
            Err(_) => {
                ::log::debug!("Not tracking unparseable URL: {}", url);
                false
            }
        }
    }

    fn is_in_domain_scope(&self, url: &Url) -> bool {
        let Some(required) = &self.config.required_domain else {
            return true;
        };
        let Some(host) = url.host_str() else {
            return false;
        };
        let required = required.to_ascii_lowercase();
        host == required || host.ends_with(&format!(".{}", required))
    }
}
