use crate::filter::VisitFilterConfig;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Configuration for watching pages in a live browser session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebWatchConfig {
    /// Pages to open, in order; the first is loaded immediately
    pub start_urls: Vec<String>,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Backend base URL records are posted to (if None, nothing is posted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,

    /// Quiet period before a URL change is evaluated, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// How often the session's current URL is checked, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Time spent on each page before moving to the next queued URL, in seconds
    #[serde(default = "default_dwell_secs")]
    pub dwell_secs: u64,

    /// Stop after this many seconds without a recorded visit
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Stop after this many seconds in total
    #[serde(default = "default_total_timeout_secs")]
    pub total_timeout_secs: u64,

    /// Which pages are tracked at all
    #[serde(default)]
    pub filter: VisitFilterConfig,
}

/// Configuration for analyzing a saved HTML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    /// Path to the HTML file
    pub path: String,

    /// Address the page was saved from; decides internal vs external links
    pub page_url: String,

    /// Backend base URL the record is posted to (if None, nothing is posted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,
}

/// Enum containing all source configuration types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SourceConfig {
    /// Live browser session
    Web(WebWatchConfig),

    /// Saved HTML file
    File(FileConfig),
}

impl SourceConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Backend base URL for either source type
    pub fn backend_url(&self) -> Option<&str> {
        match self {
            SourceConfig::Web(web) => web.backend_url.as_deref(),
            SourceConfig::File(file) => file.backend_url.as_deref(),
        }
    }
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_dwell_secs() -> u64 {
    5
}

/// Default idle timeout (5 minutes)
fn default_idle_timeout_secs() -> u64 {
    300
}

/// Default total timeout (20 minutes)
fn default_total_timeout_secs() -> u64 {
    1200
}

impl WebWatchConfig {
    /// Create a new configuration with default values
    pub fn new(start_url: &str) -> Self {
        Self {
            start_urls: vec![start_url.to_string()],
            webdriver_url: default_webdriver_url(),
            backend_url: None,
            debounce_ms: default_debounce_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            dwell_secs: default_dwell_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
            total_timeout_secs: default_total_timeout_secs(),
            filter: VisitFilterConfig::default(),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(10))
    }

    pub fn dwell(&self) -> Duration {
        Duration::from_secs(self.dwell_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn total_timeout(&self) -> Duration {
        Duration::from_secs(self.total_timeout_secs)
    }
}
