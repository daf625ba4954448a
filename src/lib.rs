// Re-export modules
pub mod analyzers;
pub mod config;
pub mod dom;
pub mod extractor;
pub mod filter;
pub mod navigation;
pub mod reporter;
pub mod results;
pub mod store;
pub mod urls;
pub mod watch;

// Re-export commonly used types for convenience
pub use extractor::MetricsExtractor;
pub use results::{ImageCounts, LinkCounts, PageMetrics};

use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

/// Where pages come from
#[derive(Debug, Clone)]
pub enum Source {
    /// Live browser session starting at these URLs
    Web(Vec<String>),
    /// Saved HTML file and the address it was saved from
    File { path: PathBuf, page_url: String },
}

/// Main builder for producing visit records from a source
pub struct Tracker {
    source: Source,
    webdriver_url: Option<String>,
    debounce: Option<Duration>,
    idle_timeout: Option<Duration>,
    total_timeout: Option<Duration>,
    web_config: Option<config::WebWatchConfig>,
}

impl Tracker {
    /// Create a new Tracker builder for the given source
    pub fn new(source: Source) -> Self {
        Self {
            source,
            webdriver_url: None,
            debounce: None,
            idle_timeout: None,
            total_timeout: None,
            web_config: None,
        }
    }

    /// Set the WebDriver endpoint
    pub fn with_webdriver_url(mut self, webdriver_url: &str) -> Self {
        self.webdriver_url = Some(webdriver_url.to_string());
        self
    }

    /// Set the quiet period before a URL change is evaluated
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce = Some(Duration::from_millis(debounce_ms));
        self
    }

    /// Set the idle timeout (watcher stops if no new visits for this duration)
    pub fn with_idle_timeout(mut self, timeout_seconds: u64) -> Self {
        self.idle_timeout = Some(Duration::from_secs(timeout_seconds));
        self
    }

    /// Set the total timeout (maximum runtime)
    pub fn with_total_timeout(mut self, timeout_seconds: u64) -> Self {
        self.total_timeout = Some(Duration::from_secs(timeout_seconds));
        self
    }

    /// Take source and settings from a loaded configuration
    ///
    /// Builder overrides set before or after this call still win.
    pub fn with_config(mut self, config: config::SourceConfig) -> Self {
        match config {
            config::SourceConfig::Web(web_config) => {
                self.source = Source::Web(web_config.start_urls.clone());
                self.web_config = Some(web_config);
            }
            config::SourceConfig::File(file_config) => {
                self.source = Source::File {
                    path: PathBuf::from(file_config.path),
                    page_url: file_config.page_url,
                };
            }
        }
        self
    }

    /// Replace the source, keeping any loaded settings
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }

    /// Load configuration from a string
    pub fn with_config_str(self, config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config = serde_json::from_str(config_str)?;
        Ok(self.with_config(config))
    }

    /// Web watch settings after applying builder overrides and the environment
    fn web_config(&self, start_urls: &[String]) -> config::WebWatchConfig {
        let mut web_config = match &self.web_config {
            Some(web_config) => web_config.clone(),
            None => config::WebWatchConfig::new(""),
        };
        web_config.start_urls = start_urls.to_vec();

        // Override the WebDriver URL with an environment variable if provided
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                web_config.webdriver_url = webdriver_url;
            }
        }
        if let Some(webdriver_url) = &self.webdriver_url {
            web_config.webdriver_url = webdriver_url.clone();
        }
        if let Some(debounce) = self.debounce {
            web_config.debounce_ms = debounce.as_millis() as u64;
        }
        if let Some(idle_timeout) = self.idle_timeout {
            web_config.idle_timeout_secs = idle_timeout.as_secs();
        }
        if let Some(total_timeout) = self.total_timeout {
            web_config.total_timeout_secs = total_timeout.as_secs();
        }
        web_config
    }

    /// Start tracking and get a receiver for visit records
    pub async fn generate(
        self,
    ) -> Result<mpsc::Receiver<PageMetrics>, Box<dyn std::error::Error>> {
        match &self.source {
            Source::Web(start_urls) => {
                if start_urls.is_empty() {
                    return Err("no start URL given".into());
                }
                let web_config = self.web_config(start_urls);
                watch::start(&web_config).await
            }
            Source::File { path, page_url } => {
                let source = tokio::fs::read_to_string(path).await?;
                let metrics = MetricsExtractor::extract_html(&source, page_url);

                let (tx, rx) = mpsc::channel(1);
                tx.send(metrics).await?;
                Ok(rx)
            }
        }
    }
}
