use crate::config::WebWatchConfig;
use crate::extractor::MetricsExtractor;
use crate::filter::VisitFilter;
use crate::navigation::NavigationTracker;
use crate::results::PageMetrics;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder};
use std::collections::VecDeque;
use std::error::Error;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, MissedTickBehavior, sleep_until, timeout};

/// Writes each image's layout facts onto the element as `data-pm-*` attributes
///
/// The page source taken right after carries what only a live browser knows:
/// natural size, rendered box and computed visibility.
pub const SNAPSHOT_SCRIPT: &str = r#"
var images = document.querySelectorAll('img');
images.forEach(function (img) {
    var rect = img.getBoundingClientRect();
    var style = window.getComputedStyle(img);
    var visible = rect.width > 0 && rect.height > 0
        && style.display !== 'none' && style.visibility !== 'hidden';
    img.setAttribute('data-pm-natural-width', String(img.naturalWidth));
    img.setAttribute('data-pm-natural-height', String(img.naturalHeight));
    img.setAttribute('data-pm-rendered-width', String(rect.width));
    img.setAttribute('data-pm-rendered-height', String(rect.height));
    img.setAttribute('data-pm-visible', visible ? 'true' : 'false');
});
return images.length;
"#;

/// Upper bound for reading a page out of the browser
const SOURCE_TIMEOUT: Duration = Duration::from_secs(45);

/// Starts watching a browser session and returns a receiver that yields a
/// record for every accepted visit.
///
/// # Arguments
///
/// * `config` - Web watch configuration
pub async fn start(config: &WebWatchConfig) -> Result<mpsc::Receiver<PageMetrics>, Box<dyn Error>> {
    ::log::info!("Starting page watcher for: {:?}", config.start_urls);

    let filter = VisitFilter::new(config.filter.clone())?;
    let (result_tx, result_rx) = mpsc::channel::<PageMetrics>(1000);
    let config = config.clone();

    tokio::spawn(async move {
        let Some(client) = connect_to_webdriver(&config.webdriver_url).await else {
            return;
        };

        let mut session = WatchSession::new(client.clone(), config, filter, result_tx);
        if let Err(e) = session.run().await {
            handle_session_error(&e);
        }

        if let Err(e) = client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }
        ::log::info!("Page watcher stopped");
    });

    Ok(result_rx)
}

/// Connects to the WebDriver instance
async fn connect_to_webdriver(webdriver_url: &str) -> Option<Client> {
    match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Some(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
        }
    }

    // If we couldn't connect, try with common alternative URLs
    let fallback_urls = [
        "http://localhost:9515", // ChromeDriver default
        "http://localhost:4444", // geckodriver / Selenium default
        "http://127.0.0.1:4444", // Try with IP instead of localhost
    ];

    for url in fallback_urls.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Some(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    None
}

/// One browser session: queued page loads, URL polling and debounced extraction
struct WatchSession {
    client: Client,
    config: WebWatchConfig,
    filter: VisitFilter,
    tracker: NavigationTracker,
    queue: VecDeque<String>,
    result_tx: mpsc::Sender<PageMetrics>,
    /// Raw URL seen at the last poll, to notice changes
    last_seen_url: Option<String>,
}

/// Whether the consumer still wants records
enum Delivery {
    Sent,
    Skipped,
    Closed,
}

impl WatchSession {
    fn new(
        client: Client,
        config: WebWatchConfig,
        filter: VisitFilter,
        result_tx: mpsc::Sender<PageMetrics>,
    ) -> Self {
        let queue = config.start_urls.iter().cloned().collect();
        let tracker = NavigationTracker::new(config.debounce());
        Self {
            client,
            config,
            filter,
            tracker,
            queue,
            result_tx,
            last_seen_url: None,
        }
    }

    /// Runs until the timeouts expire, the consumer goes away or the session is lost
    async fn run(&mut self) -> Result<(), CmdError> {
        let started = Instant::now();
        let mut last_visit = started;
        let mut next_load = started;

        let mut poll = tokio::time::interval(self.config.poll_interval());
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let now = Instant::now();
            if now.duration_since(started) >= self.config.total_timeout() {
                ::log::info!("Total timeout reached, stopping");
                return Ok(());
            }
            if now.duration_since(last_visit) >= self.config.idle_timeout() {
                ::log::info!("No new visits for {:?}, stopping", self.config.idle_timeout());
                return Ok(());
            }

            let deadline = self.tracker.deadline();
            let delivery = tokio::select! {
                _ = poll.tick() => {
                    if Instant::now() >= next_load {
                        if let Some(url) = self.queue.pop_front() {
                            next_load = Instant::now() + self.config.dwell();
                            self.load(&url).await?
                        } else {
                            self.check_url().await?;
                            Delivery::Skipped
                        }
                    } else {
                        self.check_url().await?;
                        Delivery::Skipped
                    }
                }
                _ = sleep_until(deadline.unwrap_or(now)), if deadline.is_some() => {
                    match self.tracker.fire(Instant::now()) {
                        Some(url) => self.record(&url).await?,
                        None => Delivery::Skipped,
                    }
                }
            };

            match delivery {
                Delivery::Sent => last_visit = Instant::now(),
                Delivery::Skipped => {}
                Delivery::Closed => {
                    ::log::info!("Record receiver closed, stopping");
                    return Ok(());
                }
            }
        }
    }

    /// Opens a queued page; the loaded document is evaluated without debounce
    async fn load(&mut self, url: &str) -> Result<Delivery, CmdError> {
        if !self.filter.should_track_str(url) {
            ::log::info!("Skipping untracked page: {}", url);
            return Ok(Delivery::Skipped);
        }

        ::log::debug!("Loading {}", url);
        if let Err(e) = self.client.goto(url).await {
            ::log::error!("Failed to load {}: {}", url, e);
            return Ok(Delivery::Skipped);
        }

        // Redirects decide the URL actually visited
        let current = self.client.current_url().await?.to_string();
        self.last_seen_url = Some(current.clone());

        match self.tracker.page_loaded(&current) {
            Some(accepted) => self.record(&accepted).await,
            None => Ok(Delivery::Skipped),
        }
    }

    /// Polls the session URL; a change (history API, back/forward, link
    /// clicks, DOM-driven routing) starts the debounce timer
    async fn check_url(&mut self) -> Result<(), CmdError> {
        let current = self.client.current_url().await?.to_string();
        if self.last_seen_url.as_deref() == Some(current.as_str()) {
            return Ok(());
        }

        ::log::trace!("URL changed to {}", current);
        self.last_seen_url = Some(current.clone());
        if self.filter.should_track_str(&current) {
            self.tracker.url_changed(&current, Instant::now());
        } else {
            // The page now on screen belongs to no tracked URL
            self.tracker.cancel_pending();
        }
        Ok(())
    }

    /// Snapshots layout, reads the page and emits its record
    async fn record(&mut self, url: &str) -> Result<Delivery, CmdError> {
        if let Err(e) = self.client.execute(SNAPSHOT_SCRIPT, Vec::new()).await {
            // Static attributes still give a best-effort answer
            ::log::debug!("Layout snapshot failed on {}: {}", url, e);
        }

        let source = match timeout(SOURCE_TIMEOUT, self.client.source()).await {
            Ok(source) => source?,
            Err(_) => {
                ::log::error!("Timeout reading page source: {}", url);
                return Ok(Delivery::Skipped);
            }
        };

        let metrics = MetricsExtractor::extract_html(&source, url);
        ::log::info!(
            "Visit to {}: {} words, {} links, {} images",
            metrics.url,
            metrics.word_count,
            metrics.link_count,
            metrics.image_count
        );

        if self.result_tx.send(metrics).await.is_err() {
            return Ok(Delivery::Closed);
        }
        Ok(Delivery::Sent)
    }
}

/// Logs why a session ended early
fn handle_session_error(error: &CmdError) {
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost WebDriver session: {}", error);
    } else {
        ::log::error!("Page watcher failed: {}", error);
    }
}
