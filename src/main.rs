use clap::Parser;
use page_metrics::config::SourceConfig;
use page_metrics::reporter::{VisitReporter, await_deliveries};
use page_metrics::store::VisitLog;
use page_metrics::urls::get_display_url;
use page_metrics::{Source, Tracker};

mod args;
use args::{Args, convert_source};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match args.config.as_ref().map(SourceConfig::from_file).transpose() {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            return;
        }
    };
    let source = match convert_source(&args) {
        Ok(source) => source,
        Err(e) => {
            ::log::error!("{}", e);
            return;
        }
    };

    // Backend: flag, then environment, then configuration file
    let backend_url = args
        .backend_url
        .clone()
        .or_else(|| std::env::var("BACKEND_URL").ok().filter(|v| !v.is_empty()))
        .or_else(|| config.as_ref().and_then(|c| c.backend_url()).map(str::to_string));
    let reporter = match backend_url.as_deref().map(VisitReporter::new).transpose() {
        Ok(reporter) => reporter,
        Err(e) => {
            ::log::error!("Failed to set up visit reporting: {}", e);
            return;
        }
    };

    let mut tracker = Tracker::new(Source::Web(Vec::new()));
    if let Some(config) = config {
        tracker = tracker.with_config(config);
    }
    if let Some(source) = source {
        tracker = tracker.with_source(source);
    }
    if let Some(webdriver_url) = &args.webdriver_url {
        tracker = tracker.with_webdriver_url(webdriver_url);
    }
    if let Some(debounce_ms) = args.debounce_ms {
        tracker = tracker.with_debounce_ms(debounce_ms);
    }
    if let Some(idle_timeout) = args.idle_timeout {
        tracker = tracker.with_idle_timeout(idle_timeout);
    }
    if let Some(total_timeout) = args.total_timeout {
        tracker = tracker.with_total_timeout(total_timeout);
    }

    // Start tracking and get a receiver for visit records
    let mut rx = match tracker.generate().await {
        Ok(rx) => rx,
        Err(e) => {
            ::log::error!("Failed to start tracking: {}", e);
            return;
        }
    };

    let mut visits = VisitLog::new();
    let mut deliveries = Vec::new();

    while let Some(metrics) = rx.recv().await {
        match serde_json::to_string(&metrics) {
            Ok(line) => println!("{}", line),
            Err(e) => ::log::error!("Failed to serialize record: {}", e),
        }
        ::log::info!("Visit {}: {}", visits.len() + 1, get_display_url(&metrics.url));

        if let Some(reporter) = &reporter {
            deliveries.push(reporter.report(metrics.clone()));
        }
        visits.record(metrics);
    }

    // Deliveries are bounded by the reporter's request timeout
    await_deliveries(deliveries).await;

    match serde_json::to_string_pretty(&visits.stats()) {
        Ok(stats) => println!("{}", stats),
        Err(e) => ::log::error!("Failed to serialize stats: {}", e),
    }
}
