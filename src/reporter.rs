use crate::results::PageMetrics;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use url::Url;

/// Errors that can occur while delivering a visit record
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Invalid backend URL {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Backend rejected visit with status {0}")]
    Rejected(reqwest::StatusCode),
}

/// Posts visit records to the backend's `/visits` endpoint
#[derive(Debug, Clone)]
pub struct VisitReporter {
    client: reqwest::Client,
    endpoint: Url,
}

impl VisitReporter {
    /// Create a reporter for a backend base URL such as `http://localhost:8000/api/v1`
    pub fn new(backend_url: &str) -> Result<Self, ReportError> {
        let endpoint = visits_endpoint(backend_url).map_err(|source| ReportError::InvalidUrl {
            url: backend_url.to_string(),
            source,
        })?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self { client, endpoint })
    }

    /// Where records are posted
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Posts one record and waits for the backend to accept it
    pub async fn send(&self, metrics: &PageMetrics) -> Result<(), ReportError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(metrics)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Rejected(status));
        }
        Ok(())
    }

    /// Fire-and-forget delivery
    ///
    /// Failures are logged and dropped; nothing is retried. The handle is only
    /// useful to callers that want to wait for outstanding deliveries.
    pub fn report(&self, metrics: PageMetrics) -> JoinHandle<()> {
        let reporter = self.clone();
        tokio::spawn(async move {
            match reporter.send(&metrics).await {
                Ok(()) => ::log::info!("Recorded visit to {}", metrics.url),
                Err(e) => ::log::warn!("Failed to record visit to {}: {}", metrics.url, e),
            }
        })
    }
}

/// Waits for outstanding deliveries; returns how many tasks died
///
/// Delivery errors are already logged by the task itself, so only tasks that
/// panicked or were cancelled are reported here.
pub async fn await_deliveries(deliveries: Vec<JoinHandle<()>>) -> usize {
    let mut failed = 0;
    for delivery in deliveries {
        if let Err(e) = delivery.await {
            ::log::warn!("Visit delivery task failed: {}", e);
            failed += 1;
        }
    }
    failed
}

/// `{base}/visits`, keeping any path prefix on the base URL
fn visits_endpoint(backend_url: &str) -> Result<Url, url::ParseError> {
    let mut base = Url::parse(backend_url)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("visits")
}
