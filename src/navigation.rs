use crate::urls::{normalize_url, should_record_new_visit};
use tokio::time::{Duration, Instant};

/// Default quiet period before a URL change is evaluated
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Where the tracker is in its debounce cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationState {
    /// Nothing pending
    Idle,
    /// A URL change was seen; evaluate it once `deadline` passes
    PendingDebounce { url: String, deadline: Instant },
}

/// Decides which navigation events become recorded visits
///
/// Holds the last accepted normalized URL and the pending debounce timer.
/// Bursts of URL changes restart the timer, so only the URL that is current
/// when things go quiet is evaluated, and it is accepted only if it
/// normalizes differently from the last accepted one.
#[derive(Debug)]
pub struct NavigationTracker {
    last_normalized_url: Option<String>,
    state: NavigationState,
    debounce: Duration,
}

impl Default for NavigationTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl NavigationTracker {
    pub fn new(debounce: Duration) -> Self {
        Self {
            last_normalized_url: None,
            state: NavigationState::Idle,
            debounce,
        }
    }

    pub fn last_normalized_url(&self) -> Option<&str> {
        self.last_normalized_url.as_deref()
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// When the pending change should be evaluated, if one is pending
    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            NavigationState::Idle => None,
            NavigationState::PendingDebounce { deadline, .. } => Some(*deadline),
        }
    }

    /// A document finished loading; evaluated right away
    ///
    /// Any pending change is superseded by the load. Returns the URL to
    /// extract if this is a new visit.
    pub fn page_loaded(&mut self, url: &str) -> Option<String> {
        self.state = NavigationState::Idle;
        self.evaluate(url)
    }

    /// The page URL changed; starts or restarts the debounce timer
    pub fn url_changed(&mut self, url: &str, now: Instant) {
        let deadline = now + self.debounce;
        if let NavigationState::PendingDebounce { .. } = self.state {
            ::log::trace!("Debounce restarted for {}", url);
        }
        self.state = NavigationState::PendingDebounce {
            url: url.to_string(),
            deadline,
        };
    }

    /// Drops the pending change without evaluating it
    ///
    /// Used when the page moved on to something that is not tracked, so the
    /// earlier URL no longer describes what the browser shows.
    pub fn cancel_pending(&mut self) {
        if let NavigationState::PendingDebounce { url, .. } = &self.state {
            ::log::trace!("Pending change to {} cancelled", url);
        }
        self.state = NavigationState::Idle;
    }

    /// Evaluates the pending change if its timer has expired
    ///
    /// Returns the URL to extract when the change is accepted. Rejected
    /// changes leave the last accepted URL untouched.
    pub fn fire(&mut self, now: Instant) -> Option<String> {
        let url = match &self.state {
            NavigationState::PendingDebounce { url, deadline } if *deadline <= now => url.clone(),
            _ => return None,
        };
        self.state = NavigationState::Idle;
        self.evaluate(&url)
    }

    fn evaluate(&mut self, url: &str) -> Option<String> {
        let is_new = match &self.last_normalized_url {
            Some(last) => should_record_new_visit(last, url),
            None => true,
        };
        if !is_new {
            ::log::debug!("Same page as last visit, not recording: {}", url);
            return None;
        }
        self.last_normalized_url = Some(normalize_url(url));
        Some(url.to_string())
    }
}
