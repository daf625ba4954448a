use crate::results::PageMetrics;
use crate::urls::normalize_url;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Aggregate statistics over recorded visits, as served by `GET /visits/stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisitStats {
    pub total_visits: usize,
    pub unique_urls: usize,
    pub average_links: f64,
    pub average_internal_links: f64,
    pub average_external_links: f64,
    pub average_words: f64,
    pub average_images: f64,
    pub average_content_images: f64,
    pub average_decorative_images: f64,
}

/// In-memory log of recorded visits
///
/// Lookups compare normalized URLs, so any equivalent form of a page's URL
/// finds its visits.
#[derive(Debug, Default)]
pub struct VisitLog {
    visits: Vec<PageMetrics>,
}

impl VisitLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, metrics: PageMetrics) {
        self.visits.push(metrics);
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// All visits to a page, newest first
    pub fn visits_by_url(&self, url: &str) -> Vec<&PageMetrics> {
        let wanted = normalize_url(url);
        let mut found: Vec<&PageMetrics> = self
            .visits
            .iter()
            .filter(|visit| normalize_url(&visit.url) == wanted)
            .collect();
        // Stable sort keeps later-recorded visits first among equal timestamps
        found.reverse();
        found.sort_by(|a, b| b.datetime_visited.cmp(&a.datetime_visited));
        found
    }

    /// Most recent visit to a page
    pub fn latest_visit(&self, url: &str) -> Option<&PageMetrics> {
        self.visits_by_url(url).into_iter().next()
    }

    /// Counts and per-visit averages, rounded to two decimals
    pub fn stats(&self) -> VisitStats {
        if self.visits.is_empty() {
            return VisitStats::default();
        }

        let unique_urls = self
            .visits
            .iter()
            .map(|visit| normalize_url(&visit.url))
            .collect::<HashSet<_>>()
            .len();
        let average = |field: fn(&PageMetrics) -> usize| -> f64 {
            let sum: usize = self.visits.iter().map(field).sum();
            round2(sum as f64 / self.visits.len() as f64)
        };

        VisitStats {
            total_visits: self.visits.len(),
            unique_urls,
            average_links: average(|v| v.link_count),
            average_internal_links: average(|v| v.internal_links),
            average_external_links: average(|v| v.external_links),
            average_words: average(|v| v.word_count),
            average_images: average(|v| v.image_count),
            average_content_images: average(|v| v.content_images),
            average_decorative_images: average(|v| v.decorative_images),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn visit(url: &str, minute: i64, links: usize, words: usize) -> PageMetrics {
        PageMetrics {
            url: url.to_string(),
            link_count: links,
            internal_links: links,
            external_links: 0,
            image_count: 1,
            content_images: 1,
            decorative_images: 0,
            word_count: words,
            datetime_visited: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
                + Duration::minutes(minute),
        }
    }

    #[test]
    fn test_empty_log_has_zero_stats() {
        let log = VisitLog::new();
        assert!(log.is_empty());
        assert_eq!(log.stats(), VisitStats::default());
        assert!(log.latest_visit("https://a.com/").is_none());
    }

    #[test]
    fn test_lookup_by_equivalent_url_newest_first() {
        let mut log = VisitLog::new();
        log.record(visit("https://a.com/x", 1, 1, 10));
        log.record(visit("https://a.com/y", 2, 1, 10));
        log.record(visit("https://a.com/x", 3, 2, 20));

        let found = log.visits_by_url("https://www.a.com/x?ref=feed");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].word_count, 20);
        assert_eq!(found[1].word_count, 10);

        assert_eq!(log.latest_visit("https://a.com/x#top").unwrap().link_count, 2);
        assert!(log.latest_visit("https://a.com/z").is_none());
    }

    #[test]
    fn test_stats_round_to_two_decimals() {
        let mut log = VisitLog::new();
        log.record(visit("https://a.com/x", 1, 1, 100));
        log.record(visit("https://a.com/x", 2, 2, 100));
        log.record(visit("https://b.com/", 3, 2, 101));

        let stats = log.stats();
        assert_eq!(stats.total_visits, 3);
        assert_eq!(stats.unique_urls, 2);
        assert_eq!(stats.average_links, 1.67);
        assert_eq!(stats.average_internal_links, 1.67);
        assert_eq!(stats.average_external_links, 0.0);
        assert_eq!(stats.average_words, 100.33);
        assert_eq!(stats.average_images, 1.0);
    }
}
