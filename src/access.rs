//! Access-log aggregation.
//!
//! Folds parsed request lines into request totals, per-key counters, hourly
//! and daily buckets, and the ordered list of HTTP errors.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::parser::{self, AccessLogEntry};

/// Lowest status code recorded as an HTTP error.
pub const ERROR_STATUS_THRESHOLD: u64 = 400;

/// A request that ended with a 4xx or 5xx status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Request time in the log's own offset.
    pub timestamp: DateTime<FixedOffset>,
    /// Client address.
    pub ip: String,
    /// Status code, saturated at `u64::MAX` for oversized digit strings.
    pub status: u64,
    /// Requested path.
    pub path: String,
    /// Client user agent.
    pub user_agent: String,
}

/// Aggregate statistics over one access log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessStats {
    /// Number of lines that matched the access-log shape.
    pub total_requests: u64,
    /// Distinct client addresses, serialized as a sorted array.
    pub unique_ips: BTreeSet<String>,
    /// Requests per status code string.
    pub status_codes: BTreeMap<String, u64>,
    /// Requests per user agent.
    pub user_agents: BTreeMap<String, u64>,
    /// Requests per `YYYY-MM-DD HH:00` bucket.
    pub hourly_requests: BTreeMap<String, u64>,
    /// Requests per `YYYY-MM-DD` bucket.
    pub daily_requests: BTreeMap<String, u64>,
    /// Requests per path.
    pub top_pages: BTreeMap<String, u64>,
    /// Error responses in encounter order.
    pub errors: Vec<ErrorRecord>,
}

impl AccessStats {
    /// The `n` most frequent status codes, highest count first.
    pub fn most_common_status_codes(&self, n: usize) -> Vec<(&str, u64)> {
        most_common(&self.status_codes, n)
    }

    /// The `n` most requested paths, highest count first.
    pub fn most_common_pages(&self, n: usize) -> Vec<(&str, u64)> {
        most_common(&self.top_pages, n)
    }
}

/// Single-pass accumulator producing [`AccessStats`].
#[derive(Debug, Default)]
pub struct AccessLogAggregator {
    stats: AccessStats,
}

impl AccessLogAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and fold one raw line. Lines that do not match are ignored.
    pub fn ingest(&mut self, line: &str) {
        if let Some(entry) = parser::parse_access_line(line) {
            self.record(&entry);
        }
    }

    /// Fold an already parsed entry.
    ///
    /// The base counters always move. Time buckets and the error list need a
    /// valid timestamp, and the error list additionally needs a numeric status.
    pub fn record(&mut self, entry: &AccessLogEntry) {
        let stats = &mut self.stats;

        stats.total_requests = stats.total_requests.saturating_add(1);
        stats.unique_ips.insert(entry.ip.clone());
        bump(&mut stats.status_codes, &entry.status);
        bump(&mut stats.user_agents, &entry.user_agent);
        bump(&mut stats.top_pages, &entry.path);

        let Some(timestamp) = entry.timestamp else {
            return;
        };

        bump(
            &mut stats.hourly_requests,
            &timestamp.format("%Y-%m-%d %H:00").to_string(),
        );
        bump(
            &mut stats.daily_requests,
            &timestamp.format("%Y-%m-%d").to_string(),
        );

        if let Some(status) = entry.status_code() {
            if status >= ERROR_STATUS_THRESHOLD {
                stats.errors.push(ErrorRecord {
                    timestamp,
                    ip: entry.ip.clone(),
                    status,
                    path: entry.path.clone(),
                    user_agent: entry.user_agent.clone(),
                });
            }
        }
    }

    /// Consume the aggregator and return the final snapshot.
    pub fn finalize(self) -> AccessStats {
        self.stats
    }
}

fn bump(counter: &mut BTreeMap<String, u64>, key: &str) {
    let count = counter.entry(key.to_owned()).or_insert(0);
    *count = count.saturating_add(1);
}

/// Top `n` entries by count descending; ties break on key ascending.
fn most_common(counter: &BTreeMap<String, u64>, n: usize) -> Vec<(&str, u64)> {
    let mut entries: Vec<(&str, u64)> = counter
        .iter()
        .map(|(key, count)| (key.as_str(), *count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries.truncate(n);
    entries
}
