//! Monitoring-log aggregation.
//!
//! Counts health-check outcomes written by the prober, collects response-time
//! samples and downtime events, and derives uptime at finalization.

use serde::{Deserialize, Serialize};

use crate::parser::{self, MonitoringCheckEvent};

/// A failed health check recorded with its log timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DowntimeEvent {
    /// `YYYY-MM-DD HH:MM:SS` taken from the log line.
    pub timestamp: String,
    /// The full trimmed log line.
    pub error: String,
}

/// Aggregate statistics over one monitoring log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitoringStats {
    /// Successful plus failed checks.
    pub total_checks: u64,
    /// Checks that found the site healthy.
    pub successful_checks: u64,
    /// Checks that found the site unhealthy or unreachable.
    pub failed_checks: u64,
    /// Alerts reported as delivered.
    pub alerts_sent: u64,
    /// Mean of `response_times`, 0 when there are no samples.
    pub average_response_time: f64,
    /// Response-time samples in seconds, in log order.
    pub response_times: Vec<f64>,
    /// Percentage of successful checks, 0 when there are no checks.
    pub uptime_percentage: f64,
    /// Failed checks that carried a timestamp, in log order.
    pub downtime_events: Vec<DowntimeEvent>,
}

/// Single-pass accumulator producing [`MonitoringStats`].
#[derive(Debug, Default)]
pub struct MonitoringLogAggregator {
    stats: MonitoringStats,
}

impl MonitoringLogAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify and fold one raw line.
    pub fn ingest(&mut self, line: &str) {
        if let Some(event) = parser::classify_monitoring_line(line) {
            self.record(event);
        }
    }

    /// Fold an already classified event.
    pub fn record(&mut self, event: MonitoringCheckEvent) {
        let stats = &mut self.stats;
        match event {
            MonitoringCheckEvent::Success {
                response_time_seconds,
            } => {
                stats.total_checks = stats.total_checks.saturating_add(1);
                stats.successful_checks = stats.successful_checks.saturating_add(1);
                if let Some(seconds) = response_time_seconds {
                    stats.response_times.push(seconds);
                }
            }
            MonitoringCheckEvent::Failure {
                timestamp,
                raw_line,
            } => {
                stats.total_checks = stats.total_checks.saturating_add(1);
                stats.failed_checks = stats.failed_checks.saturating_add(1);
                if let Some(timestamp) = timestamp {
                    stats.downtime_events.push(DowntimeEvent {
                        timestamp,
                        error: raw_line,
                    });
                }
            }
            MonitoringCheckEvent::AlertSent => {
                stats.alerts_sent = stats.alerts_sent.saturating_add(1);
            }
        }
    }

    /// Compute the derived fields and return the final snapshot.
    pub fn finalize(self) -> MonitoringStats {
        let mut stats = self.stats;
        stats.average_response_time = mean(&stats.response_times);
        stats.uptime_percentage = uptime_percentage(stats.successful_checks, stats.total_checks);
        stats
    }
}

/// Arithmetic mean, 0.0 for an empty slice.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = samples.len() as f64;
    samples.iter().sum::<f64>() / count
}

/// Successes as a percentage of total, 0.0 when total is 0.
pub fn uptime_percentage(successes: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = successes as f64 / total as f64;
    (ratio * 100.0).clamp(0.0, 100.0)
}
