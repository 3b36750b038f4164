//! Report composition and the printed summary.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::access::AccessStats;
use crate::monitoring::MonitoringStats;

/// Number of rows shown per ranking in the printed summary.
const TOP_N: usize = 5;

/// Number of trailing events shown per event list in the printed summary.
const RECENT_N: usize = 5;

/// Headline figures projected from the two stats snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Total matched access-log requests.
    pub total_web_requests: u64,
    /// Distinct client addresses.
    pub unique_visitors: usize,
    /// Monitoring uptime percentage.
    pub monitoring_uptime: f64,
    /// Total health checks.
    pub total_monitoring_checks: u64,
    /// Alerts reported as delivered.
    pub alerts_sent: u64,
}

/// Combined access and monitoring report for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// When the report was built.
    pub generated_at: DateTime<Local>,
    /// Access-log statistics.
    pub nginx: AccessStats,
    /// Monitoring-log statistics.
    pub monitoring: MonitoringStats,
    /// Headline figures.
    pub summary: Summary,
}

/// Compose a report from two finalized snapshots.
pub fn build(now: DateTime<Local>, nginx: AccessStats, monitoring: MonitoringStats) -> Report {
    let summary = Summary {
        total_web_requests: nginx.total_requests,
        unique_visitors: nginx.unique_ips.len(),
        monitoring_uptime: monitoring.uptime_percentage,
        total_monitoring_checks: monitoring.total_checks,
        alerts_sent: monitoring.alerts_sent,
    };

    Report {
        generated_at: now,
        nginx,
        monitoring,
        summary,
    }
}

/// Render the human-readable summary printed at the end of an analysis run.
pub fn render_summary(report: &Report) -> String {
    let nginx = &report.nginx;
    let monitoring = &report.monitoring;
    let rule = "=".repeat(60);

    let mut text = format!(
        "{rule}\nLOG REPORT\n{rule}\n\n\
         Generated at: {generated_at}\n\n\
         WEB SERVER\n\
         \x20 Total requests: {total}\n\
         \x20 Unique visitors: {unique}\n\
         \x20 Most common status codes:\n",
        generated_at = report.generated_at.to_rfc3339(),
        total = nginx.total_requests,
        unique = nginx.unique_ips.len(),
    );

    for (status, count) in nginx.most_common_status_codes(TOP_N) {
        text.push_str(&format!("    - {status}: {count} requests\n"));
    }

    if !nginx.top_pages.is_empty() {
        text.push_str("  Most requested pages:\n");
        for (page, count) in nginx.most_common_pages(TOP_N) {
            text.push_str(&format!("    - {page}: {count} hits\n"));
        }
    }

    text.push_str(&format!(
        "\nMONITORING\n\
         \x20 Total checks: {total}\n\
         \x20 Successful checks: {ok}\n\
         \x20 Failed checks: {failed}\n\
         \x20 Uptime: {uptime:.2}%\n\
         \x20 Average response time: {avg:.3}s\n\
         \x20 Alerts sent: {alerts}\n",
        total = monitoring.total_checks,
        ok = monitoring.successful_checks,
        failed = monitoring.failed_checks,
        uptime = monitoring.uptime_percentage,
        avg = monitoring.average_response_time,
        alerts = monitoring.alerts_sent,
    ));

    if !monitoring.downtime_events.is_empty() {
        text.push_str("\nDOWNTIME EVENTS\n");
        for event in last_n(&monitoring.downtime_events, RECENT_N) {
            text.push_str(&format!("  {}: {}\n", event.timestamp, event.error));
        }
    }

    if !nginx.errors.is_empty() {
        text.push_str("\nRECENT HTTP ERRORS\n");
        for error in last_n(&nginx.errors, RECENT_N) {
            text.push_str(&format!(
                "  {}: {} - {} ({})\n",
                error.timestamp.to_rfc3339(),
                error.status,
                error.path,
                error.ip
            ));
        }
    }

    text
}

fn last_n<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}
