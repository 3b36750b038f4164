//! Tests for `src/monitoring.rs`: check counters and derived uptime figures.

use sitewatch::monitoring::{mean, uptime_percentage, MonitoringLogAggregator, MonitoringStats};

fn aggregate(lines: &[&str]) -> MonitoringStats {
    let mut aggregator = MonitoringLogAggregator::new();
    for line in lines {
        aggregator.ingest(line);
    }
    aggregator.finalize()
}

#[test]
fn empty_log_has_zero_defaults() {
    let stats = aggregate(&[]);

    assert_eq!(stats.total_checks, 0);
    assert_eq!(stats.average_response_time, 0.0);
    assert_eq!(stats.uptime_percentage, 0.0);
    assert!(stats.response_times.is_empty());
}

#[test]
fn mixed_log_counts_every_outcome() {
    let stats = aggregate(&[
        "2025-01-10 10:00:00 - INFO - starting site check",
        "2025-01-10 10:00:00 - INFO - Site OK - Status: 200, Tempo: 2.00s",
        "2025-01-10 10:05:00 - WARNING - Site com problema - Status: 502, Tempo: 0.50s",
        "2025-01-10 10:05:00 - INFO - Alerta de site fora do ar enviado",
        "2025-01-10 10:10:00 - ERROR - Erro ao acessar o site: timed out",
        "2025-01-10 10:15:00 - INFO - Site OK - Status: 200, Tempo: 4.00s",
        "2025-01-10 10:15:00 - INFO - Alerta de site restaurado enviado",
    ]);

    assert_eq!(stats.total_checks, 4);
    assert_eq!(stats.successful_checks, 2);
    assert_eq!(stats.failed_checks, 2);
    assert_eq!(
        stats.successful_checks + stats.failed_checks,
        stats.total_checks
    );
    assert_eq!(stats.alerts_sent, 2);
    assert_eq!(stats.response_times, vec![2.0, 4.0]);
    assert_eq!(stats.average_response_time, 3.0);
    assert_eq!(stats.uptime_percentage, 50.0);

    assert_eq!(stats.downtime_events.len(), 2);
    assert_eq!(stats.downtime_events[0].timestamp, "2025-01-10 10:05:00");
    assert!(stats.downtime_events[0].error.contains("Status: 502"));
    assert_eq!(stats.downtime_events[1].timestamp, "2025-01-10 10:10:00");
}

#[test]
fn alerts_do_not_count_as_checks() {
    let stats = aggregate(&["Alerta enviado", "Alerta enviado"]);
    assert_eq!(stats.alerts_sent, 2);
    assert_eq!(stats.total_checks, 0);
    assert_eq!(stats.uptime_percentage, 0.0);
}

#[test]
fn failure_without_timestamp_counts_but_records_no_event() {
    let stats = aggregate(&["Erro ao acessar o site: dns failure"]);
    assert_eq!(stats.failed_checks, 1);
    assert_eq!(stats.total_checks, 1);
    assert!(stats.downtime_events.is_empty());
}

#[test]
fn success_without_sample_counts_but_adds_no_sample() {
    let stats = aggregate(&["Site OK", "Site OK - Tempo: 1.00s"]);
    assert_eq!(stats.successful_checks, 2);
    assert_eq!(stats.response_times, vec![1.0]);
    assert_eq!(stats.average_response_time, 1.0);
    assert_eq!(stats.uptime_percentage, 100.0);
}

#[test]
fn mean_of_samples() {
    assert_eq!(mean(&[2.0, 4.0]), 3.0);
    assert_eq!(mean(&[]), 0.0);
}

#[test]
fn uptime_stays_in_range() {
    assert_eq!(uptime_percentage(0, 0), 0.0);
    assert_eq!(uptime_percentage(0, 7), 0.0);
    assert_eq!(uptime_percentage(7, 7), 100.0);
    let pct = uptime_percentage(1, 3);
    assert!((0.0..=100.0).contains(&pct));
    assert!((pct - 33.333).abs() < 0.01);
}

#[test]
fn same_input_gives_identical_stats() {
    let lines = [
        "2025-01-10 10:00:00 Site OK - Tempo: 0.10s",
        "2025-01-10 10:01:00 Site com problema",
        "Alerta enviado",
    ];
    assert_eq!(aggregate(&lines), aggregate(&lines));
}
