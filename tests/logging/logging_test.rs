//! Tests for `src/logging.rs`.

use chrono::NaiveDateTime;
use sitewatch::logging::{LoggingGuard, MONITORING_TIME_FORMAT};
use sitewatch::parser::{classify_monitoring_line, MonitoringCheckEvent};

#[test]
fn logging_guard_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<LoggingGuard>();
}

// init_monitor installs the global subscriber, so this binary holds exactly
// one test that calls it.
#[test]
fn monitor_lines_are_readable_by_the_analyzer() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let log_path = tmp.path().join("logs").join("monitoring.log");

    let guard = sitewatch::logging::init_monitor(&log_path).expect("init monitor logging");
    tracing::info!("Site OK - Status: 200, Tempo: 0.10s");
    tracing::error!("Erro ao acessar o site: connection refused");
    drop(guard);

    let content = std::fs::read_to_string(&log_path).expect("read monitoring log");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2, "unexpected log content: {content}");

    let (stamp, rest) = lines[0].split_at(19);
    NaiveDateTime::parse_from_str(stamp, MONITORING_TIME_FORMAT).expect("timestamp prefix");
    assert_eq!(rest, " - INFO - Site OK - Status: 200, Tempo: 0.10s");

    match classify_monitoring_line(lines[0]) {
        Some(MonitoringCheckEvent::Success {
            response_time_seconds: Some(t),
        }) => assert!((t - 0.1).abs() < 1e-9),
        other => panic!("expected success with sample, got {other:?}"),
    }

    match classify_monitoring_line(lines[1]) {
        Some(MonitoringCheckEvent::Failure { timestamp, .. }) => {
            assert_eq!(timestamp.as_deref(), Some(stamp));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}
