//! Tests for `src/store.rs`: previous-status persistence and report files.

use chrono::{Local, TimeZone};
use sitewatch::access::AccessStats;
use sitewatch::availability::{decide_with_history, AlertDecision};
use sitewatch::monitoring::MonitoringStats;
use sitewatch::report;
use sitewatch::status::StatusInfo;
use sitewatch::store::{report_file_name, save_report, StatusStore};

#[test]
fn missing_status_file_is_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = StatusStore::new(dir.path().join("status.json"));
    assert!(store.load_previous().is_none());
}

#[test]
fn corrupt_status_file_is_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("status.json");
    std::fs::write(&path, "{ not json").expect("write");

    let store = StatusStore::new(path);
    assert!(store.load_previous().is_none());
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = StatusStore::new(dir.path().join("state").join("status.json"));

    let status = StatusInfo::from_error("http://localhost", Local::now(), "connection refused");
    store.save(&status).expect("save status");

    let loaded = store.load_previous().expect("status should load");
    assert_eq!(loaded, status);
    assert!(!store.path().with_extension("json.tmp").exists());
}

#[test]
fn status_json_uses_snake_case_and_nulls() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = StatusStore::new(dir.path().join("status.json"));

    let status = StatusInfo::from_error("http://localhost", Local::now(), "timeout");
    store.save(&status).expect("save status");

    let raw = std::fs::read_to_string(store.path()).expect("read");
    assert!(raw.contains("\"is_up\": false"));
    assert!(raw.contains("\"status_code\": null"));
    assert!(raw.contains("\"response_time\": null"));
    assert!(raw.contains("\"error\": \"timeout\""));
}

#[test]
fn report_file_name_uses_generation_time() {
    let at = Local
        .with_ymd_and_hms(2025, 1, 10, 9, 5, 3)
        .single()
        .expect("valid local time");
    assert_eq!(report_file_name(at), "report_20250110_090503.json");
}

#[test]
fn save_report_writes_pretty_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("reports");

    let report = report::build(
        Local::now(),
        AccessStats::default(),
        MonitoringStats::default(),
    );
    let path = save_report(&report, &out).expect("save report");

    assert!(path.starts_with(&out));
    let raw = std::fs::read_to_string(&path).expect("read report");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    assert_eq!(value["summary"]["total_web_requests"], 0);
    assert!(raw.contains("\n  \"nginx\""));
}

#[test]
fn reads_status_with_offsetless_timestamp() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("site_status.json");
    std::fs::write(
        &path,
        r#"{
  "timestamp": "2025-01-10T10:00:00.123456",
  "url": "http://localhost",
  "status_code": null,
  "response_time": null,
  "is_up": false,
  "error": "timeout"
}"#,
    )
    .expect("write");

    let store = StatusStore::new(path);
    let previous = store.load_previous().expect("status should load");
    assert!(!previous.is_up);
    assert_eq!(
        previous.timestamp.naive_local().to_string(),
        "2025-01-10 10:00:00.123456"
    );

    // A site already recorded as down must not alert again.
    let current = StatusInfo::from_error("http://localhost", Local::now(), "timeout");
    assert_eq!(
        decide_with_history(Some(&previous), &current),
        AlertDecision::NoAlert
    );
}
