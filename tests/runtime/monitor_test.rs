//! Tests for `src/monitor.rs`: alert dispatch and the full check cycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Local;
use sitewatch::availability::AlertDecision;
use sitewatch::config::SiteConfig;
use sitewatch::monitor::{dispatch_alert, run_check};
use sitewatch::notifier::AlertSink;
use sitewatch::probe::Prober;
use sitewatch::status::StatusInfo;
use sitewatch::store::StatusStore;

use crate::probe_test::{closed_url, serve_once};

/// Sink that records every message and answers with a fixed result.
struct RecordingSink {
    sent: Mutex<Vec<String>>,
    succeed: AtomicBool,
}

impl RecordingSink {
    fn new(succeed: bool) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            succeed: AtomicBool::new(succeed),
        }
    }

    fn messages(&self) -> Vec<String> {
        self.sent.lock().expect("lock").clone()
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn send_alert(&self, message: &str) -> bool {
        self.sent.lock().expect("lock").push(message.to_owned());
        self.succeed.load(Ordering::SeqCst)
    }
}

fn up() -> StatusInfo {
    StatusInfo::from_response("http://localhost", Local::now(), 200, 0.1)
}

fn down() -> StatusInfo {
    StatusInfo::from_error("http://localhost", Local::now(), "timeout")
}

#[tokio::test]
async fn healthy_to_healthy_never_calls_the_sink() {
    let sink = RecordingSink::new(true);
    let (decision, delivered) = dispatch_alert(Some(&up()), &up(), &sink).await;

    assert_eq!(decision, AlertDecision::NoAlert);
    assert_eq!(delivered, None);
    assert!(sink.messages().is_empty());
}

#[tokio::test]
async fn down_to_down_never_calls_the_sink() {
    let sink = RecordingSink::new(true);
    let (decision, _) = dispatch_alert(Some(&down()), &down(), &sink).await;

    assert_eq!(decision, AlertDecision::NoAlert);
    assert!(sink.messages().is_empty());
}

#[tokio::test]
async fn going_down_sends_one_message() {
    let sink = RecordingSink::new(true);
    let (decision, delivered) = dispatch_alert(Some(&up()), &down(), &sink).await;

    assert_eq!(decision, AlertDecision::AlertWentDown);
    assert_eq!(delivered, Some(true));
    let messages = sink.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("timeout"));
}

#[tokio::test]
async fn first_run_failure_alerts() {
    let sink = RecordingSink::new(true);
    let (decision, _) = dispatch_alert(None, &down(), &sink).await;

    assert_eq!(decision, AlertDecision::AlertWentDown);
    assert_eq!(sink.messages().len(), 1);
}

#[tokio::test]
async fn failed_delivery_is_reported_not_retried() {
    let sink = RecordingSink::new(false);
    let (decision, delivered) = dispatch_alert(Some(&down()), &up(), &sink).await;

    assert_eq!(decision, AlertDecision::AlertRecovered);
    assert_eq!(delivered, Some(false));
    assert_eq!(sink.messages().len(), 1);
}

#[tokio::test]
async fn run_check_persists_status_and_alerts_on_transition() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = StatusStore::new(dir.path().join("status.json"));
    let sink = RecordingSink::new(true);

    // First run: unreachable with no history alerts once.
    let prober = Prober::new(&SiteConfig {
        url: closed_url().await,
        timeout_secs: 5,
    });
    let outcome = run_check(&prober, &store, &sink).await;
    assert_eq!(outcome.decision, AlertDecision::AlertWentDown);
    assert_eq!(outcome.delivered, Some(true));
    assert!(!store.load_previous().expect("saved").is_up);

    // Second run: still down, no new alert.
    let outcome = run_check(&prober, &store, &sink).await;
    assert_eq!(outcome.decision, AlertDecision::NoAlert);
    assert_eq!(sink.messages().len(), 1);

    // Third run: site is back.
    let prober = Prober::new(&SiteConfig {
        url: serve_once("200 OK").await,
        timeout_secs: 5,
    });
    let outcome = run_check(&prober, &store, &sink).await;
    assert_eq!(outcome.decision, AlertDecision::AlertRecovered);
    assert!(outcome.status.is_up);
    assert_eq!(sink.messages().len(), 2);
    assert!(store.load_previous().expect("saved").is_up);
}
