//! One monitoring cycle: probe, persist, compare, alert.

use tracing::{error, info};

use crate::alert::format_alert;
use crate::availability::{decide_with_history, AlertDecision};
use crate::notifier::AlertSink;
use crate::parser::{ALERT_MARKER, SENT_MARKER};
use crate::probe::Prober;
use crate::status::StatusInfo;
use crate::store::StatusStore;

/// Result of one monitoring cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    /// The fresh probe result.
    pub status: StatusInfo,
    /// Transition decision against the previous result.
    pub decision: AlertDecision,
    /// Delivery result, `None` when no alert was due.
    pub delivered: Option<bool>,
}

/// Decide on an alert and deliver it if one is due.
///
/// The sink is only called when the state changed. Returns the decision and
/// the delivery result.
pub async fn dispatch_alert(
    previous: Option<&StatusInfo>,
    current: &StatusInfo,
    sink: &dyn AlertSink,
) -> (AlertDecision, Option<bool>) {
    let decision = decide_with_history(previous, current);
    if !decision.should_alert() {
        return (decision, None);
    }

    let label = match decision {
        AlertDecision::AlertWentDown => "de site fora do ar",
        _ => "de site restaurado",
    };

    let message = format_alert(decision, current);
    let delivered = sink.send_alert(&message).await;
    if delivered {
        info!("{ALERT_MARKER} {label} {SENT_MARKER}");
    } else {
        error!(decision = ?decision, url = %current.url, "failed to deliver availability alert");
    }

    (decision, Some(delivered))
}

/// Run one full cycle against the site.
///
/// The current result is persisted before alerting, so a failed delivery is
/// not retried on the next run. A failed save is logged and does not stop
/// the cycle.
pub async fn run_check(prober: &Prober, store: &StatusStore, sink: &dyn AlertSink) -> CheckOutcome {
    info!(url = %prober.url(), "starting site check");

    let previous = store.load_previous();
    let status = prober.check().await;

    if let Err(e) = store.save(&status) {
        error!(error = %e, "failed to save current status");
    }

    let (decision, delivered) = dispatch_alert(previous.as_ref(), &status, sink).await;

    info!(is_up = status.is_up, decision = ?decision, "site check complete");

    CheckOutcome {
        status,
        decision,
        delivered,
    }
}
