//! Alert message rendering for availability transitions.
//!
//! Messages use Discord markdown (`**bold**`) since that is the transport the
//! notifier ships with.

use crate::availability::AlertDecision;
use crate::status::StatusInfo;

/// Timestamp layout shown in alert messages.
const ALERT_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Render the message for an alerting decision.
///
/// # Panics
///
/// Panics when called with [`AlertDecision::NoAlert`]. Callers must check
/// [`AlertDecision::should_alert`] first.
pub fn format_alert(decision: AlertDecision, current: &StatusInfo) -> String {
    let timestamp = current.timestamp.format(ALERT_TIME_FORMAT);
    let url = &current.url;

    match decision {
        AlertDecision::AlertWentDown => match current.error.as_deref() {
            Some(error) => format!(
                "\u{1f6a8} **ALERT: Site Unreachable** \u{1f6a8}\n\n\
                 **URL:** {url}\n\
                 **Timestamp:** {timestamp}\n\
                 **Error:** {error}\n\n\
                 The site is not responding. Check the server immediately!"
            ),
            None => format!(
                "\u{1f6a8} **ALERT: Site Returned Error Status** \u{1f6a8}\n\n\
                 **URL:** {url}\n\
                 **Timestamp:** {timestamp}\n\
                 **Status Code:** {code}\n\
                 **Response Time:** {elapsed}\n\n\
                 The site returned an error status. Check the server!",
                code = describe_code(current.status_code),
                elapsed = describe_elapsed(current.response_time),
            ),
        },
        AlertDecision::AlertRecovered => format!(
            "\u{2705} **Site Restored** \u{2705}\n\n\
             **URL:** {url}\n\
             **Timestamp:** {timestamp}\n\
             **Status Code:** {code}\n\
             **Response Time:** {elapsed}\n\n\
             The site is back to normal.",
            code = describe_code(current.status_code),
            elapsed = describe_elapsed(current.response_time),
        ),
        AlertDecision::NoAlert => {
            panic!("format_alert called with AlertDecision::NoAlert")
        }
    }
}

fn describe_code(code: Option<u16>) -> String {
    code.map_or_else(|| "unknown".to_owned(), |c| c.to_string())
}

fn describe_elapsed(seconds: Option<f64>) -> String {
    seconds.map_or_else(|| "unknown".to_owned(), |s| format!("{s:.2}s"))
}
