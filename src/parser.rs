//! Line-level parsing for access-log and monitoring-log input.
//!
//! Both parsers are pure: one raw line in, one typed record (or `None`) out.
//! A structural mismatch is never an error, the caller simply skips the line.

use std::num::IntErrorKind;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;

/// Datetime layout used inside the brackets of an nginx combined log line.
pub const ACCESS_DATETIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Marker written by the prober for a healthy check.
pub const SUCCESS_MARKER: &str = "Site OK";

/// Marker written by the prober when the site answered with a non-200 status.
pub const ERROR_STATUS_MARKER: &str = "Site com problema";

/// Marker written by the prober when the request itself failed.
pub const UNREACHABLE_MARKER: &str = "Erro ao acessar";

/// First half of the "alert delivered" marker pair.
pub const ALERT_MARKER: &str = "Alerta";

/// Second half of the "alert delivered" marker pair.
pub const SENT_MARKER: &str = "enviado";

static ACCESS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"^(?P<ip>\S+) - - \[(?P<datetime>[^\]]+)\] "#,
        r#""(?P<method>\S+) (?P<path>\S+) (?P<protocol>\S+)" "#,
        r#"(?P<status>\d+) (?P<size>\d+) "(?P<referer>[^"]*)" "(?P<user_agent>[^"]*)""#,
    ))
    .expect("access line pattern is valid")
});

static RESPONSE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Tempo: ([\d.]+)s").expect("response time pattern is valid"));

static CHECK_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})").expect("timestamp pattern is valid")
});

/// One request line from the HTTP access log.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessLogEntry {
    /// Client address exactly as logged.
    pub ip: String,
    /// Parsed request time with its original offset, `None` if the field was malformed.
    pub timestamp: Option<DateTime<FixedOffset>>,
    /// Raw text between the brackets.
    pub raw_timestamp: String,
    /// Request method.
    pub method: String,
    /// Request path, including any query string.
    pub path: String,
    /// Protocol token, e.g. `HTTP/1.1`.
    pub protocol: String,
    /// Status code digits as logged.
    pub status: String,
    /// Response body size, `None` if the digits overflow.
    pub size: Option<u64>,
    /// Referer header, possibly empty or `-`.
    pub referer: String,
    /// User agent header, possibly empty.
    pub user_agent: String,
}

impl AccessLogEntry {
    /// Numeric status code, `None` if the field is not an integer.
    ///
    /// Digit strings too long for a `u64` saturate at `u64::MAX`.
    pub fn status_code(&self) -> Option<u64> {
        match self.status.parse::<u64>() {
            Ok(code) => Some(code),
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u64::MAX),
            Err(_) => None,
        }
    }
}

/// Outcome classified from a single monitoring-log line.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitoringCheckEvent {
    /// Healthy check, with the response time when the line carried one.
    Success {
        /// Seconds taken by the probe.
        response_time_seconds: Option<f64>,
    },
    /// Failed check (error status or unreachable site).
    Failure {
        /// `YYYY-MM-DD HH:MM:SS` token found on the line, if any.
        timestamp: Option<String>,
        /// The trimmed line.
        raw_line: String,
    },
    /// An alert was delivered.
    AlertSent,
}

/// Parse one access-log line.
///
/// Returns `None` when the line does not have the combined log shape. A line
/// that matches but carries an unparseable datetime is still returned, with
/// `timestamp` set to `None`.
pub fn parse_access_line(line: &str) -> Option<AccessLogEntry> {
    let caps = ACCESS_LINE.captures(line.trim())?;
    let field = |name: &str| {
        caps.name(name)
            .map(|m| m.as_str().to_owned())
            .unwrap_or_default()
    };

    let raw_timestamp = field("datetime");
    let timestamp = DateTime::parse_from_str(&raw_timestamp, ACCESS_DATETIME_FORMAT).ok();

    Some(AccessLogEntry {
        ip: field("ip"),
        timestamp,
        raw_timestamp,
        method: field("method"),
        path: field("path"),
        protocol: field("protocol"),
        status: field("status"),
        size: field("size").parse().ok(),
        referer: field("referer"),
        user_agent: field("user_agent"),
    })
}

/// Classify one monitoring-log line.
///
/// Checks run in a fixed order and the first hit wins: success, then failure,
/// then alert-sent. Lines with none of the markers yield `None`.
pub fn classify_monitoring_line(line: &str) -> Option<MonitoringCheckEvent> {
    if line.contains(SUCCESS_MARKER) {
        let response_time_seconds = RESPONSE_TIME
            .captures(line)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok());
        return Some(MonitoringCheckEvent::Success {
            response_time_seconds,
        });
    }

    if line.contains(ERROR_STATUS_MARKER) || line.contains(UNREACHABLE_MARKER) {
        let timestamp = CHECK_TIMESTAMP
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_owned());
        return Some(MonitoringCheckEvent::Failure {
            timestamp,
            raw_line: line.trim().to_owned(),
        });
    }

    if line.contains(ALERT_MARKER) && line.contains(SENT_MARKER) {
        return Some(MonitoringCheckEvent::AlertSent);
    }

    None
}
