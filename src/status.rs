//! Probe results as persisted between monitor runs.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// The only status code that counts as "up".
pub const HEALTHY_STATUS: u16 = 200;

/// Result of one availability probe.
///
/// Build through [`StatusInfo::from_response`] or [`StatusInfo::from_error`]
/// so that `is_up` always agrees with `status_code` and `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusInfo {
    /// When the probe started.
    ///
    /// Read back from either RFC 3339 or an offset-less ISO time, which is
    /// taken as local time.
    #[serde(deserialize_with = "deserialize_local_time")]
    pub timestamp: DateTime<Local>,
    /// Probed URL.
    pub url: String,
    /// HTTP status code, absent when the request itself failed.
    pub status_code: Option<u16>,
    /// Seconds until the response arrived, absent when the request failed.
    pub response_time: Option<f64>,
    /// `true` iff the site answered with 200.
    pub is_up: bool,
    /// Transport error message, absent when a response arrived.
    pub error: Option<String>,
}

impl StatusInfo {
    /// Status for a probe that received an HTTP response.
    pub fn from_response(
        url: impl Into<String>,
        timestamp: DateTime<Local>,
        status_code: u16,
        response_time: f64,
    ) -> Self {
        Self {
            timestamp,
            url: url.into(),
            status_code: Some(status_code),
            response_time: Some(response_time),
            is_up: status_code == HEALTHY_STATUS,
            error: None,
        }
    }

    /// Status for a probe whose request failed before any response.
    pub fn from_error(
        url: impl Into<String>,
        timestamp: DateTime<Local>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            url: url.into(),
            status_code: None,
            response_time: None,
            is_up: false,
            error: Some(error.into()),
        }
    }
}

fn deserialize_local_time<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(at) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(at.with_timezone(&Local));
    }
    raw.parse::<NaiveDateTime>()
        .ok()
        .and_then(|naive| naive.and_local_timezone(Local).earliest())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid status timestamp: {raw}")))
}
