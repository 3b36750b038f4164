//! HTTP availability probe.
//!
//! Issues one GET against the configured site and records the outcome both
//! as a [`StatusInfo`] and as a monitoring-log line the analyzer can read.

use std::time::{Duration, Instant};

use chrono::Local;
use tracing::{error, info, warn};

use crate::config::SiteConfig;
use crate::parser::{ERROR_STATUS_MARKER, SUCCESS_MARKER, UNREACHABLE_MARKER};
use crate::status::StatusInfo;

/// Performs availability probes against one URL.
#[derive(Debug, Clone)]
pub struct Prober {
    client: reqwest::Client,
    url: String,
}

impl Prober {
    /// Create a prober for the configured site and timeout.
    pub fn new(config: &SiteConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to build HTTP client with timeout, using default");
                reqwest::Client::default()
            });
        Self {
            client,
            url: config.url.clone(),
        }
    }

    /// Probed URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Probe the site once.
    ///
    /// Never fails: transport errors become a down [`StatusInfo`] carrying
    /// the error message.
    pub async fn check(&self) -> StatusInfo {
        let started_at = Local::now();
        let start = Instant::now();

        match self.client.get(&self.url).send().await {
            Ok(response) => {
                let elapsed = start.elapsed().as_secs_f64();
                let code = response.status().as_u16();
                let status = StatusInfo::from_response(&self.url, started_at, code, elapsed);
                if status.is_up {
                    info!("{SUCCESS_MARKER} - Status: {code}, Tempo: {elapsed:.2}s");
                } else {
                    warn!("{ERROR_STATUS_MARKER} - Status: {code}, Tempo: {elapsed:.2}s");
                }
                status
            }
            Err(e) => {
                let message = e.to_string();
                error!("{UNREACHABLE_MARKER} o site: {message}");
                StatusInfo::from_error(&self.url, Local::now(), message)
            }
        }
    }
}
