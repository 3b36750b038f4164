//! Alert delivery.
//!
//! The monitor only needs one capability from a transport: send a rendered
//! message and report whether it was delivered. [`AlertSink`] is that seam;
//! [`DiscordWebhook`] is the shipped implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{WebhookConfig, WebhookKind};

/// Timeout for a single webhook POST.
const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised while delivering an alert.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// No webhook URL configured.
    #[error("webhook URL is not configured")]
    MissingUrl,
    /// HTTP transport failure.
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The webhook answered with a non-success status.
    #[error("webhook returned status {0}")]
    HttpStatus(u16),
}

/// Transport for rendered alert messages.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Deliver `message`. Returns `true` on success; failures are logged by
    /// the implementation and never retried.
    async fn send_alert(&self, message: &str) -> bool;
}

/// Discord channel webhook payload.
#[derive(Debug, Serialize)]
struct DiscordPayload<'a> {
    content: &'a str,
    username: &'a str,
    avatar_url: &'a str,
}

/// Posts alerts to a Discord webhook.
#[derive(Debug, Clone)]
pub struct DiscordWebhook {
    client: reqwest::Client,
    url: String,
    username: String,
    avatar_url: String,
}

impl DiscordWebhook {
    /// Create a webhook client from configuration.
    pub fn new(config: &WebhookConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to build HTTP client with timeout, using default");
                reqwest::Client::default()
            });
        Self {
            client,
            url: config.url.clone(),
            username: config.username.clone(),
            avatar_url: config.avatar_url.clone(),
        }
    }

    /// Post `message`, surfacing the failure cause.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when no URL is configured, the request fails,
    /// or Discord answers with a non-2xx status.
    pub async fn post(&self, message: &str) -> Result<(), NotifyError> {
        if self.url.is_empty() {
            return Err(NotifyError::MissingUrl);
        }

        let payload = DiscordPayload {
            content: message,
            username: &self.username,
            avatar_url: &self.avatar_url,
        };

        let response = self.client.post(&self.url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::HttpStatus(status.as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl AlertSink for DiscordWebhook {
    async fn send_alert(&self, message: &str) -> bool {
        match self.post(message).await {
            Ok(()) => {
                info!("alert delivered via Discord");
                true
            }
            Err(NotifyError::MissingUrl) => {
                warn!("Discord webhook URL not configured, alert not sent");
                false
            }
            Err(e) => {
                warn!(error = %e, "failed to send alert via Discord");
                false
            }
        }
    }
}

/// Build the sink for the configured provider.
pub fn build_sink(config: &WebhookConfig) -> Box<dyn AlertSink> {
    match config.kind {
        WebhookKind::Discord => Box::new(DiscordWebhook::new(config)),
    }
}
