//! Configuration loading for sitewatch.
//!
//! Loads `sitewatch.toml` with per-section defaults. All sections use
//! `#[serde(default)]` so a minimal, empty, or missing config file is valid.
//!
//! Precedence: env vars > config file > defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "SITEWATCH_CONFIG";

/// Top-level sitewatch configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SitewatchConfig {
    /// Probed site.
    #[serde(default)]
    pub site: SiteConfig,

    /// Log, status, and report locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Alert delivery target.
    #[serde(default)]
    pub webhook: WebhookConfig,
}

/// The site the monitor probes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// URL requested on every check.
    #[serde(default = "default_site_url")]
    pub url: String,

    /// Seconds before a probe is abandoned and counted as down.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: default_site_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Filesystem locations read and written by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// nginx access log in combined format.
    #[serde(default = "default_access_log")]
    pub access_log: PathBuf,

    /// Log the monitor appends to and the analyzer reads.
    #[serde(default = "default_monitoring_log")]
    pub monitoring_log: PathBuf,

    /// JSON file holding the previous probe result.
    #[serde(default = "default_status_file")]
    pub status_file: PathBuf,

    /// Directory receiving timestamped JSON reports.
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            access_log: default_access_log(),
            monitoring_log: default_monitoring_log(),
            status_file: default_status_file(),
            reports_dir: default_reports_dir(),
        }
    }
}

/// Supported webhook providers.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum WebhookKind {
    /// Discord channel webhook.
    #[default]
    Discord,
}

/// Alert delivery settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Provider the URL belongs to.
    #[serde(default)]
    pub kind: WebhookKind,

    /// Webhook URL. Empty disables delivery.
    #[serde(default)]
    pub url: String,

    /// Display name used for posted messages.
    #[serde(default = "default_webhook_username")]
    pub username: String,

    /// Avatar shown next to posted messages.
    #[serde(default = "default_avatar_url")]
    pub avatar_url: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            kind: WebhookKind::default(),
            url: String::new(),
            username: default_webhook_username(),
            avatar_url: default_avatar_url(),
        }
    }
}

impl SitewatchConfig {
    /// Validate that configuration values are within sane bounds.
    pub fn validate(&self) -> anyhow::Result<()> {
        let site_url = url::Url::parse(&self.site.url)
            .with_context(|| format!("site.url is not a valid URL: {}", self.site.url))?;
        anyhow::ensure!(
            matches!(site_url.scheme(), "http" | "https"),
            "site.url must use http or https"
        );
        anyhow::ensure!(
            (1..=300).contains(&self.site.timeout_secs),
            "site.timeout_secs must be in [1, 300]"
        );
        if !self.webhook.url.is_empty() {
            let hook = url::Url::parse(&self.webhook.url).context("webhook.url is not a valid URL")?;
            anyhow::ensure!(hook.scheme() == "https", "webhook.url must use https");
        }
        Ok(())
    }

    /// Apply environment variable overrides.
    ///
    /// Takes a resolver function so tests can inject values without touching
    /// the process environment.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("SITEWATCH_SITE_URL") {
            self.site.url = v;
        }
        if let Some(v) = env("SITEWATCH_TIMEOUT_SECS") {
            match v.parse() {
                Ok(n) => self.site.timeout_secs = n,
                Err(_) => warn!(
                    var = "SITEWATCH_TIMEOUT_SECS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("SITEWATCH_WEBHOOK_URL") {
            self.webhook.url = v;
        }
    }
}

/// Load configuration from a TOML file, falling back to defaults when the
/// file does not exist. Env overrides are applied before validation.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails validation.
pub fn load_config(path: &Path) -> anyhow::Result<SitewatchConfig> {
    let mut config = read_config_file(path)?;
    config.apply_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

/// Read the TOML file only, without env overrides or validation.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn read_config_file(path: &Path) -> anyhow::Result<SitewatchConfig> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            info!(path = %path.display(), "loading config from file");
            toml::from_str(&contents)
                .with_context(|| format!("failed to parse config at {}", path.display()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no config file found, using defaults");
            Ok(SitewatchConfig::default())
        }
        Err(e) => {
            Err(e).with_context(|| format!("failed to read config at {}", path.display()))
        }
    }
}

/// Write the configuration back to disk as TOML, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_config(config: &SitewatchConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write config at {}", path.display()))
}

/// Resolve the config file path.
///
/// Checks `$SITEWATCH_CONFIG` first, then the platform config directory
/// (`~/.config/sitewatch/sitewatch.toml` on Linux).
///
/// # Errors
///
/// Returns an error if no home directory can be determined.
pub fn config_path() -> anyhow::Result<PathBuf> {
    config_path_with(|key| std::env::var(key).ok())
}

fn config_path_with(env: impl Fn(&str) -> Option<String>) -> anyhow::Result<PathBuf> {
    if let Some(p) = env(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(p));
    }
    let dirs = directories::ProjectDirs::from("", "", "sitewatch")
        .context("could not determine a home directory for the config file")?;
    Ok(dirs.config_dir().join("sitewatch.toml"))
}

// Default value functions for serde.

fn default_site_url() -> String {
    "http://localhost".to_owned()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_access_log() -> PathBuf {
    PathBuf::from("/var/log/nginx/access.log")
}

fn default_monitoring_log() -> PathBuf {
    PathBuf::from("/var/log/sitewatch/monitoring.log")
}

fn default_status_file() -> PathBuf {
    PathBuf::from("/tmp/site_status.json")
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_webhook_username() -> String {
    "Site Monitor".to_owned()
}

fn default_avatar_url() -> String {
    "https://cdn-icons-png.flaticon.com/512/2919/2919906.png".to_owned()
}
