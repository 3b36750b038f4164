//! sitewatch CLI entry point.
//!
//! Provides `analyze`, `check`, and `webhook` subcommands for building a log
//! report, running one availability check, or managing the alert webhook.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use sitewatch::config::{config_path, load_config, read_config_file, save_config, WebhookKind};
use sitewatch::notifier::build_sink;
use sitewatch::probe::Prober;
use sitewatch::store::{self, StatusStore};
use sitewatch::{logging, monitor, report, source};

/// Message posted by `webhook test`.
const TEST_MESSAGE: &str = "\u{1f9ea} **Configuration Test**\n\nThis is a test message from sitewatch.";

/// sitewatch: access-log and uptime-log analysis with availability alerts.
#[derive(Parser)]
#[command(name = "sitewatch", version, about)]
struct Cli {
    /// Config file (default: $SITEWATCH_CONFIG or the platform config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Analyze the access and monitoring logs and print a report.
    Analyze {
        /// Access log to read instead of the configured one.
        #[arg(long)]
        access_log: Option<PathBuf>,
        /// Monitoring log to read instead of the configured one.
        #[arg(long)]
        monitoring_log: Option<PathBuf>,
        /// Directory for the JSON report instead of the configured one.
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Print the summary without writing the JSON report.
        #[arg(long)]
        no_save: bool,
    },
    /// Probe the site once and alert if its availability changed.
    Check,
    /// Manage the alert webhook.
    Webhook {
        /// Webhook action.
        #[command(subcommand)]
        action: WebhookAction,
    },
}

/// Webhook management actions.
#[derive(Subcommand)]
enum WebhookAction {
    /// Store a Discord webhook URL in the config file.
    Set {
        /// Webhook URL.
        #[arg(long)]
        url: String,
        /// Provider the URL belongs to.
        #[arg(long, value_enum, default_value_t = WebhookKind::Discord)]
        kind: WebhookKind,
    },
    /// Send a test message through the configured webhook.
    Test,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config_file = match cli.config {
        Some(path) => path,
        None => config_path()?,
    };

    match cli.command {
        Command::Analyze {
            access_log,
            monitoring_log,
            output_dir,
            no_save,
        } => handle_analyze(&config_file, access_log, monitoring_log, output_dir, no_save),
        Command::Check => handle_check(&config_file).await,
        Command::Webhook { action } => match action {
            WebhookAction::Set { url, kind } => handle_webhook_set(&config_file, url, kind),
            WebhookAction::Test => handle_webhook_test(&config_file).await,
        },
    }
}

/// Build, print, and optionally save the log report.
fn handle_analyze(
    config_file: &Path,
    access_log: Option<PathBuf>,
    monitoring_log: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    no_save: bool,
) -> anyhow::Result<()> {
    logging::init_cli();

    let config = load_config(config_file)
        .with_context(|| format!("failed to load {}", config_file.display()))?;

    let access_log = access_log.unwrap_or(config.paths.access_log);
    let monitoring_log = monitoring_log.unwrap_or(config.paths.monitoring_log);

    info!(
        access_log = %access_log.display(),
        monitoring_log = %monitoring_log.display(),
        "analyzing logs"
    );

    let nginx = source::analyze_access_log(&access_log);
    let monitoring = source::analyze_monitoring_log(&monitoring_log);
    let report = report::build(chrono::Local::now(), nginx, monitoring);

    println!("{}", report::render_summary(&report));

    if !no_save {
        let dir = output_dir.unwrap_or(config.paths.reports_dir);
        let path = store::save_report(&report, &dir)?;
        println!("Report saved to: {}", path.display());
    }

    info!("analysis complete");
    Ok(())
}

/// Probe the site once, persist the result, and alert on transitions.
async fn handle_check(config_file: &Path) -> anyhow::Result<()> {
    let config = load_config(config_file)
        .with_context(|| format!("failed to load {}", config_file.display()))?;

    let _logging_guard = logging::init_monitor(&config.paths.monitoring_log)?;

    let prober = Prober::new(&config.site);
    let store = StatusStore::new(config.paths.status_file.clone());
    let sink = build_sink(&config.webhook);

    monitor::run_check(&prober, &store, sink.as_ref()).await;
    Ok(())
}

/// Write the webhook URL into the config file.
fn handle_webhook_set(config_file: &Path, url: String, kind: WebhookKind) -> anyhow::Result<()> {
    logging::init_cli();

    // File values only: env overrides must not end up in the saved file.
    let mut config = read_config_file(config_file)?;
    config.webhook.kind = kind;
    config.webhook.url = url;
    config.validate()?;
    save_config(&config, config_file)?;

    info!(
        config = %config_file.display(),
        kind = ?config.webhook.kind,
        "webhook configured"
    );
    Ok(())
}

/// Send a test message through the configured webhook.
async fn handle_webhook_test(config_file: &Path) -> anyhow::Result<()> {
    logging::init_cli();

    let config = load_config(config_file)
        .with_context(|| format!("failed to load {}", config_file.display()))?;
    let sink = build_sink(&config.webhook);

    anyhow::ensure!(
        sink.send_alert(TEST_MESSAGE).await,
        "test message was not delivered, check the webhook configuration"
    );
    info!("test message delivered");
    Ok(())
}
