//! Structured logging setup using `tracing-subscriber` and `tracing-appender`.
//!
//! Two modes:
//! - **Monitor** ([`init_monitor`]): plain-text monitoring-log file layer + console layer
//! - **CLI** ([`init_cli`]): console-only for one-shot subcommands
//!
//! The monitor's file layer is what `analyze` later reads back, so its line
//! layout (`YYYY-MM-DD HH:MM:SS - LEVEL - message`) is part of the contract.

use std::path::Path;

use anyhow::Context;
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{ChronoLocal, FormatTime};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Timestamp layout of monitoring-log lines.
pub const MONITORING_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Holds the non-blocking writer guard for file logging.
///
/// The [`WorkerGuard`] must be kept alive for the duration of the process.
/// Dropping it flushes pending log entries and closes the file.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Event formatter producing `YYYY-MM-DD HH:MM:SS - LEVEL - message`.
#[derive(Debug)]
pub struct MonitoringLineFormat {
    timer: ChronoLocal,
}

impl Default for MonitoringLineFormat {
    fn default() -> Self {
        Self {
            timer: ChronoLocal::new(MONITORING_TIME_FORMAT.to_owned()),
        }
    }
}

impl<S, N> FormatEvent<S, N> for MonitoringLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        self.timer.format_time(&mut writer)?;
        write!(writer, " - {} - ", event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Initialise logging for the `check` subcommand.
///
/// Appends plain-text lines to `monitoring_log` (no rotation) and emits
/// human-readable output to stderr. Both are controlled by `RUST_LOG`
/// (default: `info`).
///
/// Returns a [`LoggingGuard`] that must be kept alive for log flushing.
///
/// # Errors
///
/// Returns an error if the log's parent directory cannot be created or the
/// path has no file name.
pub fn init_monitor(monitoring_log: &Path) -> anyhow::Result<LoggingGuard> {
    let dir = monitoring_log
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let file_name = monitoring_log
        .file_name()
        .with_context(|| format!("monitoring log has no file name: {}", monitoring_log.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .event_format(MonitoringLineFormat::default())
        .with_writer(non_blocking);

    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("failed to install global tracing subscriber")?;

    Ok(LoggingGuard { _guard: guard })
}

/// Initialise minimal logging for one-shot subcommands (CLI mode).
///
/// Emits human-readable output to stderr only. No file output.
/// Controlled by `RUST_LOG` (default: `info`).
pub fn init_cli() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
