//! Log file reading for the aggregators.
//!
//! Uses synchronous `std::fs` reads since these are quick local operations.
//! A missing log file is not an error: the analysis proceeds with an empty
//! aggregate, matching how a freshly installed host looks.

use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::Context;
use tracing::{debug, warn};

use crate::access::{AccessLogAggregator, AccessStats};
use crate::monitoring::{MonitoringLogAggregator, MonitoringStats};

/// Lines longer than this are skipped rather than parsed.
const MAX_LINE_LEN: usize = 1_048_576;

/// Anything that folds raw log lines one at a time.
pub trait LineAggregator {
    /// Fold one raw line.
    fn ingest_line(&mut self, line: &str);
}

impl LineAggregator for AccessLogAggregator {
    fn ingest_line(&mut self, line: &str) {
        self.ingest(line);
    }
}

impl LineAggregator for MonitoringLogAggregator {
    fn ingest_line(&mut self, line: &str) {
        self.ingest(line);
    }
}

/// Feed every line of `reader` to `aggregator`, in order.
///
/// Invalid UTF-8 is replaced rather than rejected. Returns the number of
/// lines read.
///
/// # Errors
///
/// Returns an error if reading fails.
pub fn feed_reader<R: Read>(reader: R, aggregator: &mut impl LineAggregator) -> anyhow::Result<u64> {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut lines: u64 = 0;

    loop {
        buf.clear();
        let bytes_read = reader
            .read_until(b'\n', &mut buf)
            .context("failed to read log line")?;
        if bytes_read == 0 {
            break;
        }
        lines = lines.saturating_add(1);

        if buf.len() > MAX_LINE_LEN {
            continue;
        }

        aggregator.ingest_line(&String::from_utf8_lossy(&buf));
    }

    Ok(lines)
}

/// Feed a log file to `aggregator`.
///
/// Returns `Ok(false)` without touching the aggregator when the file does not
/// exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be opened or read.
pub fn feed_file(path: &Path, aggregator: &mut impl LineAggregator) -> anyhow::Result<bool> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to open log file {}", path.display()))
        }
    };

    let lines = feed_reader(file, aggregator)
        .with_context(|| format!("failed to read log file {}", path.display()))?;
    debug!(path = %path.display(), lines, "log file read");
    Ok(true)
}

/// Aggregate an access log file.
///
/// Read failures are logged and whatever was aggregated so far is returned.
pub fn analyze_access_log(path: &Path) -> AccessStats {
    let mut aggregator = AccessLogAggregator::new();
    run_feed(path, &mut aggregator, "access");
    aggregator.finalize()
}

/// Aggregate a monitoring log file.
///
/// Read failures are logged and whatever was aggregated so far is returned.
pub fn analyze_monitoring_log(path: &Path) -> MonitoringStats {
    let mut aggregator = MonitoringLogAggregator::new();
    run_feed(path, &mut aggregator, "monitoring");
    aggregator.finalize()
}

fn run_feed(path: &Path, aggregator: &mut impl LineAggregator, kind: &str) {
    match feed_file(path, aggregator) {
        Ok(true) => {}
        Ok(false) => warn!(path = %path.display(), kind, "log file not found"),
        Err(e) => warn!(path = %path.display(), kind, error = %e, "failed to analyze log"),
    }
}
