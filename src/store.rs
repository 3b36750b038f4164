//! JSON persistence for the previous probe result and generated reports.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::report::Report;
use crate::status::StatusInfo;

/// File-backed store for the last probe result.
#[derive(Debug, Clone)]
pub struct StatusStore {
    path: PathBuf,
}

impl StatusStore {
    /// Create a store backed by the given JSON file.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the previous probe result.
    ///
    /// A missing, unreadable, or malformed file yields `None`; the latter two
    /// are logged at `warn`.
    pub fn load_previous(&self) -> Option<StatusInfo> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no previous status recorded");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read previous status");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(status) => Some(status),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to parse previous status");
                None
            }
        }
    }

    /// Persist the current probe result, replacing the previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, status: &StatusInfo) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(status).context("failed to serialize status")?;
        write_atomic(&self.path, &json)
            .with_context(|| format!("failed to write status file {}", self.path.display()))
    }
}

/// File name for a report generated at `now`: `report_YYYYMMDD_HHMMSS.json`.
pub fn report_file_name(now: DateTime<Local>) -> String {
    format!("report_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Save a report as pretty-printed JSON under `dir`, returning the file path.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the write fails.
pub fn save_report(report: &Report, dir: &Path) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create report directory {}", dir.display()))?;
    let path = dir.join(report_file_name(report.generated_at));
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    std::fs::write(&path, json)
        .with_context(|| format!("failed to write report {}", path.display()))?;
    Ok(path)
}

/// Write via a sibling temp file and rename so readers never see a partial file.
fn write_atomic(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, contents)
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("failed to rename {} to {}", tmp.display(), path.display()))
}
