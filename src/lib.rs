//! sitewatch: access-log and uptime-log analysis with availability alerts.
//!
//! Parses nginx access logs and the monitor's own check log into aggregate
//! statistics, and probes a site on each run, alerting only when its
//! availability changes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Access-log aggregation into request statistics.
pub mod access;
/// Alert message rendering.
pub mod alert;
/// Edge-triggered up/down transition logic.
pub mod availability;
/// Configuration loading and validation.
pub mod config;
/// Structured logging setup.
pub mod logging;
/// One probe-persist-alert cycle.
pub mod monitor;
/// Monitoring-log aggregation into uptime statistics.
pub mod monitoring;
/// Alert transports.
pub mod notifier;
/// Line parsers for both log formats.
pub mod parser;
/// HTTP availability probe.
pub mod probe;
/// Report composition and printed summary.
pub mod report;
/// Log file reading.
pub mod source;
/// Probe result type.
pub mod status;
/// JSON persistence for status and reports.
pub mod store;
