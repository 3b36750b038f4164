//! Edge-triggered up/down transition detection.
//!
//! Only a change of state produces an alert. Two consecutive down probes
//! alert once, on the first.

use crate::status::StatusInfo;

/// Availability derived from a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityState {
    /// Site answered with 200.
    Up,
    /// Site answered with another status or not at all.
    Down,
}

impl AvailabilityState {
    /// State of a probe result.
    pub fn of(status: &StatusInfo) -> Self {
        if status.is_up {
            Self::Up
        } else {
            Self::Down
        }
    }
}

/// What the monitor must do after comparing two probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertDecision {
    /// No state change.
    NoAlert,
    /// The site went from up to down.
    AlertWentDown,
    /// The site went from down to up.
    AlertRecovered,
}

impl AlertDecision {
    /// Whether an alert must be formatted and sent.
    pub fn should_alert(self) -> bool {
        !matches!(self, Self::NoAlert)
    }
}

/// Compare two probe results.
pub fn decide(previous: &StatusInfo, current: &StatusInfo) -> AlertDecision {
    transition(AvailabilityState::of(previous), AvailabilityState::of(current))
}

/// Compare against the persisted previous result, if there is one.
///
/// With no history the site is assumed to have been up, so a first-ever
/// failing probe still alerts.
pub fn decide_with_history(previous: Option<&StatusInfo>, current: &StatusInfo) -> AlertDecision {
    let was = previous.map_or(AvailabilityState::Up, AvailabilityState::of);
    transition(was, AvailabilityState::of(current))
}

/// Transition table between two states.
pub fn transition(was: AvailabilityState, now: AvailabilityState) -> AlertDecision {
    match (was, now) {
        (AvailabilityState::Up, AvailabilityState::Down) => AlertDecision::AlertWentDown,
        (AvailabilityState::Down, AvailabilityState::Up) => AlertDecision::AlertRecovered,
        _ => AlertDecision::NoAlert,
    }
}
