//! Backward-chained phase start times.
//!
//! Phases run grooming → tacking → warm-up → test, each immediately after
//! the previous. Starting from the test time, subtract the durations in
//! reverse order.

use serde::{Deserialize, Serialize};

use crate::clock::TimeOfDay;
use crate::error::TimeParseError;
use crate::phase::{Phase, PrepDurations};

/// Start times derived from an event time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedTimes {
    pub grooming_start: TimeOfDay,
    pub tacking_start: TimeOfDay,
    pub warm_up_start: TimeOfDay,
    /// Same as the input event time.
    pub event_start: TimeOfDay,
}

impl DerivedTimes {
    pub fn start_of(&self, phase: Phase) -> TimeOfDay {
        match phase {
            Phase::Grooming => self.grooming_start,
            Phase::Tacking => self.tacking_start,
            Phase::WarmUp => self.warm_up_start,
        }
    }
}

/// Compute phase start times. Results wrap past midnight without a day indicator.
pub fn derive(event_time: TimeOfDay, durations: PrepDurations) -> DerivedTimes {
    let warm_up = i64::from(durations.warm_up);
    let tacking = i64::from(durations.tacking);
    let grooming = i64::from(durations.grooming);

    DerivedTimes {
        grooming_start: event_time.minus(warm_up + tacking + grooming),
        tacking_start: event_time.minus(warm_up + tacking),
        warm_up_start: event_time.minus(warm_up),
        event_start: event_time,
    }
}

/// [`derive`] for a raw `HH:MM` string.
pub fn derive_str(event_time: &str, durations: PrepDurations) -> Result<DerivedTimes, TimeParseError> {
    Ok(derive(event_time.parse()?, durations))
}
