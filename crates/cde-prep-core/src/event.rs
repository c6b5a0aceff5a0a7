use serde::Serialize;
use uuid::Uuid;

use crate::backchain::{derive, DerivedTimes};
use crate::clock::TimeOfDay;
use crate::phase::{Phase, PrepDurations};

/// Opaque identifier, only used as a key for deletion and rendering.
pub type EventId = Uuid;

/// A competition test (dressage, marathon, cones) with its derived
/// preparation schedule.
///
/// Immutable once created: derived times are computed in [`ScheduledEvent::new`]
/// and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledEvent {
    id: EventId,
    event_name: String,
    event_time: TimeOfDay,
    durations: PrepDurations,
    times: DerivedTimes,
}

impl ScheduledEvent {
    /// Create with a fresh id.
    pub fn new(event_name: impl Into<String>, event_time: TimeOfDay, durations: PrepDurations) -> Self {
        Self::with_id(Uuid::new_v4(), event_name, event_time, durations)
    }

    pub fn with_id(
        id: EventId,
        event_name: impl Into<String>,
        event_time: TimeOfDay,
        durations: PrepDurations,
    ) -> Self {
        Self {
            id,
            event_name: event_name.into(),
            event_time,
            durations,
            times: derive(event_time, durations),
        }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn event_time(&self) -> TimeOfDay {
        self.event_time
    }

    pub fn durations(&self) -> PrepDurations {
        self.durations
    }

    pub fn times(&self) -> &DerivedTimes {
        &self.times
    }

    pub fn event_start(&self) -> TimeOfDay {
        self.times.event_start
    }

    pub fn grooming_start(&self) -> TimeOfDay {
        self.times.grooming_start
    }

    pub fn tacking_start(&self) -> TimeOfDay {
        self.times.tacking_start
    }

    pub fn warm_up_start(&self) -> TimeOfDay {
        self.times.warm_up_start
    }

    /// `(phase, start, duration_min)` in chronological order.
    pub fn phases(&self) -> impl Iterator<Item = (Phase, TimeOfDay, u32)> + '_ {
        Phase::ALL
            .into_iter()
            .map(|p| (p, self.times.start_of(p), self.durations.get(p)))
    }
}
