//! Event entry form.
//!
//! Holds raw user input until submission, then validates it, derives the
//! phase schedule and appends the new event to an [`EventStore`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::TimeOfDay;
use crate::error::ValidationError;
use crate::event::{EventId, ScheduledEvent};
use crate::phase::PrepDurations;
use crate::storage::Config;
use crate::store::EventStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    EventName,
    EventTime,
    WarmUpTime,
    TackingTime,
    GroomingTime,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::EventName,
        FormField::EventTime,
        FormField::WarmUpTime,
        FormField::TackingTime,
        FormField::GroomingTime,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FormField::EventName => "event_name",
            FormField::EventTime => "event_time",
            FormField::WarmUpTime => "warm_up_time",
            FormField::TackingTime => "tacking_time",
            FormField::GroomingTime => "grooming_time",
        }
    }

    /// Human-readable label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            FormField::EventName => "Event Name",
            FormField::EventTime => "Event Time",
            FormField::WarmUpTime => "Warm-up (min)",
            FormField::TackingTime => "Tacking (min)",
            FormField::GroomingTime => "Grooming (min)",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FormField::WarmUpTime | FormField::TackingTime | FormField::GroomingTime
        )
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| format!("unknown form field: {s}"))
    }
}

/// Raw form state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventForm {
    pub event_name: String,
    pub event_time: String,
    pub durations: PrepDurations,
}

impl EventForm {
    /// Blank name and time, durations set to `defaults`.
    pub fn blank(defaults: PrepDurations) -> Self {
        Self {
            event_name: String::new(),
            event_time: String::new(),
            durations: defaults,
        }
    }

    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::EventName => self.event_name.clone(),
            FormField::EventTime => self.event_time.clone(),
            FormField::WarmUpTime => self.durations.warm_up.to_string(),
            FormField::TackingTime => self.durations.tacking.to_string(),
            FormField::GroomingTime => self.durations.grooming.to_string(),
        }
    }
}

impl Default for EventForm {
    fn default() -> Self {
        Self::blank(PrepDurations::default())
    }
}

/// Gatekeeper between raw input and the event store.
#[derive(Debug, Clone)]
pub struct FormController {
    form: EventForm,
    defaults: PrepDurations,
    strict_numbers: bool,
}

impl FormController {
    pub fn new(defaults: PrepDurations) -> Self {
        Self {
            form: EventForm::blank(defaults),
            defaults,
            strict_numbers: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.defaults.durations()).with_strict_numbers(config.form.strict_numbers)
    }

    /// Reject unparseable numbers instead of keeping the previous value.
    pub fn with_strict_numbers(mut self, strict: bool) -> Self {
        self.strict_numbers = strict;
        self
    }

    pub fn form(&self) -> &EventForm {
        &self.form
    }

    /// Update one field from raw input.
    ///
    /// Numeric fields that do not parse as a non-negative whole number keep
    /// their previous value unless strict mode is on.
    pub fn set_field(&mut self, field: FormField, raw: &str) -> Result<(), ValidationError> {
        let slot = match field {
            FormField::EventName => {
                self.form.event_name = raw.to_string();
                return Ok(());
            }
            FormField::EventTime => {
                self.form.event_time = raw.to_string();
                return Ok(());
            }
            FormField::WarmUpTime => &mut self.form.durations.warm_up,
            FormField::TackingTime => &mut self.form.durations.tacking,
            FormField::GroomingTime => &mut self.form.durations.grooming,
        };

        match raw.trim().parse::<u32>() {
            Ok(minutes) => *slot = minutes,
            Err(_) if self.strict_numbers => {
                return Err(ValidationError::InvalidNumber {
                    field: field.name(),
                    value: raw.to_string(),
                });
            }
            Err(_) => {
                warn!(field = field.name(), value = raw, kept = *slot, "ignoring unparseable number");
            }
        }
        Ok(())
    }

    /// Validate, derive and append. On error the store and form are unchanged.
    pub fn submit(&mut self, store: &mut EventStore) -> Result<EventId, ValidationError> {
        let name = self.form.event_name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("event name"));
        }
        let time = self.form.event_time.trim();
        if time.is_empty() {
            return Err(ValidationError::MissingField("event time"));
        }
        let event_time: TimeOfDay = time.parse()?;

        let event = ScheduledEvent::new(name, event_time, self.form.durations);
        let id = event.id();
        debug!(%id, start = %event.grooming_start(), "form submitted");
        store.add(event);
        self.reset();
        Ok(id)
    }

    /// Blank name and time, default durations.
    pub fn reset(&mut self) {
        self.form = EventForm::blank(self.defaults);
    }
}

impl Default for FormController {
    fn default() -> Self {
        Self::new(PrepDurations::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(name: &str, time: &str) -> FormController {
        let mut form = FormController::default();
        form.set_field(FormField::EventName, name).unwrap();
        form.set_field(FormField::EventTime, time).unwrap();
        form
    }

    #[test]
    fn submit_appends_derived_event_and_resets() {
        let mut store = EventStore::new();
        let mut form = filled("Dressage Test A", "10:00");
        let id = form.submit(&mut store).unwrap();

        let event = store.get(id).unwrap();
        assert_eq!(event.event_name(), "Dressage Test A");
        assert_eq!(event.warm_up_start().to_string(), "09:30");
        assert_eq!(event.tacking_start().to_string(), "09:20");
        assert_eq!(event.grooming_start().to_string(), "09:10");
        assert_eq!(form.form(), &EventForm::default());
    }

    #[test]
    fn missing_name_leaves_store_unchanged() {
        let mut store = EventStore::new();
        let mut form = filled("   ", "10:00");
        let err = form.submit(&mut store).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("event name"));
        assert!(store.is_empty());
        assert_eq!(form.form().event_time, "10:00");
    }

    #[test]
    fn missing_time_leaves_store_unchanged() {
        let mut store = EventStore::new();
        let mut form = filled("Marathon", "");
        assert_eq!(
            form.submit(&mut store).unwrap_err(),
            ValidationError::MissingField("event time")
        );
        assert!(store.is_empty());
    }

    #[test]
    fn malformed_time_is_rejected() {
        let mut store = EventStore::new();
        let mut form = filled("Marathon", "noon");
        assert!(matches!(
            form.submit(&mut store),
            Err(ValidationError::InvalidTime(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn unparseable_number_keeps_prior_value() {
        let mut form = FormController::default();
        form.set_field(FormField::WarmUpTime, "45").unwrap();
        form.set_field(FormField::WarmUpTime, "forty").unwrap();
        form.set_field(FormField::TackingTime, "-5").unwrap();
        assert_eq!(form.form().durations.warm_up, 45);
        assert_eq!(form.form().durations.tacking, 10);
    }

    #[test]
    fn strict_mode_rejects_unparseable_number() {
        let mut form = FormController::default().with_strict_numbers(true);
        let err = form.set_field(FormField::GroomingTime, "abc").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidNumber {
                field: "grooming_time",
                value: "abc".into()
            }
        );
        assert_eq!(form.form().durations.grooming, 10);
    }

    #[test]
    fn reset_uses_configured_defaults() {
        let mut store = EventStore::new();
        let mut form = FormController::new(PrepDurations::new(20, 5, 15));
        form.set_field(FormField::EventName, "Cones").unwrap();
        form.set_field(FormField::EventTime, "15:00").unwrap();
        form.set_field(FormField::WarmUpTime, "40").unwrap();
        let id = form.submit(&mut store).unwrap();
        assert_eq!(store.get(id).unwrap().durations().warm_up, 40);
        assert_eq!(form.form().durations, PrepDurations::new(20, 5, 15));
        assert!(form.form().event_name.is_empty());
    }

    #[test]
    fn field_names_roundtrip() {
        for field in FormField::ALL {
            assert_eq!(field.name().parse::<FormField>().unwrap(), field);
        }
        assert!("eventName".parse::<FormField>().is_err());
    }
}
