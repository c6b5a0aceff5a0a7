//! # CDE Prep Core Library
//!
//! Business logic for the CDE Prep scheduler: given the time a driving test
//! starts and how long each preparation phase takes, work backwards to when
//! grooming, tacking up and warm-up must begin, and export the result to an
//! external calendar.
//!
//! The CLI is a thin layer over this crate. Nothing here performs I/O except
//! [`Config`] (TOML preferences) and whatever [`offline::Network`]
//! implementation the caller hands to the offline shell.
//!
//! ## Key Components
//!
//! - [`TimeOfDay`]: minute-precision wall-clock value with wraparound
//! - [`derive`]: backward-chained phase start computation
//! - [`CalendarLinkBuilder`]: Google Calendar template link export
//! - [`EventStore`]: in-memory ordered collection of scheduled events
//! - [`FormController`]: input validation and event creation
//! - [`OfflineShell`]: cache-first asset cache with offline fallback

pub mod clock;
pub mod phase;
pub mod backchain;
pub mod event;
pub mod store;
pub mod calendar_link;
pub mod form;
pub mod offline;
pub mod storage;
pub mod error;

pub use clock::{TimeOfDay, MINUTES_PER_DAY};
pub use phase::{Phase, PrepDurations};
pub use backchain::{derive, derive_str, DerivedTimes};
pub use event::{EventId, ScheduledEvent};
pub use store::EventStore;
pub use calendar_link::{CalendarLinkBuilder, DEFAULT_CALENDAR_BASE_URL};
pub use form::{EventForm, FormController, FormField};
pub use offline::{OfflineShell, ShellConfig};
pub use storage::Config;
pub use error::{
    ConfigError, LinkError, ShellError, TimeParseError, ValidationError,
};
