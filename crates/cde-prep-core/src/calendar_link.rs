//! Google Calendar "add event" template links.
//!
//! No API call is made; the link opens the provider's event-creation page
//! pre-filled with the title, a per-phase description and a UTC time window.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use tracing::debug;
use url::Url;

use crate::error::LinkError;
use crate::event::ScheduledEvent;

pub const DEFAULT_CALENDAR_BASE_URL: &str = "https://www.google.com/calendar/render";
pub const DEFAULT_WINDOW_MINUTES: u32 = 60;

/// UTC basic format used by the `dates` parameter.
const DATES_FORMAT: &str = "%Y%m%dT%H%M%SZ";

#[derive(Debug, Clone)]
pub struct CalendarLinkBuilder {
    base_url: Url,
    window_minutes: u32,
}

impl CalendarLinkBuilder {
    pub fn new(base_url: &str) -> Result<Self, LinkError> {
        let base_url = Url::parse(base_url).map_err(|source| LinkError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            base_url,
            window_minutes: DEFAULT_WINDOW_MINUTES,
        })
    }

    /// Length of the exported calendar entry.
    pub fn with_window_minutes(mut self, minutes: u32) -> Self {
        self.window_minutes = minutes;
        self
    }

    pub fn window_minutes(&self) -> u32 {
        self.window_minutes
    }

    /// Link anchored on today's date in the local timezone.
    ///
    /// The date is taken at export time, not when the event was entered.
    pub fn build_link(&self, event: &ScheduledEvent) -> Result<Url, LinkError> {
        self.build_link_on(event, Local::now().date_naive(), &Local)
    }

    /// Link anchored on `date`, interpreting the event's wall-clock time in `tz`.
    pub fn build_link_on<Tz: TimeZone>(
        &self,
        event: &ScheduledEvent,
        date: NaiveDate,
        tz: &Tz,
    ) -> Result<Url, LinkError> {
        let (start, end) = self.window(event, date, tz)?;
        let dates = format!("{}/{}", start.format(DATES_FORMAT), end.format(DATES_FORMAT));

        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("action", "TEMPLATE")
            .append_pair("text", event.event_name())
            .append_pair("details", &details(event))
            .append_pair("dates", &dates);

        debug!(id = %event.id(), %dates, "calendar link built");
        Ok(url)
    }

    /// UTC bounds of the exported entry.
    pub fn window<Tz: TimeZone>(
        &self,
        event: &ScheduledEvent,
        date: NaiveDate,
        tz: &Tz,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>), LinkError> {
        let time = event.event_start();
        let local = date.and_time(time.to_naive_time());
        // A folded (repeated) local time resolves to the earlier instant.
        let start = tz
            .from_local_datetime(&local)
            .earliest()
            .ok_or(LinkError::NonexistentLocalTime { date, time })?
            .with_timezone(&Utc);
        let end = start + Duration::minutes(i64::from(self.window_minutes));
        Ok((start, end))
    }
}

impl Default for CalendarLinkBuilder {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_CALENDAR_BASE_URL)
                .expect("default calendar URL is a valid absolute URL"),
            window_minutes: DEFAULT_WINDOW_MINUTES,
        }
    }
}

/// Multi-line event description listing each phase.
pub fn details(event: &ScheduledEvent) -> String {
    let mut lines: Vec<String> = event
        .phases()
        .map(|(phase, start, minutes)| format!("{}: {} ({} min)", phase.label(), start, minutes))
        .collect();
    lines.push(format!("Event: {}", event.event_start()));
    lines.join("\n")
}
