//! Wall-clock time of day with minute precision.
//!
//! `TimeOfDay` carries no date. Arithmetic wraps around midnight without
//! reporting a day change, so `00:15 - 30min` is `23:45`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TimeParseError;

pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Minutes since midnight, always in `0..MINUTES_PER_DAY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Build from any minute offset, wrapping modulo 24h.
    pub fn from_minutes_wrapping(minutes: i64) -> Self {
        Self(minutes.rem_euclid(MINUTES_PER_DAY) as u16)
    }

    pub fn hour(self) -> u32 {
        u32::from(self.0) / 60
    }

    pub fn minute(self) -> u32 {
        u32::from(self.0) % 60
    }

    pub fn minutes_since_midnight(self) -> u32 {
        u32::from(self.0)
    }

    /// Subtract `minutes`, wrapping to the previous day's clock time if needed.
    pub fn minus(self, minutes: i64) -> Self {
        Self::from_minutes_wrapping(i64::from(self.0) - minutes.rem_euclid(MINUTES_PER_DAY))
    }

    /// Add `minutes`, wrapping past midnight.
    pub fn plus(self, minutes: i64) -> Self {
        Self::from_minutes_wrapping(i64::from(self.0) + minutes.rem_euclid(MINUTES_PER_DAY))
    }

    pub fn to_naive_time(self) -> NaiveTime {
        // hour/minute are in range by construction
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or(NaiveTime::MIN)
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(t: NaiveTime) -> Self {
        use chrono::Timelike;
        Self((t.hour() * 60 + t.minute()) as u16)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

fn two_digits(part: &str) -> Option<u32> {
    if part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit()) {
        part.parse().ok()
    } else {
        None
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    /// Accepts `HH:MM`, or `HH:MM:SS` with the seconds dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| TimeParseError {
            input: s.to_string(),
            reason,
        };

        let mut parts = s.trim().split(':');
        let hour = parts
            .next()
            .and_then(two_digits)
            .ok_or_else(|| err("expected HH:MM"))?;
        let minute = parts
            .next()
            .and_then(two_digits)
            .ok_or_else(|| err("expected HH:MM"))?;
        if let Some(seconds) = parts.next() {
            match two_digits(seconds) {
                Some(sec) if sec < 60 => {}
                _ => return Err(err("seconds must be two digits below 60")),
            }
        }
        if parts.next().is_some() {
            return Err(err("too many ':' separated fields"));
        }

        if hour >= 24 {
            return Err(err("hour must be below 24"));
        }
        if minute >= 60 {
            return Err(err("minute must be below 60"));
        }
        Ok(Self((hour * 60 + minute) as u16))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
