pub mod config;
pub mod derive;
pub mod link;
pub mod session;

use clap::Args;
use cde_prep_core::{Config, PrepDurations, ScheduledEvent};
use std::fmt::Write as _;

/// Phase durations; unset flags fall back to the configured defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct DurationArgs {
    /// Warm-up minutes
    #[arg(long)]
    pub warm_up: Option<u32>,
    /// Tacking minutes
    #[arg(long)]
    pub tacking: Option<u32>,
    /// Grooming minutes
    #[arg(long)]
    pub grooming: Option<u32>,
}

impl DurationArgs {
    pub fn resolve(&self, config: &Config) -> PrepDurations {
        let defaults = config.defaults.durations();
        PrepDurations::new(
            self.warm_up.unwrap_or(defaults.warm_up),
            self.tacking.unwrap_or(defaults.tacking),
            self.grooming.unwrap_or(defaults.grooming),
        )
    }
}

/// Phase table for one event, earliest first.
pub fn render_phases(event: &ScheduledEvent, indent: &str) -> String {
    let mut out = String::new();
    for (phase, start, minutes) in event.phases() {
        let _ = writeln!(out, "{indent}{:<9} {start} ({minutes} min)", phase.label());
    }
    let _ = writeln!(out, "{indent}{:<9} {}", "Event", event.event_start());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_flags_override_config_defaults() {
        let mut config = Config::default();
        config.set("defaults.tacking", "15").unwrap();
        let args = DurationArgs {
            warm_up: Some(20),
            ..DurationArgs::default()
        };
        assert_eq!(args.resolve(&config), PrepDurations::new(20, 15, 10));
    }

    #[test]
    fn phase_table_lists_every_phase() {
        let event = ScheduledEvent::new("Dressage", "10:00".parse().unwrap(), PrepDurations::default());
        assert_eq!(
            render_phases(&event, ""),
            "Grooming  09:10 (10 min)\nTacking   09:20 (10 min)\nWarm Up   09:30 (30 min)\nEvent     10:00\n"
        );
    }
}
