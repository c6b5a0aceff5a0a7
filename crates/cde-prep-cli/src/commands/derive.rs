use clap::Args;
use cde_prep_core::{Config, DerivedTimes, PrepDurations, ScheduledEvent, TimeOfDay};
use serde::Serialize;

use super::{render_phases, DurationArgs};

#[derive(Args)]
pub struct DeriveArgs {
    /// Event start time (HH:MM, 24-hour)
    pub event_time: String,
    #[command(flatten)]
    pub durations: DurationArgs,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct DeriveOutput {
    event_time: TimeOfDay,
    durations: PrepDurations,
    #[serde(flatten)]
    times: DerivedTimes,
}

pub fn run(args: DeriveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let event_time: TimeOfDay = args.event_time.parse()?;
    let durations = args.durations.resolve(&config);

    if args.json {
        let output = DeriveOutput {
            event_time,
            durations,
            times: cde_prep_core::derive(event_time, durations),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let event = ScheduledEvent::new(String::new(), event_time, durations);
        print!("{}", render_phases(&event, ""));
    }
    Ok(())
}
