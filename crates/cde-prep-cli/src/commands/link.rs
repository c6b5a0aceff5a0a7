use chrono::{Local, NaiveDate};
use clap::Args;
use cde_prep_core::{Config, ScheduledEvent, TimeOfDay};
use tracing::debug;

use super::DurationArgs;

#[derive(Args)]
pub struct LinkArgs {
    /// Event name (calendar entry title)
    pub name: String,
    /// Event start time (HH:MM, 24-hour)
    pub event_time: String,
    #[command(flatten)]
    pub durations: DurationArgs,
    /// Anchor date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Open the link in the default browser
    #[arg(long)]
    pub open: bool,
}

pub fn run(args: LinkArgs) -> Result<(), Box<dyn std::error::Error>> {
    let name = args.name.trim();
    if name.is_empty() {
        return Err("Please enter event name".into());
    }
    let config = Config::load()?;
    let event_time: TimeOfDay = args.event_time.parse()?;
    let event = ScheduledEvent::new(name, event_time, args.durations.resolve(&config));

    let builder = config.calendar_link_builder()?;
    let url = match args.date {
        Some(date) => builder.build_link_on(&event, date, &Local)?,
        None => builder.build_link(&event)?,
    };

    println!("{url}");
    if args.open {
        debug!(%url, "opening calendar link");
        open::that(url.as_str())?;
    }
    Ok(())
}
