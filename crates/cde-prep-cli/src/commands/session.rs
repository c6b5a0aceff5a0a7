//! Interactive scheduling session.
//!
//! Events live in an [`EventStore`] owned by the session and are gone when
//! it ends. `add` walks through the entry form one field at a time.

use std::io::{self, BufRead, Write};

use chrono::{Local, NaiveDate};
use clap::Args;
use cde_prep_core::{
    CalendarLinkBuilder, Config, EventStore, FormController, FormField, LinkError,
    ScheduledEvent,
};

use super::render_phases;

#[derive(Args)]
pub struct SessionArgs {
    /// Anchor date for calendar links (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

pub fn run(args: SessionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(&config, stdin.lock(), stdout.lock())?.with_date(args.date);
    session.run()?;
    Ok(())
}

const HELP: &str = "\
Commands:
  add            enter a new event
  list           show scheduled events
  delete <n>     remove event number n
  link <n>       print a Google Calendar link for event n
  open <n>       open that link in your browser
  help           show this help
  quit           end the session (events are not saved)
";

enum Flow {
    Continue,
    Quit,
}

type Opener = Box<dyn FnMut(&str) -> io::Result<()>>;

pub struct Session<R, W> {
    input: R,
    output: W,
    form: FormController,
    store: EventStore,
    links: CalendarLinkBuilder,
    date: Option<NaiveDate>,
    opener: Opener,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(config: &Config, input: R, output: W) -> Result<Self, LinkError> {
        Ok(Self {
            input,
            output,
            form: FormController::from_config(config),
            store: EventStore::new(),
            links: config.calendar_link_builder()?,
            date: None,
            opener: Box::new(|url: &str| open::that(url)),
        })
    }

    /// Pin calendar links to `date` instead of today.
    pub fn with_date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    #[cfg(test)]
    fn with_opener(mut self, opener: Opener) -> Self {
        self.opener = opener;
        self
    }

    #[cfg(test)]
    fn store(&self) -> &EventStore {
        &self.store
    }

    /// Read commands until `quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "CDE Prep. Type `help` for commands.")?;
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                break;
            };
            if let Flow::Quit = self.dispatch(line.trim())? {
                break;
            }
        }
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn dispatch(&mut self, line: &str) -> io::Result<Flow> {
        let (command, arg) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(c, a)| (c, a.trim()));
        match command {
            "" => {}
            "add" => self.add()?,
            "list" | "ls" => self.list()?,
            "delete" | "rm" => self.delete(arg)?,
            "link" => self.link(arg, false)?,
            "open" => self.link(arg, true)?,
            "help" | "?" => write!(self.output, "{HELP}")?,
            "quit" | "exit" | "q" => return Ok(Flow::Quit),
            other => writeln!(self.output, "unknown command: {other} (try `help`)")?,
        }
        Ok(Flow::Continue)
    }

    fn add(&mut self) -> io::Result<()> {
        for field in FormField::ALL {
            loop {
                if field.is_numeric() {
                    write!(self.output, "{} [{}]: ", field.label(), self.form.form().value(field))?;
                } else {
                    write!(self.output, "{}: ", field.label())?;
                }
                self.output.flush()?;

                let Some(raw) = self.read_line()? else {
                    writeln!(self.output)?;
                    writeln!(self.output, "cancelled")?;
                    self.form.reset();
                    return Ok(());
                };
                // Blank keeps the current duration.
                if field.is_numeric() && raw.trim().is_empty() {
                    break;
                }
                match self.form.set_field(field, &raw) {
                    Ok(()) => break,
                    Err(e) => writeln!(self.output, "error: {e}")?,
                }
            }
        }

        match self.form.submit(&mut self.store) {
            Ok(id) => {
                if let Some(event) = self.store.get(id) {
                    writeln!(
                        self.output,
                        "Added {} (start grooming at {})",
                        event.event_name(),
                        event.grooming_start()
                    )?;
                }
            }
            Err(e) => writeln!(self.output, "error: {e}")?,
        }
        Ok(())
    }

    fn list(&mut self) -> io::Result<()> {
        if self.store.is_empty() {
            writeln!(self.output, "No events scheduled yet. Add your first event with `add`.")?;
            return Ok(());
        }
        for (i, event) in self.store.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, event.event_name())?;
            write!(self.output, "{}", render_phases(event, "   "))?;
        }
        Ok(())
    }

    fn delete(&mut self, arg: &str) -> io::Result<()> {
        let Some(id) = select(&self.store, arg).map(ScheduledEvent::id) else {
            return writeln!(self.output, "no event '{arg}'");
        };
        if let Some(removed) = self.store.remove(id) {
            writeln!(self.output, "Deleted {}", removed.event_name())?;
        }
        Ok(())
    }

    fn link(&mut self, arg: &str, open: bool) -> io::Result<()> {
        let Some(event) = select(&self.store, arg) else {
            return writeln!(self.output, "no event '{arg}'");
        };
        let url = match self.date {
            Some(date) => self.links.build_link_on(event, date, &Local),
            None => self.links.build_link(event),
        };
        let url = match url {
            Ok(url) => url,
            Err(e) => return writeln!(self.output, "error: {e}"),
        };

        writeln!(self.output, "{url}")?;
        if open {
            if let Err(e) = (self.opener)(url.as_str()) {
                writeln!(self.output, "error: could not open browser: {e}")?;
            }
        }
        Ok(())
    }
}

/// Event by 1-based list number or by id.
fn select<'a>(store: &'a EventStore, arg: &str) -> Option<&'a ScheduledEvent> {
    if let Ok(n) = arg.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| store.nth(i));
    }
    arg.parse().ok().and_then(|id| store.get(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::rc::Rc;

    fn run_script(script: &str) -> (String, EventStore) {
        let mut output = Vec::new();
        let store = {
            let mut session =
                Session::new(&Config::default(), Cursor::new(script.to_string()), &mut output)
                    .unwrap()
                    .with_date(NaiveDate::from_ymd_opt(2025, 5, 17));
            session.run().unwrap();
            session.store().clone()
        };
        (String::from_utf8(output).unwrap(), store)
    }

    #[test]
    fn add_then_list_shows_derived_times() {
        let (out, store) = run_script("add\nDressage Test A\n10:00\n\n\n\nlist\nquit\n");
        assert_eq!(store.len(), 1);
        assert!(out.contains("Added Dressage Test A (start grooming at 09:10)"));
        assert!(out.contains("1. Dressage Test A"));
        assert!(out.contains("   Warm Up   09:30 (30 min)"));
        assert!(out.contains("Warm-up (min) [30]: "));
    }

    #[test]
    fn add_with_custom_durations_wraps_midnight() {
        let (out, store) = run_script("add\nMarathon\n00:15\n30\n0\n0\n");
        let event = store.nth(0).unwrap();
        assert_eq!(event.warm_up_start().to_string(), "23:45");
        assert!(out.contains("start grooming at 23:45"));
    }

    #[test]
    fn unparseable_duration_keeps_default() {
        let (_, store) = run_script("add\nCones\n14:00\nlots\n\n\n");
        assert_eq!(store.nth(0).unwrap().durations().warm_up, 30);
    }

    #[test]
    fn empty_name_reports_error_and_adds_nothing() {
        let (out, store) = run_script("add\n\n10:00\n\n\n\nlist\n");
        assert!(store.is_empty());
        assert!(out.contains("error: Please enter event name"));
        assert!(out.contains("No events scheduled yet"));
    }

    #[test]
    fn eof_during_add_cancels() {
        let (out, store) = run_script("add\nDressage\n");
        assert!(store.is_empty());
        assert!(out.contains("cancelled"));
    }

    #[test]
    fn delete_by_number_and_unknown() {
        let script = "add\nA\n09:00\n\n\n\nadd\nB\n11:00\n\n\n\ndelete 1\ndelete 7\ndelete x\nlist\n";
        let (out, store) = run_script(script);
        assert_eq!(store.len(), 1);
        assert_eq!(store.nth(0).unwrap().event_name(), "B");
        assert!(out.contains("Deleted A"));
        assert!(out.contains("no event '7'"));
        assert!(out.contains("no event 'x'"));
    }

    #[test]
    fn link_prints_calendar_url_for_pinned_date() {
        let (out, _) = run_script("add\nDressage Test A\n10:00\n\n\n\nlink 1\n");
        let line = out
            .lines()
            .find(|l| l.contains("google.com/calendar/render"))
            .unwrap();
        assert!(line.contains("action=TEMPLATE"));
        assert!(line.contains("text=Dressage+Test+A"));
        assert!(line.contains("dates=2025051"));
    }

    #[test]
    fn open_hands_url_to_opener() {
        let opened = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = Rc::clone(&opened);
        let mut output = Vec::new();
        let script = "add\nCones\n15:00\n\n\n\nopen 1\nopen 2\n";
        let mut session = Session::new(&Config::default(), Cursor::new(script), &mut output)
            .unwrap()
            .with_opener(Box::new(move |url: &str| {
                sink.borrow_mut().push(url.to_string());
                Ok(())
            }));
        session.run().unwrap();
        drop(session);
        assert_eq!(opened.borrow().len(), 1);
        assert!(opened.borrow()[0].starts_with("https://www.google.com/calendar/render?"));
        assert!(String::from_utf8(output).unwrap().contains("no event '2'"));
    }

    #[test]
    fn unknown_command_and_help() {
        let (out, _) = run_script("frobnicate\nhelp\n");
        assert!(out.contains("unknown command: frobnicate"));
        assert!(out.contains("delete <n>"));
    }

    #[test]
    fn select_accepts_id() {
        let mut store = EventStore::new();
        let event = ScheduledEvent::new("A", "10:00".parse().unwrap(), Default::default());
        let id = event.id();
        store.add(event);
        assert_eq!(select(&store, &id.to_string()).unwrap().id(), id);
        assert!(select(&store, "0").is_none());
    }
}
