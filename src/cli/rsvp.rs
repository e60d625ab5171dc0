//! cgrs rsvp command implementation

use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;

use crate::calendar::Event;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::rsvp::{rsvp_key, RsvpRecord, RsvpStatus};

/// Options for `cgrs rsvp set` and `cgrs rsvp toggle`
pub struct SetOptions {
    pub event_id: String,
    pub status: String,
    pub toggle: bool,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ShowOptions {
    pub event_id: Option<String>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ClearOptions {
    pub event_id: String,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RsvpReport {
    event_id: String,
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rsvp: Option<RsvpRecord>,
}

impl RsvpReport {
    fn new(event_id: &str, rsvp: Option<RsvpRecord>) -> Self {
        Self {
            event_id: event_id.to_string(),
            key: rsvp_key(event_id),
            rsvp,
        }
    }
}

pub fn run_set(options: SetOptions) -> Result<()> {
    let status: RsvpStatus = options.status.parse()?;
    let storage = super::open_storage(options.dir.as_deref());
    let events = storage.load_events()?;
    let mut store = storage.open_rsvps_locked()?;

    let now = Utc::now();
    let rsvp = if options.toggle {
        store.toggle(&options.event_id, status, now)?
    } else {
        Some(store.set(&options.event_id, status, now)?)
    };

    let (command, header) = match (&rsvp, options.toggle) {
        (Some(record), true) => ("rsvp toggle", format!("cgrs rsvp: {}", record.status)),
        (None, _) => ("rsvp toggle", "cgrs rsvp: cleared".to_string()),
        (Some(record), false) => ("rsvp set", format!("cgrs rsvp: {}", record.status)),
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("event", event_label(&events, &options.event_id));
    if let Some(warning) = unknown_event_warning(&events, &options.event_id) {
        human.push_warning(warning);
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        command,
        &RsvpReport::new(&options.event_id, rsvp),
        Some(&human),
    )
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let storage = super::open_storage(options.dir.as_deref());
    let events = storage.load_events()?;
    let store = storage.open_rsvps()?;
    let output = OutputOptions {
        json: options.json,
        quiet: options.quiet,
    };

    if let Some(event_id) = options.event_id.as_deref() {
        let rsvp = store.get(event_id).copied();
        let header = match &rsvp {
            Some(record) => format!("cgrs rsvp: {}", record.status),
            None => "cgrs rsvp: none".to_string(),
        };
        let mut human = HumanOutput::new(header);
        human.push_summary("event", event_label(&events, event_id));
        if let Some(record) = &rsvp {
            human.push_summary("since", record.timestamp.to_rfc3339());
        } else {
            human.push_next_step(format!("cgrs rsvp set {event_id} --status attending"));
        }
        return emit_success(
            output,
            "rsvp show",
            &RsvpReport::new(event_id, rsvp),
            Some(&human),
        );
    }

    let reports: Vec<RsvpReport> = store
        .event_ids()
        .map(|event_id| RsvpReport::new(event_id, store.get(event_id).copied()))
        .collect();
    let mut human = HumanOutput::new(format!("cgrs rsvps: {}", reports.len()));
    for report in &reports {
        if let Some(record) = &report.rsvp {
            human.push_summary(event_label(&events, &report.event_id), record.status.to_string());
        }
    }
    emit_success(output, "rsvp show", &reports, Some(&human))
}

pub fn run_clear(options: ClearOptions) -> Result<()> {
    let storage = super::open_storage(options.dir.as_deref());
    let mut store = storage.open_rsvps_locked()?;
    let removed = store.clear(&options.event_id)?;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct ClearReport<'a> {
        event_id: &'a str,
        removed: bool,
    }

    let header = if removed {
        format!("cgrs rsvp cleared: {}", options.event_id)
    } else {
        format!("cgrs rsvp: nothing recorded for {}", options.event_id)
    };
    let human = HumanOutput::new(header);

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "rsvp clear",
        &ClearReport {
            event_id: &options.event_id,
            removed,
        },
        Some(&human),
    )
}

fn event_label(events: &[Event], event_id: &str) -> String {
    events
        .iter()
        .find(|event| event.id == event_id)
        .map(|event| format!("{} ({})", event.title, event.date))
        .unwrap_or_else(|| event_id.to_string())
}

/// Warn when events are known but none carries this id.
fn unknown_event_warning(events: &[Event], event_id: &str) -> Option<String> {
    if events.is_empty() || events.iter().any(|event| event.id == event_id) {
        return None;
    }
    Some(format!("no event with id '{event_id}' in the events list"))
}
