//! cgrs calendar command implementation
//!
//! Month grids follow `calendar.week_start`; events are listed per day with
//! any RSVP the resident has recorded.

use std::path::PathBuf;

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;

use crate::calendar::{find_event, group_events_by_date, month_grid, CalendarDay, Event};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::rsvp::{RsvpRecord, RsvpStore};

pub struct MonthOptions {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct EventOptions {
    pub slug: String,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventEntry<'a> {
    event: &'a Event,
    #[serde(skip_serializing_if = "Option::is_none")]
    rsvp: Option<RsvpRecord>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DayEntry<'a> {
    date: NaiveDate,
    events: Vec<EventEntry<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MonthReport<'a> {
    year: i32,
    month: u32,
    week_start: String,
    weeks: &'a [[CalendarDay; 7]],
    days: Vec<DayEntry<'a>>,
}

pub fn run_month(options: MonthOptions) -> Result<()> {
    let storage = super::open_storage(options.dir.as_deref());
    let week_start = storage.config().calendar.week_start()?;
    let events = storage.load_events()?;
    let rsvps = storage.open_rsvps()?;

    let today = Local::now().date_naive();
    let year = options.year.unwrap_or_else(|| today.year());
    let month = options.month.unwrap_or_else(|| today.month());
    let grid = month_grid(year, month, week_start, today)?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::InvalidArgument(format!("invalid calendar month {year}-{month:02}")))?;

    let by_date = group_events_by_date(&events);
    let days: Vec<DayEntry<'_>> = by_date
        .iter()
        .filter(|(date, _)| date.year() == year && date.month() == month)
        .map(|(date, day)| DayEntry {
            date: *date,
            events: day.iter().copied().map(|event| entry(event, &rsvps)).collect(),
        })
        .collect();

    let mut human = HumanOutput::new(format!("cgrs calendar: {}", first.format("%B %Y")));
    human.push_summary("events", days.iter().map(|day| day.events.len()).sum::<usize>().to_string());
    human.push_detail(weekday_header(&grid.weeks[0]));
    for week in &grid.weeks {
        human.push_detail(format_week(week, |date| by_date.contains_key(&date)));
    }
    for day in &days {
        for item in &day.events {
            human.push_detail(format_event_line(item));
        }
    }
    if !days.is_empty() {
        human.push_next_step("cgrs calendar event <slug>");
    }

    let report = MonthReport {
        year,
        month,
        week_start: week_start.to_string(),
        weeks: &grid.weeks,
        days,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "calendar month",
        &report,
        Some(&human),
    )
}

pub fn run_event(options: EventOptions) -> Result<()> {
    let storage = super::open_storage(options.dir.as_deref());
    let events = storage.load_events()?;
    let rsvps = storage.open_rsvps()?;
    let event = find_event(&events, &options.slug)?;
    let item = entry(event, &rsvps);

    let mut human = HumanOutput::new(format!("cgrs event: {}", event.title));
    human.push_summary("date", event.date.format("%A, %B %-d, %Y").to_string());
    if let Some(start) = event.start_time {
        let time = match event.end_time {
            Some(end) => format!("{} - {}", start.format("%H:%M"), end.format("%H:%M")),
            None => start.format("%H:%M").to_string(),
        };
        human.push_summary("time", time);
    }
    if !event.location.is_empty() {
        human.push_summary("location", event.location.clone());
    }
    if !event.category.is_empty() {
        human.push_summary("category", event.category.clone());
    }
    match &item.rsvp {
        Some(record) => human.push_summary("rsvp", record.status.to_string()),
        None => human.push_next_step(format!("cgrs rsvp set {} --status attending", event.id)),
    }
    if !event.description.is_empty() {
        human.push_detail(event.description.clone());
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "calendar event",
        &item,
        Some(&human),
    )
}

fn entry<'a>(event: &'a Event, rsvps: &RsvpStore) -> EventEntry<'a> {
    EventEntry {
        event,
        rsvp: rsvps.get(&event.id).copied(),
    }
}

fn weekday_header(week: &[CalendarDay; 7]) -> String {
    week.iter()
        .map(|day| format!("{:>4}", &day.date.weekday().to_string()[..2]))
        .collect()
}

/// One grid row: out-of-month days in parentheses, `*` marks today, `+` a day with events.
fn format_week(week: &[CalendarDay; 7], has_events: impl Fn(NaiveDate) -> bool) -> String {
    week.iter()
        .map(|day| {
            let number = if day.in_month {
                day.date.day().to_string()
            } else {
                format!("({})", day.date.day())
            };
            let mark = if day.is_today {
                "*"
            } else if has_events(day.date) {
                "+"
            } else {
                " "
            };
            format!("{number:>3}{mark}")
        })
        .collect()
}

fn format_event_line(item: &EventEntry<'_>) -> String {
    let event = item.event;
    let when = event
        .start_time
        .map(|start| format!("{} {}", event.date, start.format("%H:%M")))
        .unwrap_or_else(|| format!("{} all day", event.date));
    let mut line = format!("{when} {} ({})", event.title, event.slug);
    if let Some(record) = &item.rsvp {
        line.push_str(&format!(" [{}]", record.status));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn week_row_marks_today_events_and_padding() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let grid = month_grid(2024, 6, Weekday::Sun, today).unwrap();
        let event_day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let first = format_week(&grid.weeks[0], |date| date == event_day);
        assert!(first.starts_with("(26) "));
        assert!(first.ends_with("  1+"));
        let second = format_week(&grid.weeks[1], |_| false);
        assert!(second.contains("  3*"));
    }

    #[test]
    fn header_uses_week_start() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let grid = month_grid(2024, 6, Weekday::Mon, today).unwrap();
        assert!(weekday_header(&grid.weeks[0]).trim_start().starts_with("Mo"));
    }
}
