//! Community events calendar: per-day grouping and month grids.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Weeks shown in a month grid.
pub const GRID_WEEKS: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
}

/// Events keyed by day; within a day all-day events first, then by start time and title.
pub fn group_events_by_date(events: &[Event]) -> BTreeMap<NaiveDate, Vec<&Event>> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&Event>> = BTreeMap::new();
    for event in events {
        by_date.entry(event.date).or_default().push(event);
    }
    for day in by_date.values_mut() {
        day.sort_by(|left, right| {
            left.start_time
                .cmp(&right.start_time)
                .then_with(|| left.title.cmp(&right.title))
        });
    }
    by_date
}

/// Events on or after `today`, soonest first.
pub fn upcoming(events: &[Event], today: NaiveDate, limit: usize) -> Vec<&Event> {
    group_events_by_date(events)
        .range(today..)
        .flat_map(|(_, day)| day.iter().copied())
        .take(limit)
        .collect()
}

pub fn find_event<'a>(events: &'a [Event], slug: &str) -> Result<&'a Event> {
    events
        .iter()
        .find(|event| event.slug == slug)
        .ok_or_else(|| Error::not_found("event", slug))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<[CalendarDay; 7]>,
}

impl MonthGrid {
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.weeks.iter().flat_map(|week| week.iter())
    }
}

/// Six full weeks covering `year-month`, starting on `week_start`.
///
/// Months whose grid would run past the range chrono can represent are
/// rejected like any other invalid month.
pub fn month_grid(year: i32, month: u32, week_start: Weekday, today: NaiveDate) -> Result<MonthGrid> {
    let invalid = || Error::InvalidArgument(format!("invalid calendar month {year}-{month:02}"));
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let lead = (7 + first.weekday().num_days_from_monday()
        - week_start.num_days_from_monday())
        % 7;
    let start = first
        .checked_sub_signed(Duration::days(i64::from(lead)))
        .ok_or_else(invalid)?;

    let mut weeks = Vec::with_capacity(GRID_WEEKS);
    for week_index in 0..GRID_WEEKS {
        let mut week = [CalendarDay {
            date: start,
            in_month: false,
            is_today: false,
        }; 7];
        for (offset, slot) in week.iter_mut().enumerate() {
            let days = (week_index * 7 + offset) as i64;
            let date = start
                .checked_add_signed(Duration::days(days))
                .ok_or_else(invalid)?;
            *slot = CalendarDay {
                date,
                in_month: date.month() == month && date.year() == year,
                is_today: date == today,
            };
        }
        weeks.push(week);
    }
    Ok(MonthGrid { year, month, weeks })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(slug: &str, date: (i32, u32, u32), start: Option<(u32, u32)>) -> Event {
        Event {
            id: slug.to_string(),
            slug: slug.to_string(),
            title: slug.to_string(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            start_time: start.map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0).unwrap()),
            end_time: None,
            location: String::new(),
            category: String::new(),
        }
    }

    #[test]
    fn groups_by_day_and_orders_within_day() {
        let events = vec![
            event("yoga", (2024, 6, 2), Some((9, 0))),
            event("market", (2024, 6, 1), Some((10, 0))),
            event("movie", (2024, 6, 2), Some((19, 30))),
            event("cleanup", (2024, 6, 2), None),
        ];
        let grouped = group_events_by_date(&events);
        let days: Vec<NaiveDate> = grouped.keys().copied().collect();
        assert_eq!(days.len(), 2);
        let june2: Vec<&str> = grouped[&days[1]].iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(june2, vec!["cleanup", "yoga", "movie"]);
    }

    #[test]
    fn upcoming_skips_past_days() {
        let events = vec![
            event("past", (2024, 5, 30), None),
            event("soon", (2024, 6, 1), None),
            event("later", (2024, 6, 9), None),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let slugs: Vec<&str> = upcoming(&events, today, 5).iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["soon", "later"]);
        assert_eq!(upcoming(&events, today, 1).len(), 1);
    }

    #[test]
    fn month_grid_covers_month_from_week_start() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        // June 2024 starts on a Saturday.
        let grid = month_grid(2024, 6, Weekday::Sun, today).unwrap();
        assert_eq!(grid.weeks.len(), GRID_WEEKS);
        let first = grid.weeks[0][0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 5, 26).unwrap());
        assert!(!first.in_month);
        assert_eq!(grid.weeks[0][6].date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(grid.days().filter(|d| d.in_month).count(), 30);
        assert_eq!(grid.days().filter(|d| d.is_today).count(), 1);
        for week in &grid.weeks {
            assert_eq!(week[0].date.weekday(), Weekday::Sun);
        }
    }

    #[test]
    fn month_grid_monday_start_when_month_begins_monday() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let grid = month_grid(2024, 1, Weekday::Mon, today).unwrap();
        assert_eq!(grid.weeks[0][0].date, today);
        assert!(grid.weeks[0][0].is_today);
    }

    #[test]
    fn invalid_month_is_rejected() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(matches!(
            month_grid(2024, 13, Weekday::Sun, today),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn months_at_the_edge_of_the_date_range_are_rejected() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(matches!(
            month_grid(NaiveDate::MAX.year(), 12, Weekday::Sun, today),
            Err(Error::InvalidArgument(_))
        ));
        // Starting the week the day after MIN's weekday forces six lead days.
        let earliest = NaiveDate::MIN;
        assert!(matches!(
            month_grid(earliest.year(), earliest.month(), earliest.weekday().succ(), today),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn unknown_slug_is_not_found() {
        let events = vec![event("market", (2024, 6, 1), None)];
        assert!(find_event(&events, "market").is_ok());
        assert!(matches!(
            find_event(&events, "gala"),
            Err(Error::NotFound { kind: "event", .. })
        ));
    }
}
