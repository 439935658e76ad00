//! Calendar event types.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock;

/// Display color of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventColor {
    Red,
    #[default]
    Blue,
    Green,
}

impl EventColor {
    pub const ALL: [EventColor; 3] = [EventColor::Red, EventColor::Blue, EventColor::Green];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventColor::Red => "red",
            EventColor::Blue => "blue",
            EventColor::Green => "green",
        }
    }
}

impl fmt::Display for EventColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventColor::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown color '{}'. Expected red, blue or green", s))
    }
}

/// A single calendar event on one day.
///
/// Timed events carry `start_time`/`end_time` in `"HH:MM AM/PM"` form;
/// all-day events leave both empty. Serialized with camelCase keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub all_day: bool,
    pub start_time: String,
    pub end_time: String,
    pub color: EventColor,
    pub date: NaiveDate,
}

impl Event {
    pub fn new_all_day(
        id: impl Into<String>,
        name: impl Into<String>,
        date: NaiveDate,
        color: EventColor,
    ) -> Self {
        Event {
            id: id.into(),
            name: name.into(),
            all_day: true,
            start_time: String::new(),
            end_time: String::new(),
            color,
            date,
        }
    }

    /// Build a timed event. Times may be given in either clock form and are
    /// stored as `"HH:MM AM/PM"`.
    pub fn new_timed(
        id: impl Into<String>,
        name: impl Into<String>,
        date: NaiveDate,
        start: &str,
        end: &str,
        color: EventColor,
    ) -> Self {
        Event {
            id: id.into(),
            name: name.into(),
            all_day: false,
            start_time: clock::to_am_pm(&clock::to_24_hour(start)),
            end_time: clock::to_am_pm(&clock::to_24_hour(end)),
            color,
            date,
        }
    }

    /// Date key in `YYYY-MM-DD` form.
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn start_minutes(&self) -> Option<u32> {
        clock::minutes_since_midnight(&self.start_time)
    }

    /// Check the time invariant: timed events need both times with start < end.
    pub fn has_valid_times(&self) -> bool {
        if self.all_day {
            return true;
        }
        match (
            clock::minutes_since_midnight(&self.start_time),
            clock::minutes_since_midnight(&self.end_time),
        ) {
            (Some(start), Some(end)) => start < end,
            _ => false,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.all_day {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} - {} {}", self.start_time, self.end_time, self.name)
        }
    }
}

/// Ordering used for every stored collection: all-day events first, then
/// timed events by start time. Equal keys compare equal so a stable sort
/// keeps their insertion order.
pub fn compare(a: &Event, b: &Event) -> Ordering {
    match (a.all_day, b.all_day) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => Ordering::Equal,
        (false, false) => a.start_minutes().cmp(&b.start_minutes()),
    }
}
