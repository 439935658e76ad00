//! Month navigation, day classification and accessible labels.

use chrono::{Months, NaiveDate};

use crate::error::{CalGridError, CalGridResult};
use crate::event::Event;
use crate::grid::{self, GridDay, MonthGrid};
use crate::overflow::DayEvents;

/// The month currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarView {
    current: NaiveDate,
}

impl CalendarView {
    pub fn new(current: NaiveDate) -> Self {
        CalendarView { current }
    }

    pub fn current(&self) -> NaiveDate {
        self.current
    }

    pub fn previous_month(&mut self) -> CalGridResult<()> {
        self.current = self
            .current
            .checked_sub_months(Months::new(1))
            .ok_or_else(|| CalGridError::Validation("no earlier month".into()))?;
        Ok(())
    }

    pub fn next_month(&mut self) -> CalGridResult<()> {
        self.current = self
            .current
            .checked_add_months(Months::new(1))
            .ok_or_else(|| CalGridError::Validation("no later month".into()))?;
        Ok(())
    }

    pub fn go_to_today(&mut self, today: NaiveDate) {
        self.current = today;
    }

    /// Header text, e.g. `"October 2026"`.
    pub fn title(&self) -> String {
        self.current.format("%B %Y").to_string()
    }

    pub fn grid(&self) -> CalGridResult<MonthGrid> {
        MonthGrid::for_date(self.current)
    }

    pub fn grid_label(&self) -> String {
        format!("Calendar for {}", self.title())
    }
}

/// Visual state of a day cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayKind {
    pub other_month: bool,
    pub past: bool,
    pub today: bool,
}

impl DayKind {
    pub fn classify(day: &GridDay, today: NaiveDate) -> Self {
        DayKind {
            other_month: !day.in_month,
            past: day.date < today,
            today: day.date == today,
        }
    }
}

fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Label of a day cell, e.g.
/// `"October 19, 2026, Today, 2 events. Click to add event."`.
pub fn day_label(date: NaiveDate, today: NaiveDate, event_count: usize) -> String {
    let mut label = long_date(date);
    if date == today {
        label.push_str(", Today");
    }
    match event_count {
        0 => {}
        1 => label.push_str(", 1 event"),
        n => label.push_str(&format!(", {} events", n)),
    }
    label.push_str(". Click to add event.");
    label
}

/// Label of an event button inside a day cell.
pub fn event_label(event: &Event) -> String {
    if event.all_day {
        return format!("{}, All day event", event.name);
    }
    let or_na = |t: &str| {
        if t.is_empty() {
            "N/A".to_string()
        } else {
            t.to_string()
        }
    };
    format!(
        "{}, From {} to {}",
        event.name,
        or_na(&event.start_time),
        or_na(&event.end_time)
    )
}

/// Label of an entry in the overflow list.
pub fn overflow_entry_label(event: &Event) -> String {
    if event.all_day {
        format!("{}, All day event", event.name)
    } else {
        format!("{}, Starts at {}", event.name, event.start_time)
    }
}

/// Label of the "+N More" control, when the day overflows.
pub fn more_button_label(day: &DayEvents<'_>) -> Option<String> {
    day.has_overflow()
        .then(|| format!("Show {} more events on {}", day.hidden, long_date(day.date)))
}

pub fn weekday_header(index: usize) -> Option<&'static str> {
    grid::WEEKDAY_LABELS.get(index).copied()
}
