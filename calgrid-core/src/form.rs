//! Add/edit form state and validation.

use chrono::NaiveDate;
use thiserror::Error;

use crate::clock;
use crate::event::{Event, EventColor};

/// Validation failures, in the order they are checked. The `Display`
/// text is what the form shows.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    #[error("Event name is required.")]
    NameRequired,

    #[error("Invalid time format. Use HH:MM.")]
    InvalidTimeFormat,

    #[error("Start time must be before end time.")]
    StartNotBeforeEnd,
}

/// Form fields. Times are 24-hour `HH:MM` as typed into a time input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventForm {
    pub name: String,
    pub all_day: bool,
    pub start_time: String,
    pub end_time: String,
    pub color: EventColor,
}

impl EventForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fill from an existing event, converting stored times to 24-hour.
    pub fn from_event(event: &Event) -> Self {
        EventForm {
            name: event.name.clone(),
            all_day: event.all_day,
            start_time: clock::to_24_hour(&event.start_time),
            end_time: clock::to_24_hour(&event.end_time),
            color: event.color,
        }
    }

    pub fn toggle_all_day(&mut self) {
        self.all_day = !self.all_day;
    }

    /// First failing rule wins.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::NameRequired);
        }
        if self.all_day {
            return Ok(());
        }
        if !clock::is_hh_mm(&self.start_time) || !clock::is_hh_mm(&self.end_time) {
            return Err(FormError::InvalidTimeFormat);
        }
        match (
            clock::minutes_since_midnight(&self.start_time),
            clock::minutes_since_midnight(&self.end_time),
        ) {
            (Some(start), Some(end)) if start < end => Ok(()),
            (Some(_), Some(_)) => Err(FormError::StartNotBeforeEnd),
            _ => Err(FormError::InvalidTimeFormat),
        }
    }

    /// Validate and produce the event to store.
    pub fn build(&self, id: String, date: NaiveDate) -> Result<Event, FormError> {
        self.validate()?;
        let (start_time, end_time) = if self.all_day {
            (String::new(), String::new())
        } else {
            (
                clock::to_am_pm(&self.start_time),
                clock::to_am_pm(&self.end_time),
            )
        };
        Ok(Event {
            id,
            name: self.name.clone(),
            all_day: self.all_day,
            start_time,
            end_time,
            color: self.color,
            date,
        })
    }
}
