//! In-memory event collection backed by a [`KeyValueStore`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{CalGridError, CalGridResult};
use crate::event::{self, Event, EventColor};
use crate::storage::KeyValueStore;

/// Storage key holding the JSON array of events.
pub const STORAGE_KEY: &str = "calendarEvents";

/// Shape of a persisted record before it is trusted.
///
/// Time fields are only required for timed events, so they're read loosely
/// and checked in [`StoredEvent::into_event`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEvent {
    id: String,
    name: String,
    all_day: bool,
    start_time: Option<Value>,
    end_time: Option<Value>,
    color: EventColor,
    date: NaiveDate,
}

impl StoredEvent {
    fn into_event(self, index: usize) -> CalGridResult<Event> {
        let (start_time, end_time) = if self.all_day {
            (String::new(), String::new())
        } else {
            match (self.start_time, self.end_time) {
                (Some(Value::String(start)), Some(Value::String(end))) => (start, end),
                _ => {
                    return Err(CalGridError::Validation(format!(
                        "record {} ({}) is timed but lacks string startTime/endTime",
                        index, self.id
                    )));
                }
            }
        };

        Ok(Event {
            id: self.id,
            name: self.name,
            all_day: self.all_day,
            start_time,
            end_time,
            color: self.color,
            date: self.date,
        })
    }
}

/// Ordered event collection. Every mutation keeps the collection sorted
/// with [`event::compare`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from events in any order.
    pub fn from_events(mut events: Vec<Event>) -> Self {
        events.sort_by(event::compare);
        EventStore { events }
    }

    /// Hydrate from storage.
    ///
    /// A missing key gives an empty store. If the stored value fails to parse
    /// or any single record is malformed, the whole collection is discarded
    /// and an empty store is returned; the reason is logged only.
    pub fn load(storage: &dyn KeyValueStore) -> Self {
        let raw = match storage.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::new(),
            Err(err) => {
                tracing::error!(error = %err, "Error loading events from storage");
                return Self::new();
            }
        };

        match Self::parse(&raw) {
            Ok(events) => {
                tracing::debug!(count = events.len(), "Loaded events from storage");
                EventStore { events }
            }
            Err(err) => {
                tracing::warn!(error = %err, "Invalid event data found in storage, discarding");
                Self::new()
            }
        }
    }

    /// Parse and validate a persisted JSON array. Stored order is kept.
    pub fn parse(raw: &str) -> CalGridResult<Vec<Event>> {
        let records: Vec<StoredEvent> = serde_json::from_str(raw)?;
        records
            .into_iter()
            .enumerate()
            .map(|(i, record)| record.into_event(i))
            .collect()
    }

    pub fn to_json(&self) -> CalGridResult<String> {
        Ok(serde_json::to_string(&self.events)?)
    }

    /// Write the collection immediately, bypassing any debouncing.
    pub fn save(&self, storage: &dyn KeyValueStore) -> CalGridResult<()> {
        storage.set(STORAGE_KEY, &self.to_json()?)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Events on `date`, in collection order.
    pub fn events_on(&self, date: NaiveDate) -> Vec<&Event> {
        self.events.iter().filter(|e| e.date == date).collect()
    }

    /// A new id derived from `now` in epoch milliseconds, bumped past any
    /// id already in use.
    pub fn fresh_id(&self, now: DateTime<Utc>) -> String {
        let mut millis = now.timestamp_millis();
        while self.get(&millis.to_string()).is_some() {
            millis += 1;
        }
        millis.to_string()
    }

    pub fn add(&mut self, event: Event) -> CalGridResult<()> {
        if self.get(&event.id).is_some() {
            return Err(CalGridError::Validation(format!(
                "an event with id '{}' already exists",
                event.id
            )));
        }
        self.events.push(event);
        self.events.sort_by(event::compare);
        Ok(())
    }

    /// Replace the event with the same id and re-sort.
    pub fn update(&mut self, updated: Event) -> CalGridResult<()> {
        let slot = self
            .events
            .iter_mut()
            .find(|e| e.id == updated.id)
            .ok_or_else(|| CalGridError::EventNotFound(updated.id.clone()))?;
        *slot = updated;
        self.events.sort_by(event::compare);
        Ok(())
    }

    /// Remove by id. The remaining events keep their relative order.
    pub fn delete(&mut self, id: &str) -> CalGridResult<Event> {
        let index = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| CalGridError::EventNotFound(id.to_string()))?;
        Ok(self.events.remove(index))
    }
}
