//! Per-day visible/overflow split.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::event::Event;
use crate::grid::MonthGrid;
use crate::store::EventStore;

/// Events shown directly in a day cell before the "+N More" control.
pub const MAX_VISIBLE_EVENTS: usize = 3;

/// The events of one day split for display in a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct DayEvents<'a> {
    pub date: NaiveDate,
    pub visible: Vec<&'a Event>,
    pub hidden: usize,
}

impl<'a> DayEvents<'a> {
    pub fn for_date(store: &'a EventStore, date: NaiveDate) -> Self {
        let mut visible = store.events_on(date);
        let hidden = visible.len().saturating_sub(MAX_VISIBLE_EVENTS);
        visible.truncate(MAX_VISIBLE_EVENTS);
        DayEvents {
            date,
            visible,
            hidden,
        }
    }

    pub fn total(&self) -> usize {
        self.visible.len() + self.hidden
    }

    pub fn has_overflow(&self) -> bool {
        self.hidden > 0
    }

    /// Text of the overflow control, e.g. `"+2 More"`.
    pub fn more_label(&self) -> Option<String> {
        self.has_overflow()
            .then(|| format!("+{} More", self.hidden))
    }
}

/// Events past the visible limit for every day of a grid, keyed by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverflowIndex<'a> {
    buckets: BTreeMap<NaiveDate, Vec<&'a Event>>,
}

impl<'a> OverflowIndex<'a> {
    pub fn compute(grid: &MonthGrid, store: &'a EventStore) -> Self {
        let buckets = grid
            .days()
            .iter()
            .filter_map(|day| {
                let events = store.events_on(day.date);
                (events.len() > MAX_VISIBLE_EVENTS)
                    .then(|| (day.date, events[MAX_VISIBLE_EVENTS..].to_vec()))
            })
            .collect();
        OverflowIndex { buckets }
    }

    /// Only the overflowed events of `date` (4th onwards).
    pub fn get(&self, date: NaiveDate) -> Option<&[&'a Event]> {
        self.buckets.get(&date).map(Vec::as_slice)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.buckets.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Contents of the overflow dialog: every event on `date`, not just the
/// overflowed ones.
pub fn overflow_list(store: &EventStore, date: NaiveDate) -> Vec<&Event> {
    store.events_on(date)
}
