//! The calendar as a whole: store, view, dialogs and persistence behind one
//! command-driven handle.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::CalGridResult;
use crate::form::EventForm;
use crate::grid::{Arrow, GridDay, MonthGrid};
use crate::modal::{FocusTarget, ModalCommand, ModalController, ModalState, Outcome};
use crate::overflow::{DayEvents, OverflowIndex};
use crate::persist::{Persister, SaveStatus, SaveTimings};
use crate::storage::KeyValueStore;
use crate::store::EventStore;
use crate::view::{self, CalendarView, DayKind};

/// Keys handled by a focused day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKey {
    Arrow(Arrow),
    Enter,
    Space,
}

/// Everything needed to draw one cell of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell<'a> {
    pub day: GridDay,
    pub kind: DayKind,
    pub events: DayEvents<'a>,
    pub label: String,
}

pub struct CalendarApp {
    store: EventStore,
    view: CalendarView,
    modal: ModalController,
    persister: Persister,
}

impl CalendarApp {
    /// Hydrate from `storage` and show the month containing `today`.
    pub fn open(storage: Arc<dyn KeyValueStore>, timings: SaveTimings, today: NaiveDate) -> Self {
        let store = EventStore::load(storage.as_ref());
        CalendarApp {
            store,
            view: CalendarView::new(today),
            modal: ModalController::new(),
            persister: Persister::new(storage, timings),
        }
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn view(&self) -> &CalendarView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut CalendarView {
        &mut self.view
    }

    pub fn modal_state(&self) -> ModalState<'_> {
        self.modal.state()
    }

    pub fn form_mut(&mut self) -> Option<&mut EventForm> {
        self.modal.form_mut()
    }

    pub fn save_status(&self) -> SaveStatus {
        self.persister.status()
    }

    /// Run a dialog command; any store change schedules a save.
    pub fn dispatch(&mut self, command: ModalCommand) -> CalGridResult<Outcome> {
        let outcome = self.modal.handle(command, &mut self.store)?;
        if let Some(change) = &outcome.change {
            tracing::debug!(?change, "Event store changed");
            self.persister.schedule(self.store.events());
        }
        Ok(outcome)
    }

    /// Key pressed on the cell at `index` of the current grid.
    pub fn cell_key(&mut self, index: usize, key: CellKey) -> CalGridResult<Outcome> {
        let grid = self.view.grid()?;
        match key {
            CellKey::Arrow(arrow) => Ok(Outcome {
                focus: grid
                    .step(index, arrow)
                    .map(|i| FocusTarget::DayCell(grid.days()[i].date)),
                ..Outcome::default()
            }),
            CellKey::Enter | CellKey::Space => match grid.days().get(index) {
                Some(day) => self.dispatch(ModalCommand::OpenDay {
                    date: day.date,
                    trigger: Some(FocusTarget::DayCell(day.date)),
                }),
                None => Ok(Outcome::default()),
            },
        }
    }

    pub fn grid(&self) -> CalGridResult<MonthGrid> {
        self.view.grid()
    }

    /// Cells of the current month grid, in display order.
    pub fn cells(&self, today: NaiveDate) -> CalGridResult<Vec<DayCell<'_>>> {
        let grid = self.view.grid()?;
        Ok(grid
            .days()
            .iter()
            .map(|day| {
                let events = DayEvents::for_date(&self.store, day.date);
                DayCell {
                    day: *day,
                    kind: DayKind::classify(day, today),
                    label: view::day_label(day.date, today, events.total()),
                    events,
                }
            })
            .collect())
    }

    pub fn overflow(&self) -> CalGridResult<OverflowIndex<'_>> {
        Ok(OverflowIndex::compute(&self.view.grid()?, &self.store))
    }

    /// Write pending changes now.
    pub fn flush(&mut self) -> SaveStatus {
        self.persister.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, EventColor};
    use crate::modal::StoreChange;
    use crate::storage::MemoryStorage;
    use crate::store::STORAGE_KEY;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn seeded_storage() -> Arc<MemoryStorage> {
        let storage = Arc::new(MemoryStorage::new());
        let events = (0..5)
            .map(|i| {
                Event::new_all_day(
                    format!("e{}", i),
                    format!("Item {}", i),
                    today(),
                    EventColor::Green,
                )
            })
            .collect();
        EventStore::from_events(events)
            .save(storage.as_ref())
            .unwrap();
        storage
    }

    #[tokio::test(start_paused = true)]
    async fn submit_schedules_debounced_save() {
        let storage = Arc::new(MemoryStorage::new());
        let mut app = CalendarApp::open(storage.clone(), SaveTimings::default(), today());

        app.dispatch(ModalCommand::OpenDay {
            date: today(),
            trigger: None,
        })
        .unwrap();
        let form = app.form_mut().unwrap();
        form.name = "Dinner".into();
        form.all_day = true;

        let outcome = app
            .dispatch(ModalCommand::Submit {
                now: Utc.with_ymd_and_hms(2026, 10, 19, 18, 0, 0).unwrap(),
            })
            .unwrap();
        assert!(matches!(outcome.change, Some(StoreChange::Added(_))));
        assert_eq!(storage.get(STORAGE_KEY).unwrap(), None);

        tokio::time::sleep(Duration::from_millis(301)).await;
        assert_eq!(app.save_status(), SaveStatus::Saved);
        assert_eq!(EventStore::load(storage.as_ref()).len(), 1);
    }

    #[tokio::test]
    async fn cells_report_overflow() {
        let app = CalendarApp::open(seeded_storage(), SaveTimings::default(), today());
        let cells = app.cells(today()).unwrap();

        assert_eq!(cells.len() % 7, 0);
        let cell = cells.iter().find(|c| c.day.date == today()).unwrap();
        assert!(cell.kind.today);
        assert_eq!(cell.events.visible.len(), 3);
        assert_eq!(cell.events.hidden, 2);
        assert_eq!(
            cell.label,
            "October 19, 2026, Today, 5 events. Click to add event."
        );
        assert_eq!(app.overflow().unwrap().get(today()).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn arrow_keys_move_focus_and_enter_opens() {
        let storage = Arc::new(MemoryStorage::new());
        let mut app = CalendarApp::open(storage, SaveTimings::default(), today());
        let grid = app.grid().unwrap();
        let index = grid.index_of(today()).unwrap();

        let moved = app.cell_key(index, CellKey::Arrow(Arrow::Down)).unwrap();
        let next_week = today() + chrono::Days::new(7);
        assert_eq!(moved.focus, Some(FocusTarget::DayCell(next_week)));

        let opened = app.cell_key(index, CellKey::Space).unwrap();
        assert_eq!(opened.focus, Some(FocusTarget::NameInput));
        assert!(matches!(app.modal_state(), ModalState::EditOpen { .. }));
    }

    #[tokio::test]
    async fn flush_persists_delete() {
        let storage = seeded_storage();
        let mut app = CalendarApp::open(storage.clone(), SaveTimings::default(), today());

        app.dispatch(ModalCommand::OpenEvent {
            event_id: "e2".into(),
            trigger: None,
        })
        .unwrap();
        app.dispatch(ModalCommand::Delete).unwrap();

        assert_eq!(app.flush(), SaveStatus::Saved);
        let ids: Vec<_> = EventStore::load(storage.as_ref())
            .events()
            .iter()
            .map(|e| e.id.clone())
            .collect();
        assert_eq!(ids, vec!["e0", "e1", "e3", "e4"]);
    }
}
