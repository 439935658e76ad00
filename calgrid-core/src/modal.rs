//! Dialog state machine with focus capture and restore.
//!
//! At most two dialogs are open at once: the overflow list for a day, with
//! an add/edit dialog stacked over it when one of its entries is opened.
//! Every dialog remembers the control that opened it and hands it back
//! when it closes.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{CalGridError, CalGridResult};
use crate::event::Event;
use crate::form::{EventForm, FormError};
use crate::store::EventStore;

/// A focusable control.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    DayCell(NaiveDate),
    AddButton(NaiveDate),
    EventButton(String),
    MoreButton(NaiveDate),
    OverflowEntry(String),
    NameInput,
}

/// What is on screen. With stacked dialogs this is the topmost one.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalState<'a> {
    Closed,
    EditOpen {
        date: NaiveDate,
        event: Option<&'a Event>,
        form: &'a EventForm,
        error: Option<FormError>,
    },
    OverflowOpen {
        date: NaiveDate,
    },
}

/// User actions while the calendar is shown.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalCommand {
    /// Day cell activated (click, Enter/Space, or its "+" button).
    OpenDay {
        date: NaiveDate,
        trigger: Option<FocusTarget>,
    },
    /// An event button in a cell or in the overflow list.
    OpenEvent {
        event_id: String,
        trigger: Option<FocusTarget>,
    },
    /// The "+N More" control.
    OpenOverflow {
        date: NaiveDate,
        trigger: Option<FocusTarget>,
    },
    Escape,
    BackdropClick,
    /// Submit the edit form; `now` seeds the id of a new event.
    Submit { now: DateTime<Utc> },
    /// Delete the event being edited.
    Delete,
}

/// How the store changed as a result of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Added(String),
    Updated(String),
    Deleted(String),
}

/// Result of handling a command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// Control that should receive keyboard focus next.
    pub focus: Option<FocusTarget>,
    pub change: Option<StoreChange>,
    /// Validation error now shown in the form.
    pub error: Option<FormError>,
}

#[derive(Debug, Clone, PartialEq)]
enum Dialog {
    Edit {
        date: NaiveDate,
        event: Option<Event>,
        form: EventForm,
        error: Option<FormError>,
    },
    Overflow {
        date: NaiveDate,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct Layer {
    dialog: Dialog,
    trigger: Option<FocusTarget>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModalController {
    layers: Vec<Layer>,
}

/// Dialog heading, e.g. `"Edit Event 3/20/25"`.
pub fn dialog_title(date: NaiveDate, editing: bool) -> String {
    let verb = if editing { "Edit Event" } else { "Add Event" };
    format!("{} {}", verb, date.format("%-m/%-d/%y"))
}

impl ModalController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        !self.layers.is_empty()
    }

    /// Number of stacked dialogs.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    pub fn state(&self) -> ModalState<'_> {
        match self.layers.last().map(|l| &l.dialog) {
            None => ModalState::Closed,
            Some(Dialog::Edit {
                date,
                event,
                form,
                error,
            }) => ModalState::EditOpen {
                date: *date,
                event: event.as_ref(),
                form,
                error: *error,
            },
            Some(Dialog::Overflow { date }) => ModalState::OverflowOpen { date: *date },
        }
    }

    /// Mutable access to the open edit form, if the top dialog is one.
    pub fn form_mut(&mut self) -> Option<&mut EventForm> {
        match self.layers.last_mut().map(|l| &mut l.dialog) {
            Some(Dialog::Edit { form, .. }) => Some(form),
            _ => None,
        }
    }

    pub fn handle(
        &mut self,
        command: ModalCommand,
        store: &mut EventStore,
    ) -> CalGridResult<Outcome> {
        match command {
            ModalCommand::OpenDay { date, trigger } => {
                self.open_edit(date, None, trigger);
                Ok(Outcome {
                    focus: Some(FocusTarget::NameInput),
                    ..Outcome::default()
                })
            }
            ModalCommand::OpenEvent { event_id, trigger } => {
                let event = store
                    .get(&event_id)
                    .cloned()
                    .ok_or_else(|| CalGridError::EventNotFound(event_id.clone()))?;
                self.open_edit(event.date, Some(event), trigger);
                Ok(Outcome {
                    focus: Some(FocusTarget::NameInput),
                    ..Outcome::default()
                })
            }
            ModalCommand::OpenOverflow { date, trigger } => {
                self.layers.clear();
                self.layers.push(Layer {
                    dialog: Dialog::Overflow { date },
                    trigger,
                });
                let first = store
                    .events_on(date)
                    .first()
                    .map(|e| FocusTarget::OverflowEntry(e.id.clone()));
                Ok(Outcome {
                    focus: first,
                    ..Outcome::default()
                })
            }
            ModalCommand::Escape | ModalCommand::BackdropClick => Ok(Outcome {
                focus: self.close_top(),
                ..Outcome::default()
            }),
            ModalCommand::Submit { now } => self.submit(store, now),
            ModalCommand::Delete => self.delete(store),
        }
    }

    fn open_edit(&mut self, date: NaiveDate, event: Option<Event>, trigger: Option<FocusTarget>) {
        let over_overflow = matches!(
            self.layers.last(),
            Some(Layer {
                dialog: Dialog::Overflow { .. },
                ..
            })
        );
        if !over_overflow {
            self.layers.clear();
        }

        let form = event
            .as_ref()
            .map(EventForm::from_event)
            .unwrap_or_default();
        self.layers.push(Layer {
            dialog: Dialog::Edit {
                date,
                event,
                form,
                error: None,
            },
            trigger,
        });
    }

    /// Pop the top dialog and return its trigger.
    fn close_top(&mut self) -> Option<FocusTarget> {
        self.layers.pop().and_then(|layer| layer.trigger)
    }

    fn submit(&mut self, store: &mut EventStore, now: DateTime<Utc>) -> CalGridResult<Outcome> {
        let Some(Dialog::Edit {
            date,
            event,
            form,
            error,
        }) = self.layers.last_mut().map(|l| &mut l.dialog)
        else {
            return Err(CalGridError::Validation("no form is open".into()));
        };

        let id = match event {
            Some(existing) => existing.id.clone(),
            None => store.fresh_id(now),
        };

        let built = match form.build(id, *date) {
            Ok(built) => built,
            Err(err) => {
                *error = Some(err);
                return Ok(Outcome {
                    error: Some(err),
                    ..Outcome::default()
                });
            }
        };

        let change = if event.is_some() {
            let id = built.id.clone();
            store.update(built)?;
            StoreChange::Updated(id)
        } else {
            let id = built.id.clone();
            store.add(built)?;
            StoreChange::Added(id)
        };

        Ok(Outcome {
            focus: self.close_top(),
            change: Some(change),
            error: None,
        })
    }

    fn delete(&mut self, store: &mut EventStore) -> CalGridResult<Outcome> {
        let id = match self.layers.last().map(|l| &l.dialog) {
            Some(Dialog::Edit {
                event: Some(event),
                ..
            }) => event.id.clone(),
            _ => return Err(CalGridError::Validation("no event selected".into())),
        };

        store.delete(&id)?;
        Ok(Outcome {
            focus: self.close_top(),
            change: Some(StoreChange::Deleted(id)),
            error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventColor;
    use chrono::TimeZone;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn busy_store() -> EventStore {
        let events = (0..5)
            .map(|i| {
                let start = format!("{:02}:00", 9 + i);
                let end = format!("{:02}:45", 9 + i);
                Event::new_timed(
                    format!("e{}", i),
                    format!("Meeting {}", i),
                    date(),
                    &start,
                    &end,
                    EventColor::Blue,
                )
            })
            .collect();
        EventStore::from_events(events)
    }

    fn open_day(modal: &mut ModalController, store: &mut EventStore) {
        modal
            .handle(
                ModalCommand::OpenDay {
                    date: date(),
                    trigger: Some(FocusTarget::DayCell(date())),
                },
                store,
            )
            .unwrap();
    }

    #[test]
    fn starts_closed() {
        let modal = ModalController::new();
        assert_eq!(modal.state(), ModalState::Closed);
        assert!(!modal.is_open());
    }

    #[test]
    fn escape_restores_day_cell_focus() {
        let mut store = EventStore::new();
        let mut modal = ModalController::new();
        open_day(&mut modal, &mut store);

        let state = modal.state();
        assert!(matches!(state, ModalState::EditOpen { event: None, .. }));

        let outcome = modal.handle(ModalCommand::Escape, &mut store).unwrap();
        assert_eq!(outcome.focus, Some(FocusTarget::DayCell(date())));
        assert_eq!(modal.state(), ModalState::Closed);
    }

    #[test]
    fn submit_adds_event_and_closes() {
        let mut store = EventStore::new();
        let mut modal = ModalController::new();
        open_day(&mut modal, &mut store);

        let form = modal.form_mut().unwrap();
        form.name = "Dentist".into();
        form.start_time = "09:00".into();
        form.end_time = "10:00".into();

        let outcome = modal
            .handle(ModalCommand::Submit { now: now() }, &mut store)
            .unwrap();

        let id = now().timestamp_millis().to_string();
        assert_eq!(outcome.change, Some(StoreChange::Added(id.clone())));
        assert_eq!(outcome.focus, Some(FocusTarget::DayCell(date())));
        assert!(!modal.is_open());
        assert_eq!(store.get(&id).unwrap().start_time, "09:00 AM");
    }

    #[test]
    fn inverted_times_show_error_without_mutation() {
        let mut store = EventStore::new();
        let mut modal = ModalController::new();
        open_day(&mut modal, &mut store);

        let form = modal.form_mut().unwrap();
        form.name = "Backwards".into();
        form.start_time = "10:00".into();
        form.end_time = "09:00".into();

        let outcome = modal
            .handle(ModalCommand::Submit { now: now() }, &mut store)
            .unwrap();

        assert_eq!(outcome.error, Some(FormError::StartNotBeforeEnd));
        assert_eq!(outcome.change, None);
        assert!(store.is_empty());
        assert!(matches!(
            modal.state(),
            ModalState::EditOpen {
                error: Some(FormError::StartNotBeforeEnd),
                ..
            }
        ));
    }

    #[test]
    fn editing_prefills_and_updates() {
        let mut store = busy_store();
        let mut modal = ModalController::new();
        modal
            .handle(
                ModalCommand::OpenEvent {
                    event_id: "e1".into(),
                    trigger: Some(FocusTarget::EventButton("e1".into())),
                },
                &mut store,
            )
            .unwrap();

        let form = modal.form_mut().unwrap();
        assert_eq!(form.start_time, "10:00");
        form.name = "Renamed".into();

        let outcome = modal
            .handle(ModalCommand::Submit { now: now() }, &mut store)
            .unwrap();
        assert_eq!(outcome.change, Some(StoreChange::Updated("e1".into())));
        assert_eq!(outcome.focus, Some(FocusTarget::EventButton("e1".into())));
        assert_eq!(store.get("e1").unwrap().name, "Renamed");
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn delete_removes_and_closes() {
        let mut store = busy_store();
        let mut modal = ModalController::new();
        modal
            .handle(
                ModalCommand::OpenEvent {
                    event_id: "e2".into(),
                    trigger: None,
                },
                &mut store,
            )
            .unwrap();

        let outcome = modal.handle(ModalCommand::Delete, &mut store).unwrap();
        assert_eq!(outcome.change, Some(StoreChange::Deleted("e2".into())));
        assert!(store.get("e2").is_none());
        assert!(!modal.is_open());
    }

    #[test]
    fn delete_requires_existing_event() {
        let mut store = EventStore::new();
        let mut modal = ModalController::new();
        open_day(&mut modal, &mut store);
        assert!(modal.handle(ModalCommand::Delete, &mut store).is_err());
    }

    #[test]
    fn overflow_focuses_first_entry() {
        let mut store = busy_store();
        let mut modal = ModalController::new();

        let outcome = modal
            .handle(
                ModalCommand::OpenOverflow {
                    date: date(),
                    trigger: Some(FocusTarget::MoreButton(date())),
                },
                &mut store,
            )
            .unwrap();

        assert_eq!(outcome.focus, Some(FocusTarget::OverflowEntry("e0".into())));
        assert_eq!(modal.state(), ModalState::OverflowOpen { date: date() });
    }

    #[test]
    fn edit_stacks_over_overflow_and_unwinds() {
        let mut store = busy_store();
        let mut modal = ModalController::new();

        modal
            .handle(
                ModalCommand::OpenOverflow {
                    date: date(),
                    trigger: Some(FocusTarget::MoreButton(date())),
                },
                &mut store,
            )
            .unwrap();
        modal
            .handle(
                ModalCommand::OpenEvent {
                    event_id: "e4".into(),
                    trigger: Some(FocusTarget::OverflowEntry("e4".into())),
                },
                &mut store,
            )
            .unwrap();
        assert_eq!(modal.depth(), 2);

        let first = modal.handle(ModalCommand::Escape, &mut store).unwrap();
        assert_eq!(first.focus, Some(FocusTarget::OverflowEntry("e4".into())));
        assert_eq!(modal.state(), ModalState::OverflowOpen { date: date() });

        let second = modal
            .handle(ModalCommand::BackdropClick, &mut store)
            .unwrap();
        assert_eq!(second.focus, Some(FocusTarget::MoreButton(date())));
        assert_eq!(modal.state(), ModalState::Closed);
    }

    #[test]
    fn opening_unknown_event_fails() {
        let mut store = EventStore::new();
        let mut modal = ModalController::new();
        let result = modal.handle(
            ModalCommand::OpenEvent {
                event_id: "missing".into(),
                trigger: None,
            },
            &mut store,
        );
        assert!(matches!(result, Err(CalGridError::EventNotFound(_))));
        assert!(!modal.is_open());
    }

    #[test]
    fn titles() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
        assert_eq!(dialog_title(d, false), "Add Event 3/20/25");
        assert_eq!(dialog_title(d, true), "Edit Event 3/20/25");
    }
}
