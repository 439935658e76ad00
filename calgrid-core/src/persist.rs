//! Debounced persistence with a transient save status.
//!
//! Every mutation calls [`Persister::schedule`] with the new collection.
//! Requests arriving within the debounce window replace each other, so a
//! burst of edits produces a single write. After a write the status shows
//! `Saved` or `Error` for a while and then falls back to `Idle`.
//!
//! Timers run on the tokio runtime; `schedule` must be called from inside
//! one.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::event::Event;
use crate::storage::KeyValueStore;
use crate::store::STORAGE_KEY;

/// Save indicator shown next to the month title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    Error,
}

impl SaveStatus {
    /// Short user-facing text, empty when idle.
    pub fn label(&self) -> &'static str {
        match self {
            SaveStatus::Idle => "",
            SaveStatus::Saving => "Saving...",
            SaveStatus::Saved => "✓ Saved",
            SaveStatus::Error => "⚠ Save failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTimings {
    pub debounce: Duration,
    pub saved_reset: Duration,
    pub error_reset: Duration,
}

impl Default for SaveTimings {
    fn default() -> Self {
        SaveTimings {
            debounce: Duration::from_millis(300),
            saved_reset: Duration::from_millis(2000),
            error_reset: Duration::from_millis(3000),
        }
    }
}

struct Shared {
    storage: Arc<dyn KeyValueStore>,
    timings: SaveTimings,
    status: watch::Sender<SaveStatus>,
    pending: Mutex<Option<Vec<Event>>>,
    reset: Mutex<Option<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Shared {
    /// Write the pending snapshot, if any, and start the status reset timer.
    fn write_pending(self: &Arc<Self>) {
        let Some(events) = lock(&self.pending).take() else {
            return;
        };

        self.status.send_replace(SaveStatus::Saving);

        let result = serde_json::to_string(&events)
            .map_err(crate::error::CalGridError::from)
            .and_then(|json| self.storage.set(STORAGE_KEY, &json));

        let (status, delay) = match result {
            Ok(()) => {
                tracing::debug!(count = events.len(), "Saved events");
                (SaveStatus::Saved, self.timings.saved_reset)
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to save events");
                (SaveStatus::Error, self.timings.error_reset)
            }
        };
        self.status.send_replace(status);

        let shared = Arc::clone(self);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.status.send_replace(SaveStatus::Idle);
        });
        if let Some(previous) = lock(&self.reset).replace(timer) {
            previous.abort();
        }
    }
}

/// Coalescing writer for the event collection.
pub struct Persister {
    shared: Arc<Shared>,
    debounce: Option<JoinHandle<()>>,
}

impl Persister {
    pub fn new(storage: Arc<dyn KeyValueStore>, timings: SaveTimings) -> Self {
        let (status, _) = watch::channel(SaveStatus::Idle);
        Persister {
            shared: Arc::new(Shared {
                storage,
                timings,
                status,
                pending: Mutex::new(None),
                reset: Mutex::new(None),
            }),
            debounce: None,
        }
    }

    pub fn status(&self) -> SaveStatus {
        *self.shared.status.borrow()
    }

    /// Follow status changes.
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.shared.status.subscribe()
    }

    pub fn has_pending(&self) -> bool {
        lock(&self.shared.pending).is_some()
    }

    /// Queue `events` for writing once the debounce window passes without
    /// another request.
    pub fn schedule(&mut self, events: &[Event]) {
        *lock(&self.shared.pending) = Some(events.to_vec());

        if let Some(previous) = self.debounce.take() {
            previous.abort();
            tracing::debug!("Coalesced pending save");
        }

        let shared = Arc::clone(&self.shared);
        let delay = shared.timings.debounce;
        self.debounce = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.write_pending();
        }));
    }

    /// Write any pending snapshot now and report the resulting status.
    pub fn flush(&mut self) -> SaveStatus {
        if let Some(handle) = self.debounce.take() {
            handle.abort();
        }
        self.shared.write_pending();
        self.status()
    }
}

impl Drop for Persister {
    fn drop(&mut self) {
        if let Some(handle) = self.debounce.take() {
            handle.abort();
        }
        if let Some(handle) = lock(&self.shared.reset).take() {
            handle.abort();
        }
    }
}
