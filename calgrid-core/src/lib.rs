//! Core of the calgrid month calendar.
//!
//! - `store`/`storage`/`persist`: the event collection, where it lives and
//!   how it gets written back
//! - `grid`/`overflow`/`view`: what the month looks like
//! - `form`/`modal`: adding, editing and deleting through dialogs
//! - `app`: all of the above behind a single command-driven handle

pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod form;
pub mod grid;
pub mod modal;
pub mod overflow;
pub mod persist;
pub mod storage;
pub mod store;
pub mod view;

pub use error::{CalGridError, CalGridResult};
pub use event::{Event, EventColor};
