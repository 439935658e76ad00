use anyhow::Result;
use calgrid_core::app::CalendarApp;
use calgrid_core::modal::{FocusTarget, ModalCommand};
use chrono::Utc;
use owo_colors::OwoColorize;

use super::{EventArgs, finish, form_mut};

pub fn run(app: &mut CalendarApp, id: &str, fields: EventArgs) -> Result<()> {
    app.dispatch(ModalCommand::OpenEvent {
        event_id: id.to_string(),
        trigger: Some(FocusTarget::EventButton(id.to_string())),
    })?;
    fields.apply_to(form_mut(app)?)?;

    let outcome = app.dispatch(ModalCommand::Submit { now: Utc::now() })?;
    if let Some(err) = outcome.error {
        app.dispatch(ModalCommand::Escape)?;
        anyhow::bail!("{}", err);
    }

    if let Some(event) = app.store().get(id) {
        println!("{}", format!("  Updated: {}", event.name).green());
    }
    finish(app)
}
