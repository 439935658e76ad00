use anyhow::Result;
use calgrid_core::app::CalendarApp;
use calgrid_core::modal::{FocusTarget, ModalCommand, ModalState};
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use super::finish;

pub fn run(app: &mut CalendarApp, id: &str, force: bool) -> Result<()> {
    app.dispatch(ModalCommand::OpenEvent {
        event_id: id.to_string(),
        trigger: Some(FocusTarget::EventButton(id.to_string())),
    })?;

    let name = match app.modal_state() {
        ModalState::EditOpen {
            event: Some(event),
            ..
        } => event.name.clone(),
        _ => anyhow::bail!("Event '{}' could not be opened", id),
    };

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete '{}'?", name))
            .default(false)
            .interact()?;

        if !confirmed {
            app.dispatch(ModalCommand::Escape)?;
            println!("{}", "Cancelled".dimmed());
            return Ok(());
        }
    }

    app.dispatch(ModalCommand::Delete)?;
    println!("{}", format!("  Deleted: {}", name).red());
    finish(app)
}
