use anyhow::Result;
use calgrid_core::EventColor;
use calgrid_core::app::CalendarApp;
use calgrid_core::form::{EventForm, FormError};
use calgrid_core::modal::{self, FocusTarget, ModalCommand, StoreChange};
use chrono::{NaiveDate, Utc};
use dialoguer::{Confirm, Input, Select};
use owo_colors::OwoColorize;

use super::{EventArgs, finish, form_mut, parse_date};

pub fn run(
    app: &mut CalendarApp,
    date: Option<&str>,
    fields: EventArgs,
    today: NaiveDate,
) -> Result<()> {
    let date = match date {
        Some(d) => parse_date(d)?,
        None => today,
    };
    let interactive = fields.name.is_none();

    app.dispatch(ModalCommand::OpenDay {
        date,
        trigger: Some(FocusTarget::DayCell(date)),
    })?;
    fields.apply_to(form_mut(app)?)?;

    if interactive {
        println!("{}", modal::dialog_title(date, false).bold());
        prompt_missing(form_mut(app)?, &fields)?;
    }

    let id = loop {
        let outcome = app.dispatch(ModalCommand::Submit { now: Utc::now() })?;
        match (outcome.change, outcome.error) {
            (Some(StoreChange::Added(id)), _) => break id,
            (_, Some(err)) if interactive => {
                eprintln!("  {}", err.to_string().red());
                reprompt(form_mut(app)?, err)?;
            }
            (_, Some(err)) => {
                app.dispatch(ModalCommand::Escape)?;
                anyhow::bail!("{}", err);
            }
            (change, None) => anyhow::bail!("Unexpected result from submit: {:?}", change),
        }
    };

    if let Some(event) = app.store().get(&id) {
        if interactive {
            println!();
        }
        println!("{}", format!("  Added: {}", event.name).green());
    }
    finish(app)
}

/// Ask for every field not given on the command line.
fn prompt_missing(form: &mut EventForm, fields: &EventArgs) -> Result<()> {
    form.name = ask("  Name", &form.name)?;

    if !fields.all_day && !fields.timed {
        form.all_day = Confirm::new()
            .with_prompt("  All day?")
            .default(form.all_day)
            .interact()?;
    }

    if !form.all_day {
        if fields.start.is_none() {
            form.start_time = ask("  Starts (HH:MM)", &form.start_time)?;
        }
        if fields.end.is_none() {
            form.end_time = ask("  Ends (HH:MM)", &form.end_time)?;
        }
    }

    if fields.color.is_none() {
        form.color = prompt_color(form.color)?;
    }
    Ok(())
}

/// Ask again for whatever the error points at.
fn reprompt(form: &mut EventForm, err: FormError) -> Result<()> {
    match err {
        FormError::NameRequired => {
            form.name = ask("  Name", "")?;
        }
        FormError::InvalidTimeFormat | FormError::StartNotBeforeEnd => {
            form.start_time = ask("  Starts (HH:MM)", &form.start_time)?;
            form.end_time = ask("  Ends (HH:MM)", &form.end_time)?;
        }
    }
    Ok(())
}

fn ask(prompt: &str, current: &str) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt);
    if !current.is_empty() {
        input = input.default(current.to_string());
    }
    Ok(input.interact_text()?)
}

fn prompt_color(current: EventColor) -> Result<EventColor> {
    let items: Vec<&str> = EventColor::ALL.iter().map(|c| c.as_str()).collect();
    let default = EventColor::ALL
        .iter()
        .position(|c| *c == current)
        .unwrap_or(0);
    let selection = Select::new()
        .with_prompt("  Color")
        .items(&items)
        .default(default)
        .interact()?;
    Ok(EventColor::ALL[selection])
}
