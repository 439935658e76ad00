pub mod add;
pub mod day;
pub mod delete;
pub mod edit;
pub mod show;

use anyhow::{Context, Result};
use calgrid_core::app::CalendarApp;
use calgrid_core::form::EventForm;
use calgrid_core::persist::SaveStatus;
use chrono::NaiveDate;
use clap::Args;
use owo_colors::OwoColorize;

/// Event fields shared by `add` and `edit`.
#[derive(Args, Debug, Default)]
pub struct EventArgs {
    /// Event name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Start time (HH:MM, 24-hour)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End time (HH:MM, 24-hour)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Make it an all-day event
    #[arg(long, conflicts_with = "timed")]
    pub all_day: bool,

    /// Make it a timed event
    #[arg(long)]
    pub timed: bool,

    /// red, blue or green
    #[arg(short, long)]
    pub color: Option<String>,
}

impl EventArgs {
    /// Copy every given field onto the form, leaving the rest untouched.
    pub fn apply_to(&self, form: &mut EventForm) -> Result<()> {
        if let Some(name) = &self.name {
            form.name = name.clone();
        }
        if self.all_day {
            form.all_day = true;
        }
        if self.timed {
            form.all_day = false;
        }
        if let Some(start) = &self.start {
            form.start_time = start.clone();
        }
        if let Some(end) = &self.end {
            form.end_time = end.clone();
        }
        if let Some(color) = &self.color {
            form.color = color.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        }
        Ok(())
    }
}

/// Parse YYYY-MM-DD
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}

/// Parse YYYY-MM as the first of that month
pub fn parse_month(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month format '{}'. Expected YYYY-MM", s))
}

pub fn form_mut(app: &mut CalendarApp) -> Result<&mut EventForm> {
    app.form_mut().context("No event form is open")
}

/// Write pending changes and report how it went. A failed write is shown
/// but doesn't fail the command.
pub fn finish(app: &mut CalendarApp) -> Result<()> {
    match app.flush() {
        SaveStatus::Saved => println!("{}", SaveStatus::Saved.label().dimmed()),
        SaveStatus::Error => eprintln!("{}", SaveStatus::Error.label().red()),
        SaveStatus::Idle | SaveStatus::Saving => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calgrid_core::EventColor;

    #[test]
    fn parses_dates_and_months() {
        assert_eq!(
            parse_date("2026-10-19").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
        );
        assert_eq!(
            parse_month("2026-02").unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
        );
        assert!(parse_date("10/19/2026").is_err());
        assert!(parse_month("2026-13").is_err());
    }

    #[test]
    fn apply_only_touches_given_fields() {
        let mut form = EventForm {
            name: "Keep".into(),
            start_time: "09:00".into(),
            end_time: "10:00".into(),
            ..EventForm::new()
        };
        let args = EventArgs {
            end: Some("11:00".into()),
            color: Some("green".into()),
            ..EventArgs::default()
        };

        args.apply_to(&mut form).unwrap();
        assert_eq!(form.name, "Keep");
        assert_eq!(form.start_time, "09:00");
        assert_eq!(form.end_time, "11:00");
        assert_eq!(form.color, EventColor::Green);
    }

    #[test]
    fn unknown_color_is_an_error() {
        let args = EventArgs {
            color: Some("mauve".into()),
            ..EventArgs::default()
        };
        assert!(args.apply_to(&mut EventForm::new()).is_err());
    }
}
