use anyhow::Result;
use calgrid_core::app::CalendarApp;
use calgrid_core::overflow::overflow_list;
use owo_colors::OwoColorize;

use super::parse_date;
use crate::render::Render;

pub fn run(app: &CalendarApp, date: &str) -> Result<()> {
    let date = parse_date(date)?;
    let events = overflow_list(app.store(), date);

    println!("{}", date.format("%A, %B %-d, %Y").bold());
    if events.is_empty() {
        println!("{}", "No events".dimmed());
        return Ok(());
    }

    for event in events {
        println!("  {}  {}", event.id.dimmed(), event.render());
    }
    Ok(())
}
