use anyhow::Result;
use calgrid_core::app::CalendarApp;
use calgrid_core::view::CalendarView;
use chrono::NaiveDate;

use super::parse_month;
use crate::render::render_month;

pub fn run(
    app: &mut CalendarApp,
    month: Option<&str>,
    previous: bool,
    next: bool,
    today: NaiveDate,
) -> Result<()> {
    if let Some(month) = month {
        *app.view_mut() = CalendarView::new(parse_month(month)?);
    }
    if previous {
        app.view_mut().previous_month()?;
    }
    if next {
        app.view_mut().next_month()?;
    }

    let cells = app.cells(today)?;
    println!("{}", render_month(app.view(), app.save_status(), &cells));
    Ok(())
}
