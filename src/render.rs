//! Colored terminal rendering for calgrid types.

use calgrid_core::app::DayCell;
use calgrid_core::event::{Event, EventColor};
use calgrid_core::grid::DAYS_PER_WEEK;
use calgrid_core::overflow::MAX_VISIBLE_EVENTS;
use calgrid_core::persist::SaveStatus;
use calgrid_core::view::{self, CalendarView};
use chrono::Datelike;
use owo_colors::OwoColorize;

/// Width of one day column, in characters.
pub const CELL_WIDTH: usize = 14;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for SaveStatus {
    fn render(&self) -> String {
        let label = self.label();
        match self {
            SaveStatus::Idle => String::new(),
            SaveStatus::Saving => label.yellow().to_string(),
            SaveStatus::Saved => label.green().to_string(),
            SaveStatus::Error => label.red().to_string(),
        }
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let time = if self.all_day {
            "All day".to_string()
        } else {
            format!("{} - {}", self.start_time, self.end_time)
        };
        format!("{} {}", paint(self.color, &self.name), time.dimmed())
    }
}

fn paint(color: EventColor, text: &str) -> String {
    match color {
        EventColor::Red => text.red().to_string(),
        EventColor::Blue => text.blue().to_string(),
        EventColor::Green => text.green().to_string(),
    }
}

/// Truncate or pad `text` to exactly `width` characters.
pub fn fit(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len > width {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// What fits of an event inside a day column.
fn cell_text(event: &Event) -> String {
    if event.all_day {
        event.name.clone()
    } else {
        format!("{} {}", event.start_time.trim_start_matches('0'), event.name)
    }
}

fn render_day_number(cell: &DayCell<'_>) -> String {
    let number = cell.day.date.day().to_string();
    let padding = " ".repeat(CELL_WIDTH - number.len());
    let styled = if cell.kind.today {
        number.bold().reversed().to_string()
    } else if cell.kind.other_month {
        number.dimmed().to_string()
    } else if cell.kind.past {
        number.italic().to_string()
    } else {
        number.bold().to_string()
    };
    format!("{}{}", styled, padding)
}

/// The whole month: title with save status, weekday header, then one block
/// per week with up to three events per day and a "+N More" row.
pub fn render_month(view: &CalendarView, status: SaveStatus, cells: &[DayCell<'_>]) -> String {
    let blank = " ".repeat(CELL_WIDTH);
    let mut lines = Vec::new();

    let mut title = view.title().bold().to_string();
    if status != SaveStatus::Idle {
        title.push_str("  ");
        title.push_str(&status.render());
    }
    lines.push(title);

    let header: String = (0..DAYS_PER_WEEK)
        .filter_map(view::weekday_header)
        .map(|label| fit(label, CELL_WIDTH))
        .collect();
    lines.push(header.dimmed().to_string());

    for week in cells.chunks(DAYS_PER_WEEK) {
        lines.push("─".repeat(CELL_WIDTH * DAYS_PER_WEEK).dimmed().to_string());
        lines.push(week.iter().map(render_day_number).collect());

        for slot in 0..MAX_VISIBLE_EVENTS {
            if week.iter().all(|cell| cell.events.visible.len() <= slot) {
                break;
            }
            lines.push(
                week.iter()
                    .map(|cell| match cell.events.visible.get(slot) {
                        Some(event) => paint(event.color, &fit(&cell_text(event), CELL_WIDTH)),
                        None => blank.clone(),
                    })
                    .collect(),
            );
        }

        if week.iter().any(|cell| cell.events.has_overflow()) {
            lines.push(
                week.iter()
                    .map(|cell| match cell.events.more_label() {
                        Some(more) => fit(&more, CELL_WIDTH).dimmed().to_string(),
                        None => blank.clone(),
                    })
                    .collect(),
            );
        }
    }

    lines.join("\n")
}
