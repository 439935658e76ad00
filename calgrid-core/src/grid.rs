//! Month grid derivation.
//!
//! A grid covers the reference month padded out to whole weeks (Sunday
//! first), so its length is always a multiple of 7.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::error::{CalGridError, CalGridResult};

pub const DAYS_PER_WEEK: usize = 7;

/// Column headers, Sunday first.
pub const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDay {
    pub date: NaiveDate,
    /// False for the leading/trailing days borrowed from adjacent months.
    pub in_month: bool,
}

/// Arrow keys for moving focus between cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    month_end: NaiveDate,
    days: Vec<GridDay>,
}

fn out_of_range(date: NaiveDate) -> CalGridError {
    CalGridError::Validation(format!("{} is outside the supported calendar range", date))
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

pub fn end_of_month(date: NaiveDate) -> CalGridResult<NaiveDate> {
    start_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| out_of_range(date))
}

impl MonthGrid {
    /// Derive the grid for the month containing `reference`.
    pub fn for_date(reference: NaiveDate) -> CalGridResult<Self> {
        let month_start = start_of_month(reference);
        let month_end = end_of_month(reference)?;

        let lead = u64::from(month_start.weekday().num_days_from_sunday());
        let trail = 6 - u64::from(month_end.weekday().num_days_from_sunday());

        let grid_start = month_start
            .checked_sub_days(Days::new(lead))
            .ok_or_else(|| out_of_range(reference))?;
        let grid_end = month_end
            .checked_add_days(Days::new(trail))
            .ok_or_else(|| out_of_range(reference))?;

        let days = grid_start
            .iter_days()
            .take_while(|d| *d <= grid_end)
            .map(|date| GridDay {
                date,
                in_month: date >= month_start && date <= month_end,
            })
            .collect();

        Ok(MonthGrid { month_end, days })
    }

    pub fn month_end(&self) -> NaiveDate {
        self.month_end
    }

    pub fn days(&self) -> &[GridDay] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of week rows.
    pub fn rows(&self) -> usize {
        self.days.len().div_ceil(DAYS_PER_WEEK)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.date)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.days.last().map(|d| d.date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.index_of(date).is_some()
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.days.iter().position(|d| d.date == date)
    }

    /// Cell reached from `index` by an arrow key, or `None` at the grid edge.
    pub fn step(&self, index: usize, arrow: Arrow) -> Option<usize> {
        let target = match arrow {
            Arrow::Left => index.checked_sub(1)?,
            Arrow::Right => index + 1,
            Arrow::Up => index.checked_sub(DAYS_PER_WEEK)?,
            Arrow::Down => index + DAYS_PER_WEEK,
        };
        (target < self.days.len()).then_some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn pads_to_whole_weeks() {
        // October 2026 starts on a Thursday and ends on a Saturday.
        let grid = MonthGrid::for_date(date(2026, 10, 19)).unwrap();

        assert_eq!(grid.first_day(), Some(date(2026, 9, 27)));
        assert_eq!(grid.last_day(), Some(date(2026, 10, 31)));
        assert_eq!(grid.len(), 35);
        assert_eq!(grid.rows(), 5);
    }

    #[test]
    fn six_row_month() {
        // August 2026 starts on a Saturday.
        let grid = MonthGrid::for_date(date(2026, 8, 1)).unwrap();
        assert_eq!(grid.len(), 42);
        assert_eq!(grid.rows(), 6);
        assert_eq!(grid.first_day(), Some(date(2026, 7, 26)));
        assert_eq!(grid.last_day(), Some(date(2026, 9, 5)));
    }

    #[test]
    fn four_row_february() {
        // February 2015: 28 days starting on a Sunday.
        let grid = MonthGrid::for_date(date(2015, 2, 14)).unwrap();
        assert_eq!(grid.len(), 28);
        assert!(grid.days().iter().all(|d| d.in_month));
    }

    #[test]
    fn every_month_is_covered_and_week_aligned() {
        for year in [2023, 2024, 2025] {
            for month in 1..=12 {
                let grid = MonthGrid::for_date(date(year, month, 15)).unwrap();

                assert_eq!(grid.len() % DAYS_PER_WEEK, 0);
                assert_eq!(grid.first_day().unwrap().weekday(), Weekday::Sun);
                assert_eq!(grid.last_day().unwrap().weekday(), Weekday::Sat);

                let in_month: Vec<_> = grid.days().iter().filter(|d| d.in_month).collect();
                assert_eq!(in_month.first().unwrap().date, date(year, month, 1));
                assert_eq!(in_month.last().unwrap().date, grid.month_end());
                assert!(
                    in_month
                        .windows(2)
                        .all(|w| w[1].date == w[0].date.succ_opt().unwrap())
                );
            }
        }
    }

    #[test]
    fn leap_february_end() {
        assert_eq!(end_of_month(date(2024, 2, 10)).unwrap(), date(2024, 2, 29));
        assert_eq!(end_of_month(date(2025, 2, 10)).unwrap(), date(2025, 2, 28));
    }

    #[test]
    fn arrows_stay_inside_grid() {
        let grid = MonthGrid::for_date(date(2026, 10, 1)).unwrap();

        assert_eq!(grid.step(0, Arrow::Left), None);
        assert_eq!(grid.step(0, Arrow::Up), None);
        assert_eq!(grid.step(0, Arrow::Right), Some(1));
        assert_eq!(grid.step(3, Arrow::Down), Some(10));
        assert_eq!(grid.step(34, Arrow::Right), None);
        assert_eq!(grid.step(30, Arrow::Down), None);
        assert_eq!(grid.step(30, Arrow::Up), Some(23));
    }
}
