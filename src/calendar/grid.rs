use chrono::NaiveDate;

use super::dates::{days_in_month, is_weekend, month_name, weekday_index};
use super::event::Event;
use super::marks::{derive_day, MarkSet};
use crate::storage::config::SchoolYearConfig;

pub const GRID_CELLS: usize = 42;

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarCell {
    pub day: u32,
    pub date: NaiveDate,
    pub marks: MarkSet,
    pub is_weekend: bool,
    pub has_diamond: bool,
    pub has_circle: bool,
    pub show_asterisk: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthData {
    pub name: &'static str,
    pub year: i32,
    pub month0: u32,
    pub cells: Vec<Option<CalendarCell>>,
}

pub fn month_cells(
    year: i32,
    month: u32,
    events: &[Event],
    config: &SchoolYearConfig,
) -> Vec<Option<CalendarCell>> {
    let mut cells: Vec<Option<CalendarCell>> = Vec::with_capacity(GRID_CELLS);

    let Some(first_day) = NaiveDate::from_ymd_opt(year, month, 1) else {
        cells.resize(GRID_CELLS, None);
        return cells;
    };

    for _ in 0..weekday_index(first_day) {
        cells.push(None);
    }

    for day in 1..=days_in_month(year, month) {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            break;
        };
        let derived = derive_day(events, date, config);

        cells.push(Some(CalendarCell {
            day,
            date,
            marks: derived.marks,
            is_weekend: is_weekend(date),
            has_diamond: derived.has_diamond,
            has_circle: derived.has_circle,
            show_asterisk: derived.show_asterisk,
        }));
    }

    // Pad to a full 6x7 grid.
    cells.resize(GRID_CELLS, None);
    cells
}

pub fn month_data(
    year: i32,
    month: u32,
    events: &[Event],
    config: &SchoolYearConfig,
) -> MonthData {
    MonthData {
        name: month_name(month),
        year,
        month0: month - 1,
        cells: month_cells(year, month, events, config),
    }
}

// August of the starting year through July of the following year.
pub fn school_year_months(start_year: i32) -> Vec<(i32, u32)> {
    let mut months = Vec::with_capacity(12);

    months.push((start_year, 8));
    for month in 9..=12 {
        months.push((start_year, month));
    }
    for month in 1..=7 {
        months.push((start_year + 1, month));
    }

    months
}

pub fn school_year_grid(
    start_year: i32,
    events: &[Event],
    config: &SchoolYearConfig,
) -> Vec<MonthData> {
    school_year_months(start_year)
        .into_iter()
        .map(|(year, month)| month_data(year, month, events, config))
        .collect()
}
