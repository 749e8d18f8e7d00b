//! Calendar month arithmetic
//!
//! Month addition keeps the day of month and clamps to the last valid day
//! of the resulting month (Aug 31 + 6 months = Feb 28/29).

use chrono::{Datelike, Months, NaiveDate};

/// Add calendar months, clamping to the end of the target month.
///
/// Returns `None` only when the result leaves chrono's supported range.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Subtract calendar months with the same clamping rule
pub fn sub_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_sub_months(Months::new(months))
}

/// Absolute month index (`year * 12 + month0`), for month-granular positions
pub fn month_index(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + date.month0() as i64
}

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Signed whole days from `from` to `to`
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}
