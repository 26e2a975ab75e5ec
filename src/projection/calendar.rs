//! Month arithmetic for projections
//!
//! Months are handled as a single running index (`year * 12 + month0`) so
//! year rollover is plain integer math. Building a date whose day does not
//! exist in the target month rolls forward into the next month
//! (Jan 31 + 1 month = Mar 2 or 3); this mirrors what the tracker UI shows
//! and is kept on purpose.

use chrono::{Datelike, Days, Month, NaiveDate};

/// Running month index of a (year, month) pair, month is 1-based
pub fn month_index(year: i32, month: u32) -> i64 {
    year as i64 * 12 + (month as i64 - 1)
}

/// Running month index of a date
pub fn date_month_index(date: NaiveDate) -> i64 {
    month_index(date.year(), date.month())
}

/// Inverse of [`month_index`]
pub fn from_month_index(index: i64) -> (i32, u32) {
    (index.div_euclid(12) as i32, index.rem_euclid(12) as u32 + 1)
}

/// Whole months from `from`'s month to `to`'s month, ignoring days
pub fn month_offset(from: NaiveDate, to: NaiveDate) -> i64 {
    date_month_index(to) - date_month_index(from)
}

/// Calendar (year, month) of projection month `i`; month 0 is the one after `as_of`
pub fn target_month(as_of: NaiveDate, i: u32) -> (i32, u32) {
    from_month_index(date_month_index(as_of) + i as i64 + 1)
}

/// Date for `day` of the given month, rolling into the next month when the
/// day does not exist. `None` only outside chrono's supported range.
pub fn rolled_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_days(Days::new(day.saturating_sub(1) as u64))
}

/// `date` moved forward by `months`, keeping the day of month (with rollover)
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let (year, month) = from_month_index(date_month_index(date) + months as i64);
    rolled_date(year, month, date.day())
}

/// True when `date` falls in the given calendar month
pub fn in_month(date: NaiveDate, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}

/// English month name, e.g. "January"
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("Unknown")
}
