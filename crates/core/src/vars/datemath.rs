//! Calendar arithmetic shared by the time-expression rules.
//!
//! Days travel through the pipeline as *numbered dates*: the integer
//! `YYYYMMDD` (e.g. `20200301` for 2020-03-01). Everything else in this module
//! works on [`NaiveDate`] and converts at the edges.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use thiserror::Error;

/// A calendar day encoded as `YYYYMMDD`.
pub type NumberedDate = u32;

/// Error type for date string conversion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateMathError {
    #[error("invalid date string: {0}")]
    InvalidDateString(String),
}

/// Units for period arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationUnit {
    Days,
    Weeks,
    Months,
    Years,
}

impl DurationUnit {
    /// Parse a unit word such as `days`, `week` or `months`.
    pub fn from_word(word: &str) -> Option<Self> {
        match word.trim_end_matches('s') {
            "day" => Some(DurationUnit::Days),
            "week" => Some(DurationUnit::Weeks),
            "month" => Some(DurationUnit::Months),
            "year" => Some(DurationUnit::Years),
            _ => None,
        }
    }
}

/// Direction for relative weekday lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous, // most recent occurrence, today included
    Next,     // next occurrence, today excluded
}

pub fn to_numbered_date(date: NaiveDate) -> NumberedDate {
    date.year() as u32 * 10000 + date.month() * 100 + date.day()
}

pub fn numbered_date_from_values(year: i32, month: u32, day: u32) -> NumberedDate {
    year as u32 * 10000 + month * 100 + day
}

/// Parse `YYYY-MM-DD`.
pub fn parse_iso_date(s: &str) -> Result<NaiveDate, DateMathError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| DateMathError::InvalidDateString(s.to_string()))
}

/// Build a date the way a lenient calendar does: months and days outside
/// their range carry over into the neighbouring month or year.
///
/// `(2020, 2, 30)` is 2020-03-01 and `(2020, 1, 0)` is 2019-12-31.
pub fn overflowing_ymd(year: i32, month: i64, day: i64) -> Option<NaiveDate> {
    let total_months = year as i64 * 12 + (month - 1);
    let y = total_months.div_euclid(12) as i32;
    let m = (total_months.rem_euclid(12) + 1) as u32;
    let first = NaiveDate::from_ymd_opt(y, m, 1)?;
    first.checked_add_signed(Duration::days(day - 1))
}

pub fn add_months(date: NaiveDate, months: i64) -> NaiveDate {
    let year = date.year() as i64;
    let month = date.month() as i64;
    let day = date.day();

    let total_months = year * 12 + month - 1 + months;
    let new_year = total_months.div_euclid(12) as i32;
    let new_month = (total_months.rem_euclid(12) + 1) as u32;

    // Jan 31 + 1 month = Feb 28/29
    let max_day = days_in_month(new_year, new_month);
    let new_day = day.min(max_day);

    NaiveDate::from_ymd_opt(new_year, new_month, new_day).unwrap_or(date)
}

pub fn add_years(date: NaiveDate, years: i64) -> NaiveDate {
    add_months(date, years * 12)
}

/// Shift a date by a signed amount of `unit`.
pub fn shift(date: NaiveDate, amount: i64, unit: DurationUnit) -> NaiveDate {
    match unit {
        DurationUnit::Days => date + Duration::days(amount),
        DurationUnit::Weeks => date + Duration::weeks(amount),
        DurationUnit::Months => add_months(date, amount),
        DurationUnit::Years => add_years(date, amount),
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(days_in_month(date.year(), date.month())).unwrap_or(date)
}

pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

pub fn end_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
}

/// Monday of the week containing `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Sunday of the week containing `date`.
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    start_of_week(date) + Duration::days(6)
}

/// First and last day of the period of `unit` containing `date`.
pub fn period_bounds(date: NaiveDate, unit: DurationUnit) -> (NaiveDate, NaiveDate) {
    match unit {
        DurationUnit::Days => (date, date),
        DurationUnit::Weeks => (start_of_week(date), end_of_week(date)),
        DurationUnit::Months => (start_of_month(date), end_of_month(date)),
        DurationUnit::Years => (start_of_year(date), end_of_year(date)),
    }
}

pub fn find_relative_weekday(
    date: NaiveDate,
    target: Weekday,
    direction: Direction,
) -> NaiveDate {
    let current = date.weekday();

    match direction {
        Direction::Previous => {
            let days_back = (current.num_days_from_monday() as i64
                - target.num_days_from_monday() as i64
                + 7)
                % 7;
            date - Duration::days(days_back)
        }
        Direction::Next => {
            let days_diff = (target.num_days_from_monday() as i64
                - current.num_days_from_monday() as i64
                + 7)
                % 7;
            let days_forward = if days_diff == 0 { 7 } else { days_diff };
            date + Duration::days(days_forward)
        }
    }
}

pub fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tues" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thurs" | "thur" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

pub fn parse_month(s: &str) -> Option<u32> {
    let month = match s.to_lowercase().trim_end_matches('.') {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Alternation of month names and abbreviations for use inside patterns.
pub const MONTH_PATTERN: &str = "january|february|march|april|may|june|july|august|september|october|november|december|jan\\.?|feb\\.?|mar\\.?|apr\\.?|jun\\.?|jul\\.?|aug\\.?|sept?\\.?|oct\\.?|nov\\.?|dec\\.?";

/// Alternation of weekday names and abbreviations for use inside patterns.
pub const WEEKDAY_PATTERN: &str = "sunday|monday|tuesday|wednesday|thursday|friday|saturday|sun|mon|tues|tue|wed|thurs|thur|thu|fri|sat";

/// The most recent year in which `month`/`day` does not fall after `reference`.
pub fn closest_past_year(reference: NaiveDate, month: u32, day: u32) -> i32 {
    let mut year = reference.year();
    while let Some(date) = overflowing_ymd(year, month as i64, day as i64) {
        if date <= reference {
            break;
        }
        year -= 1;
    }
    year
}
