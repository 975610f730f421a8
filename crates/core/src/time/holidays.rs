//! US holiday calendar and the cache of their most recent occurrences.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::debug;

/// Named holidays that can be referred to in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Holiday {
    NewYearsDay,
    ValentinesDay,
    MartinLutherKingDay,
    PresidentsDay,
    Easter,
    MothersDay,
    MemorialDay,
    FathersDay,
    IndependenceDay,
    LaborDay,
    ColumbusDay,
    Halloween,
    VeteransDay,
    Thanksgiving,
    Christmas,
}

impl Holiday {
    pub const ALL: [Holiday; 15] = [
        Holiday::NewYearsDay,
        Holiday::ValentinesDay,
        Holiday::MartinLutherKingDay,
        Holiday::PresidentsDay,
        Holiday::Easter,
        Holiday::MothersDay,
        Holiday::MemorialDay,
        Holiday::FathersDay,
        Holiday::IndependenceDay,
        Holiday::LaborDay,
        Holiday::ColumbusDay,
        Holiday::Halloween,
        Holiday::VeteransDay,
        Holiday::Thanksgiving,
        Holiday::Christmas,
    ];

    /// The date of the holiday in `year`.
    pub fn date_in(self, year: i32) -> Option<NaiveDate> {
        use Weekday::{Mon, Sun, Thu};
        let nth = |month, weekday, n| NaiveDate::from_weekday_of_month_opt(year, month, weekday, n);
        match self {
            Holiday::NewYearsDay => NaiveDate::from_ymd_opt(year, 1, 1),
            Holiday::ValentinesDay => NaiveDate::from_ymd_opt(year, 2, 14),
            Holiday::MartinLutherKingDay => nth(1, Mon, 3),
            Holiday::PresidentsDay => nth(2, Mon, 3),
            Holiday::Easter => easter(year),
            Holiday::MothersDay => nth(5, Sun, 2),
            Holiday::MemorialDay => last_weekday_of_month(year, 5, Mon),
            Holiday::FathersDay => nth(6, Sun, 3),
            Holiday::IndependenceDay => NaiveDate::from_ymd_opt(year, 7, 4),
            Holiday::LaborDay => nth(9, Mon, 1),
            Holiday::ColumbusDay => nth(10, Mon, 2),
            Holiday::Halloween => NaiveDate::from_ymd_opt(year, 10, 31),
            Holiday::VeteransDay => NaiveDate::from_ymd_opt(year, 11, 11),
            Holiday::Thanksgiving => nth(11, Thu, 4),
            Holiday::Christmas => NaiveDate::from_ymd_opt(year, 12, 25),
        }
    }

    /// The latest occurrence not after `reference`.
    pub fn most_recent(self, reference: NaiveDate) -> Option<NaiveDate> {
        let mut year = reference.year();
        loop {
            let date = self.date_in(year)?;
            if date <= reference {
                return Some(date);
            }
            year -= 1;
        }
    }
}

fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = next_month - Duration::days(1);
    let back = (7 + last.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
    Some(last - Duration::days(i64::from(back)))
}

/// Western Easter Sunday (anonymous Gregorian algorithm).
fn easter(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

#[derive(Default)]
struct CacheState {
    reference: Option<NaiveDate>,
    dates: HashMap<Holiday, NaiveDate>,
}

/// Most recent occurrence of every holiday for one reference date.
///
/// Filled on first use and refilled whenever a different reference date is
/// asked for. The lock makes concurrent calls with different dates safe.
#[derive(Default)]
pub struct HolidayCache {
    state: Mutex<CacheState>,
}

impl HolidayCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn most_recent(&self, holiday: Holiday, reference: NaiveDate) -> Option<NaiveDate> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.reference != Some(reference) {
            debug!(%reference, "refreshing recent holiday cache");
            state.dates = Holiday::ALL
                .iter()
                .filter_map(|h| h.most_recent(reference).map(|d| (*h, d)))
                .collect();
            state.reference = Some(reference);
        }
        state.dates.get(&holiday).copied()
    }

    /// Reference date the cache currently holds.
    pub fn reference(&self) -> Option<NaiveDate> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).reference
    }
}
