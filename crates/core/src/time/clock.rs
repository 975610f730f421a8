//! Clock-time phrases such as "half past ten", "ten to seven" or "730".
//!
//! Times are returned as signed seconds from midnight. A bedtime read with the
//! night preference that falls after the shift hour belongs to the previous
//! evening and comes back negative (`10 pm` is `-7200`).

use std::sync::LazyLock;

use regex::Regex;

use crate::numbers::convert_number_words;

const SECONDS_HOUR: i64 = 3600;
const SECONDS_DAY: i64 = 24 * SECONDS_HOUR;

/// Default hour after which a night-preference time is moved to the day before.
pub const DEFAULT_BEDTIME_SHIFT_HOUR: u32 = 12;

/// How to read a time with no am/pm marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPreference {
    /// Waking hours: `3` is 3 pm, `7` is 7 am.
    Day,
    /// Bedtime: `3` is 3 am, `11` is 11 pm.
    Night,
}

static FRACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(\d+)\s+)?(?:a\s+)?(quarters?|half)\s+(past|to|after)\s+(.+)$")
        .expect("valid regex")
});

static MINUTES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s+(?:minutes?\s+)?(to|past|after)\s+(.+)$").expect("valid regex")
});

static NAMED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)(noon|midnight)(?:$|\s)").expect("valid regex"));

static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(\d+)(?:(?::(\d+))|(?:\s+(\d{2})))?(?:\s+o'clock)?(?:\s+(am|pm))?(?:$|\s)")
        .expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HourMinute {
    h: i64,
    m: i64,
}

impl HourMinute {
    fn seconds(self) -> i64 {
        self.h * SECONDS_HOUR + self.m * 60
    }
}

/// Parse a time of day to signed seconds from midnight.
///
/// Returns `None` when nothing in the phrase reads as a time.
///
/// # Examples
/// ```
/// use healthnlu_core::time::clock::{parse_clock_time, DayPreference};
///
/// assert_eq!(parse_clock_time("half past ten", DayPreference::Day, 12), Some(37_800));
/// assert_eq!(parse_clock_time("10 pm", DayPreference::Night, 12), Some(-7_200));
/// assert_eq!(parse_clock_time("steps", DayPreference::Day, 12), None);
/// ```
pub fn parse_clock_time(text: &str, preference: DayPreference, shift_hour: u32) -> Option<i64> {
    let text = convert_number_words(&text.to_lowercase());

    let seconds = if let Some(caps) = FRACTION_RE.captures(&text) {
        let anchor = parse_anchor(&caps[4], preference)?;
        let multiple: i64 = caps.get(1).and_then(|m| m.as_str().parse().ok()).unwrap_or(1);
        let ratio = if &caps[2] == "half" { 30 } else { 15 };
        anchor.seconds() + multiple * ratio * 60 * direction_sign(&caps[3])
    } else if let Some(caps) = MINUTES_RE.captures(&text) {
        let anchor = parse_anchor(&caps[3], preference)?;
        let minutes: i64 = caps[1].parse().ok()?;
        anchor.seconds() + minutes * 60 * direction_sign(&caps[2])
    } else {
        parse_anchor(&text, preference)?.seconds()
    };

    let result = seconds % SECONDS_DAY;
    if preference == DayPreference::Night && result >= i64::from(shift_hour) * SECONDS_HOUR {
        return Some(result - SECONDS_DAY);
    }
    Some(result)
}

fn direction_sign(word: &str) -> i64 {
    if word == "to" { -1 } else { 1 }
}

fn parse_anchor(text: &str, preference: DayPreference) -> Option<HourMinute> {
    if let Some(caps) = NAMED_RE.captures(text) {
        return Some(match &caps[1] {
            "noon" => HourMinute { h: 12, m: 0 },
            _ => match preference {
                DayPreference::Day => HourMinute { h: 24, m: 0 },
                DayPreference::Night => HourMinute { h: 0, m: 0 },
            },
        });
    }

    let caps = CLOCK_RE.captures(text)?;
    let hour_text = &caps[1];
    let minute = caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str());
    let marker = caps.get(4).map(|m| m.as_str());

    let (h, m) = match (minute, marker) {
        (None, None) => split_bare_number(hour_text)?,
        _ => {
            let h: i64 = hour_text.parse().ok()?;
            let m: i64 = minute.map_or(Some(0), |m| m.parse().ok())?;
            if h > 12 {
                return valid(h, m);
            }
            (h, m)
        }
    };
    if h > 12 {
        return valid(h, m);
    }

    let pm = match marker {
        Some(marker) => marker == "pm",
        None => match preference {
            DayPreference::Day => h < 4 || h == 12,
            DayPreference::Night => h >= 7 && h != 12,
        },
    };

    if h == 12 && m == 0 && !pm {
        return Some(match preference {
            DayPreference::Day => HourMinute { h: 24, m: 0 },
            DayPreference::Night => HourMinute { h: 0, m: 0 },
        });
    }
    valid(h % 12 + if pm { 12 } else { 0 }, m)
}

/// Read a bare numeral: `7` is 7:00, `730` is 7:30 and `1045` is 10:45.
fn split_bare_number(digits: &str) -> Option<(i64, i64)> {
    let number: i64 = digits.parse().ok()?;
    if number <= 12 {
        return Some((number, 0));
    }
    match digits.len() {
        2 | 3 => Some((digits[..1].parse().ok()?, digits[1..].parse().ok()?)),
        4 => Some((digits[..2].parse().ok()?, digits[2..].parse().ok()?)),
        _ => None,
    }
}

fn valid(h: i64, m: i64) -> Option<HourMinute> {
    ((0..=24).contains(&h) && (0..60).contains(&m)).then_some(HourMinute { h, m })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(text: &str) -> Option<i64> {
        parse_clock_time(text, DayPreference::Day, DEFAULT_BEDTIME_SHIFT_HOUR)
    }

    fn night(text: &str) -> Option<i64> {
        parse_clock_time(text, DayPreference::Night, DEFAULT_BEDTIME_SHIFT_HOUR)
    }

    fn hm(h: i64, m: i64) -> i64 {
        h * 3600 + m * 60
    }

    #[test]
    fn test_explicit_times() {
        assert_eq!(day("10:30"), Some(hm(10, 30)));
        assert_eq!(day("8 am"), Some(hm(8, 0)));
        assert_eq!(day("7:30 am"), Some(hm(7, 30)));
        assert_eq!(day("ten o'clock"), Some(hm(10, 0)));
        assert_eq!(day("18:15"), Some(hm(18, 15)));
        assert_eq!(day("12:30 pm"), Some(hm(12, 30)));
    }

    #[test]
    fn test_relative_phrases() {
        assert_eq!(day("half past eleven"), Some(hm(11, 30)));
        assert_eq!(day("ten to seven"), Some(hm(6, 50)));
        assert_eq!(day("quarter to twelve"), Some(hm(11, 45)));
        assert_eq!(day("a quarter to noon"), Some(hm(11, 45)));
        assert_eq!(day("5 minutes after 8"), Some(hm(8, 5)));
    }

    #[test]
    fn test_dictated_numerals() {
        assert_eq!(day("730"), Some(hm(7, 30)));
        assert_eq!(day("seven thirty"), Some(hm(7, 30)));
        assert_eq!(day("1045"), Some(hm(10, 45)));
        assert_eq!(day("15"), Some(hm(1, 5) + 12 * 3600));
    }

    #[test]
    fn test_am_pm_inference() {
        assert_eq!(day("3"), Some(hm(15, 0)));
        assert_eq!(day("7"), Some(hm(7, 0)));
        assert_eq!(night("3"), Some(hm(3, 0)));
        assert_eq!(night("11"), Some(hm(23, 0) - SECONDS_DAY));
        assert_eq!(night("12"), Some(0));
    }

    #[test]
    fn test_midnight_depends_on_preference() {
        assert_eq!(night("midnight"), Some(0));
        assert_eq!(night("half past midnight"), Some(hm(0, 30)));
        // a full day wraps to zero
        assert_eq!(day("midnight"), Some(0));
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(day("later"), None);
        assert_eq!(day("99:99"), None);
    }
}
