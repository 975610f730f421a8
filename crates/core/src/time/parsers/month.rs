//! Month names, with or without a day.

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Match, Regex};

use crate::error::{NluError, compile};
use crate::time::engine::{ParseContext, ParsedComponents, ParsedResult, Parser, Value};
use crate::vars::datemath::{MONTH_PATTERN, closest_past_year, end_of_month, parse_month};

/// Read a year, accepting the dictated `20:19` form.
fn parse_year(text: &str) -> Option<i32> {
    text.replace(':', "").parse().ok()
}

/// `march 5`, `january 20th`, `december 12th, 2019`.
pub struct MonthDayParser {
    pattern: Regex,
}

impl MonthDayParser {
    pub fn new() -> Result<Self, NluError> {
        let pattern = format!(
            r"\b({MONTH_PATTERN})\s+(\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s+([12]\d{{3}})\b)?"
        );
        Ok(Self { pattern: compile("month-day", &pattern)? })
    }
}

impl Parser for MonthDayParser {
    fn name(&self) -> &'static str {
        "month-day"
    }

    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn extract(&self, _text: &str, caps: &Captures<'_>, ctx: &ParseContext) -> Option<ParsedResult> {
        let month = parse_month(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        if !(1..=31).contains(&day) {
            return None;
        }
        let year = match caps.get(3) {
            Some(y) => {
                let year = y.as_str().parse().ok()?;
                NaiveDate::from_ymd_opt(year, month, day)?;
                Value::Known(year)
            }
            None => Value::Implied(closest_past_year(ctx.reference, month, day)),
        };
        let start = ParsedComponents {
            year,
            month: Value::Known(month),
            day: Value::Known(day),
            weekday: None,
        };
        Some(ParsedResult::from_match(caps, start))
    }
}

/// `january`, `last march`, `february of last year`, `june 2019`.
pub struct MonthNameParser {
    pattern: Regex,
}

impl MonthNameParser {
    pub fn new() -> Result<Self, NluError> {
        let qualifier = r"(?:(?:this|last|past|next)\s+)+";
        let pattern = format!(
            r"\b(?:the\s+)?({qualifier})?({MONTH_PATTERN})(?:\s+(?:(?:of|in)\s+)?(?:the\s+)?(?:({qualifier})year|([12]\d:?\d{{2}})))?\b"
        );
        Ok(Self { pattern: compile("month-name", &pattern)? })
    }
}

const MODAL_SUBJECTS: &[&str] = &["i", "we", "you", "he", "she", "they"];

/// "may i", "may we": the modal, not the month.
fn is_modal_may(text: &str, month: Match<'_>) -> bool {
    month.as_str() == "may"
        && text[month.end()..].split_whitespace().next().is_some_and(|w| MODAL_SUBJECTS.contains(&w))
}

fn count_lasts(words: &str) -> i32 {
    words.split_whitespace().filter(|w| matches!(*w, "last" | "past")).count() as i32
}

impl Parser for MonthNameParser {
    fn name(&self) -> &'static str {
        "month-name"
    }

    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn extract(&self, text: &str, caps: &Captures<'_>, ctx: &ParseContext) -> Option<ParsedResult> {
        let qualified = caps.get(1).is_some() || caps.get(3).is_some() || caps.get(4).is_some();
        if !qualified && is_modal_may(text, caps.get(2)?) {
            return None;
        }
        let month = parse_month(&caps[2])?;
        let today = ctx.reference;

        let year = if let Some(stated) = caps.get(4) {
            Value::Known(parse_year(stated.as_str())?)
        } else if let Some(suffix) = caps.get(3) {
            let suffix = suffix.as_str();
            let year = if suffix.contains("next") {
                today.year() + 1
            } else {
                today.year() - count_lasts(suffix)
            };
            Value::Known(year)
        } else if let Some(prefix) = caps.get(1) {
            let prefix = prefix.as_str();
            let first = NaiveDate::from_ymd_opt(today.year(), month, 1)?;
            let lasts = count_lasts(prefix);
            let year = if lasts > 0 {
                // the k-th most recent month of that name that has ended
                let pivot_year = if end_of_month(first) > today { today.year() - 1 } else { today.year() };
                pivot_year - (lasts - 1)
            } else if prefix.contains("next") {
                if first > today { today.year() } else { today.year() + 1 }
            } else {
                today.year()
            };
            Value::Known(year)
        } else {
            Value::Implied(closest_past_year(today, month, 1))
        };

        let start = ParsedComponents {
            year,
            month: Value::Known(month),
            day: Value::Implied(1),
            weekday: None,
        };
        Some(ParsedResult::from_match(caps, start))
    }
}
