use chrono::Duration;
use regex::{Captures, Regex};

use crate::error::{NluError, compile};
use crate::time::engine::{ParseContext, ParsedComponents, ParsedResult, Parser};
use crate::vars::datemath::{
    Direction, WEEKDAY_PATTERN, find_relative_weekday, parse_weekday, start_of_week,
};

/// `monday`, `last friday`, `this wednesday`, `tuesday next week`.
///
/// Without a qualifier the most recent occurrence (today included) is
/// implied; only the weekday itself is certain then.
pub struct WeekdayParser {
    pattern: Regex,
}

impl WeekdayParser {
    pub fn new() -> Result<Self, NluError> {
        let qualifier = r"(?:(?:this|last|past|next)\s+)+";
        let pattern = format!(
            r"\b({qualifier})?({WEEKDAY_PATTERN})\b(?:\s+(?:(?:of|on|in)\s+)?({qualifier})week\b)?"
        );
        Ok(Self { pattern: compile("weekday", &pattern)? })
    }
}

impl Parser for WeekdayParser {
    fn name(&self) -> &'static str {
        "weekday"
    }

    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn extract(&self, _text: &str, caps: &Captures<'_>, ctx: &ParseContext) -> Option<ParsedResult> {
        let weekday = parse_weekday(&caps[2])?;
        let today = ctx.reference;
        let qualifier = caps.get(1).or_else(|| caps.get(3)).map(|m| m.as_str()).unwrap_or("");
        let words: Vec<&str> = qualifier.split_whitespace().collect();

        let recent = find_relative_weekday(today, weekday, Direction::Previous);
        let in_week = start_of_week(today) + Duration::days(i64::from(weekday.num_days_from_monday()));

        let start = if words.is_empty() {
            let mut start = ParsedComponents::implied(recent);
            start.weekday = Some(weekday);
            start
        } else if words.iter().all(|w| *w == "past") {
            ParsedComponents::known(recent)
        } else if words.contains(&"this") {
            ParsedComponents::known(in_week)
        } else if words.contains(&"next") {
            ParsedComponents::known(in_week + Duration::weeks(1))
        } else {
            let lasts = words.iter().filter(|w| matches!(**w, "last" | "past")).count() as i64;
            ParsedComponents::known(recent - Duration::weeks(lasts))
        };

        Some(ParsedResult::from_match(caps, start))
    }
}
