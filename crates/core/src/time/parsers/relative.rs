//! Expressions anchored on today: "last 7 days", "last month", "yesterday",
//! "3 weeks ago".

use chrono::{Duration, NaiveDate};
use regex::{Captures, Regex};

use crate::error::{NluError, compile};
use crate::numbers::{count_pattern, parse_number};
use crate::time::engine::{ParseContext, ParsedComponents, ParsedResult, Parser};
use crate::vars::datemath::{DurationUnit, period_bounds, shift};

fn parse_count(text: &str) -> Option<i64> {
    let n = parse_number(text)?;
    (n >= 1.0 && n.fract() == 0.0).then_some(n as i64)
}

/// `(recent|past|last) N days|weeks|months|years`: N units ending today.
pub struct RecentDurationParser {
    pattern: Regex,
}

impl RecentDurationParser {
    pub fn new() -> Result<Self, NluError> {
        let pattern = format!(
            r"\b(?:recent|resent|past|last)\s+({})\s+(days?|weeks?|months?|years?)\b",
            count_pattern()
        );
        Ok(Self { pattern: compile("recent-duration", &pattern)? })
    }
}

impl Parser for RecentDurationParser {
    fn name(&self) -> &'static str {
        "recent-duration"
    }

    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn extract(&self, _text: &str, caps: &Captures<'_>, ctx: &ParseContext) -> Option<ParsedResult> {
        let count = parse_count(&caps[1])?;
        let unit = DurationUnit::from_word(&caps[2])?;
        let today = ctx.reference;
        let start = match unit {
            DurationUnit::Days => today - Duration::days(count - 1),
            _ => shift(today, -count, unit) + Duration::days(1),
        };
        Some(ParsedResult::known_range(caps, start, today))
    }
}

/// `last last month`, `this week`, `past year`: whole calendar periods.
pub struct RelativePeriodParser {
    pattern: Regex,
}

impl RelativePeriodParser {
    pub fn new() -> Result<Self, NluError> {
        let pattern = r"\b((?:(?:this|current|present|last|lost|past|recent)\s+)+)(week|month|year)\b";
        Ok(Self { pattern: compile("relative-period", pattern)? })
    }
}

impl Parser for RelativePeriodParser {
    fn name(&self) -> &'static str {
        "relative-period"
    }

    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn extract(&self, _text: &str, caps: &Captures<'_>, ctx: &ParseContext) -> Option<ParsedResult> {
        let unit = DurationUnit::from_word(&caps[2])?;
        let back = caps[1]
            .split_whitespace()
            .filter(|w| matches!(*w, "last" | "lost" | "past" | "recent"))
            .count() as i64;
        let (start, end) = period_bounds(shift(ctx.reference, -back, unit), unit);
        Some(ParsedResult::known_range(caps, start, end))
    }
}

/// `today`, `yesterday`, `the day before yesterday`.
pub struct CasualDayParser {
    pattern: Regex,
}

impl CasualDayParser {
    pub fn new() -> Result<Self, NluError> {
        let pattern = r"\b(the\s+day\s+before\s+yesterday|today|tonight|yesterday)\b";
        Ok(Self { pattern: compile("casual-day", pattern)? })
    }
}

impl Parser for CasualDayParser {
    fn name(&self) -> &'static str {
        "casual-day"
    }

    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn extract(&self, _text: &str, caps: &Captures<'_>, ctx: &ParseContext) -> Option<ParsedResult> {
        let days_back = match &caps[1] {
            "today" | "tonight" => 0,
            "yesterday" => 1,
            _ => 2,
        };
        let date: NaiveDate = ctx.reference - Duration::days(days_back);
        Some(ParsedResult::from_match(caps, ParsedComponents::known(date)))
    }
}

/// `N days|weeks|months|years ago`: a single day.
pub struct TimeAgoParser {
    pattern: Regex,
}

impl TimeAgoParser {
    pub fn new() -> Result<Self, NluError> {
        let pattern = format!(r"\b({})\s+(days?|weeks?|months?|years?)\s+ago\b", count_pattern());
        Ok(Self { pattern: compile("time-ago", &pattern)? })
    }
}

impl Parser for TimeAgoParser {
    fn name(&self) -> &'static str {
        "time-ago"
    }

    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn extract(&self, _text: &str, caps: &Captures<'_>, ctx: &ParseContext) -> Option<ParsedResult> {
        let count = parse_count(&caps[1])?;
        let unit = DurationUnit::from_word(&caps[2])?;
        let date = shift(ctx.reference, -count, unit);
        Some(ParsedResult::from_match(caps, ParsedComponents::known(date)))
    }
}
