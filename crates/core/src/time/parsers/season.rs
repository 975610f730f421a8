use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};

use crate::error::{NluError, compile};
use crate::time::engine::{ParseContext, ParsedResult, Parser};
use crate::vars::datemath::days_in_month;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    fn from_word(word: &str) -> Option<Self> {
        match word {
            "spring" => Some(Season::Spring),
            "summer" => Some(Season::Summer),
            "fall" | "autumn" => Some(Season::Fall),
            "winter" => Some(Season::Winter),
            _ => None,
        }
    }

    /// First and last day of the season starting in `year`.
    fn range(self, year: i32) -> Option<(NaiveDate, NaiveDate)> {
        let (first_month, end_year, last_month) = match self {
            Season::Spring => (3, year, 5),
            Season::Summer => (6, year, 8),
            Season::Fall => (9, year, 11),
            Season::Winter => (12, year + 1, 2),
        };
        Some((
            NaiveDate::from_ymd_opt(year, first_month, 1)?,
            NaiveDate::from_ymd_opt(end_year, last_month, days_in_month(end_year, last_month))?,
        ))
    }
}

/// `spring`, `last winter`, `2018 summer`, `fall of 2019`.
pub struct SeasonParser {
    pattern: Regex,
}

impl SeasonParser {
    pub fn new() -> Result<Self, NluError> {
        let pattern = r"\b(?:([12]\d{3})(?:'s)?\s+|((?:last,?\s+)+))?(spring|summer|fall|autumn|winter)(?:\s+(?:(?:of|in)\s+)?([12]\d{3}))?\b";
        Ok(Self { pattern: compile("season", pattern)? })
    }
}

impl Parser for SeasonParser {
    fn name(&self) -> &'static str {
        "season"
    }

    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn extract(&self, _text: &str, caps: &Captures<'_>, ctx: &ParseContext) -> Option<ParsedResult> {
        let season = Season::from_word(&caps[3])?;
        let stated_year = caps.get(1).or_else(|| caps.get(4)).and_then(|m| m.as_str().parse().ok());

        let (start, end) = match stated_year {
            Some(year) => season.range(year)?,
            None => {
                let today = ctx.reference;
                let mut year = today.year();
                let mut range = season.range(year)?;
                while today < range.0 {
                    year -= 1;
                    range = season.range(year)?;
                }
                let lasts = caps.get(2).map_or(0, |m| m.as_str().split_whitespace().count()) as i32;
                if lasts > 0 {
                    year -= if today < range.1 { lasts } else { lasts - 1 };
                    range = season.range(year)?;
                }
                range
            }
        };
        Some(ParsedResult::known_range(caps, start, end))
    }
}
