use regex::{Captures, Regex};

use crate::error::{NluError, compile};
use crate::time::engine::{
    ParseContext, ParsedComponents, ParsedResult, Parser, Value, preceding_word,
};

/// A bare `19xx`/`20xx` year. Numbers after "than" are comparisons, not years.
pub struct YearParser {
    pattern: Regex,
}

impl YearParser {
    pub fn new() -> Result<Self, NluError> {
        Ok(Self { pattern: compile("year", r"\b((?:19|20)\d{2})\b")? })
    }
}

impl Parser for YearParser {
    fn name(&self) -> &'static str {
        "year"
    }

    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn extract(&self, text: &str, caps: &Captures<'_>, _ctx: &ParseContext) -> Option<ParsedResult> {
        let m = caps.get(1)?;
        if preceding_word(text, m.start()) == Some("than") {
            return None;
        }
        let start = ParsedComponents {
            year: Value::Known(m.as_str().parse().ok()?),
            month: Value::Implied(1),
            day: Value::Implied(1),
            weekday: None,
        };
        Some(ParsedResult::from_match(caps, start))
    }
}
