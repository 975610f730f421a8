//! Dates defined by the data itself rather than the calendar.

use regex::{Captures, Regex};

use crate::error::{NluError, compile};
use crate::time::engine::{ParseContext, ParsedComponents, ParsedResult, Parser};

/// `the first day of data` and `the entire dataset`.
///
/// Both need the earliest available date; without one nothing is produced.
pub struct DatasetBoundParser {
    pattern: Regex,
}

impl DatasetBoundParser {
    pub fn new() -> Result<Self, NluError> {
        let pattern = r"\b(?:the\s+)?(?:((?:first|initial)\s+day(?:\s+of\s+(?:the\s+)?(?:data(?:set)?|records?))?)|((?:entire|whole)\s+(?:period|range|dataset|data)))\b";
        Ok(Self { pattern: compile("dataset-bound", pattern)? })
    }
}

impl Parser for DatasetBoundParser {
    fn name(&self) -> &'static str {
        "dataset-bound"
    }

    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn extract(&self, _text: &str, caps: &Captures<'_>, ctx: &ParseContext) -> Option<ParsedResult> {
        let initial = ctx.data_initial_date?;
        if caps.get(1).is_some() {
            Some(ParsedResult::from_match(caps, ParsedComponents::known(initial)))
        } else {
            Some(ParsedResult::known_range(caps, initial, ctx.reference))
        }
    }
}
