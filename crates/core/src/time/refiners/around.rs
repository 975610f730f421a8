use chrono::Duration;
use regex::Regex;

use crate::error::{NluError, compile};
use crate::time::engine::{ParseContext, ParsedComponents, ParsedResult, Refiner};

const AROUND_DAYS: i64 = 3;

/// `around X` / `near X` for a single day: three days either side.
pub struct AroundRefiner {
    keyword: Regex,
}

impl AroundRefiner {
    pub fn new() -> Result<Self, NluError> {
        Ok(Self { keyword: compile("around", r"\b(around|near)\s+$")? })
    }
}

impl Refiner for AroundRefiner {
    fn name(&self) -> &'static str {
        "around"
    }

    fn refine(&self, text: &str, results: Vec<ParsedResult>, ctx: &ParseContext) -> Vec<ParsedResult> {
        results
            .into_iter()
            .map(|mut result| {
                if result.end.is_some() || !result.start.day.is_known() {
                    return result;
                }
                let Some(caps) = text.get(..result.index).and_then(|before| self.keyword.captures(before))
                else {
                    return result;
                };
                let Some(pivot) = result.start.date(ctx.reference) else {
                    return result;
                };
                let start = caps.get(0).map_or(result.index, |m| m.start());
                result.preposition = Some(caps[1].to_string());
                result.text = text[start..result.end_index()].to_string();
                result.index = start;
                result.start = ParsedComponents::known(pivot - Duration::days(AROUND_DAYS));
                result.end = Some(ParsedComponents::known(pivot + Duration::days(AROUND_DAYS)));
                result.tags.insert("around");
                result
            })
            .collect()
    }
}
