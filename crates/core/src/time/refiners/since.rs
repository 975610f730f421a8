use regex::Regex;

use crate::error::{NluError, compile};
use crate::time::engine::{ParseContext, ParsedComponents, ParsedResult, Refiner};

/// `since X`: from the start of X up to today.
pub struct SinceRefiner {
    keyword: Regex,
}

impl SinceRefiner {
    pub fn new() -> Result<Self, NluError> {
        Ok(Self { keyword: compile("since", r"\bsince\s+$")? })
    }
}

impl Refiner for SinceRefiner {
    fn name(&self) -> &'static str {
        "since"
    }

    fn refine(&self, text: &str, results: Vec<ParsedResult>, ctx: &ParseContext) -> Vec<ParsedResult> {
        results
            .into_iter()
            .map(|mut result| {
                let Some(m) = text.get(..result.index).and_then(|before| self.keyword.find(before))
                else {
                    return result;
                };
                result.text = text[m.start()..result.end_index()].to_string();
                result.index = m.start();
                result.end = Some(ParsedComponents::known(ctx.reference));
                result.preposition = Some("since".to_string());
                result.tags.insert("since");
                result
            })
            .collect()
    }
}
