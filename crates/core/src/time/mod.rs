//! Time expressions: calendar dates and ranges, clock times and durations.
//!
//! [`TimeExtractor`] finds every date or date range in a sentence and
//! resolves it against a reference "today". The [`clock`] and [`duration`]
//! helpers read the values of sleep-related conditions.

pub mod clock;
pub mod duration;
pub mod engine;
pub mod holidays;
pub mod parsers;
pub mod refiners;

use std::ops::Range;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::NluError;
use crate::vars::datemath::{
    end_of_month, end_of_year, start_of_month, start_of_year, to_numbered_date,
};
use crate::vars::types::VariableValue;
use engine::{Engine, ParseContext, ParsedComponents, ParsedResult, preceding_word};
use parsers::{
    CasualDayParser, DatasetBoundParser, HolidayParser, MonthDayParser, MonthNameParser,
    RecentDurationParser, RelativePeriodParser, SeasonParser, TimeAgoParser, WeekdayParser,
    YearParser,
};
use refiners::{AroundRefiner, MergeDateRangeRefiner, SinceRefiner};

/// Words recorded as the preposition of a time phrase.
const PREPOSITIONS: &[&str] = &[
    "on", "in", "at", "during", "since", "from", "for", "of", "until", "till", "before",
    "after", "around", "near", "between", "by", "to", "through",
];

/// A resolved date or date range found in a sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeExpression {
    /// Byte range in the scanned text.
    pub span: Range<usize>,
    pub text: String,
    /// Either [`VariableValue::Date`] or [`VariableValue::Period`].
    pub value: VariableValue,
    /// Whether the year was stated or computed rather than guessed.
    pub certain: bool,
    pub preposition: Option<String>,
}

/// The configured date rule engine.
pub struct TimeExtractor {
    engine: Engine,
}

impl TimeExtractor {
    /// Compile every date rule.
    pub fn new() -> Result<Self, NluError> {
        let mut engine = Engine::new();
        engine
            .add_parser(RecentDurationParser::new()?)
            .add_parser(RelativePeriodParser::new()?)
            .add_parser(CasualDayParser::new()?)
            .add_parser(TimeAgoParser::new()?)
            .add_parser(DatasetBoundParser::new()?)
            .add_parser(HolidayParser::new()?)
            .add_parser(SeasonParser::new()?)
            .add_parser(MonthDayParser::new()?)
            .add_parser(MonthNameParser::new()?)
            .add_parser(WeekdayParser::new()?)
            .add_parser(YearParser::new()?)
            .add_refiner(MergeDateRangeRefiner::new()?)
            .add_refiner(SinceRefiner::new()?)
            .add_refiner(AroundRefiner::new()?);
        Ok(Self { engine })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Find every time expression in `text`, in order of appearance.
    pub fn extract(&self, text: &str, ctx: &ParseContext) -> Vec<TimeExpression> {
        let expressions: Vec<TimeExpression> = self
            .engine
            .parse(text, ctx)
            .into_iter()
            .filter_map(|result| to_expression(text, result, ctx.reference))
            .collect();
        debug!(count = expressions.len(), "time expressions extracted");
        expressions
    }

    /// The first time expression in `text`, if any.
    pub fn extract_first(&self, text: &str, ctx: &ParseContext) -> Option<TimeExpression> {
        self.extract(text, ctx).into_iter().next()
    }
}

fn snap_start(c: &ParsedComponents, reference: NaiveDate) -> Option<NaiveDate> {
    let date = c.date(reference)?;
    Some(if c.day.is_known() {
        date
    } else if c.month.is_known() {
        start_of_month(date)
    } else if c.year.is_known() {
        start_of_year(date)
    } else {
        date
    })
}

fn snap_end(c: &ParsedComponents, reference: NaiveDate) -> Option<NaiveDate> {
    let date = c.date(reference)?;
    Some(if c.day.is_known() {
        date
    } else if c.month.is_known() {
        end_of_month(date)
    } else if c.year.is_known() {
        end_of_year(date)
    } else {
        date
    })
}

fn to_expression(text: &str, result: ParsedResult, reference: NaiveDate) -> Option<TimeExpression> {
    let start = &result.start;
    let certain = start.year.is_known() && result.end.as_ref().is_none_or(|e| e.year.is_known());

    let value = match &result.end {
        Some(end) => {
            let a = to_numbered_date(snap_start(start, reference)?);
            let b = to_numbered_date(snap_end(end, reference)?);
            VariableValue::Period([a.min(b), a.max(b)])
        }
        None => {
            let date = start.date(reference)?;
            if start.day.is_known() || start.weekday.is_some() {
                VariableValue::Date(to_numbered_date(date))
            } else if start.month.is_known() {
                VariableValue::Period([
                    to_numbered_date(start_of_month(date)),
                    to_numbered_date(end_of_month(date)),
                ])
            } else if start.year.is_known() {
                VariableValue::Period([
                    to_numbered_date(start_of_year(date)),
                    to_numbered_date(end_of_year(date)),
                ])
            } else {
                return None;
            }
        }
    };

    let preposition = result.preposition.clone().or_else(|| {
        preceding_word(text, result.index)
            .filter(|w| PREPOSITIONS.contains(w))
            .map(str::to_string)
    });

    Some(TimeExpression {
        span: result.span(),
        text: result.text,
        value,
        certain,
        preposition,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ParseContext {
        ParseContext {
            reference: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
            data_initial_date: None,
        }
    }

    #[test]
    fn test_rules_compile_in_order() {
        let extractor = TimeExtractor::new().unwrap();
        let parsers: Vec<_> = extractor.engine().parser_names().collect();
        assert_eq!(parsers.first(), Some(&"recent-duration"));
        assert_eq!(parsers.last(), Some(&"year"));
        let refiners: Vec<_> = extractor.engine().refiner_names().collect();
        assert_eq!(refiners, ["merge-date-range", "since", "around"]);
    }

    #[test]
    fn test_span_and_preposition() {
        let extractor = TimeExtractor::new().unwrap();
        let found = extractor.extract("my steps in march", &ctx());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span, 12..17);
        assert_eq!(found[0].preposition.as_deref(), Some("in"));
        assert!(!found[0].certain);
    }

    #[test]
    fn test_weekday_alone_is_a_date() {
        let extractor = TimeExtractor::new().unwrap();
        let found = extractor.extract_first("monday", &ctx()).unwrap();
        assert_eq!(found.value, VariableValue::Date(20200224));
    }

    #[test]
    fn test_nothing_found() {
        let extractor = TimeExtractor::new().unwrap();
        assert!(extractor.extract("show my weight", &ctx()).is_empty());
    }
}
