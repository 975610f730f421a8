//! Rule engine for date expressions.
//!
//! Every [`Parser`] scans the text with its pattern and turns matches into
//! [`ParsedResult`]s. Results are ordered by position, overlaps are resolved
//! in favour of the longest match, and the [`Refiner`]s then run in
//! registration order over the surviving list.

use std::collections::BTreeSet;
use std::ops::Range;

use chrono::{Datelike, NaiveDate, Weekday};
use regex::{Captures, Regex};
use tracing::trace;

use crate::vars::datemath::overflowing_ymd;

/// A date component and how sure we are of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Value<T> {
    #[default]
    Unknown,
    /// Filled in by inference (closest year, first of month, ...).
    Implied(T),
    /// Stated in the text or computed exactly.
    Known(T),
}

impl<T: Copy> Value<T> {
    pub fn get(self) -> Option<T> {
        match self {
            Value::Unknown => None,
            Value::Implied(v) | Value::Known(v) => Some(v),
        }
    }

    pub fn known(self) -> Option<T> {
        match self {
            Value::Known(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_known(self) -> bool {
        matches!(self, Value::Known(_))
    }

    /// Set an implied value unless the component is already known.
    pub fn imply(&mut self, v: T) {
        if !self.is_known() {
            *self = Value::Implied(v);
        }
    }

    /// Replace the value, keeping whether it was known.
    pub fn replace(&mut self, v: T) {
        *self = match self {
            Value::Known(_) => Value::Known(v),
            _ => Value::Implied(v),
        };
    }
}

/// Year, month and day of one end of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParsedComponents {
    pub year: Value<i32>,
    pub month: Value<u32>,
    pub day: Value<u32>,
    /// Set when a weekday was named but the calendar date was inferred.
    pub weekday: Option<Weekday>,
}

impl ParsedComponents {
    /// All three components known.
    pub fn known(date: NaiveDate) -> Self {
        Self {
            year: Value::Known(date.year()),
            month: Value::Known(date.month()),
            day: Value::Known(date.day()),
            weekday: None,
        }
    }

    /// All three components implied.
    pub fn implied(date: NaiveDate) -> Self {
        Self {
            year: Value::Implied(date.year()),
            month: Value::Implied(date.month()),
            day: Value::Implied(date.day()),
            weekday: None,
        }
    }

    /// Imply every component that is not already known.
    pub fn imply_date(&mut self, date: NaiveDate) {
        self.year.imply(date.year());
        self.month.imply(date.month());
        self.day.imply(date.day());
    }

    /// Only the weekday was certain.
    pub fn is_only_weekday(&self) -> bool {
        self.weekday.is_some()
            && !self.year.is_known()
            && !self.month.is_known()
            && !self.day.is_known()
    }

    /// Resolve to a calendar date, filling gaps from `reference`.
    pub fn date(&self, reference: NaiveDate) -> Option<NaiveDate> {
        let year = self.year.get().unwrap_or(reference.year());
        let month = self.month.get().unwrap_or(reference.month());
        let day = self.day.get().unwrap_or(reference.day());
        overflowing_ymd(year, i64::from(month), i64::from(day))
    }

    /// Copy known components of `other` into the gaps of `self`.
    pub fn fill_known_from(&mut self, other: &ParsedComponents) {
        if let (false, Some(v)) = (self.year.is_known(), other.year.known()) {
            self.year = Value::Known(v);
        }
        if let (false, Some(v)) = (self.month.is_known(), other.month.known()) {
            self.month = Value::Known(v);
        }
        if let (false, Some(v)) = (self.day.is_known(), other.day.known()) {
            self.day = Value::Known(v);
        }
    }
}

/// One recognized date expression, possibly a range.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResult {
    /// Byte offset of the match in the scanned text.
    pub index: usize,
    pub text: String,
    pub start: ParsedComponents,
    pub end: Option<ParsedComponents>,
    /// Names of the rules that produced or touched this result.
    pub tags: BTreeSet<&'static str>,
    /// Preposition absorbed into the match ("since", "around").
    pub preposition: Option<String>,
}

impl ParsedResult {
    pub fn new(index: usize, text: impl Into<String>, start: ParsedComponents) -> Self {
        Self {
            index,
            text: text.into(),
            start,
            end: None,
            tags: BTreeSet::new(),
            preposition: None,
        }
    }

    /// A result spanning a whole capture match.
    pub fn from_match(caps: &Captures<'_>, start: ParsedComponents) -> Self {
        let m = caps.get(0).map_or((0, ""), |m| (m.start(), m.as_str()));
        Self::new(m.0, m.1, start)
    }

    /// Result with both ends known.
    pub fn known_range(caps: &Captures<'_>, from: NaiveDate, to: NaiveDate) -> Self {
        let mut result = Self::from_match(caps, ParsedComponents::known(from));
        result.end = Some(ParsedComponents::known(to));
        result
    }

    pub fn with_tag(mut self, tag: &'static str) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn span(&self) -> Range<usize> {
        self.index..self.end_index()
    }

    pub fn end_index(&self) -> usize {
        self.index + self.text.len()
    }
}

/// Inputs every rule may consult.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext {
    /// The date taken as "today".
    pub reference: NaiveDate,
    /// Earliest date with data, when known.
    pub data_initial_date: Option<NaiveDate>,
}

/// A rule that recognizes one family of date expressions.
pub trait Parser: Send + Sync {
    fn name(&self) -> &'static str;

    fn pattern(&self) -> &Regex;

    /// Build a result from a pattern match, or reject the match.
    fn extract(&self, text: &str, caps: &Captures<'_>, ctx: &ParseContext) -> Option<ParsedResult>;
}

/// A rule that rewrites the list of parsed results.
pub trait Refiner: Send + Sync {
    fn name(&self) -> &'static str;

    fn refine(&self, text: &str, results: Vec<ParsedResult>, ctx: &ParseContext) -> Vec<ParsedResult>;
}

/// Ordered parsers and refiners.
#[derive(Default)]
pub struct Engine {
    parsers: Vec<Box<dyn Parser>>,
    refiners: Vec<Box<dyn Refiner>>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_parser(&mut self, parser: impl Parser + 'static) -> &mut Self {
        self.parsers.push(Box::new(parser));
        self
    }

    pub fn add_refiner(&mut self, refiner: impl Refiner + 'static) -> &mut Self {
        self.refiners.push(Box::new(refiner));
        self
    }

    pub fn parser_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.parsers.iter().map(|p| p.name())
    }

    pub fn refiner_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.refiners.iter().map(|r| r.name())
    }

    /// Run every rule over `text`.
    pub fn parse(&self, text: &str, ctx: &ParseContext) -> Vec<ParsedResult> {
        let mut results = Vec::new();
        for parser in &self.parsers {
            for caps in parser.pattern().captures_iter(text) {
                if let Some(result) = parser.extract(text, &caps, ctx) {
                    trace!(parser = parser.name(), text = %result.text, "date rule matched");
                    results.push(result.with_tag(parser.name()));
                }
            }
        }

        results.sort_by_key(|r| r.index);
        let mut results = remove_overlaps(results);

        for refiner in &self.refiners {
            results = refiner.refine(text, results, ctx);
        }
        results
    }
}

/// Keep the longest of every group of overlapping results.
fn remove_overlaps(results: Vec<ParsedResult>) -> Vec<ParsedResult> {
    let mut kept: Vec<ParsedResult> = Vec::with_capacity(results.len());
    for result in results {
        match kept.last_mut() {
            Some(prev) if result.index < prev.end_index() => {
                if result.text.len() > prev.text.len() {
                    *prev = result;
                }
            }
            _ => kept.push(result),
        }
    }
    kept
}

/// The word right before `index`, if any.
pub(crate) fn preceding_word(text: &str, index: usize) -> Option<&str> {
    text.get(..index)?.split_whitespace().next_back()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_unknown_components_come_from_reference() {
        let mut c = ParsedComponents::default();
        c.month = Value::Known(2);
        c.day = Value::Implied(1);
        assert_eq!(c.date(ymd(2020, 3, 1)), Some(ymd(2020, 2, 1)));
    }

    #[test]
    fn test_imply_keeps_known_values() {
        let mut c = ParsedComponents::known(ymd(2019, 10, 10));
        c.imply_date(ymd(2020, 1, 1));
        assert_eq!(c.year, Value::Known(2019));
        assert!(!c.is_only_weekday());
    }

    #[test]
    fn test_overlaps_keep_longest() {
        let a = ParsedResult::new(0, "march", ParsedComponents::default());
        let b = ParsedResult::new(0, "march 5", ParsedComponents::default());
        let c = ParsedResult::new(12, "2019", ParsedComponents::default());
        let kept = remove_overlaps(vec![a, b, c]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].text, "march 5");
    }

    #[test]
    fn test_preceding_word() {
        assert_eq!(preceding_word("steps since march", 12), Some("since"));
        assert_eq!(preceding_word("march", 0), None);
    }
}
