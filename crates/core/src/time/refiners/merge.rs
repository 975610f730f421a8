//! Joins "X to Y" into one range.
//!
//! Dictation often turns "to" into "two" or "2", and sometimes glues that 2
//! onto the preceding number ("january 22 february 10" for "january 20 to
//! february 10"). Both cases are merged here; the second one is a best-effort
//! guess that rewrites the trailing number of the first result.

use chrono::{Datelike, Duration};
use regex::Regex;
use tracing::debug;

use crate::error::{NluError, compile};
use crate::time::engine::{ParseContext, ParsedResult, Refiner, Value};
use crate::vars::datemath::add_years;

pub struct MergeDateRangeRefiner {
    connector: Regex,
    spacer: Regex,
    trailing_two: Regex,
}

impl MergeDateRangeRefiner {
    pub fn new() -> Result<Self, NluError> {
        Ok(Self {
            connector: compile(
                "merge-connector",
                r"^[,.]?\s*(?:to|through|thru|till|until|two|-|2)\s*$",
            )?,
            spacer: compile("merge-spacer", r"^[,.]?\s*$")?,
            trailing_two: compile("merge-trailing-two", r"(?:2nd|2)$")?,
        })
    }

    /// Decide whether `prev` and `next` form a range, fixing `prev` when
    /// its trailing 2 was a misheard "to".
    fn should_merge(
        &self,
        text: &str,
        prev: &mut ParsedResult,
        next: &ParsedResult,
        ctx: &ParseContext,
    ) -> bool {
        let Some(between) = text.get(prev.end_index()..next.index) else {
            return false;
        };
        if self.connector.is_match(between) {
            return true;
        }
        if !self.spacer.is_match(between) || !self.trailing_two.is_match(&prev.text) {
            return false;
        }

        let year = prev.start.year.known().filter(|y| ends_with_two(i64::from(*y)));
        let day = prev.start.day.known().filter(|d| ends_with_two(i64::from(*d)));
        match (year, day) {
            (Some(y), Some(d)) => {
                if y > ctx.reference.year() {
                    prev.start.year = Value::Known(y - 2);
                } else {
                    prev.start.day = Value::Known(d - 2);
                }
            }
            (Some(y), None) => prev.start.year = Value::Known(y - 2),
            (None, Some(d)) => prev.start.day = Value::Known(d - 2),
            (None, None) => return false,
        }
        debug!(text = %prev.text, "read trailing 2 as \"to\"");
        true
    }
}

fn ends_with_two(value: i64) -> bool {
    value > 20 && value % 10 == 2
}

fn merge(text: &str, mut from: ParsedResult, mut to: ParsedResult, ctx: &ParseContext) -> ParsedResult {
    let reference = ctx.reference;

    if !from.start.is_only_weekday() && !to.start.is_only_weekday() {
        from.start.fill_known_from(&to.start);
        to.start.fill_known_from(&from.start);
    }

    if let (Some(from_date), Some(to_date)) = (from.start.date(reference), to.start.date(reference))
        && from_date > to_date
    {
        let week = Duration::weeks(1);
        if from.start.is_only_weekday() && from_date - week < to_date {
            let moved = from_date - week;
            from.start.year = Value::Implied(moved.year());
            from.start.month = Value::Implied(moved.month());
            from.start.day = Value::Implied(moved.day());
        } else if to.start.is_only_weekday() && to_date + week > from_date {
            let moved = to_date + week;
            to.start.year = Value::Implied(moved.year());
            to.start.month = Value::Implied(moved.month());
            to.start.day = Value::Implied(moved.day());
        } else if !to.start.year.is_known() {
            let mut rolled = to_date;
            while from_date > rolled {
                rolled = add_years(rolled, 1);
            }
            to.start.day.replace(rolled.day());
            to.start.month.replace(rolled.month());
            to.start.year = Value::Implied(rolled.year());
        } else {
            std::mem::swap(&mut from, &mut to);
        }
    }

    let start = from.index.min(to.index);
    let end = from.end_index().max(to.end_index());
    from.end = Some(to.start);
    from.tags.extend(to.tags);
    from.tags.insert("merge-date-range");
    from.index = start;
    from.text = text[start..end].to_string();
    from
}

impl Refiner for MergeDateRangeRefiner {
    fn name(&self) -> &'static str {
        "merge-date-range"
    }

    fn refine(&self, text: &str, results: Vec<ParsedResult>, ctx: &ParseContext) -> Vec<ParsedResult> {
        let mut merged = Vec::with_capacity(results.len());
        let mut iter = results.into_iter().peekable();

        while let Some(mut prev) = iter.next() {
            let mergeable = match iter.peek() {
                Some(next) => {
                    prev.end.is_none() && next.end.is_none() && self.should_merge(text, &mut prev, next, ctx)
                }
                None => false,
            };
            if mergeable && let Some(next) = iter.next() {
                prev = merge(text, prev, next, ctx);
            }
            merged.push(prev);
        }
        merged
    }
}
