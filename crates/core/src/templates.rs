//! Whole-sentence templates checked before the regular pipeline.
//!
//! A bare year, a bare month and "compare A with B" sentences are common
//! enough, and awkward enough for the general stages, to be answered
//! directly. When a template matches, its claims are the whole answer and
//! the regular stages do not run.

use std::ops::Range;

use regex::Regex;
use tracing::trace;

use crate::error::{NluError, compile};
use crate::rules::RuleTable;
use crate::time::TimeExtractor;
use crate::time::engine::ParseContext;
use crate::vars::datemath::{
    MONTH_PATTERN, closest_past_year, end_of_month, numbered_date_from_values, parse_month,
    to_numbered_date,
};
use crate::vars::types::{BindingExtra, Intent, VariableType, VariableValue};

/// A span of the sentence and what it stands for.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickClaim {
    pub span: Range<usize>,
    pub value: VariableValue,
    pub extra: Option<BindingExtra>,
}

/// A matched template.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickMatch {
    pub template: &'static str,
    pub intent: Intent,
    pub claims: Vec<QuickClaim>,
}

/// How one side of a comparison was read.
enum Side {
    Found(Vec<QuickClaim>),
    /// "this", "that one": refers to what is on screen.
    Pronoun,
    Unresolved,
}

impl Side {
    fn is_resolved(&self) -> bool {
        !matches!(self, Side::Unresolved)
    }

    fn time_kind(&self) -> Option<VariableType> {
        match self {
            Side::Found(claims) => claims
                .iter()
                .map(|c| c.value.variable_type())
                .find(|k| matches!(k, VariableType::Date | VariableType::Period)),
            _ => None,
        }
    }
}

pub struct QuickPass {
    bare_year: Regex,
    bare_month: Regex,
    compare: Regex,
    conjunction: Regex,
    pronoun: Regex,
    after_source: Regex,
}

impl QuickPass {
    pub fn new() -> Result<Self, NluError> {
        Ok(Self {
            bare_year: compile("bare-year", r"^(?:year\s+)?([12]\d{3})$")?,
            bare_month: compile(
                "bare-month",
                &format!(r"^(?:the\s+)?(?:month\s+of\s+)?({MONTH_PATTERN})$"),
            )?,
            compare: compile(
                "compare",
                r"^(?:compare|compared|compel|compelled|difference\s+between)\s+(.+)$",
            )?,
            conjunction: compile("compare-conjunction", r"\s(?:with|and|to|versus|vs\.?)\s")?,
            pronoun: compile(
                "pronoun",
                r"^(?:this|it|that|these|them)(?:\s+(?:ones?|things?|elements?))?$",
            )?,
            after_source: compile("source-preposition", r"^\s+(?:of|in|on|at|during|for|from)\b")?,
        })
    }

    /// Try every template on the normalized sentence.
    pub fn try_match(
        &self,
        sentence: &str,
        time: &TimeExtractor,
        rules: &RuleTable,
        ctx: &ParseContext,
    ) -> Option<QuickMatch> {
        self.year(sentence)
            .or_else(|| self.month(sentence, ctx))
            .or_else(|| self.comparison(sentence, time, rules, ctx))
    }

    fn year(&self, sentence: &str) -> Option<QuickMatch> {
        let caps = self.bare_year.captures(sentence)?;
        let year: i32 = caps[1].parse().ok()?;
        Some(QuickMatch {
            template: "bare-year",
            intent: Intent::AssignTrivial,
            claims: vec![QuickClaim {
                span: 0..sentence.len(),
                value: VariableValue::Period([
                    numbered_date_from_values(year, 1, 1),
                    numbered_date_from_values(year, 12, 31),
                ]),
                extra: Some(BindingExtra { certain: true, preposition: None }),
            }],
        })
    }

    fn month(&self, sentence: &str, ctx: &ParseContext) -> Option<QuickMatch> {
        let caps = self.bare_month.captures(sentence)?;
        let month = parse_month(&caps[1])?;
        let year = closest_past_year(ctx.reference, month, 1);
        let start = chrono::NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(QuickMatch {
            template: "bare-month",
            intent: Intent::AssignTrivial,
            claims: vec![QuickClaim {
                span: 0..sentence.len(),
                value: VariableValue::Period([
                    to_numbered_date(start),
                    to_numbered_date(end_of_month(start)),
                ]),
                extra: Some(BindingExtra { certain: false, preposition: None }),
            }],
        })
    }

    fn comparison(
        &self,
        sentence: &str,
        time: &TimeExtractor,
        rules: &RuleTable,
        ctx: &ParseContext,
    ) -> Option<QuickMatch> {
        let tail = self.compare.captures(sentence)?.get(1)?;
        let offset = tail.start();
        let mut masked = tail.as_str().to_string();
        let mut claims = Vec::new();

        if let Some((value, range)) = rules.find_data_source(&masked) {
            claims.push(QuickClaim { span: offset + range.start..offset + range.end, value, extra: None });
            let mask_end = self
                .after_source
                .find(&masked[range.end..])
                .map_or(range.end, |m| range.end + m.end());
            masked.replace_range(range.start..mask_end, &" ".repeat(mask_end - range.start));
        }

        let mut best: Option<(usize, Range<usize>, Side, Range<usize>, Side)> = None;
        for m in self.conjunction.find_iter(&masked) {
            let (a_range, b_range) = (0..m.start(), m.end()..masked.len());
            let a = self.side(&masked[a_range.clone()], offset, time, rules, ctx);
            let b = self.side(&masked[b_range.clone()], offset + b_range.start, time, rules, ctx);
            let resolved = usize::from(a.is_resolved()) + usize::from(b.is_resolved());
            trace!(split = m.as_str().trim(), resolved, "compare split");
            if best.as_ref().is_none_or(|(n, ..)| resolved > *n) {
                best = Some((resolved, a_range, a, b_range, b));
            }
            if resolved == 2 {
                break;
            }
        }

        match best {
            Some((resolved, a_range, a, b_range, b)) if resolved > 0 => {
                let joint = match (a.time_kind(), b.time_kind()) {
                    (Some(x), Some(y)) if x != y => {
                        self.joint(&masked, a_range, b_range, offset, time, ctx)
                    }
                    _ => None,
                };
                match joint {
                    Some(joint) => {
                        for side in [a, b] {
                            if let Side::Found(found) = side {
                                claims.extend(found.into_iter().filter(|c| !is_time(&c.value)));
                            }
                        }
                        claims.extend(joint);
                    }
                    None => {
                        for side in [a, b] {
                            if let Side::Found(found) = side {
                                claims.extend(found);
                            }
                        }
                    }
                }
            }
            _ => {
                // no usable split: whatever time phrases the tail holds
                claims.extend(self.times(&masked, offset, time, ctx));
            }
        }

        if claims.is_empty() {
            return None;
        }
        claims.sort_by_key(|c| c.span.start);
        Some(QuickMatch { template: "compare", intent: Intent::Compare, claims })
    }

    fn side(
        &self,
        text: &str,
        offset: usize,
        time: &TimeExtractor,
        rules: &RuleTable,
        ctx: &ParseContext,
    ) -> Side {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Side::Unresolved;
        }
        let times = self.times(text, offset, time, ctx);
        if !times.is_empty() {
            return Side::Found(times);
        }
        if self.pronoun.is_match(trimmed) {
            return Side::Pronoun;
        }
        match rules.find_data_source(text) {
            Some((value, range)) => Side::Found(vec![QuickClaim {
                span: offset + range.start..offset + range.end,
                value,
                extra: None,
            }]),
            None => Side::Unresolved,
        }
    }

    fn times(&self, text: &str, offset: usize, time: &TimeExtractor, ctx: &ParseContext) -> Vec<QuickClaim> {
        time.extract(text, ctx)
            .into_iter()
            .map(|expr| QuickClaim {
                span: offset + expr.span.start..offset + expr.span.end,
                value: expr.value,
                extra: Some(BindingExtra { certain: expr.certain, preposition: expr.preposition }),
            })
            .collect()
    }

    /// Read both sides as one phrase, "A and B", so each side can borrow
    /// what the other states. Gives up unless every expression found lies
    /// within one side.
    fn joint(
        &self,
        masked: &str,
        a: Range<usize>,
        b: Range<usize>,
        offset: usize,
        time: &TimeExtractor,
        ctx: &ParseContext,
    ) -> Option<Vec<QuickClaim>> {
        const JOINER: &str = " and ";
        let a_len = a.end - a.start;
        let text = format!("{}{JOINER}{}", &masked[a.clone()], &masked[b.clone()]);
        let b_start = a_len + JOINER.len();

        let found = time.extract(&text, ctx);
        if found.is_empty() {
            return None;
        }
        found
            .into_iter()
            .map(|expr| {
                let span = if expr.span.end <= a_len {
                    offset + a.start + expr.span.start..offset + a.start + expr.span.end
                } else if expr.span.start >= b_start {
                    offset + b.start + (expr.span.start - b_start)
                        ..offset + b.start + (expr.span.end - b_start)
                } else {
                    return None;
                };
                Some(QuickClaim {
                    span,
                    value: expr.value,
                    extra: Some(BindingExtra { certain: expr.certain, preposition: expr.preposition }),
                })
            })
            .collect()
    }
}

fn is_time(value: &VariableValue) -> bool {
    matches!(value, VariableValue::Date(_) | VariableValue::Period(_))
}
