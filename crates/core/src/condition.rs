//! Comparison and extreme conditions: "more than 10000", "heavier than 150",
//! "earlier than half past ten", "above my goal", "the longest".

use std::collections::HashMap;
use std::ops::Range;

use regex::Regex;
use tracing::{debug, trace};

use crate::error::{NluError, compile};
use crate::numbers::parse_number;
use crate::tagger::{Tag, Term};
use crate::time::clock::{DayPreference, parse_clock_time};
use crate::time::duration::parse_duration;
use crate::vars::types::{ConditionInfo, ConditionKind, DataSourceType, MeasureUnit, PropertyKey};

const KG_PER_POUND: f64 = 0.453_592;

/// Source of the user's goal for a metric.
pub trait GoalResolver {
    fn goal(&self, source: DataSourceType) -> Option<f64>;
}

impl GoalResolver for HashMap<DataSourceType, f64> {
    fn goal(&self, source: DataSourceType) -> Option<f64> {
        self.get(&source).copied()
    }
}

impl<F> GoalResolver for F
where
    F: Fn(DataSourceType) -> Option<f64>,
{
    fn goal(&self, source: DataSourceType) -> Option<f64> {
        self(source)
    }
}

/// A resolver that knows no goals.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGoals;

impl GoalResolver for NoGoals {
    fn goal(&self, _source: DataSourceType) -> Option<f64> {
        None
    }
}

/// How a compared value is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Duration,
    Time,
    Scalar,
}

struct ComparisonTerm {
    stems: &'static [&'static str],
    kind: ConditionKind,
    value_types: &'static [ValueType],
    implied: Option<DataSourceType>,
}

use ValueType::{Duration, Scalar, Time};

const COMPARISON_TERMS: &[ComparisonTerm] = &[
    ComparisonTerm { stems: &["earl"], kind: ConditionKind::Less, value_types: &[Time, Duration], implied: None },
    ComparisonTerm { stems: &["late"], kind: ConditionKind::More, value_types: &[Time, Duration], implied: None },
    ComparisonTerm {
        stems: &["short"],
        kind: ConditionKind::Less,
        value_types: &[Duration],
        implied: Some(DataSourceType::HoursSlept),
    },
    ComparisonTerm {
        stems: &["long"],
        kind: ConditionKind::More,
        value_types: &[Duration],
        implied: Some(DataSourceType::HoursSlept),
    },
    ComparisonTerm {
        stems: &["heav"],
        kind: ConditionKind::More,
        value_types: &[Scalar],
        implied: Some(DataSourceType::Weight),
    },
    ComparisonTerm {
        stems: &["light"],
        kind: ConditionKind::Less,
        value_types: &[Scalar],
        implied: Some(DataSourceType::Weight),
    },
    ComparisonTerm {
        stems: &["slow"],
        kind: ConditionKind::Less,
        value_types: &[Scalar],
        implied: Some(DataSourceType::HeartRate),
    },
    ComparisonTerm {
        stems: &["fast"],
        kind: ConditionKind::More,
        value_types: &[Scalar],
        implied: Some(DataSourceType::HeartRate),
    },
    ComparisonTerm {
        stems: &["low", "small", "few", "under", "below"],
        kind: ConditionKind::Less,
        value_types: &[Scalar, Duration],
        implied: None,
    },
    ComparisonTerm {
        stems: &["high", "big", "large", "great", "over", "above"],
        kind: ConditionKind::More,
        value_types: &[Scalar, Duration],
        implied: None,
    },
    ComparisonTerm { stems: &["less"], kind: ConditionKind::Less, value_types: &[Duration, Scalar], implied: None },
    ComparisonTerm { stems: &["more"], kind: ConditionKind::More, value_types: &[Duration, Scalar], implied: None },
];

const MAX_EXTREMES: &[&str] =
    &["max", "maximum", "latest", "fastest", "most", "highest", "longest", "heaviest"];
const MIN_EXTREMES: &[&str] =
    &["min", "minimum", "earliest", "slowest", "least", "lowest", "shortest", "lightest"];

/// Words that may sit inside a spoken time or duration.
const VALUE_CONNECTORS: &[&str] =
    &["and", "a", "an", "half", "quarter", "quarters", "past", "to", "after", "o'clock", "oclock"];

const WEIGHT_UNITS: &[&str] = &[
    "pounds", "pound", "lbs", "lb", "kg", "kgs", "kilograms", "kilogram", "kilos", "kilo",
];

/// Facts the condition engine reads besides the terms.
pub struct ConditionContext<'a> {
    /// The whole normalized sentence, searched for bedtime/waketime cues.
    pub sentence: &'a str,
    /// Data source already extracted from the sentence.
    pub data_source: Option<DataSourceType>,
    pub measure_unit: MeasureUnit,
    pub goals: &'a dyn GoalResolver,
    pub bedtime_shift_hour: u32,
}

/// A condition and the terms it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionMatch {
    /// Byte range in the tagged text.
    pub span: Range<usize>,
    pub info: ConditionInfo,
}

/// Infers a comparison or extreme from tagged terms.
pub struct ConditionEngine {
    bedtime_cue: Regex,
    waketime_cue: Regex,
}

impl ConditionEngine {
    pub fn new() -> Result<Self, NluError> {
        Ok(Self {
            bedtime_cue: compile("bedtime-cue", r"\b(?:slept|bed|asleep|start)")?,
            waketime_cue: compile("waketime-cue", r"\b(?:wake|woke|g[oe]t(?:ting)?\s+up)")?,
        })
    }

    fn property_key(&self, sentence: &str) -> Option<PropertyKey> {
        if self.bedtime_cue.is_match(sentence) {
            Some(PropertyKey::Bedtime)
        } else if self.waketime_cue.is_match(sentence) {
            Some(PropertyKey::Waketime)
        } else {
            None
        }
    }

    /// Find the first condition expressed by `terms`.
    pub fn infer(&self, terms: &[Term], ctx: &ConditionContext<'_>) -> Option<ConditionMatch> {
        let found = terms
            .iter()
            .enumerate()
            .filter_map(|(idx, term)| comparison_term(term).map(|c| (idx, c)))
            .find_map(|(idx, comparison)| self.compare(terms, idx, comparison, ctx))
            .or_else(|| self.extreme(terms, ctx));
        if let Some(m) = &found {
            debug!(kind = ?m.info.kind, source = ?m.info.implied_data_source, "condition inferred");
        }
        found
    }

    fn compare(
        &self,
        terms: &[Term],
        idx: usize,
        comparison: &ComparisonTerm,
        ctx: &ConditionContext<'_>,
    ) -> Option<ConditionMatch> {
        let mut next = idx + 1;
        let has_than = terms.get(next).is_some_and(|t| t.text == "than");
        if has_than {
            next += 1;
        }

        let phrase = value_phrase(terms, next);
        let starts_with_number = phrase.first().is_some_and(|t| t.has(Tag::Value));
        let has_amount = phrase
            .iter()
            .any(|t| t.has(Tag::Value) || t.has(Tag::Duration) || t.has(Tag::Time));
        if starts_with_number || (has_than && has_amount) {
            let end = next + phrase.len();
            trace!(term = %terms[idx].text, phrase = ?phrase.iter().map(|t| &t.text).collect::<Vec<_>>(), "comparison");
            if let Some(info) = self.read_value(comparison, phrase, ctx) {
                return Some(ConditionMatch { span: terms[idx].span.start..terms[end - 1].span.end, info });
            }
            return None;
        }

        if has_than {
            return self.against_goal(terms, idx, comparison, ctx);
        }
        None
    }

    fn read_value(
        &self,
        comparison: &ComparisonTerm,
        phrase: &[Term],
        ctx: &ConditionContext<'_>,
    ) -> Option<ConditionInfo> {
        let text = phrase.iter().map(Term::normalized).collect::<Vec<_>>().join(" ");
        let property_key = self.property_key(ctx.sentence);

        comparison.value_types.iter().find_map(|value_type| match value_type {
            Duration => parse_duration(&text).map(|seconds| ConditionInfo {
                kind: comparison.kind,
                implied_data_source: Some(DataSourceType::HoursSlept),
                property_key: None,
                ref_value: Some(seconds as f64),
            }),
            Time => {
                let preference = match property_key? {
                    PropertyKey::Bedtime => DayPreference::Night,
                    PropertyKey::Waketime => DayPreference::Day,
                };
                parse_clock_time(&text, preference, ctx.bedtime_shift_hour).map(|seconds| ConditionInfo {
                    kind: comparison.kind,
                    implied_data_source: Some(DataSourceType::SleepRange),
                    property_key,
                    ref_value: Some(seconds as f64),
                })
            }
            Scalar => {
                let number = phrase.iter().find(|t| t.has(Tag::Value))?;
                let value = number.value.or_else(|| parse_number(&number.text))?;
                let unit = phrase.last().filter(|t| !t.has(Tag::Value)).map(|t| t.text.as_str());
                let source = comparison.implied.or(ctx.data_source);
                Some(ConditionInfo {
                    kind: comparison.kind,
                    implied_data_source: source,
                    property_key: None,
                    ref_value: Some(to_storage_units(value, unit, source, ctx.measure_unit)),
                })
            }
        })
    }

    fn against_goal(
        &self,
        terms: &[Term],
        idx: usize,
        comparison: &ComparisonTerm,
        ctx: &ConditionContext<'_>,
    ) -> Option<ConditionMatch> {
        let goal_idx = terms[idx..].iter().position(|t| t.text == "goal" || t.text == "goals")? + idx;
        let source = comparison.implied.or(ctx.data_source)?;
        let goal = ctx.goals.goal(source)?;
        let span = if terms[idx..goal_idx].iter().any(Term::is_replaced) {
            terms[idx].span.clone()
        } else {
            terms[idx].span.start..terms[goal_idx].span.end
        };
        Some(ConditionMatch {
            span,
            info: ConditionInfo {
                kind: comparison.kind,
                implied_data_source: Some(source),
                property_key: None,
                ref_value: Some(goal),
            },
        })
    }

    fn extreme(&self, terms: &[Term], ctx: &ConditionContext<'_>) -> Option<ConditionMatch> {
        terms.iter().filter(|t| !t.is_replaced()).find_map(|term| {
            let kind = if MAX_EXTREMES.contains(&term.text.as_str()) {
                ConditionKind::Max
            } else if MIN_EXTREMES.contains(&term.text.as_str()) {
                ConditionKind::Min
            } else {
                return None;
            };
            Some(ConditionMatch {
                span: term.span.clone(),
                info: ConditionInfo {
                    kind,
                    implied_data_source: None,
                    property_key: self.property_key(ctx.sentence),
                    ref_value: None,
                },
            })
        })
    }
}

fn comparison_term(term: &Term) -> Option<&'static ComparisonTerm> {
    if term.is_replaced() || !(term.has(Tag::Adjective) || term.has(Tag::Adverb)) {
        return None;
    }
    COMPARISON_TERMS
        .iter()
        .find(|c| c.stems.iter().any(|stem| term.text.contains(stem)))
}

/// The run of terms from `start` that spells a number, time or duration,
/// plus a trailing weight unit.
fn value_phrase(terms: &[Term], start: usize) -> &[Term] {
    let Some(rest) = terms.get(start..) else {
        return &[];
    };
    let mut len = rest
        .iter()
        .take_while(|t| {
            !t.is_replaced()
                && (t.has(Tag::Value)
                    || t.has(Tag::Duration)
                    || t.has(Tag::Time)
                    || VALUE_CONNECTORS.contains(&t.text.as_str()))
        })
        .count();
    while len > 0 && VALUE_CONNECTORS.contains(&rest[len - 1].text.as_str()) && rest[len - 1].text != "o'clock" {
        len -= 1;
    }
    if len == 0 {
        return &[];
    }
    if rest.get(len).is_some_and(|t| WEIGHT_UNITS.contains(&t.text.as_str())) {
        len += 1;
    }
    &rest[..len]
}

/// Convert a compared number to the unit its metric is stored in.
///
/// # Examples
/// ```
/// use healthnlu_core::condition::to_storage_units;
/// use healthnlu_core::vars::{DataSourceType, MeasureUnit};
///
/// let kg = to_storage_units(150.0, Some("pounds"), Some(DataSourceType::Weight), MeasureUnit::Metric);
/// assert!((kg - 68.0388).abs() < 1e-4);
/// assert_eq!(to_storage_units(7.0, None, Some(DataSourceType::HoursSlept), MeasureUnit::Metric), 25_200.0);
/// ```
pub fn to_storage_units(
    value: f64,
    unit: Option<&str>,
    source: Option<DataSourceType>,
    measure_unit: MeasureUnit,
) -> f64 {
    match source {
        Some(DataSourceType::Weight) => {
            let pounds = match unit {
                Some(u) => u.starts_with("pound") || u.starts_with("lb"),
                None => measure_unit == MeasureUnit::Us,
            };
            if pounds { value * KG_PER_POUND } else { value }
        }
        Some(DataSourceType::HoursSlept) => match unit {
            Some(u) => parse_duration(&format!("{value} {u}")).map_or(value * 3600.0, |s| s as f64),
            None => value * 3600.0,
        },
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::{LexiconTagger, Tagger};

    fn infer_with(sentence: &str, source: Option<DataSourceType>, unit: MeasureUnit) -> Option<ConditionInfo> {
        let engine = ConditionEngine::new().unwrap();
        let terms = LexiconTagger.tag(sentence, &|_| None);
        let goals: HashMap<DataSourceType, f64> = HashMap::from([(DataSourceType::StepCount, 10_000.0)]);
        let ctx = ConditionContext {
            sentence,
            data_source: source,
            measure_unit: unit,
            goals: &goals,
            bedtime_shift_hour: 12,
        };
        engine.infer(&terms, &ctx).map(|m| m.info)
    }

    fn infer(sentence: &str) -> Option<ConditionInfo> {
        infer_with(sentence, None, MeasureUnit::Metric)
    }

    #[test]
    fn test_heavier_than() {
        let info = infer("heavier than 150").unwrap();
        assert_eq!(info.kind, ConditionKind::More);
        assert_eq!(info.implied_data_source, Some(DataSourceType::Weight));
        assert_eq!(info.ref_value, Some(150.0));
    }

    #[test]
    fn test_bare_weight_in_us_units() {
        let info = infer_with("heavier than 150", None, MeasureUnit::Us).unwrap();
        let kg = info.ref_value.unwrap();
        assert!((kg - 68.0388).abs() < 1e-4, "{kg}");
    }

    #[test]
    fn test_duration_comes_first_for_less() {
        let info = infer("less than five hours").unwrap();
        assert_eq!(info.kind, ConditionKind::Less);
        assert_eq!(info.implied_data_source, Some(DataSourceType::HoursSlept));
        assert_eq!(info.ref_value, Some(18_000.0));
    }

    #[test]
    fn test_scalar_uses_extracted_source() {
        let info = infer_with("more than 10000", Some(DataSourceType::StepCount), MeasureUnit::Metric)
            .unwrap();
        assert_eq!(info.implied_data_source, Some(DataSourceType::StepCount));
        assert_eq!(info.ref_value, Some(10_000.0));
    }

    #[test]
    fn test_bedtime_needs_a_cue() {
        let info = infer("went to bed later than 11").unwrap();
        assert_eq!(info.kind, ConditionKind::More);
        assert_eq!(info.implied_data_source, Some(DataSourceType::SleepRange));
        assert_eq!(info.property_key, Some(PropertyKey::Bedtime));
        assert_eq!(info.ref_value, Some(-3_600.0));

        let info = infer("woke up earlier than half past 6").unwrap();
        assert_eq!(info.property_key, Some(PropertyKey::Waketime));
        assert_eq!(info.ref_value, Some(23_400.0));
    }

    #[test]
    fn test_goal() {
        let info = infer_with("more than my goal", Some(DataSourceType::StepCount), MeasureUnit::Metric)
            .unwrap();
        assert_eq!(info.kind, ConditionKind::More);
        assert_eq!(info.ref_value, Some(10_000.0));

        assert!(infer_with("more than my goal", Some(DataSourceType::Weight), MeasureUnit::Metric)
            .is_none());
    }

    #[test]
    fn test_extremes() {
        let info = infer("when did i go to bed the latest").unwrap();
        assert_eq!(info.kind, ConditionKind::Max);
        assert_eq!(info.property_key, Some(PropertyKey::Bedtime));
        assert_eq!(info.ref_value, None);

        assert_eq!(infer("my lowest").unwrap().kind, ConditionKind::Min);
    }

    #[test]
    fn test_cues_inside_compound_words() {
        let info = infer("bedtime later than 11 pm").unwrap();
        assert_eq!(info.property_key, Some(PropertyKey::Bedtime));
        assert_eq!(info.ref_value, Some(-3_600.0));

        let info = infer("my latest bedtime").unwrap();
        assert_eq!(info.kind, ConditionKind::Max);
        assert_eq!(info.property_key, Some(PropertyKey::Bedtime));

        let info = infer("earliest wakeup").unwrap();
        assert_eq!(info.kind, ConditionKind::Min);
        assert_eq!(info.property_key, Some(PropertyKey::Waketime));
    }

    #[test]
    fn test_no_condition() {
        assert!(infer("show me more").is_none());
        assert!(infer("what did i do").is_none());
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |source: DataSourceType| (source == DataSourceType::Weight).then_some(70.0);
        assert_eq!(resolver.goal(DataSourceType::Weight), Some(70.0));
        assert_eq!(NoGoals.goal(DataSourceType::Weight), None);
    }
}
