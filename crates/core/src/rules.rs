//! Data-source and cyclic time-frame phrase table.

use std::ops::Range;

use regex::Regex;
use tracing::trace;

use crate::error::{NluError, compile};
use crate::vars::registry::Registry;
use crate::vars::types::{CyclicTimeFrame, DataSourceType, VariableValue};

/// A phrase pattern and the value it stands for.
pub struct PhraseRule {
    pub name: &'static str,
    pub regex: Regex,
    pub value: VariableValue,
}

const DATA_SOURCE_RULES: &[(&str, &str, DataSourceType)] = &[
    ("step-count", r"step\s+count(?:s|er)?|steps?|walk(?:s|ed|ing)?", DataSourceType::StepCount),
    (
        "heart-rate",
        r"(?:resting\s+)?heart\s+rates?|bpm|beats?\s+per\s+minutes?",
        DataSourceType::HeartRate,
    ),
    (
        "hours-slept",
        r"h?ours?\s*(?:i\s+|of\s+)?(?:slept|sleep)|sleep\s+length|(?:length|duration)\s+of\s+(?:[a-z]+\s+)?sleep|sleep\s+duration|sleep\s+h?ours?|i\s+(?:slept|sleep)",
        DataSourceType::HoursSlept,
    ),
    (
        "sleep-range",
        r"sleep(?:\s+range)?|range\s+of\s+(?:[a-z]+\s+)?sleep|sleep\s+schedules?",
        DataSourceType::SleepRange,
    ),
    ("weight", r"(?:body\s+)?weight|wait|how\s+heavy\s+i\s+(?:was|am)", DataSourceType::Weight),
];

const CYCLE_RULES: &[(&str, &str, CyclicTimeFrame)] = &[
    ("days-of-week", r"(?:by\s+)?days?\s+of\s+(?:the\s+)?weeks?", CyclicTimeFrame::DayOfWeek),
    ("weekly", r"(?:by\s+)?weekly(?:\s+(?:data|pattern))?", CyclicTimeFrame::DayOfWeek),
    ("by-month", r"by\s+months?", CyclicTimeFrame::MonthOfYear),
    (
        "months-of-year",
        r"(?:by\s+)?months?\s+of\s+(?:the\s+)?years?|monthly(?:\s+(?:data|pattern))?",
        CyclicTimeFrame::MonthOfYear,
    ),
    ("yearly", r"(?:by\s+)?yearly(?:\s+(?:data|pattern))?", CyclicTimeFrame::MonthOfYear),
];

fn word_bounded(pattern: &str) -> String {
    format!(r"\b(?:{pattern})\b")
}

/// Ordered data-source and cycle rules.
pub struct RuleTable {
    data_sources: Vec<PhraseRule>,
    cycles: Vec<PhraseRule>,
}

impl RuleTable {
    pub fn new() -> Result<Self, NluError> {
        let data_sources = DATA_SOURCE_RULES
            .iter()
            .map(|(name, pattern, source)| {
                Ok(PhraseRule {
                    name,
                    regex: compile(name, &word_bounded(pattern))?,
                    value: VariableValue::DataSource(*source),
                })
            })
            .collect::<Result<Vec<_>, NluError>>()?;
        let cycles = CYCLE_RULES
            .iter()
            .map(|(name, pattern, cycle)| {
                Ok(PhraseRule {
                    name,
                    regex: compile(name, &word_bounded(pattern))?,
                    value: VariableValue::TimeCycle(*cycle),
                })
            })
            .collect::<Result<Vec<_>, NluError>>()?;
        Ok(Self { data_sources, cycles })
    }

    pub fn data_source_rules(&self) -> &[PhraseRule] {
        &self.data_sources
    }

    pub fn cycle_rules(&self) -> &[PhraseRule] {
        &self.cycles
    }

    /// First data source mentioned in `text`, by rule order.
    pub fn find_data_source(&self, text: &str) -> Option<(VariableValue, Range<usize>)> {
        self.data_sources
            .iter()
            .find_map(|rule| rule.regex.find(text).map(|m| (rule.value.clone(), m.range())))
    }

    /// Claim every data-source and cycle phrase still unclaimed.
    ///
    /// Rules run in order, each on the text left by the previous one.
    pub fn claim_all(&self, registry: &mut Registry) -> usize {
        let mut claimed = 0;
        for rule in self.data_sources.iter().chain(&self.cycles) {
            let view = registry.view();
            let spans: Vec<Range<usize>> = rule
                .regex
                .find_iter(view.as_str())
                .filter_map(|m| view.to_original(m.range()))
                .collect();
            for span in spans {
                if registry.claim(span, rule.value.clone(), None).is_some() {
                    trace!(rule = rule.name, "phrase claimed");
                    claimed += 1;
                }
            }
        }
        claimed
    }
}
