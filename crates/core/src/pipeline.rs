//! The preprocessing pipeline.
//!
//! A sentence goes through: normalization, the template quick-pass (which may
//! answer on its own), time extraction, data-source and cycle rules, tagging,
//! verb classification and condition inference. Each stage claims what it
//! recognizes in a shared [`Registry`]; the pipeline stops early once nothing
//! but placeholder tokens is left.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::condition::{ConditionContext, ConditionEngine, GoalResolver, NoGoals};
use crate::error::NluError;
use crate::ids::TokenGenerator;
use crate::rules::RuleTable;
use crate::tagger::{LexiconTagger, Tagger};
use crate::templates::QuickPass;
use crate::time::TimeExtractor;
use crate::time::clock::DEFAULT_BEDTIME_SHIFT_HOUR;
use crate::time::engine::ParseContext;
use crate::vars::registry::Registry;
use crate::vars::types::{
    BindingExtra, Intent, MeasureUnit, VariableBinding, VariableType, VariableValue,
};
use crate::verb::main_verb;

/// Settings fixed for the lifetime of a [`Preprocessor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NluConfig {
    /// Bedtimes at or after this hour are placed on the previous day.
    pub bedtime_shift_hour: u32,
}

impl Default for NluConfig {
    fn default() -> Self {
        Self { bedtime_shift_hour: DEFAULT_BEDTIME_SHIFT_HOUR }
    }
}

/// Per-call inputs.
#[derive(Clone, Copy)]
pub struct PreprocessOptions<'a> {
    /// Reference date for every relative expression.
    pub today: NaiveDate,
    pub measure_unit: MeasureUnit,
    /// First day with data, for "since the beginning".
    pub data_initial_date: Option<NaiveDate>,
    pub goals: &'a dyn GoalResolver,
    /// Seed for placeholder tokens; random when `None`.
    pub token_seed: Option<u64>,
}

impl PreprocessOptions<'static> {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            measure_unit: MeasureUnit::default(),
            data_initial_date: None,
            goals: &NoGoals,
            token_seed: None,
        }
    }
}

impl<'a> PreprocessOptions<'a> {
    pub fn with_goals<'b>(self, goals: &'b dyn GoalResolver) -> PreprocessOptions<'b> {
        PreprocessOptions {
            today: self.today,
            measure_unit: self.measure_unit,
            data_initial_date: self.data_initial_date,
            goals,
            token_seed: self.token_seed,
        }
    }

    pub fn with_measure_unit(mut self, unit: MeasureUnit) -> Self {
        self.measure_unit = unit;
        self
    }

    pub fn with_data_initial_date(mut self, date: Option<NaiveDate>) -> Self {
        self.data_initial_date = date;
        self
    }

    pub fn with_token_seed(mut self, seed: u64) -> Self {
        self.token_seed = Some(seed);
        self
    }
}

/// The structured reading of one sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessResult {
    /// The normalized sentence with every recognized phrase replaced by the
    /// token of its binding.
    pub processed_text: String,
    pub original_text: String,
    pub variables: HashMap<String, VariableBinding>,
    pub intent: Intent,
}

impl PreprocessResult {
    /// Bindings in the order their tokens appear in `processed_text`.
    pub fn bindings_in_order(&self) -> Vec<&VariableBinding> {
        let mut bindings: Vec<(usize, &VariableBinding)> = self
            .variables
            .values()
            .map(|b| (self.processed_text.find(&b.id).unwrap_or(usize::MAX), b))
            .collect();
        bindings.sort_by_key(|(pos, _)| *pos);
        bindings.into_iter().map(|(_, b)| b).collect()
    }

    /// Bindings of `kind`, in sentence order.
    pub fn variables_of(&self, kind: VariableType) -> Vec<&VariableBinding> {
        self.bindings_in_order().into_iter().filter(|b| b.kind == kind).collect()
    }

    /// Value of the first binding of `kind`.
    pub fn first_value_of(&self, kind: VariableType) -> Option<&VariableValue> {
        self.variables_of(kind).first().map(|b| &b.value)
    }
}

/// Compiled rule tables; build once, share freely.
pub struct Preprocessor {
    config: NluConfig,
    quick: QuickPass,
    time: TimeExtractor,
    rules: RuleTable,
    tagger: Box<dyn Tagger>,
    conditions: ConditionEngine,
}

impl Preprocessor {
    /// Compile every rule with the bundled lexicon tagger.
    pub fn new(config: &NluConfig) -> Result<Self, NluError> {
        Self::with_tagger(config, Box::new(LexiconTagger))
    }

    pub fn with_tagger(config: &NluConfig, tagger: Box<dyn Tagger>) -> Result<Self, NluError> {
        Ok(Self {
            config: config.clone(),
            quick: QuickPass::new()?,
            time: TimeExtractor::new()?,
            rules: RuleTable::new()?,
            tagger,
            conditions: ConditionEngine::new()?,
        })
    }

    pub fn config(&self) -> &NluConfig {
        &self.config
    }

    pub fn time_extractor(&self) -> &TimeExtractor {
        &self.time
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Read `sentence`. Never fails: what is not understood stays as text.
    pub fn preprocess(&self, sentence: &str, options: &PreprocessOptions<'_>) -> PreprocessResult {
        let normalized = normalize(sentence);
        let tokens = options.token_seed.map_or_else(TokenGenerator::new, TokenGenerator::seeded);
        let mut registry = Registry::new(normalized, tokens);
        let ctx = ParseContext { reference: options.today, data_initial_date: options.data_initial_date };

        if registry.text().is_empty() {
            return assemble(registry, sentence, Intent::AssignTrivial);
        }

        if let Some(quick) = self.quick.try_match(registry.text(), &self.time, &self.rules, &ctx) {
            debug!(template = quick.template, claims = quick.claims.len(), "template matched");
            for claim in quick.claims {
                registry.claim(claim.span, claim.value, claim.extra);
            }
            return assemble(registry, sentence, quick.intent);
        }

        let intent = self.run_stages(&mut registry, &ctx, options);
        assemble(registry, sentence, intent)
    }

    fn run_stages(
        &self,
        registry: &mut Registry,
        ctx: &ParseContext,
        options: &PreprocessOptions<'_>,
    ) -> Intent {
        let mut intent = Intent::AssignTrivial;

        let view = registry.view();
        let found = self.time.extract(view.as_str(), ctx);
        for expr in found {
            let Some(span) = view.to_original(expr.span.clone()) else { continue };
            let extra = BindingExtra { certain: expr.certain, preposition: expr.preposition };
            registry.claim(span, expr.value, Some(extra));
        }
        debug!(claims = registry.claims().len(), "time stage done");
        if registry.view().is_exhausted() {
            return intent;
        }

        let claimed = self.rules.claim_all(registry);
        debug!(claimed, "data-source stage done");
        if registry.view().is_exhausted() {
            return intent;
        }

        let view = registry.view();
        let terms = self.tagger.tag(view.as_str(), &|word| registry.kind_of(word));
        if let Some((idx, verb)) = main_verb(&terms) {
            if let Some(span) = view.to_original(terms[idx].span.clone()) {
                debug!(root = %verb.root, intent = %verb.intent, "main verb");
                intent = verb.intent;
                registry.claim(span, VariableValue::Verb(verb), None);
            }
        }
        if registry.view().is_exhausted() {
            return intent;
        }

        let view = registry.view();
        let terms = self.tagger.tag(view.as_str(), &|word| registry.kind_of(word));
        let condition_ctx = ConditionContext {
            sentence: registry.text(),
            data_source: registry
                .first_of(VariableType::DataSource)
                .and_then(|b| b.value.as_data_source()),
            measure_unit: options.measure_unit,
            goals: options.goals,
            bedtime_shift_hour: self.config.bedtime_shift_hour,
        };
        if let Some(found) = self.conditions.infer(&terms, &condition_ctx)
            && let Some(span) = view.to_original(found.span)
        {
            registry.claim(span, VariableValue::Condition(found.info), None);
            intent = Intent::Highlight;
        }
        intent
    }
}

/// Lower-case, trim and drop digit-group commas (`10,000` → `10000`).
///
/// # Examples
/// ```
/// use healthnlu_core::pipeline::normalize;
///
/// assert_eq!(normalize("  More than 10,000 Steps "), "more than 10000 steps");
/// assert_eq!(normalize("monday, tuesday"), "monday, tuesday");
/// ```
pub fn normalize(sentence: &str) -> String {
    let lowered = sentence.trim().to_lowercase();
    let chars: Vec<char> = lowered.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter(|(i, c)| {
            **c != ','
                || !(i.checked_sub(1).is_some_and(|p| chars[p].is_ascii_digit())
                    && chars.get(i + 1).is_some_and(char::is_ascii_digit))
        })
        .map(|(_, c)| *c)
        .collect()
}

fn assemble(registry: Registry, original: &str, intent: Intent) -> PreprocessResult {
    let (processed_text, bindings) = registry.into_parts();
    let variables = bindings.into_iter().map(|b| (b.id.clone(), b)).collect();
    PreprocessResult { processed_text, original_text: original.to_string(), variables, intent }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars::types::{ConditionKind, DataSourceType};

    fn run(sentence: &str) -> PreprocessResult {
        let pre = Preprocessor::new(&NluConfig::default()).unwrap();
        let today = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        pre.preprocess(sentence, &PreprocessOptions::new(today).with_token_seed(11))
    }

    #[test]
    fn test_tokens_replace_phrases() {
        let result = run("Show my steps last week");
        assert_eq!(result.intent, Intent::Browse);
        assert_eq!(result.original_text, "Show my steps last week");
        for binding in result.variables.values() {
            assert_eq!(result.processed_text.matches(&binding.id).count(), 1);
        }
        assert_eq!(
            result.first_value_of(VariableType::DataSource),
            Some(&VariableValue::DataSource(DataSourceType::StepCount))
        );
        assert_eq!(
            result.first_value_of(VariableType::Period),
            Some(&VariableValue::Period([20200217, 20200223]))
        );
        let verb = result.first_value_of(VariableType::Verb).unwrap();
        assert_eq!(verb.as_verb().unwrap().root, "show");
    }

    #[test]
    fn test_condition_sets_highlight() {
        let result = run("I slept less than five hours");
        assert_eq!(result.intent, Intent::Highlight);
        let info = result.first_value_of(VariableType::Condition).unwrap().as_condition().unwrap();
        assert_eq!(info.kind, ConditionKind::Less);
        assert_eq!(info.implied_data_source, Some(DataSourceType::HoursSlept));
        assert_eq!(info.ref_value, Some(18_000.0));
    }

    #[test]
    fn test_template_short_circuits() {
        let result = run("2019");
        assert_eq!(result.variables.len(), 1);
        let binding = result.bindings_in_order()[0];
        assert_eq!(result.processed_text, binding.id);
        assert_eq!(binding.value, VariableValue::Period([20190101, 20191231]));
    }

    #[test]
    fn test_empty_sentence() {
        let result = run("   ");
        assert!(result.variables.is_empty());
        assert_eq!(result.processed_text, "");
        assert_eq!(result.intent, Intent::AssignTrivial);
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        assert_eq!(run("steps since february"), run("steps since february"));
    }

    #[test]
    fn test_preprocessor_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Preprocessor>();
    }
}
