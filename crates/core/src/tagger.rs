//! Part-of-speech tagging of the working text.
//!
//! The condition and verb stages need little more than coarse word classes,
//! so the default [`LexiconTagger`] uses a small closed lexicon plus suffix
//! heuristics. Anything richer can be plugged in through [`Tagger`].

use std::ops::Range;

use crate::ids::is_token;
use crate::numbers::number_runs;
use crate::vars::types::VariableType;

/// Coarse word class of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Verb,
    Modal,
    Auxiliary,
    Adjective,
    Adverb,
    Noun,
    Pronoun,
    Determiner,
    Preposition,
    Conjunction,
    /// A number, spelled out or in digits.
    Value,
    /// A duration unit such as "hours".
    Duration,
    /// A clock marker such as "pm" or "noon".
    Time,
    /// A placeholder token standing for an extracted phrase.
    Replaced,
    /// The kind of the binding behind a placeholder token.
    Variable(VariableType),
}

/// One word (or number-word run) of the working text.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub text: String,
    /// Byte range in the tagged text.
    pub span: Range<usize>,
    pub tags: Vec<Tag>,
    /// Numeric value for [`Tag::Value`] terms.
    pub value: Option<f64>,
}

impl Term {
    pub fn has(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn is_replaced(&self) -> bool {
        self.has(Tag::Replaced)
    }

    /// The term as it should be read by value parsers: digits for numbers.
    pub fn normalized(&self) -> String {
        match self.value {
            Some(v) if v.fract() == 0.0 => format!("{}", v as i64),
            Some(v) => v.to_string(),
            None => self.text.clone(),
        }
    }
}

/// Splits a text into tagged terms.
pub trait Tagger: Send + Sync {
    /// Tag `text`. `token_kind` resolves placeholder tokens to the kind of
    /// their binding.
    fn tag(&self, text: &str, token_kind: &dyn Fn(&str) -> Option<VariableType>) -> Vec<Term>;
}

const MODALS: &[&str] = &[
    "can", "could", "would", "will", "should", "may", "might", "must", "shall",
];

const AUXILIARIES: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being", "do", "does", "did", "have", "has",
    "had",
];

const PRONOUNS: &[&str] = &[
    "i", "me", "you", "it", "we", "us", "they", "them", "he", "she", "him", "her", "mine",
];

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "my", "your", "our", "their", "this", "that", "these", "those", "every",
    "each", "all", "some", "any", "no",
];

const PREPOSITIONS: &[&str] = &[
    "in", "on", "at", "of", "for", "from", "to", "during", "since", "until", "till", "by",
    "with", "between", "than", "around", "near", "before", "after", "through", "per",
];

const CONJUNCTIONS: &[&str] = &["and", "or", "but", "versus", "vs"];

/// Comparison words that act as adverbs in "over 10000", "under 8 hours".
const ADVERBS: &[&str] = &[
    "over", "under", "above", "below", "very", "really", "ever", "never", "often", "also", "not",
    "most", "least", "only", "just",
];

const ADJECTIVES: &[&str] = &[
    "less", "more", "fewer", "few", "high", "low", "long", "short", "late", "early", "big",
    "small", "large", "great", "fast", "slow", "heavy", "light", "max", "maximum", "min",
    "minimum", "best", "worst",
];

const DURATION_UNITS: &[&str] = &[
    "hour", "hours", "hr", "hrs", "h", "minute", "minutes", "min", "mins", "second", "seconds",
    "sec", "secs", "day", "days",
];

const TIME_MARKERS: &[&str] = &["am", "pm", "a.m.", "p.m.", "noon", "midnight", "o'clock", "oclock"];

const NOUNS: &[&str] = &[
    "goal", "goals", "data", "week", "weeks", "month", "months", "year", "years", "pounds",
    "pound", "lbs", "lb", "kg", "kgs", "kilograms", "kilogram", "kilos", "kilo", "bed", "time",
    "average", "value", "values", "record", "records", "chart", "graph", "difference",
];

/// Verb roots the lexicon knows, including every root an intent maps from.
const VERB_ROOTS: &[&str] = &[
    "set", "assign", "put", "change", "modify", "edit", "replace", "browse", "go", "show",
    "explore", "compare", "highlight", "count", "find", "see", "tell", "give", "let", "want",
    "need", "look", "view", "display", "sleep", "wake", "get", "take", "make", "walk", "weigh",
    "know", "list", "open", "check", "bring", "pull", "select", "choose", "filter", "mark",
    "search", "reach", "hit", "exceed", "beat",
];

const IRREGULAR_VERBS: &[(&str, &str)] = &[
    ("went", "go"),
    ("gone", "go"),
    ("goes", "go"),
    ("shown", "show"),
    ("found", "find"),
    ("saw", "see"),
    ("seen", "see"),
    ("got", "get"),
    ("gotten", "get"),
    ("took", "take"),
    ("taken", "take"),
    ("gave", "give"),
    ("given", "give"),
    ("slept", "sleep"),
    ("woke", "wake"),
    ("woken", "wake"),
    ("made", "make"),
    ("told", "tell"),
    ("brought", "bring"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("knew", "know"),
    ("compel", "compare"),
    ("compelled", "compare"),
];

fn known_root(candidate: &str) -> Option<&'static str> {
    VERB_ROOTS.iter().find(|r| **r == candidate).copied()
}

/// Reduce an inflected verb to its root.
///
/// Irregular forms come from a table. Regular ones drop `-ing`, `-ed`,
/// `-es` or `-s`, restoring a final `e` or undoing a doubled consonant when
/// that yields a known root. Unknown words come back with the suffix dropped.
///
/// # Examples
/// ```
/// use healthnlu_core::tagger::verb_root;
///
/// assert_eq!(verb_root("showing"), "show");
/// assert_eq!(verb_root("compared"), "compare");
/// assert_eq!(verb_root("setting"), "set");
/// assert_eq!(verb_root("went"), "go");
/// ```
pub fn verb_root(word: &str) -> String {
    lexicon_root(word).map(str::to_string).unwrap_or_else(|| {
        ["ing", "ed", "es", "s"]
            .iter()
            .find_map(|suffix| word.strip_suffix(suffix).filter(|base| base.len() > 1))
            .unwrap_or(word)
            .to_string()
    })
}

fn lexicon_root(word: &str) -> Option<&'static str> {
    if let Some((_, root)) = IRREGULAR_VERBS.iter().find(|(form, _)| *form == word) {
        return Some(root);
    }
    if let Some(root) = known_root(word) {
        return Some(root);
    }
    for suffix in ["ing", "ed", "es", "s", "d"] {
        let Some(base) = word.strip_suffix(suffix) else {
            continue;
        };
        if base.len() < 2 {
            continue;
        }
        let undoubled = base
            .chars()
            .last()
            .filter(|c| base[..base.len() - 1].ends_with(*c))
            .map(|_| &base[..base.len() - 1]);
        let with_e = format!("{base}e");
        let found = known_root(base)
            .or_else(|| known_root(&with_e))
            .or_else(|| undoubled.and_then(known_root));
        if found.is_some() {
            return found;
        }
    }
    None
}

/// Closed-lexicon tagger with suffix fallbacks.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconTagger;

impl LexiconTagger {
    fn word_tags(word: &str) -> Vec<Tag> {
        let mut tags = Vec::new();
        let is = |list: &[&str]| list.contains(&word);

        if is(MODALS) {
            tags.extend([Tag::Verb, Tag::Modal]);
        } else if is(AUXILIARIES) {
            tags.extend([Tag::Verb, Tag::Auxiliary]);
        }
        if is(TIME_MARKERS) {
            tags.push(Tag::Time);
        }
        if is(DURATION_UNITS) {
            tags.extend([Tag::Duration, Tag::Noun]);
        }
        if is(PRONOUNS) {
            tags.push(Tag::Pronoun);
        }
        if is(DETERMINERS) {
            tags.push(Tag::Determiner);
        }
        if is(PREPOSITIONS) {
            tags.push(Tag::Preposition);
        }
        if is(CONJUNCTIONS) {
            tags.push(Tag::Conjunction);
        }
        if is(ADVERBS) {
            tags.push(Tag::Adverb);
        }
        if is(ADJECTIVES) {
            tags.push(Tag::Adjective);
        }
        if is(NOUNS) {
            tags.push(Tag::Noun);
        }
        if !tags.is_empty() {
            return tags;
        }

        if lexicon_root(word).is_some() {
            tags.push(Tag::Verb);
        } else if word.ends_with("ly") {
            tags.push(Tag::Adverb);
        } else if word.len() > 4 && (word.ends_with("er") || word.ends_with("est")) {
            tags.push(Tag::Adjective);
        } else if word.ends_with("ing") || word.ends_with("ed") {
            tags.push(Tag::Verb);
        } else {
            tags.push(Tag::Noun);
        }
        tags
    }
}

/// Tags of a digit-led word that is not a plain number: `10:30`, `7pm`, `1.5h`.
fn numeral_tags(word: &str) -> Vec<Tag> {
    let suffix = word.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.');
    if word.contains(':') || TIME_MARKERS.contains(&suffix) {
        vec![Tag::Time]
    } else if DURATION_UNITS.contains(&suffix) {
        vec![Tag::Duration]
    } else {
        vec![Tag::Noun]
    }
}

/// Split `text` into words with their byte ranges, dropping edge punctuation.
fn words(text: &str) -> Vec<(Range<usize>, &str)> {
    let mut out = Vec::new();
    let mut offset = 0;
    for raw in text.split_whitespace() {
        let start = offset + text[offset..].find(raw).unwrap_or(0);
        offset = start + raw.len();
        let trimmed = raw.trim_end_matches([',', '.', '?', '!', ';', ':']);
        let lead = trimmed.len() - trimmed.trim_start_matches(['(', '"', '\'']).len();
        let word = &trimmed[lead..];
        if !word.is_empty() {
            out.push((start + lead..start + lead + word.len(), word));
        }
    }
    out
}

impl Tagger for LexiconTagger {
    fn tag(&self, text: &str, token_kind: &dyn Fn(&str) -> Option<VariableType>) -> Vec<Term> {
        let words = words(text);
        let plain: Vec<&str> = words.iter().map(|(_, w)| *w).collect();
        let runs = number_runs(&plain);

        let mut terms = Vec::with_capacity(words.len());
        let mut runs = runs.into_iter().peekable();
        let mut i = 0;
        while i < words.len() {
            if let Some((range, value)) = runs.peek().filter(|(r, _)| r.start == i).cloned() {
                runs.next();
                let span = words[range.start].0.start..words[range.end - 1].0.end;
                terms.push(Term {
                    text: text[span.clone()].to_string(),
                    span,
                    tags: vec![Tag::Value],
                    value: Some(value as f64),
                });
                i = range.end;
                continue;
            }

            let (span, word) = words[i].clone();
            i += 1;
            if is_token(word) {
                let mut tags = vec![Tag::Replaced];
                tags.extend(token_kind(word).map(Tag::Variable));
                terms.push(Term { text: word.to_string(), span, tags, value: None });
                continue;
            }
            let numeric = word.replace(',', "").parse::<f64>().ok();
            let tags = match numeric {
                Some(_) => vec![Tag::Value],
                None if word.starts_with(|c: char| c.is_ascii_digit()) => numeral_tags(word),
                None => Self::word_tags(word),
            };
            terms.push(Term { text: word.to_string(), span, tags, value: numeric });
        }
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(text: &str) -> Vec<Term> {
        LexiconTagger.tag(text, &|word| (word == "a1b2c3d4e5").then_some(VariableType::DataSource))
    }

    #[test]
    fn test_number_words_collapse() {
        let terms = tag("less than twenty five hours");
        assert_eq!(terms.len(), 4);
        assert_eq!(terms[2].text, "twenty five");
        assert_eq!(terms[2].value, Some(25.0));
        assert_eq!(terms[2].normalized(), "25");
        assert!(terms[3].has(Tag::Duration));
    }

    #[test]
    fn test_tokens_are_replaced() {
        let terms = tag("show a1b2c3d4e5 today");
        assert!(terms[0].has(Tag::Verb));
        assert!(terms[1].is_replaced());
        assert!(terms[1].has(Tag::Variable(VariableType::DataSource)));
        assert_eq!(terms[1].span, 5..15);
    }

    #[test]
    fn test_comparatives_and_modals() {
        let terms = tag("could i sleep longer");
        assert!(terms[0].has(Tag::Modal));
        assert!(terms[1].has(Tag::Pronoun));
        assert!(terms[2].has(Tag::Verb));
        assert!(terms[3].has(Tag::Adjective));
    }

    #[test]
    fn test_punctuation_is_not_part_of_a_term() {
        let terms = tag("steps, please.");
        assert_eq!(terms[0].text, "steps");
        assert_eq!(terms[0].span, 0..5);
        assert_eq!(terms[1].text, "please");
    }

    #[test]
    fn test_numerals_with_units() {
        let terms = tag("10:30 7pm 1.5h 3rd");
        assert!(terms[0].has(Tag::Time));
        assert!(terms[1].has(Tag::Time));
        assert!(terms[2].has(Tag::Duration));
        assert!(terms[3].has(Tag::Noun));
    }

    #[test]
    fn test_verb_root_fallback() {
        assert_eq!(verb_root("browsing"), "browse");
        assert_eq!(verb_root("changes"), "change");
        assert_eq!(verb_root("highlights"), "highlight");
        assert_eq!(verb_root("compel"), "compare");
        assert_eq!(verb_root("jumped"), "jump");
    }
}
