//! Main-verb detection and intent mapping.

use crate::tagger::{Tag, Term, verb_root};
use crate::vars::types::{Intent, VerbInfo};

const INTENT_ROOTS: &[(Intent, &[&str])] = &[
    (Intent::AssignTrivial, &["set", "assign", "put", "change", "modify", "edit", "replace"]),
    (Intent::Browse, &["browse", "go", "show", "explore"]),
    (Intent::Compare, &["compare"]),
    (Intent::Highlight, &["highlight", "count", "find"]),
];

/// Map a verb root to the intent it expresses.
///
/// Unknown roots carry no particular intent.
pub fn intent_of(root: &str) -> Intent {
    INTENT_ROOTS
        .iter()
        .find(|(_, roots)| roots.contains(&root))
        .map_or(Intent::AssignTrivial, |(intent, _)| *intent)
}

/// Find the main verb among `terms`.
///
/// That is the first verb that is neither a modal nor an auxiliary and does
/// not stand for an extracted phrase. Returns its index and the verb info.
pub fn main_verb(terms: &[Term]) -> Option<(usize, VerbInfo)> {
    let (idx, term) = terms.iter().enumerate().find(|(_, t)| {
        t.has(Tag::Verb) && !t.has(Tag::Modal) && !t.has(Tag::Auxiliary) && !t.is_replaced()
    })?;
    let root = verb_root(&term.text);
    let intent = intent_of(&root);
    Some((idx, VerbInfo { root, intent }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::{LexiconTagger, Tagger};

    fn verb(text: &str) -> Option<VerbInfo> {
        let terms = LexiconTagger.tag(text, &|_| None);
        main_verb(&terms).map(|(_, info)| info)
    }

    #[test]
    fn test_intent_mapping() {
        assert_eq!(intent_of("show"), Intent::Browse);
        assert_eq!(intent_of("compare"), Intent::Compare);
        assert_eq!(intent_of("count"), Intent::Highlight);
        assert_eq!(intent_of("replace"), Intent::AssignTrivial);
        assert_eq!(intent_of("want"), Intent::AssignTrivial);
    }

    #[test]
    fn test_modal_and_auxiliary_are_skipped() {
        let info = verb("can you show me").unwrap();
        assert_eq!(info.root, "show");
        assert_eq!(info.intent, Intent::Browse);

        let info = verb("did i go over").unwrap();
        assert_eq!(info.root, "go");
    }

    #[test]
    fn test_inflected_verbs() {
        assert_eq!(verb("highlighting the days").unwrap().intent, Intent::Highlight);
        assert_eq!(verb("i went to bed").unwrap().root, "go");
    }

    #[test]
    fn test_no_verb() {
        assert!(verb("is it").is_none());
    }
}
