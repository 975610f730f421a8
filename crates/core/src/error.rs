use regex::Regex;
use thiserror::Error;

/// Errors raised while building a [`crate::pipeline::Preprocessor`].
///
/// Preprocessing itself never fails: unrecognized or ambiguous input simply
/// produces fewer bindings.
#[derive(Debug, Error)]
pub enum NluError {
    #[error("invalid rule '{name}': {source}")]
    InvalidRule {
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// Compile a named rule pattern.
pub(crate) fn compile(name: &str, pattern: &str) -> Result<Regex, NluError> {
    Regex::new(pattern).map_err(|source| NluError::InvalidRule { name: name.to_string(), source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_pattern_names_the_rule() {
        let err = compile("broken", "(unclosed").unwrap_err();
        assert!(err.to_string().starts_with("invalid rule 'broken'"));
    }
}
