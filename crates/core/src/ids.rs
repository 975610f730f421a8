//! Placeholder token generation.
//!
//! Extracted phrases are replaced in the working text by opaque tokens made
//! of alternating lowercase letters and digits, five pairs long (e.g.
//! `k3x9a0m2q7`). English words never look like that, the lexical tagger keeps
//! them as a single word, and random generation makes two equal tokens in one
//! sentence improbable enough that collisions are not checked.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of letter/digit pairs in a token.
pub const TOKEN_PAIRS: usize = 5;

/// Length of a token in bytes.
pub const TOKEN_LEN: usize = TOKEN_PAIRS * 2;

/// Random source for placeholder tokens.
pub struct TokenGenerator {
    rng: StdRng,
}

impl TokenGenerator {
    /// A generator seeded from the operating system.
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    /// A deterministic generator, for reproducible output.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Generate the next token.
    ///
    /// # Examples
    /// ```
    /// use healthnlu_core::ids::{is_token, TokenGenerator};
    ///
    /// let mut tokens = TokenGenerator::seeded(7);
    /// let token = tokens.next_token();
    /// assert!(is_token(&token));
    /// ```
    pub fn next_token(&mut self) -> String {
        let mut token = String::with_capacity(TOKEN_LEN);
        for _ in 0..TOKEN_PAIRS {
            token.push(self.rng.gen_range(b'a'..=b'z') as char);
            token.push(self.rng.gen_range(b'0'..=b'9') as char);
        }
        token
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Check whether a word has the shape of a placeholder token.
///
/// # Examples
/// ```
/// use healthnlu_core::ids::is_token;
///
/// assert!(is_token("a1b2c3d4e5"));
/// assert!(!is_token("steps"));
/// assert!(!is_token("a1b2c3d4e"));
/// ```
pub fn is_token(word: &str) -> bool {
    let bytes = word.as_bytes();
    bytes.len() == TOKEN_LEN
        && bytes.chunks(2).all(|pair| pair[0].is_ascii_lowercase() && pair[1].is_ascii_digit())
}

/// Check whether a text consists of nothing but tokens separated by whitespace.
pub fn is_only_tokens(text: &str) -> bool {
    let mut words = text.split_whitespace().peekable();
    words.peek().is_some() && words.all(is_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_generator_is_reproducible() {
        let mut a = TokenGenerator::seeded(42);
        let mut b = TokenGenerator::seeded(42);
        assert_eq!(a.next_token(), b.next_token());
        assert_eq!(a.next_token(), b.next_token());
    }

    #[test]
    fn test_tokens_have_expected_shape() {
        let mut tokens = TokenGenerator::new();
        for _ in 0..100 {
            let token = tokens.next_token();
            assert_eq!(token.len(), TOKEN_LEN);
            assert!(is_token(&token), "{token}");
        }
    }

    #[test]
    fn test_is_only_tokens() {
        assert!(is_only_tokens("a1b2c3d4e5 z9y8x7w6v5"));
        assert!(!is_only_tokens("a1b2c3d4e5 on"));
        assert!(!is_only_tokens("   "));
    }
}
