//! Spelled-out English numbers.
//!
//! Dictation engines spell out small numbers ("ten to seven", "seven days")
//! and usually emit digits for larger ones. Runs of number words are turned
//! into digits here so the rule patterns only ever deal with numerals.
//! Adjacent numbers that cannot combine stay separate: "seven thirty" reads
//! as `7 30`, which the clock parser takes for 7:30.

use std::ops::Range;

const NUMBER_WORDS: &str = "zero|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety|hundred|thousand";

/// Pattern fragment matching a count given as digits or number words.
pub fn count_pattern() -> String {
    format!(r"\d+|(?:{NUMBER_WORDS})(?:[\s-]+(?:{NUMBER_WORDS}))*")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WordKind {
    Unit,
    Teen,
    Ten,
    Hundred,
    Thousand,
}

fn classify(word: &str) -> Option<(WordKind, u64)> {
    let value = match word {
        "zero" => 0,
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        "hundred" => return Some((WordKind::Hundred, 100)),
        "thousand" => return Some((WordKind::Thousand, 1000)),
        _ => return None,
    };
    let kind = match value {
        0..=9 => WordKind::Unit,
        10..=19 => WordKind::Teen,
        _ => WordKind::Ten,
    };
    Some((kind, value))
}

/// Value of a single number word, hyphenated compounds included.
///
/// # Examples
/// ```
/// use healthnlu_core::numbers::word_to_number;
///
/// assert_eq!(word_to_number("seven"), Some(7));
/// assert_eq!(word_to_number("twenty-five"), Some(25));
/// assert_eq!(word_to_number("steps"), None);
/// ```
pub fn word_to_number(word: &str) -> Option<u64> {
    if let Some((tens, unit)) = word.split_once('-') {
        let (WordKind::Ten, t) = classify(tens)? else { return None };
        let (WordKind::Unit, u) = classify(unit)? else { return None };
        return Some(t + u);
    }
    classify(word).map(|(_, v)| v)
}

/// Accumulates one spelled-out number.
#[derive(Default)]
struct Accumulator {
    total: u64,
    group: u64,
    last: Option<WordKind>,
}

impl Accumulator {
    /// Try to extend the number with `word`; `false` means it starts a new one.
    fn push(&mut self, kind: WordKind, value: u64) -> bool {
        use WordKind::*;
        let accepted = match (kind, self.last) {
            (Unit, None | Some(Hundred) | Some(Thousand)) => true,
            (Unit, Some(Ten)) => self.group % 10 == 0,
            (Teen | Ten, None | Some(Hundred) | Some(Thousand)) => true,
            (Hundred, Some(Unit | Teen | Ten)) => self.group < 100,
            (Hundred, None) => true,
            (Thousand, Some(Unit | Teen | Ten | Hundred)) => self.total == 0,
            _ => false,
        };
        if !accepted {
            return false;
        }
        match kind {
            Hundred => self.group = self.group.max(1) * 100,
            Thousand => {
                self.total = self.group * 1000;
                self.group = 0;
            }
            _ => self.group += value,
        }
        self.last = Some(kind);
        true
    }

    fn value(&self) -> u64 {
        self.total + self.group
    }

    fn is_empty(&self) -> bool {
        self.last.is_none()
    }
}

/// Find spelled-out numbers in a list of words.
///
/// Returns the word-index range each number covers and its value.
pub fn number_runs(words: &[&str]) -> Vec<(Range<usize>, u64)> {
    let mut runs = Vec::new();
    let mut acc = Accumulator::default();
    let mut start = 0;

    for (i, word) in words.iter().enumerate() {
        let parts: Vec<(WordKind, u64)> = match word.split_once('-') {
            Some(_) => match word_to_number(word) {
                Some(v) => vec![(WordKind::Ten, v - v % 10), (WordKind::Unit, v % 10)],
                None => Vec::new(),
            },
            None => classify(word).into_iter().collect(),
        };

        if parts.is_empty() {
            if !acc.is_empty() {
                runs.push((start..i, acc.value()));
                acc = Accumulator::default();
            }
            continue;
        }

        for (kind, value) in parts {
            if acc.is_empty() {
                start = i;
            }
            if !acc.push(kind, value) {
                runs.push((start..i, acc.value()));
                acc = Accumulator::default();
                start = i;
                acc.push(kind, value);
            }
        }
    }

    if !acc.is_empty() {
        runs.push((start..words.len(), acc.value()));
    }
    runs
}

/// Replace spelled-out numbers with digits, collapsing whitespace.
///
/// # Examples
/// ```
/// use healthnlu_core::numbers::convert_number_words;
///
/// assert_eq!(convert_number_words("ten to seven"), "10 to 7");
/// assert_eq!(convert_number_words("twenty five   hundred steps"), "2500 steps");
/// assert_eq!(convert_number_words("seven thirty pm"), "7 30 pm");
/// ```
pub fn convert_number_words(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let runs = number_runs(&words);

    let mut out: Vec<String> = Vec::with_capacity(words.len());
    let mut i = 0;
    let mut runs = runs.into_iter().peekable();
    while i < words.len() {
        match runs.peek() {
            Some((range, value)) if range.start == i => {
                out.push(value.to_string());
                i = range.end;
                runs.next();
            }
            _ => {
                out.push(words[i].to_string());
                i += 1;
            }
        }
    }
    out.join(" ")
}

/// Parse a number given as digits (decimals allowed) or as words.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if let Ok(v) = text.parse::<f64>() {
        return Some(v);
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    match number_runs(&words).as_slice() {
        [(range, value)] if range.start == 0 && range.end == words.len() => Some(*value as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_numbers() {
        assert_eq!(parse_number("twenty five"), Some(25.0));
        assert_eq!(parse_number("one hundred"), Some(100.0));
        assert_eq!(parse_number("ten thousand"), Some(10000.0));
        assert_eq!(parse_number("three hundred forty two"), Some(342.0));
        assert_eq!(parse_number("1.5"), Some(1.5));
        assert_eq!(parse_number("seven thirty"), None);
    }

    #[test]
    fn test_runs_split_on_incompatible_words() {
        let words = ["eleven", "five"];
        let runs = number_runs(&words);
        assert_eq!(runs, vec![(0..1, 11), (1..2, 5)]);
    }

    #[test]
    fn test_convert_keeps_other_words() {
        assert_eq!(convert_number_words("half past eleven"), "half past 11");
        assert_eq!(convert_number_words("last seven days"), "last 7 days");
        assert_eq!(convert_number_words("four and a half hours"), "4 and a half hours");
    }
}
