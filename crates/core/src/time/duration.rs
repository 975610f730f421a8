//! Spoken durations such as "4 and a half hours" or "5 hours and 30 minutes".

use std::sync::LazyLock;

use regex::Regex;

use crate::numbers::convert_number_words;

static FRACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:(\d+)\s+)?(?:and\s+)?(?:a\s+)?(half|quarter|1/2|1/4)\s+(?:an?\s+)?(day|hour|minute|second)s?\b",
    )
    .expect("valid regex")
});

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d+(?:\.\d+)?)\s*(days?|d|hours?|hrs?|hr|h|minutes?|mins?|m|seconds?|secs?|sec|s)\b",
    )
    .expect("valid regex")
});

fn unit_seconds(unit: &str) -> f64 {
    match unit.chars().next() {
        Some('d') => 86_400.0,
        Some('h') => 3_600.0,
        Some('m') => 60.0,
        _ => 1.0,
    }
}

/// Parse a duration phrase to whole seconds.
///
/// Returns `None` when no number/unit pair is present.
///
/// # Examples
/// ```
/// use healthnlu_core::time::duration::parse_duration;
///
/// assert_eq!(parse_duration("four and a half hours"), Some(16_200));
/// assert_eq!(parse_duration("5 hours and 30 minutes"), Some(19_800));
/// assert_eq!(parse_duration("10000"), None);
/// ```
pub fn parse_duration(text: &str) -> Option<i64> {
    let text = convert_number_words(&text.to_lowercase());

    if let Some(caps) = FRACTION_RE.captures(&text) {
        let whole: f64 = caps.get(1).and_then(|m| m.as_str().parse().ok()).unwrap_or(0.0);
        let fraction = match &caps[2] {
            "half" | "1/2" => 0.5,
            _ => 0.25,
        };
        return Some(((whole + fraction) * unit_seconds(&caps[3])).round() as i64);
    }

    let mut total = 0.0;
    let mut found = false;
    for caps in AMOUNT_RE.captures_iter(&text) {
        let Ok(amount) = caps[1].parse::<f64>() else { continue };
        total += amount * unit_seconds(&caps[2]);
        found = true;
    }
    found.then(|| total.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fractions() {
        assert_eq!(parse_duration("4 and a quarter hours"), Some(15_300));
        assert_eq!(parse_duration("4 1/2 hours"), Some(16_200));
        assert_eq!(parse_duration("half an hour"), Some(1_800));
        assert_eq!(parse_duration("a half day"), Some(43_200));
    }

    #[test]
    fn test_sums_and_abbreviations() {
        assert_eq!(parse_duration("10 hours"), Some(36_000));
        assert_eq!(parse_duration("90 min"), Some(5_400));
        assert_eq!(parse_duration("1.5h"), Some(5_400));
        assert_eq!(parse_duration("seven hours 15 minutes"), Some(26_100));
    }

    #[test]
    fn test_plain_numbers_are_not_durations() {
        assert_eq!(parse_duration("10000 steps"), None);
        assert_eq!(parse_duration("150"), None);
    }
}
