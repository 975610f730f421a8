use regex::{Captures, Regex};

use crate::error::{NluError, compile};
use crate::time::engine::{ParseContext, ParsedComponents, ParsedResult, Parser};
use crate::time::holidays::{Holiday, HolidayCache};

fn sday(core: &str) -> String {
    format!(r"{core}'?s?(?:\s+day)?")
}

fn holiday_patterns() -> Vec<(Holiday, String)> {
    vec![
        (Holiday::NewYearsDay, sday(r"new\s+year")),
        (Holiday::ValentinesDay, sday("valentine")),
        (
            Holiday::MartinLutherKingDay,
            sday(r"martin\s+luther(?:\s+king)?(?:\s+jr\.?)?(?:\s+junior)?"),
        ),
        (Holiday::PresidentsDay, sday("president")),
        (Holiday::Easter, "easter".to_string()),
        (Holiday::MothersDay, sday("mother")),
        (Holiday::MemorialDay, r"memorial\s+day".to_string()),
        (Holiday::FathersDay, sday("father")),
        (Holiday::IndependenceDay, r"independence\s+day".to_string()),
        (Holiday::LaborDay, r"labou?r\s+day".to_string()),
        (Holiday::ColumbusDay, sday("columbus")),
        (Holiday::Halloween, "halloween".to_string()),
        (Holiday::VeteransDay, sday("veteran")),
        (Holiday::Thanksgiving, r"thanksgiving(?:\s+day)?".to_string()),
        (Holiday::Christmas, r"christmas(?:\s+day)?".to_string()),
    ]
}

/// Named holidays with an optional year before or after.
pub struct HolidayParser {
    pattern: Regex,
    holidays: Vec<(Holiday, Regex)>,
    cache: HolidayCache,
}

impl HolidayParser {
    pub fn new() -> Result<Self, NluError> {
        let patterns = holiday_patterns();
        let names = patterns.iter().map(|(_, p)| format!("(?:{p})")).collect::<Vec<_>>().join("|");
        let pattern = format!(
            r"\b(?:([12]\d{{3}})(?:'s)?\s+)?({names})(?:\s+(?:(?:of|in)\s+)?([12]\d{{3}}))?\b"
        );
        let holidays = patterns
            .into_iter()
            .map(|(h, p)| Ok((h, compile("holiday", &format!("^(?:{p})$"))?)))
            .collect::<Result<Vec<_>, NluError>>()?;
        Ok(Self { pattern: compile("holiday", &pattern)?, holidays, cache: HolidayCache::new() })
    }
}

impl Parser for HolidayParser {
    fn name(&self) -> &'static str {
        "holiday"
    }

    fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn extract(&self, _text: &str, caps: &Captures<'_>, ctx: &ParseContext) -> Option<ParsedResult> {
        let name = &caps[2];
        let holiday = self.holidays.iter().find(|(_, re)| re.is_match(name)).map(|(h, _)| *h)?;
        let year = caps.get(1).or_else(|| caps.get(3)).and_then(|m| m.as_str().parse().ok());
        let date = match year {
            Some(year) => holiday.date_in(year)?,
            None => self.cache.most_recent(holiday, ctx.reference)?,
        };
        Some(ParsedResult::from_match(caps, ParsedComponents::known(date)))
    }
}
