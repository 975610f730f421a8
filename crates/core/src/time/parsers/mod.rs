//! Date expression parsers, one family per file.

mod dataset;
mod holiday;
mod month;
mod relative;
mod season;
mod weekday;
mod year;

pub use dataset::DatasetBoundParser;
pub use holiday::HolidayParser;
pub use month::{MonthDayParser, MonthNameParser};
pub use relative::{CasualDayParser, RecentDurationParser, RelativePeriodParser, TimeAgoParser};
pub use season::SeasonParser;
pub use weekday::WeekdayParser;
pub use year::YearParser;
