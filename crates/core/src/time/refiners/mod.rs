//! Refiners run after all parsers, in registration order.

mod around;
mod merge;
mod since;

pub use around::AroundRefiner;
pub use merge::MergeDateRangeRefiner;
pub use since::SinceRefiner;
