//! Variable bindings and the calendar helpers behind them.
//!
//! This module defines:
//! - Binding kinds and values (dates, periods, data sources, conditions)
//! - The claim registry that anchors bindings to the sentence
//! - Numbered-date arithmetic used by the time rules

pub mod datemath;
pub mod registry;
pub mod types;

pub use datemath::{DateMathError, Direction, DurationUnit, NumberedDate};
pub use registry::{Claim, Registry, View};
pub use types::{
    BindingExtra, ConditionInfo, ConditionKind, CyclicTimeFrame, DataSourceType, Intent,
    MeasureUnit, PropertyKey, VariableBinding, VariableType, VariableValue, VerbInfo,
};
