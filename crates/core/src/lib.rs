#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]

//! Preprocessing of dictated health-data questions.
//!
//! A [`Preprocessor`] turns a sentence such as "how many steps did I walk last
//! week" into an [`Intent`] and a set of typed [`VariableBinding`]s, each
//! standing in the processed text as an opaque token.
//!
//! ```
//! use chrono::NaiveDate;
//! use healthnlu_core::{NluConfig, PreprocessOptions, Preprocessor, VariableType};
//!
//! let pre = Preprocessor::new(&NluConfig::default()).unwrap();
//! let today = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
//! let result = pre.preprocess("show my weight since february", &PreprocessOptions::new(today));
//! assert_eq!(result.variables_of(VariableType::Period).len(), 1);
//! ```

pub mod condition;
pub mod config;
pub mod error;
pub mod ids;
pub mod numbers;
pub mod pipeline;
pub mod rules;
pub mod tagger;
pub mod templates;
pub mod time;
pub mod vars;
pub mod verb;

pub use condition::{GoalResolver, NoGoals};
pub use error::NluError;
pub use pipeline::{NluConfig, PreprocessOptions, PreprocessResult, Preprocessor};
pub use vars::{
    BindingExtra, ConditionInfo, ConditionKind, CyclicTimeFrame, DataSourceType, Intent,
    MeasureUnit, PropertyKey, VariableBinding, VariableType, VariableValue, VerbInfo,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn rustc_version() -> String {
    std::env::var("RUSTC_VERSION").unwrap_or_else(|_| "unknown".into())
}

/// One-line build summary for `hnlu doctor`.
pub fn doctor_stub() -> String {
    format!("healthnlu-core v{} | rustc {} on {}", version(), rustc_version(), std::env::consts::OS)
}
