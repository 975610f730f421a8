//! Variable binding types produced by the preprocessing pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::datemath::NumberedDate;

/// The kind of a variable binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableType {
    DataSource,
    Date,
    Period,
    Verb,
    #[serde(rename = "CyclicTime")]
    TimeCycle,
    Condition,
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VariableType::DataSource => "DataSource",
            VariableType::Date => "Date",
            VariableType::Period => "Period",
            VariableType::Verb => "Verb",
            VariableType::TimeCycle => "CyclicTime",
            VariableType::Condition => "Condition",
        };
        write!(f, "{s}")
    }
}

/// The coarse user goal of a sentence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    #[default]
    #[serde(rename = "Assign")]
    AssignTrivial,
    Browse,
    Compare,
    Highlight,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Intent::AssignTrivial => "Assign",
            Intent::Browse => "Browse",
            Intent::Compare => "Compare",
            Intent::Highlight => "Highlight",
        };
        write!(f, "{s}")
    }
}

/// Health metrics a sentence can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceType {
    StepCount,
    HeartRate,
    HoursSlept,
    SleepRange,
    Weight,
}

impl fmt::Display for DataSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataSourceType::StepCount => "step_count",
            DataSourceType::HeartRate => "heart_rate",
            DataSourceType::HoursSlept => "hours_slept",
            DataSourceType::SleepRange => "sleep_range",
            DataSourceType::Weight => "weight",
        };
        write!(f, "{s}")
    }
}

/// Recurring grouping dimensions for pattern queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclicTimeFrame {
    DayOfWeek,
    MonthOfYear,
}

/// Measurement system the user reads values in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureUnit {
    #[default]
    Metric,
    Us,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbInfo {
    pub root: String,
    #[serde(rename = "type")]
    pub intent: Intent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionKind {
    Less,
    More,
    Min,
    Max,
}

/// Which end of a sleep range a condition refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKey {
    Bedtime,
    Waketime,
}

/// A numeric or temporal condition such as "more than 10000".
///
/// `ref_value` is in storage units: seconds for durations, signed seconds from
/// midnight for clock times, kilograms for weight. It is `None` for Min/Max.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionInfo {
    #[serde(rename = "type")]
    pub kind: ConditionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implied_data_source: Option<DataSourceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_key: Option<PropertyKey>,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_value: Option<f64>,
}

/// Kind-specific value of a binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Date(NumberedDate),
    Period([NumberedDate; 2]),
    DataSource(DataSourceType),
    TimeCycle(CyclicTimeFrame),
    Verb(VerbInfo),
    Condition(ConditionInfo),
}

impl VariableValue {
    /// The binding kind this value belongs to.
    pub fn variable_type(&self) -> VariableType {
        match self {
            VariableValue::Date(_) => VariableType::Date,
            VariableValue::Period(_) => VariableType::Period,
            VariableValue::DataSource(_) => VariableType::DataSource,
            VariableValue::TimeCycle(_) => VariableType::TimeCycle,
            VariableValue::Verb(_) => VariableType::Verb,
            VariableValue::Condition(_) => VariableType::Condition,
        }
    }

    pub fn as_date(&self) -> Option<NumberedDate> {
        match self {
            VariableValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_period(&self) -> Option<[NumberedDate; 2]> {
        match self {
            VariableValue::Period(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_data_source(&self) -> Option<DataSourceType> {
        match self {
            VariableValue::DataSource(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_time_cycle(&self) -> Option<CyclicTimeFrame> {
        match self {
            VariableValue::TimeCycle(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_verb(&self) -> Option<&VerbInfo> {
        match self {
            VariableValue::Verb(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_condition(&self) -> Option<&ConditionInfo> {
        match self {
            VariableValue::Condition(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableValue::Date(d) => write!(f, "{d}"),
            VariableValue::Period([s, e]) => write!(f, "{s}..{e}"),
            VariableValue::DataSource(d) => write!(f, "{d}"),
            VariableValue::TimeCycle(CyclicTimeFrame::DayOfWeek) => write!(f, "day_of_week"),
            VariableValue::TimeCycle(CyclicTimeFrame::MonthOfYear) => write!(f, "month_of_year"),
            VariableValue::Verb(v) => write!(f, "{} ({})", v.root, v.intent),
            VariableValue::Condition(c) => {
                write!(f, "{:?}", c.kind)?;
                if let Some(source) = c.implied_data_source {
                    write!(f, " {source}")?;
                }
                if let Some(key) = c.property_key {
                    write!(f, " {key:?}")?;
                }
                if let Some(value) = c.ref_value {
                    write!(f, " {value}")?;
                }
                Ok(())
            }
        }
    }
}

/// Additional facts about a time binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingExtra {
    /// Whether the year was stated (or computed exactly) rather than inferred.
    pub certain: bool,
    /// Preposition immediately before the phrase ("on", "since", ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preposition: Option<String>,
}

/// One typed piece of information extracted from a sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableBinding {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: VariableType,
    pub value: VariableValue,
    pub original_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<BindingExtra>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_kind() {
        assert_eq!(VariableValue::Date(20200301).variable_type(), VariableType::Date);
        assert_eq!(
            VariableValue::Period([20200101, 20201231]).variable_type(),
            VariableType::Period
        );
        assert_eq!(
            VariableValue::TimeCycle(CyclicTimeFrame::DayOfWeek).variable_type(),
            VariableType::TimeCycle
        );
    }

    #[test]
    fn test_condition_serializes_with_short_keys() {
        let info = ConditionInfo {
            kind: ConditionKind::More,
            implied_data_source: Some(DataSourceType::Weight),
            property_key: None,
            ref_value: Some(150.0),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "more");
        assert_eq!(json["implied_data_source"], "weight");
        assert_eq!(json["ref"], 150.0);
        assert!(json.get("property_key").is_none());
    }

    #[test]
    fn test_accessors_match_variant() {
        let period = VariableValue::Period([20200201, 20200229]);
        assert_eq!(period.as_period(), Some([20200201, 20200229]));
        assert_eq!(period.as_date(), None);
        assert_eq!(VariableValue::Date(20200301).as_date(), Some(20200301));
        let cycle = VariableValue::TimeCycle(CyclicTimeFrame::MonthOfYear);
        assert_eq!(cycle.as_time_cycle(), Some(CyclicTimeFrame::MonthOfYear));
        assert!(cycle.as_data_source().is_none());
    }

    #[test]
    fn test_display_period() {
        let v = VariableValue::Period([20200201, 20200229]);
        assert_eq!(v.to_string(), "20200201..20200229");
    }
}
