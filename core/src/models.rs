// Parameter models for the Flapjack API

use chrono::{DateTime, FixedOffset, Offset, TimeZone};
use serde::{Deserialize, Serialize};

/// A request parameter value before validation and encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Free text (entity names, check names, summaries)
    Text(String),

    /// Whole number (durations in seconds)
    Integer(i64),

    /// Point in time, sent as ISO-8601
    Time(DateTime<FixedOffset>),
}

impl ParamValue {
    /// Short description of the value's type, used in validation messages
    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::Text(_) => "text",
            ParamValue::Integer(_) => "an integer",
            ParamValue::Time(_) => "a timestamp",
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Integer(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Integer(i64::from(value))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for ParamValue {
    fn from(value: DateTime<Tz>) -> Self {
        ParamValue::Time(to_fixed(value))
    }
}

/// Type constraint a parameter value must satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Constraint {
    /// Any value is accepted
    #[default]
    Any,

    /// Value must be a timestamp
    Time,

    /// Value must be an integer
    Integer,
}

impl Constraint {
    /// Whether `value` satisfies this constraint
    pub fn admits(&self, value: &ParamValue) -> bool {
        match self {
            Constraint::Any => true,
            Constraint::Time => matches!(value, ParamValue::Time(_)),
            Constraint::Integer => matches!(value, ParamValue::Integer(_)),
        }
    }

    /// Description of the accepted type, used in validation messages
    pub fn expected(&self) -> &'static str {
        match self {
            Constraint::Any => "any value",
            Constraint::Time => "a timestamp",
            Constraint::Integer => "an integer",
        }
    }
}

/// Optional time bounds for the maintenance, outage and downtime listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Sent as `start_time`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<FixedOffset>>,

    /// Sent as `end_time`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<FixedOffset>>,
}

impl TimeRange {
    /// A range with neither bound set
    pub fn new() -> Self {
        Self::default()
    }

    /// A range with both bounds set
    pub fn between<Tz: TimeZone, Tz2: TimeZone>(start: DateTime<Tz>, end: DateTime<Tz2>) -> Self {
        Self::new().starting_at(start).ending_at(end)
    }

    pub fn starting_at<Tz: TimeZone>(mut self, start: DateTime<Tz>) -> Self {
        self.start_time = Some(to_fixed(start));
        self
    }

    pub fn ending_at<Tz: TimeZone>(mut self, end: DateTime<Tz>) -> Self {
        self.end_time = Some(to_fixed(end));
        self
    }

    /// True when no bound is set
    pub fn is_unbounded(&self) -> bool {
        self.start_time.is_none() && self.end_time.is_none()
    }
}

/// Options for acknowledging a failing check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcknowledgeOptions {
    /// Free-text note attached to the acknowledgement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl AcknowledgeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}

/// A maintenance window to schedule for a check
///
/// The client rejects a `start_time` that is not a timestamp and a
/// `duration` that is not an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledMaintenance {
    /// Window start, must be a timestamp
    pub start_time: ParamValue,

    /// Window length in seconds, must be an integer
    pub duration: ParamValue,

    /// Free-text reason for the window
    pub summary: Option<String>,
}

impl ScheduledMaintenance {
    /// # Arguments
    /// * `start_time` - When the window opens
    /// * `duration` - Window length in seconds
    pub fn new(start_time: impl Into<ParamValue>, duration: impl Into<ParamValue>) -> Self {
        Self {
            start_time: start_time.into(),
            duration: duration.into(),
            summary: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}

fn to_fixed<Tz: TimeZone>(value: DateTime<Tz>) -> DateTime<FixedOffset> {
    let offset = value.offset().fix();
    value.with_timezone(&offset)
}
