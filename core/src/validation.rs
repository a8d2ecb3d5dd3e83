// Parameter validation and encoding

use crate::models::{Constraint, ParamValue};
use chrono::{DateTime, FixedOffset, SecondsFormat};

/// Validation errors
///
/// Raised before a request is built, so a failing call never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("'{0}' is required")]
    Missing(&'static str),

    #[error("'{name}' must be {expected}, got {actual}")]
    WrongType {
        name: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
}

/// A declared request parameter: its value plus the rules it is checked against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub value: Option<ParamValue>,
    pub required: bool,
    pub constraint: Constraint,
}

impl Param {
    /// Optional, unconstrained parameter
    pub fn new(name: &'static str, value: Option<ParamValue>) -> Self {
        Self {
            name,
            value,
            required: false,
            constraint: Constraint::Any,
        }
    }

    /// Free-text parameter sent as-is, including the empty string
    pub fn text(name: &'static str, value: Option<&str>) -> Self {
        Self::new(name, value.map(ParamValue::from))
    }

    /// Path segment parameter; a blank string counts as absent
    pub fn segment(name: &'static str, value: Option<&str>) -> Self {
        let value = value.filter(|v| !v.trim().is_empty());
        Self::text(name, value)
    }

    pub fn required(self) -> Self {
        self.required_if(true)
    }

    pub fn required_if(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn constrained(mut self, constraint: Constraint) -> Self {
        self.constraint = constraint;
        self
    }
}

/// Validate a single parameter and encode it for the wire
///
/// # Returns
/// * `Ok(None)` - value absent and not required
/// * `Ok(Some(escaped))` - value present and valid
pub fn prepare(param: &Param) -> Result<Option<String>, ValidationError> {
    let Some(value) = &param.value else {
        return if param.required {
            Err(ValidationError::Missing(param.name))
        } else {
            Ok(None)
        };
    };

    if !param.constraint.admits(value) {
        return Err(ValidationError::WrongType {
            name: param.name,
            expected: param.constraint.expected(),
            actual: value.kind(),
        });
    }

    Ok(Some(encode_value(value)))
}

/// URL-escape free text (RFC 3986 unreserved characters pass through)
pub fn encode_text(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Decimal form of an integer
pub fn encode_integer(value: i64) -> String {
    value.to_string()
}

/// ISO-8601 with whole seconds and an explicit offset, then URL-escaped
pub fn encode_time(value: &DateTime<FixedOffset>) -> String {
    encode_text(&value.to_rfc3339_opts(SecondsFormat::Secs, false))
}

fn encode_value(value: &ParamValue) -> String {
    match value {
        ParamValue::Text(text) => encode_text(text),
        ParamValue::Integer(number) => encode_integer(*number),
        ParamValue::Time(time) => encode_time(time),
    }
}

/// Escaped parameters that passed validation, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedParams {
    pairs: Vec<(&'static str, String)>,
}

impl PreparedParams {
    /// Validate every parameter; absent optional ones are dropped
    ///
    /// Either all parameters are accepted or the first failure is returned.
    pub fn prepare<I>(params: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = Param>,
    {
        let mut pairs = Vec::new();
        for param in params {
            if let Some(encoded) = prepare(&param)? {
                pairs.push((param.name, encoded));
            }
        }
        Ok(Self { pairs })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Encoded values in declaration order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `key=value` pairs joined with `&`, or `None` when nothing is set
    pub fn to_query(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.to_form())
        }
    }

    /// Form-encoded body; empty when nothing is set
    pub fn to_form(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_missing_required_param() {
        let param = Param::segment("entity", None).required();
        assert_eq!(prepare(&param), Err(ValidationError::Missing("entity")));
    }

    #[test]
    fn test_blank_segment_is_missing() {
        let param = Param::segment("entity", Some("  ")).required();
        assert_eq!(prepare(&param), Err(ValidationError::Missing("entity")));
    }

    #[test]
    fn test_missing_optional_param_is_dropped() {
        let param = Param::segment("check", None);
        assert_eq!(prepare(&param), Ok(None));
    }

    #[test]
    fn test_empty_text_is_kept() {
        let param = Param::text("summary", Some(""));
        assert_eq!(prepare(&param), Ok(Some(String::new())));
    }

    #[test]
    fn test_wrong_type() {
        let param = Param::new("duration", Some(ParamValue::from("1h")))
            .required()
            .constrained(Constraint::Integer);

        assert_eq!(
            prepare(&param),
            Err(ValidationError::WrongType {
                name: "duration",
                expected: "an integer",
                actual: "text",
            })
        );
    }

    #[test]
    fn test_encode_time_utc() {
        let time = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap().fixed_offset();
        assert_eq!(encode_time(&time), "2020-01-01T00%3A00%3A00%2B00%3A00");
    }

    #[test]
    fn test_encode_time_drops_fraction() {
        let time = Utc
            .with_ymd_and_hms(2020, 6, 30, 12, 15, 45)
            .unwrap()
            .fixed_offset()
            + chrono::Duration::milliseconds(250);
        assert_eq!(encode_time(&time), "2020-06-30T12%3A15%3A45%2B00%3A00");
    }

    #[test]
    fn test_encode_text_escapes_reserved() {
        assert_eq!(encode_text("host-1"), "host-1");
        assert_eq!(encode_text("disk /var"), "disk%20%2Fvar");
        assert_eq!(encode_text("a&b=c"), "a%26b%3Dc");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(ValidationError::Missing("check").to_string(), "'check' is required");
        let error = ValidationError::WrongType {
            name: "start_time",
            expected: "a timestamp",
            actual: "text",
        };
        assert_eq!(error.to_string(), "'start_time' must be a timestamp, got text");
    }
}
