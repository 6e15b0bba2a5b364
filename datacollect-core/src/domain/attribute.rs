use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Attribute values keyed by attribute name.
pub type Attributes = BTreeMap<String, AttributeValue>;

/// Absolute tolerance for `Decimal` equality. Tolerance makes equality
/// non-transitive: `3 == 3.0` and `3.0 == 3.0000000001`, but
/// `3 != 3.0000000001` since an integer only matches an integral decimal.
const DECIMAL_TOLERANCE: f64 = 1e-9;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A typed attribute value as it appears in element JSON.
///
/// The service coerces values to the attribute's declared type, so the same
/// logical value can come back as `3` or `3.0`. Equality follows the logical
/// value rather than the JSON token:
///
/// - `Integer(n)` equals `Decimal(x)` when `x` is integral and equal to `n`
/// - `Decimal` values compare within an absolute tolerance of `1e-9`
/// - `Text` values holding the same calendar date compare equal even when one
///   side carries a midnight time component
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl AttributeValue {
    pub fn text(value: impl Into<String>) -> Self {
        AttributeValue::Text(value.into())
    }

    pub fn integer(value: i64) -> Self {
        AttributeValue::Integer(value)
    }

    pub fn decimal(value: f64) -> Self {
        AttributeValue::Decimal(value)
    }

    pub fn boolean(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }

    pub fn date(value: NaiveDate) -> Self {
        AttributeValue::Text(value.format(DATE_FORMAT).to_string())
    }

    /// Parse an ISO date (`YYYY-MM-DD`) into a date value.
    pub fn parse_date(value: &str) -> Result<Self> {
        let date = parse_date_text(value)
            .ok_or_else(|| CoreError::InvalidDate(value.to_string()))?;
        Ok(Self::date(date))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(n) => Some(*n),
            AttributeValue::Decimal(x) => integral(*x),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Integer(n) => Some(*n as f64),
            AttributeValue::Decimal(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        self.as_text().and_then(parse_date_text)
    }
}

/// The decimal as an integer when it is integral and fits `i64`.
fn integral(x: f64) -> Option<i64> {
    // i64::MAX rounds up to 2^63 as f64, so the upper bound is exclusive
    (x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64).then(|| x as i64)
}

/// Accepts `YYYY-MM-DD` and `YYYY-MM-DDTHH:MM:SS[.fff]` at midnight.
pub(crate) fn parse_date_text(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Some(date);
    }
    let datetime = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    (datetime.num_seconds_from_midnight() == 0 && datetime.nanosecond() == 0)
        .then(|| datetime.date())
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        use AttributeValue::*;

        match (self, other) {
            (Null, Null) => true,
            (Boolean(a), Boolean(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            (Decimal(a), Decimal(b)) => (a - b).abs() <= DECIMAL_TOLERANCE,
            (Integer(n), Decimal(x)) | (Decimal(x), Integer(n)) => integral(*x) == Some(*n),
            (Text(a), Text(b)) => {
                a == b
                    || matches!(
                        (parse_date_text(a), parse_date_text(b)),
                        (Some(x), Some(y)) if x == y
                    )
            }
            _ => false,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "null"),
            AttributeValue::Boolean(b) => write!(f, "{}", b),
            AttributeValue::Integer(n) => write!(f, "{}", n),
            AttributeValue::Decimal(x) => write!(f, "{}", x),
            AttributeValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Integer(value as i64)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Decimal(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }
}

impl From<NaiveDate> for AttributeValue {
    fn from(value: NaiveDate) -> Self {
        AttributeValue::date(value)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(AttributeValue::Null)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Integer,
    Decimal,
    Boolean,
    Date,
    Reference,
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeType::String => "string",
            AttributeType::Integer => "integer",
            AttributeType::Decimal => "decimal",
            AttributeType::Boolean => "boolean",
            AttributeType::Date => "date",
            AttributeType::Reference => "reference",
        };
        write!(f, "{}", name)
    }
}

/// Descriptor of an attribute declared on a dimension or measure group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDto {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_unique: bool,
}

impl AttributeDto {
    pub fn new(id: i64, name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            id,
            name: name.into(),
            attribute_type,
            is_required: false,
            is_unique: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }
}
