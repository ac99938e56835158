//! Typed scalar values produced by coercion.
use std::fmt;

use serde::Serialize;
use time::Date;

/// Coerced literal tagged with explicit type information so the JSON form
/// remains unambiguous for downstream executors.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "t", content = "v")]
pub enum Value {
    /// UTF-8 text, also used for text identifiers.
    Text(String),
    /// Signed 64-bit integer, also used for numeric identifiers.
    Int(i64),
    /// Finite 64-bit floating point number.
    Float(f64),
    /// Boolean literal.
    Bool(bool),
    /// Calendar date.
    #[serde(serialize_with = "serde_date::serialize")]
    Date(Date),
    /// Name of an enumeration member.
    Enum(String),
}

impl fmt::Display for Value {
    /// Writes the literal form accepted back by the coercer.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(v) | Value::Enum(v) => f.write_str(v),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Date(v) => f.write_str(&serde_date::format(v)),
        }
    }
}

pub(crate) mod serde_date {
    use serde::Serializer;
    use time::macros::format_description;
    use time::Date;

    pub(crate) fn format(date: &Date) -> String {
        // Year/month/day components are always available on a Date.
        date.format(format_description!("[year]-[month]-[day]"))
            .unwrap_or_default()
    }

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(date))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<Date> for Value {
    fn from(value: Date) -> Self {
        Value::Date(value)
    }
}
