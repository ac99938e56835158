//! Literal coercion into declared attribute types.

use time::macros::format_description;
use time::Date;
use tracing::trace;

use crate::query::errors::ParseError;
use crate::query::metadata::ValueType;
use crate::query::{Result, Value};

/// Converts `literal` into a [`Value`] of the declared type.
pub fn coerce(value_type: &ValueType, literal: &str) -> Result<Value> {
    let fail = || ParseError::coercion(literal, value_type.kind());
    let value = match value_type {
        ValueType::Text | ValueType::Identifier { numeric: false } => {
            Value::Text(literal.to_owned())
        }
        ValueType::Integer | ValueType::Identifier { numeric: true } => {
            Value::Int(literal.parse::<i64>().map_err(|_| fail())?)
        }
        ValueType::Decimal => {
            let parsed = literal.parse::<f64>().map_err(|_| fail())?;
            if !parsed.is_finite() {
                return Err(fail());
            }
            Value::Float(parsed)
        }
        ValueType::Boolean => match literal {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => return Err(fail()),
        },
        ValueType::Date => Value::Date(parse_date(literal).ok_or_else(fail)?),
        ValueType::Enumeration(members) => {
            if !members.iter().any(|member| member == literal) {
                return Err(fail());
            }
            Value::Enum(literal.to_owned())
        }
    };
    trace!(literal, kind = %value_type.kind(), "coerced literal");
    Ok(value)
}

/// Coerces each literal in order, stopping at the first failure.
pub fn coerce_all<'a, I>(value_type: &ValueType, literals: I) -> Result<Vec<Value>>
where
    I: IntoIterator<Item = &'a str>,
{
    literals
        .into_iter()
        .map(|literal| coerce(value_type, literal))
        .collect()
}

fn parse_date(literal: &str) -> Option<Date> {
    // `[year]` alone would also accept signed or shorter years.
    let bytes = literal.as_bytes();
    if bytes.len() != 10 || !bytes[..4].iter().all(u8::is_ascii_digit) {
        return None;
    }
    Date::parse(literal, format_description!("[year]-[month]-[day]")).ok()
}
