//! Conversion functions and assignment coercion.

use crate::{
    expression::{Conversion, Value, VariableType},
    Result,
};

/// Applies a conversion function to a value.
///
/// - `integer(x)` truncates toward zero from numbers and numeric strings
/// - `float(x)` parses numbers and numeric strings
/// - `string(x)` always succeeds
/// - `boolean(x)` maps empty strings and zero to `false`
pub(crate) fn convert(conversion: Conversion, value: Value) -> Result<Value> {
    match conversion {
        Conversion::Integer => to_integer(value),
        Conversion::Float => to_float(value),
        Conversion::String => Ok(Value::String(value.to_string())),
        Conversion::Boolean => Ok(Value::Boolean(match value {
            Value::String(s) => !s.is_empty(),
            Value::Integer(i) => i != 0,
            Value::Float(f) => f != 0.0,
            Value::Boolean(b) => b,
        })),
    }
}

/// Coerces a final result to the type of an assignment target.
///
/// Only `integer` and `float` convert into each other; narrowing truncates
/// toward zero.
pub(crate) fn coerce(value: Value, expected: VariableType) -> Result<Value> {
    match (value, expected) {
        (Value::Integer(i), VariableType::Float) => Ok(Value::Float(i as f64)),
        (Value::Float(f), VariableType::Integer) => truncate(f),
        (value, expected) if value.value_type() == expected => Ok(value),
        (value, expected) => Err(type_error!(
            "Cannot assign {} value to {} target",
            value.value_type(),
            expected
        )),
    }
}

fn to_integer(value: Value) -> Result<Value> {
    match value {
        Value::Integer(i) => Ok(Value::Integer(i)),
        Value::Float(f) => truncate(f),
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                return Ok(Value::Integer(i));
            }
            match parse_finite(trimmed) {
                Some(f) => truncate(f),
                None => Err(type_error!("Cannot convert '{}' to integer", s)),
            }
        }
        Value::Boolean(_) => Err(type_error!("Cannot convert boolean to integer")),
    }
}

fn to_float(value: Value) -> Result<Value> {
    match value {
        Value::Integer(i) => Ok(Value::Float(i as f64)),
        Value::Float(f) => Ok(Value::Float(f)),
        Value::String(s) => parse_finite(s.trim())
            .map(Value::Float)
            .ok_or_else(|| type_error!("Cannot convert '{}' to float", s)),
        Value::Boolean(_) => Err(type_error!("Cannot convert boolean to float")),
    }
}

fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|f| f.is_finite())
}

#[allow(clippy::cast_possible_truncation)]
fn truncate(f: f64) -> Result<Value> {
    let truncated = f.trunc();
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
    if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(runtime_error!("Cannot convert {} to integer", f));
    }
    Ok(Value::Integer(truncated as i64))
}
