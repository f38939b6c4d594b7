//! Variable types and runtime values.
//!
//! Every expression in a diagram computes one of four value kinds. The
//! [`VariableType`] tag is what a variable declares; [`Value`] is what the
//! evaluator produces and what a [`ValuedVariable`](crate::expression::ValuedVariable)
//! stores. A value always knows its own tag via [`Value::value_type`].

use std::fmt;

use strum::{Display, EnumIter, EnumString};

use crate::Result;

/// The declared type of a variable.
///
/// The textual form (`string`, `integer`, `float`, `boolean`) is the one used
/// by diagram snapshots and by conversion function names.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    /// UTF-8 text.
    String,
    /// 64-bit signed integer.
    Integer,
    /// 64-bit IEEE float.
    Float,
    /// `true` or `false`.
    Boolean,
}

impl VariableType {
    /// Returns `true` for `integer` and `float`.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, VariableType::Integer | VariableType::Float)
    }
}

/// A concrete runtime value, tagged by its type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A float value.
    Float(f64),
    /// A boolean value.
    Boolean(bool),
}

impl Value {
    /// Returns the type tag of this value.
    #[must_use]
    pub fn value_type(&self) -> VariableType {
        match self {
            Value::String(_) => VariableType::String,
            Value::Integer(_) => VariableType::Integer,
            Value::Float(_) => VariableType::Float,
            Value::Boolean(_) => VariableType::Boolean,
        }
    }

    /// Returns the numeric value widened to `f64`, or `None` for non-numeric values.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the boolean payload, or `None` for non-boolean values.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Types the raw text of a literal token by its surface form.
    ///
    /// `true`/`false` become booleans, integral text becomes an integer, numeric
    /// text with a fraction or exponent becomes a float, double-quoted text becomes
    /// a string without its quotes and anything else is taken as a string verbatim.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flowscope::expression::Value;
    ///
    /// assert_eq!(Value::from_literal("42"), Value::Integer(42));
    /// assert_eq!(Value::from_literal("2.5"), Value::Float(2.5));
    /// assert_eq!(Value::from_literal("true"), Value::Boolean(true));
    /// assert_eq!(Value::from_literal("\"hi\""), Value::String("hi".into()));
    /// assert_eq!(Value::from_literal("hi"), Value::String("hi".into()));
    /// ```
    #[must_use]
    pub fn from_literal(text: &str) -> Value {
        match text {
            "true" => return Value::Boolean(true),
            "false" => return Value::Boolean(false),
            _ => {}
        }

        if let Ok(int) = text.parse::<i64>() {
            return Value::Integer(int);
        }

        if looks_numeric(text) {
            if let Ok(float) = text.parse::<f64>() {
                if float.is_finite() {
                    return Value::Float(float);
                }
            }
        }

        if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
            return Value::String(text[1..text.len() - 1].to_string());
        }

        Value::String(text.to_string())
    }

    /// Converts the value into its JSON snapshot form.
    ///
    /// Non-finite floats have no JSON representation and become `null`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::Boolean(b) => serde_json::Value::Bool(*b),
        }
    }

    /// Reads a JSON snapshot value as a value of the given type.
    ///
    /// Integral JSON numbers are accepted for `float` targets; nothing else is
    /// converted.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the JSON value does not carry the
    /// requested type.
    pub fn from_json(value: &serde_json::Value, value_type: VariableType) -> Result<Value> {
        let converted = match value_type {
            VariableType::String => value.as_str().map(|s| Value::String(s.to_string())),
            VariableType::Integer => value.as_i64().map(Value::Integer),
            VariableType::Float => value.as_f64().map(Value::Float),
            VariableType::Boolean => value.as_bool().map(Value::Boolean),
        };

        converted.ok_or_else(|| malformed_error!("value {} is not a valid {}", value, value_type))
    }
}

impl fmt::Display for Value {
    /// Formats the value the way the `string(...)` conversion renders it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Boolean(b) => write!(f, "{b}"),
        }
    }
}

fn looks_numeric(text: &str) -> bool {
    let mut digits = false;
    for c in text.chars() {
        match c {
            '0'..='9' => digits = true,
            '.' | 'e' | 'E' | '+' | '-' => {}
            _ => return false,
        }
    }
    digits
}
