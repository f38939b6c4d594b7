//! Type-checked operator semantics.
//!
//! The rules are strict: `integer` and `float` mix freely (the result is a
//! float as soon as one side is), `+` concatenates two strings, and nothing
//! else is coerced. `/` always produces a float.

use std::cmp::Ordering;

use crate::{
    expression::{BinaryOp, UnaryOp, Value},
    Result,
};

/// Applies a prefix operator.
pub(crate) fn unary(op: UnaryOp, operand: Value) -> Result<Value> {
    match (op, operand) {
        (UnaryOp::Negate, Value::Integer(i)) => i
            .checked_neg()
            .map(Value::Integer)
            .ok_or_else(|| runtime_error!("Integer overflow in negation of {}", i)),
        (UnaryOp::Negate, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (op, operand) => Err(type_error!(
            "Operator '{}' cannot be applied to {}",
            op,
            operand.value_type()
        )),
    }
}

/// Applies an infix operator.
pub(crate) fn binary(op: BinaryOp, left: Value, right: Value) -> Result<Value> {
    match op {
        BinaryOp::Add => match (left, right) {
            (Value::String(mut a), Value::String(b)) => {
                a.push_str(&b);
                Ok(Value::String(a))
            }
            (left, right) => arithmetic(op, &left, &right),
        },
        BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => {
            arithmetic(op, &left, &right)
        }
        BinaryOp::And | BinaryOp::Or => match (&left, &right) {
            (Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(if op == BinaryOp::And {
                *a && *b
            } else {
                *a || *b
            })),
            _ => Err(operand_error(op, &left, &right)),
        },
        BinaryOp::Equal | BinaryOp::NotEqual => {
            let equal = equality(op, &left, &right)?;
            Ok(Value::Boolean(if op == BinaryOp::Equal {
                equal
            } else {
                !equal
            }))
        }
        BinaryOp::Greater | BinaryOp::Less | BinaryOp::GreaterEqual | BinaryOp::LessEqual => {
            relational(op, &left, &right).map(Value::Boolean)
        }
    }
}

fn operand_error(op: BinaryOp, left: &Value, right: &Value) -> crate::Error {
    type_error!(
        "Operator '{}' cannot be applied to {} and {}",
        op,
        left.value_type(),
        right.value_type()
    )
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> Result<Value> {
    if let (Value::Integer(a), Value::Integer(b)) = (left, right) {
        return integer_arithmetic(op, *a, *b);
    }

    let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) else {
        return Err(operand_error(op, left, right));
    };

    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Subtract => a - b,
        BinaryOp::Multiply => a * b,
        BinaryOp::Divide => {
            if b == 0.0 {
                return Err(runtime_error!("Division by zero"));
            }
            a / b
        }
        BinaryOp::Modulo => {
            if b == 0.0 {
                return Err(runtime_error!("Modulo by zero"));
            }
            a % b
        }
        _ => return Err(operand_error(op, left, right)),
    };

    Ok(Value::Float(result))
}

fn integer_arithmetic(op: BinaryOp, a: i64, b: i64) -> Result<Value> {
    let result = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Subtract => a.checked_sub(b),
        BinaryOp::Multiply => a.checked_mul(b),
        BinaryOp::Divide => {
            if b == 0 {
                return Err(runtime_error!("Division by zero"));
            }
            return Ok(Value::Float(a as f64 / b as f64));
        }
        BinaryOp::Modulo => {
            if b == 0 {
                return Err(runtime_error!("Modulo by zero"));
            }
            a.checked_rem(b)
        }
        _ => {
            return Err(operand_error(
                op,
                &Value::Integer(a),
                &Value::Integer(b),
            ))
        }
    };

    result
        .map(Value::Integer)
        .ok_or_else(|| runtime_error!("Integer overflow in {} {} {}", a, op, b))
}

fn equality(op: BinaryOp, left: &Value, right: &Value) -> Result<bool> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(a == b),
        (Value::String(a), Value::String(b)) => Ok(a == b),
        (Value::Boolean(a), Value::Boolean(b)) => Ok(a == b),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => Ok(a == b),
            _ => Err(operand_error(op, left, right)),
        },
    }
}

fn relational(op: BinaryOp, left: &Value, right: &Value) -> Result<bool> {
    let ordering = match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Boolean(_), _) | (_, Value::Boolean(_)) => {
            return Err(type_error!(
                "Operator '{}' is not supported for boolean operands",
                op
            ))
        }
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => return Err(operand_error(op, left, right)),
        },
    };

    // Unordered (NaN) comparisons are false
    let Some(ordering) = ordering else {
        return Ok(false);
    };

    Ok(match op {
        BinaryOp::Greater => ordering == Ordering::Greater,
        BinaryOp::Less => ordering == Ordering::Less,
        BinaryOp::GreaterEqual => ordering != Ordering::Less,
        BinaryOp::LessEqual => ordering != Ordering::Greater,
        _ => return Err(operand_error(op, left, right)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn int(i: i64) -> Value {
        Value::Integer(i)
    }

    fn float(f: f64) -> Value {
        Value::Float(f)
    }

    fn text(s: &str) -> Value {
        Value::String(s.to_string())
    }

    #[test]
    fn test_numeric_promotion() {
        assert_eq!(binary(BinaryOp::Add, int(2), int(3)).unwrap(), int(5));
        assert_eq!(binary(BinaryOp::Add, int(2), float(0.5)).unwrap(), float(2.5));
        assert_eq!(binary(BinaryOp::Multiply, float(1.5), int(2)).unwrap(), float(3.0));
        assert_eq!(binary(BinaryOp::Divide, int(7), int(2)).unwrap(), float(3.5));
        assert_eq!(binary(BinaryOp::Divide, int(8), int(2)).unwrap(), float(4.0));
        assert_eq!(binary(BinaryOp::Modulo, int(-7), int(3)).unwrap(), int(-1));
        assert_eq!(binary(BinaryOp::Modulo, float(7.5), int(2)).unwrap(), float(1.5));
    }

    #[test]
    fn test_division_and_modulo_by_zero() {
        let err = binary(BinaryOp::Divide, int(10), int(0)).unwrap_err();
        assert!(matches!(&err, Error::Runtime(m) if m.contains("Division by zero")));

        let err = binary(BinaryOp::Divide, float(1.0), float(0.0)).unwrap_err();
        assert!(matches!(&err, Error::Runtime(m) if m.contains("Division by zero")));

        let err = binary(BinaryOp::Modulo, int(10), int(0)).unwrap_err();
        assert!(matches!(&err, Error::Runtime(m) if m.contains("Modulo by zero")));
    }

    #[test]
    fn test_integer_overflow() {
        assert!(matches!(
            binary(BinaryOp::Add, int(i64::MAX), int(1)),
            Err(Error::Runtime(_))
        ));
        assert!(matches!(
            binary(BinaryOp::Modulo, int(i64::MIN), int(-1)),
            Err(Error::Runtime(_))
        ));
        assert!(matches!(
            unary(UnaryOp::Negate, int(i64::MIN)),
            Err(Error::Runtime(_))
        ));
    }

    #[test]
    fn test_string_rules() {
        assert_eq!(binary(BinaryOp::Add, text("a"), text("b")).unwrap(), text("ab"));
        assert!(matches!(
            binary(BinaryOp::Add, text("a"), int(1)),
            Err(Error::Type(_))
        ));
        assert!(matches!(
            binary(BinaryOp::Subtract, text("a"), text("b")),
            Err(Error::Type(_))
        ));
        assert_eq!(
            binary(BinaryOp::Less, text("apple"), text("banana")).unwrap(),
            Value::Boolean(true)
        );
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(binary(BinaryOp::Equal, int(1), float(1.0)).unwrap(), Value::Boolean(true));
        assert_eq!(binary(BinaryOp::GreaterEqual, int(2), float(2.0)).unwrap(), Value::Boolean(true));
        assert_eq!(binary(BinaryOp::NotEqual, Value::Boolean(true), Value::Boolean(false)).unwrap(), Value::Boolean(true));
        assert!(matches!(
            binary(BinaryOp::Greater, Value::Boolean(true), Value::Boolean(false)),
            Err(Error::Type(_))
        ));
        assert!(matches!(
            binary(BinaryOp::Equal, text("1"), int(1)),
            Err(Error::Type(_))
        ));
        assert_eq!(
            binary(BinaryOp::Less, float(f64::NAN), int(1)).unwrap(),
            Value::Boolean(false)
        );
    }

    #[test]
    fn test_logical_operators_require_booleans() {
        assert_eq!(
            binary(BinaryOp::And, Value::Boolean(true), Value::Boolean(false)).unwrap(),
            Value::Boolean(false)
        );
        assert_eq!(
            binary(BinaryOp::Or, Value::Boolean(true), Value::Boolean(false)).unwrap(),
            Value::Boolean(true)
        );
        assert!(matches!(
            binary(BinaryOp::And, Value::Boolean(true), int(1)),
            Err(Error::Type(_))
        ));
        assert!(matches!(unary(UnaryOp::Not, int(0)), Err(Error::Type(_))));
        assert!(matches!(unary(UnaryOp::Negate, text("x")), Err(Error::Type(_))));
    }
}
