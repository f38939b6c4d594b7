//! Type-checked evaluation of expressions over valued variables.
//!
//! Evaluation always goes through the shared [`parser`](crate::parser): the
//! token sequence is turned into an [`ExprNode`] tree by [`NodeBuilder`] and the
//! tree is folded bottom-up. Variable references are looked up by id in the
//! supplied [`ValuedVariable`] set, never by name.
//!
//! # Entry points
//!
//! - [`evaluate`] computes a token sequence, optionally coercing the result
//! - [`compare`] joins two token sequences with a comparison operator
//! - [`evaluate_condition`] computes a conditional node's expression
//! - [`assign`] computes an assignment and returns the new valued variable
//!
//! # Examples
//!
//! ```rust
//! use flowscope::{
//!     evaluator::assign,
//!     expression::{Expression, ExpressionElement, Value, Variable, VariableType},
//! };
//!
//! let x = Variable::new("v1", VariableType::Integer, "x", "n1");
//! let expr = Expression::assignment(
//!     x,
//!     vec![
//!         ExpressionElement::literal("e1", "10.5"),
//!         ExpressionElement::operator("e2", "+")?,
//!         ExpressionElement::literal("e3", "3.5"),
//!     ],
//! );
//! let result = assign(&expr, &[])?;
//! assert_eq!(result.value(), &Value::Integer(14));
//! # Ok::<(), flowscope::Error>(())
//! ```

mod convert;
mod ops;
mod tree;

pub use tree::{ExprNode, NodeBuilder};

use std::collections::HashMap;

use crate::{
    expression::{
        BinaryOp, Expression, ExpressionElement, ValuedVariable, Value, VariableType,
    },
    parser::{build_expression, build_tree, ParseError},
    Result,
};

/// Evaluates expression trees against a fixed set of valued variables.
///
/// The free functions of this module construct one per call; holding an
/// `Evaluator` avoids rebuilding the lookup table when many expressions are
/// computed over the same state.
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    values: HashMap<&'a str, &'a Value>,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator over `variables`. Later entries win on duplicate ids.
    #[must_use]
    pub fn new(variables: &'a [ValuedVariable]) -> Self {
        let values = variables
            .iter()
            .map(|variable| (variable.id(), variable.value()))
            .collect();
        Evaluator { values }
    }

    /// Folds an already built tree into a value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Type`] for operand type mismatches and empty
    /// trees, and [`crate::Error::Runtime`] for unbound variables, zero
    /// divisors and integer overflow.
    pub fn eval(&self, node: &ExprNode) -> Result<Value> {
        match node {
            ExprNode::Empty => Err(type_error!("Expression is empty or incomplete")),
            ExprNode::Literal(value) => Ok(value.clone()),
            ExprNode::Identifier(variable) => self
                .values
                .get(variable.id())
                .map(|value| (*value).clone())
                .ok_or_else(|| {
                    runtime_error!("Variable '{}' has no value assigned", variable.name())
                }),
            ExprNode::Unary { op, operand } => ops::unary(*op, self.eval(operand)?),
            ExprNode::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                ops::binary(*op, left, right)
            }
            ExprNode::Call {
                conversion,
                argument,
            } => convert::convert(*conversion, self.eval(argument)?),
        }
    }

    /// See [`evaluate`].
    ///
    /// # Errors
    ///
    /// See [`evaluate`].
    pub fn evaluate(
        &self,
        tokens: &[ExpressionElement],
        expected: Option<VariableType>,
    ) -> Result<Value> {
        let tree = build_tree(tokens, &mut NodeBuilder)?;
        let value = self.eval(&tree)?;
        match expected {
            Some(expected) => convert::coerce(value, expected),
            None => Ok(value),
        }
    }

    /// See [`compare`].
    ///
    /// # Errors
    ///
    /// See [`compare`].
    pub fn compare(
        &self,
        left: &[ExpressionElement],
        op: BinaryOp,
        right: &[ExpressionElement],
    ) -> Result<bool> {
        if !op.is_comparison() {
            return Err(type_error!("Operator '{}' is not a comparison", op));
        }
        if left.is_empty() || right.is_empty() {
            return Err(ParseError::MissingOperand(op.to_string()).into());
        }
        let left = self.evaluate(left, None)?;
        let right = self.evaluate(right, None)?;
        boolean(ops::binary(op, left, right)?)
    }

    /// See [`evaluate_condition`].
    ///
    /// # Errors
    ///
    /// See [`evaluate_condition`].
    pub fn evaluate_condition(&self, expression: &Expression) -> Result<bool> {
        match (expression.left_elements(), expression.operator()) {
            (Some(left), Some(op)) => self.compare(left, op, expression.right()),
            _ => {
                let tree = build_expression(expression, &mut NodeBuilder)?;
                boolean(self.eval(&tree)?)
            }
        }
    }

    /// See [`assign`].
    ///
    /// # Errors
    ///
    /// See [`assign`].
    pub fn assign(&self, expression: &Expression) -> Result<ValuedVariable> {
        let Some(target) = expression.target() else {
            return Err(malformed_error!(
                "Expression '{}' has no assignment target",
                expression
            ));
        };
        let value = self.evaluate(expression.right(), Some(target.var_type()))?;
        ValuedVariable::new(target.clone(), value)
    }
}

fn boolean(value: Value) -> Result<bool> {
    match value {
        Value::Boolean(b) => Ok(b),
        other => Err(type_error!(
            "Condition must evaluate to a boolean, got {}",
            other.value_type()
        )),
    }
}

/// Evaluates a token sequence.
///
/// With `expected` set, an `integer` result is widened to `float` and a `float`
/// result is truncated to `integer`; any other mismatch is an error.
///
/// # Errors
///
/// Returns [`crate::Error::Parse`] for malformed sequences,
/// [`crate::Error::Type`] for type mismatches and [`crate::Error::Runtime`] for
/// unbound variables, zero divisors and overflow.
pub fn evaluate(
    tokens: &[ExpressionElement],
    expected: Option<VariableType>,
    variables: &[ValuedVariable],
) -> Result<Value> {
    Evaluator::new(variables).evaluate(tokens, expected)
}

/// Evaluates `left op right` where `op` is a comparison.
///
/// # Errors
///
/// Returns [`crate::Error::Type`] if `op` is not a comparison or the operands
/// cannot be compared, [`crate::Error::Parse`] if either side is empty, plus
/// everything [`evaluate`] returns.
pub fn compare(
    left: &[ExpressionElement],
    op: BinaryOp,
    right: &[ExpressionElement],
    variables: &[ValuedVariable],
) -> Result<bool> {
    Evaluator::new(variables).compare(left, op, right)
}

/// Evaluates a condition expression to a boolean.
///
/// A `leftSide` with an operator is a comparison; without one the right side
/// must itself evaluate to a boolean.
///
/// # Errors
///
/// Returns [`crate::Error::Type`] if the result is not a boolean, plus
/// everything [`evaluate`] returns.
pub fn evaluate_condition(expression: &Expression, variables: &[ValuedVariable]) -> Result<bool> {
    Evaluator::new(variables).evaluate_condition(expression)
}

/// Evaluates an assignment and returns the updated valued variable.
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] if the expression has no target
/// variable, plus everything [`evaluate`] returns.
pub fn assign(expression: &Expression, variables: &[ValuedVariable]) -> Result<ValuedVariable> {
    Evaluator::new(variables).assign(expression)
}
