//! Full expressions: assignments, conditions and plain values.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    expression::{BinaryOp, ExpressionElement, Operator, Variable},
    Error, Result,
};

/// The left side of an [`Expression`].
///
/// Its shape follows the comparison operator: an assignment target when there
/// is no operator, an element sequence (the left operand) when there is one.
#[derive(Debug, Clone, PartialEq)]
pub enum LeftSide {
    /// Assignment target.
    Variable(Variable),
    /// Left operand of a comparison.
    Elements(Vec<ExpressionElement>),
}

/// An ordered token sequence with an optional left side and comparison operator.
///
/// Three shapes occur in diagrams:
///
/// | Shape | Left side | Operator | Used by |
/// |-------|-----------|----------|---------|
/// | Assignment | [`LeftSide::Variable`] | none | AssignVariable nodes |
/// | Condition | [`LeftSide::Elements`] | comparison | Conditional nodes |
/// | Value | none | none | Output nodes, conditions without a comparison, call arguments |
///
/// The right side is always present, possibly empty.
///
/// # Examples
///
/// ```rust
/// use flowscope::expression::{BinaryOp, Expression, ExpressionElement, Variable, VariableType};
///
/// let x = Variable::new("v1", VariableType::Integer, "x", "n1");
/// let cond = Expression::condition(
///     vec![ExpressionElement::variable("e1", x.clone())],
///     BinaryOp::Less,
///     vec![ExpressionElement::literal("e2", "10")],
/// );
/// assert_eq!(cond.to_string(), "x < 10");
///
/// let object = cond.to_object()?;
/// assert_eq!(Expression::from_object(&object)?, cond);
/// # Ok::<(), flowscope::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExpressionObject", into = "ExpressionObject")]
pub struct Expression {
    left: Option<LeftSide>,
    right: Vec<ExpressionElement>,
    operator: Option<BinaryOp>,
}

impl Expression {
    /// Creates an assignment `target = right`.
    #[must_use]
    pub fn assignment(target: Variable, right: Vec<ExpressionElement>) -> Self {
        Expression {
            left: Some(LeftSide::Variable(target)),
            right,
            operator: None,
        }
    }

    /// Creates a condition `left op right`.
    #[must_use]
    pub fn condition(
        left: Vec<ExpressionElement>,
        operator: BinaryOp,
        right: Vec<ExpressionElement>,
    ) -> Self {
        Expression {
            left: Some(LeftSide::Elements(left)),
            right,
            operator: Some(operator),
        }
    }

    /// Creates a plain value expression.
    #[must_use]
    pub fn value(right: Vec<ExpressionElement>) -> Self {
        Expression {
            left: None,
            right,
            operator: None,
        }
    }

    /// Returns the left side, if any.
    #[must_use]
    pub fn left(&self) -> Option<&LeftSide> {
        self.left.as_ref()
    }

    /// Returns the assignment target, if this is an assignment.
    #[must_use]
    pub fn target(&self) -> Option<&Variable> {
        match &self.left {
            Some(LeftSide::Variable(var)) => Some(var),
            _ => None,
        }
    }

    /// Returns the left operand tokens, if this is a comparison.
    #[must_use]
    pub fn left_elements(&self) -> Option<&[ExpressionElement]> {
        match &self.left {
            Some(LeftSide::Elements(elements)) => Some(elements),
            _ => None,
        }
    }

    /// Returns the right side tokens.
    #[must_use]
    pub fn right(&self) -> &[ExpressionElement] {
        &self.right
    }

    /// Returns the comparison operator, if any.
    #[must_use]
    pub fn operator(&self) -> Option<BinaryOp> {
        self.operator
    }

    /// Converts the expression into its snapshot object form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_object(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Reads an expression from its snapshot object form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the object does not follow the snapshot form,
    /// including when the left side shape does not match the operator.
    pub fn from_object(object: &serde_json::Value) -> Result<Self> {
        Ok(Expression::deserialize(object)?)
    }
}

fn write_tokens(f: &mut fmt::Formatter<'_>, tokens: &[ExpressionElement]) -> fmt::Result {
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{token}")?;
    }
    Ok(())
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.left, self.operator) {
            (Some(LeftSide::Variable(var)), _) => {
                write!(f, "{} = ", var.name())?;
                write_tokens(f, &self.right)
            }
            (Some(LeftSide::Elements(left)), Some(op)) => {
                write_tokens(f, left)?;
                write!(f, " {op} ")?;
                write_tokens(f, &self.right)
            }
            _ => write_tokens(f, &self.right),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum LeftSideObject {
    Variable(Variable),
    Elements(Vec<ExpressionElement>),
}

/// Snapshot form of an [`Expression`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpressionObject {
    #[serde(default)]
    left_side: Option<LeftSideObject>,
    right_side: Vec<ExpressionElement>,
    #[serde(default)]
    operator: Option<String>,
}

impl TryFrom<ExpressionObject> for Expression {
    type Error = Error;

    fn try_from(object: ExpressionObject) -> Result<Self> {
        let operator = match object.operator.as_deref() {
            None => None,
            Some(text) => {
                let op = Operator::from_str(text)
                    .ok()
                    .and_then(Operator::as_binary)
                    .ok_or_else(|| malformed_error!("'{}' is not a binary operator", text))?;
                Some(op)
            }
        };

        let left = match (object.left_side, operator) {
            (None, None) => None,
            (Some(LeftSideObject::Variable(var)), None) => Some(LeftSide::Variable(var)),
            (Some(LeftSideObject::Elements(elements)), Some(_)) => {
                Some(LeftSide::Elements(elements))
            }
            (Some(LeftSideObject::Elements(_)), None) => {
                return Err(malformed_error!(
                    "left side is an element sequence but no operator is present"
                ))
            }
            (Some(LeftSideObject::Variable(_)), Some(op)) => {
                return Err(malformed_error!(
                    "left side is a variable but operator '{}' is present",
                    op
                ))
            }
            (None, Some(op)) => {
                return Err(malformed_error!("operator '{}' has no left side", op))
            }
        };

        Ok(Expression {
            left,
            right: object.right_side,
            operator,
        })
    }
}

impl From<Expression> for ExpressionObject {
    fn from(expression: Expression) -> Self {
        ExpressionObject {
            left_side: expression.left.map(|left| match left {
                LeftSide::Variable(var) => LeftSideObject::Variable(var),
                LeftSide::Elements(elements) => LeftSideObject::Elements(elements),
            }),
            right_side: expression.right,
            operator: expression.operator.map(|op| op.to_string()),
        }
    }
}
