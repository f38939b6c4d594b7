//! Expression elements, the tokens of the expression language.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    expression::{Conversion, Expression, Operator, Variable},
    Error, Result,
};

/// One token of an expression.
///
/// Elements keep the id assigned by the editing layer so that failures can be
/// traced back to the token that caused them. The payload is a closed set of
/// kinds, see [`ElementKind`].
///
/// # Examples
///
/// ```rust
/// use flowscope::expression::{Conversion, ElementKind, Expression, ExpressionElement};
///
/// let call = ExpressionElement::function(
///     "f1",
///     Conversion::String,
///     Expression::value(vec![ExpressionElement::literal("l1", "1")]),
/// );
/// assert!(matches!(call.kind(), ElementKind::Function { .. }));
/// assert_eq!(call.to_string(), "string(1)");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ElementObject", into = "ElementObject")]
pub struct ExpressionElement {
    id: String,
    kind: ElementKind,
}

/// The payload of an [`ExpressionElement`].
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// Raw literal text; typed by its surface form when evaluated.
    Literal(String),
    /// An operator or parenthesis.
    Operator(Operator),
    /// A reference to a declared variable.
    Variable(Variable),
    /// A conversion call wrapping exactly one nested expression.
    Function {
        /// The conversion applied to the argument.
        conversion: Conversion,
        /// The argument expression.
        argument: Box<Expression>,
    },
}

impl ExpressionElement {
    /// Creates an element from its parts.
    pub fn new(id: impl Into<String>, kind: ElementKind) -> Self {
        ExpressionElement {
            id: id.into(),
            kind,
        }
    }

    /// Creates a literal element.
    pub fn literal(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, ElementKind::Literal(text.into()))
    }

    /// Creates an operator element from its textual form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] if `text` is not one of the supported operators.
    pub fn operator(id: impl Into<String>, text: &str) -> Result<Self> {
        let op = Operator::from_str(text)
            .map_err(|_| malformed_error!("unknown operator '{}'", text))?;
        Ok(Self::new(id, ElementKind::Operator(op)))
    }

    /// Creates an operator element from an already resolved [`Operator`].
    pub fn op(id: impl Into<String>, op: Operator) -> Self {
        Self::new(id, ElementKind::Operator(op))
    }

    /// Creates a variable reference element.
    pub fn variable(id: impl Into<String>, variable: Variable) -> Self {
        Self::new(id, ElementKind::Variable(variable))
    }

    /// Creates a conversion call element.
    pub fn function(id: impl Into<String>, conversion: Conversion, argument: Expression) -> Self {
        Self::new(
            id,
            ElementKind::Function {
                conversion,
                argument: Box::new(argument),
            },
        )
    }

    /// Returns the element id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the element payload.
    #[must_use]
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Returns the operator if this element is one.
    #[must_use]
    pub fn as_operator(&self) -> Option<Operator> {
        match self.kind {
            ElementKind::Operator(op) => Some(op),
            _ => None,
        }
    }

    /// Returns the textual value of the element.
    ///
    /// Literal text, operator symbol, variable name, or conversion name.
    #[must_use]
    pub fn value(&self) -> String {
        match &self.kind {
            ElementKind::Literal(text) => text.clone(),
            ElementKind::Operator(op) => op.to_string(),
            ElementKind::Variable(var) => var.name().to_string(),
            ElementKind::Function { conversion, .. } => conversion.to_string(),
        }
    }
}

impl fmt::Display for ExpressionElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ElementKind::Function {
                conversion,
                argument,
            } => write!(f, "{conversion}({argument})"),
            _ => write!(f, "{}", self.value()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ElementType {
    Literal,
    Operator,
    Variable,
    Function,
}

/// Snapshot form of an [`ExpressionElement`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ElementObject {
    id: String,
    #[serde(rename = "type")]
    kind: ElementType,
    value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    variable: Option<Variable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expression: Option<Box<Expression>>,
}

impl TryFrom<ElementObject> for ExpressionElement {
    type Error = Error;

    fn try_from(object: ElementObject) -> Result<Self> {
        let kind = match object.kind {
            ElementType::Literal => ElementKind::Literal(object.value),
            ElementType::Operator => {
                let op = Operator::from_str(&object.value).map_err(|_| {
                    malformed_error!(
                        "element {} has unknown operator '{}'",
                        object.id,
                        object.value
                    )
                })?;
                ElementKind::Operator(op)
            }
            ElementType::Variable => {
                let variable = object.variable.ok_or_else(|| {
                    malformed_error!("variable element {} carries no variable", object.id)
                })?;
                ElementKind::Variable(variable)
            }
            ElementType::Function => {
                let conversion = Conversion::from_str(&object.value).map_err(|_| {
                    malformed_error!(
                        "function element {} has unknown conversion '{}'",
                        object.id,
                        object.value
                    )
                })?;
                let argument = object.expression.ok_or_else(|| {
                    malformed_error!("function element {} carries no expression", object.id)
                })?;
                ElementKind::Function {
                    conversion,
                    argument,
                }
            }
        };

        Ok(ExpressionElement {
            id: object.id,
            kind,
        })
    }
}

impl From<ExpressionElement> for ElementObject {
    fn from(element: ExpressionElement) -> Self {
        let value = element.value();
        let (kind, variable, expression) = match element.kind {
            ElementKind::Literal(_) => (ElementType::Literal, None, None),
            ElementKind::Operator(_) => (ElementType::Operator, None, None),
            ElementKind::Variable(var) => (ElementType::Variable, Some(var), None),
            ElementKind::Function { argument, .. } => {
                (ElementType::Function, None, Some(argument))
            }
        };

        ElementObject {
            id: element.id,
            kind,
            value,
            variable,
            expression,
        }
    }
}
