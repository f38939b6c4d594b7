//! Declared variables and their runtime bindings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    expression::{Value, VariableType},
    Error, Result,
};

/// A named, typed slot declared by exactly one diagram node.
///
/// The `id` is globally unique and is what the evaluator uses to look up a
/// variable's current value; the `name` is what generated code refers to.
/// The declared type cannot change once a variable exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    id: String,
    #[serde(rename = "type")]
    var_type: VariableType,
    name: String,
    node_id: String,
}

impl Variable {
    /// Creates a new variable declaration.
    ///
    /// # Arguments
    ///
    /// * `id` - Globally unique identifier
    /// * `var_type` - Declared type
    /// * `name` - Name used by generated code and error messages
    /// * `node_id` - Id of the diagram node that declares the variable
    pub fn new(
        id: impl Into<String>,
        var_type: VariableType,
        name: impl Into<String>,
        node_id: impl Into<String>,
    ) -> Self {
        Variable {
            id: id.into(),
            var_type,
            name: name.into(),
            node_id: node_id.into(),
        }
    }

    /// Returns the unique identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the declared type.
    #[must_use]
    pub fn var_type(&self) -> VariableType {
        self.var_type
    }

    /// Returns the variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the id of the declaring diagram node.
    #[must_use]
    pub fn node_id(&self) -> &str {
        &self.node_id
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A [`Variable`] bound to a concrete runtime value.
///
/// The value's tag always matches the variable's declared type; the
/// constructor rejects anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ValuedVariableObject", into = "ValuedVariableObject")]
pub struct ValuedVariable {
    variable: Variable,
    value: Value,
}

impl ValuedVariable {
    /// Binds a value to a variable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Type`] if the value's type differs from the declared type.
    pub fn new(variable: Variable, value: Value) -> Result<Self> {
        if value.value_type() != variable.var_type() {
            return Err(type_error!(
                "Cannot bind {} value to {} variable '{}'",
                value.value_type(),
                variable.var_type(),
                variable.name()
            ));
        }

        Ok(ValuedVariable { variable, value })
    }

    /// Returns the underlying declaration.
    #[must_use]
    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    /// Returns the bound value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Shorthand for `self.variable().id()`.
    #[must_use]
    pub fn id(&self) -> &str {
        self.variable.id()
    }

    /// Shorthand for `self.variable().name()`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.variable.name()
    }
}

/// Snapshot form of a [`ValuedVariable`]: the variable fields plus `value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ValuedVariableObject {
    #[serde(flatten)]
    variable: Variable,
    value: serde_json::Value,
}

impl TryFrom<ValuedVariableObject> for ValuedVariable {
    type Error = Error;

    fn try_from(object: ValuedVariableObject) -> Result<Self> {
        let value = Value::from_json(&object.value, object.variable.var_type())?;
        ValuedVariable::new(object.variable, value)
    }
}

impl From<ValuedVariable> for ValuedVariableObject {
    fn from(valued: ValuedVariable) -> Self {
        ValuedVariableObject {
            value: valued.value.to_json(),
            variable: valued.variable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valued_variable_rejects_mismatched_tag() {
        let var = Variable::new("v1", VariableType::Integer, "count", "n1");
        assert!(ValuedVariable::new(var.clone(), Value::Integer(3)).is_ok());

        let err = ValuedVariable::new(var, Value::String("3".into())).unwrap_err();
        assert!(matches!(err, Error::Type(_)));
        assert!(err.to_string().contains("count"));
    }

    #[test]
    fn test_variable_snapshot_form() {
        let var = Variable::new("v1", VariableType::Float, "ratio", "n7");
        let json = serde_json::to_value(&var).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "v1", "type": "float", "name": "ratio", "nodeId": "n7"})
        );

        let back: Variable = serde_json::from_value(json).unwrap();
        assert_eq!(back, var);
    }

    #[test]
    fn test_valued_variable_snapshot_form() {
        let json = serde_json::json!({
            "id": "v2", "type": "float", "name": "x", "nodeId": "n2", "value": 3
        });
        let valued: ValuedVariable = serde_json::from_value(json).unwrap();
        assert_eq!(valued.value(), &Value::Float(3.0));
        assert_eq!(valued.name(), "x");

        let bad = serde_json::json!({
            "id": "v3", "type": "boolean", "name": "b", "nodeId": "n3", "value": "yes"
        });
        assert!(serde_json::from_value::<ValuedVariable>(bad).is_err());
    }
}
