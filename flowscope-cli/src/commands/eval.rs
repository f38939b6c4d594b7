use std::path::Path;

use anyhow::{anyhow, bail, Context};
use flowscope::{
    evaluator::{assign, evaluate, evaluate_condition},
    expression::{Expression, ValuedVariable, Value, VariableType},
};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::read_json,
    output::print_output,
};

#[derive(Debug, Serialize)]
struct EvalOutput {
    expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(rename = "type")]
    value_type: VariableType,
    value: serde_json::Value,
    #[serde(skip)]
    display: String,
}

pub fn run(
    path: &Path,
    vars: Option<&Path>,
    expect: Option<&str>,
    global: &GlobalOptions,
) -> anyhow::Result<()> {
    let expression = Expression::from_object(&read_json(path)?)
        .with_context(|| format!("invalid expression object in {}", path.display()))?;

    let variables: Vec<ValuedVariable> = match vars {
        Some(vars_path) => serde_json::from_value(read_json(vars_path)?)
            .with_context(|| format!("invalid variable list in {}", vars_path.display()))?,
        None => Vec::new(),
    };

    let expected = expect
        .map(|name| {
            name.parse::<VariableType>()
                .map_err(|_| anyhow!("unknown type '{name}' (expected string, integer, float or boolean)"))
        })
        .transpose()?;

    let (target, value) = evaluate_expression(&expression, &variables, expected)?;

    let output = EvalOutput {
        expression: expression.to_string(),
        display: match &target {
            Some(name) => format!("{name} = {value}"),
            None => value.to_string(),
        },
        target,
        value_type: value.value_type(),
        value: value.to_json(),
    };

    print_output(&output, global, |out| println!("{}", out.display))
}

/// Evaluates `expression` by its shape: an assignment yields the target and its
/// new value, a comparison yields a boolean, anything else yields its value.
///
/// `expected` only applies to plain values; assignments coerce to the target's
/// declared type and comparisons are always boolean.
fn evaluate_expression(
    expression: &Expression,
    variables: &[ValuedVariable],
    expected: Option<VariableType>,
) -> anyhow::Result<(Option<String>, Value)> {
    if let Some(target) = expression.target() {
        if expected.is_some() {
            bail!(
                "--expect does not apply to an assignment; '{}' is coerced to {}",
                target.name(),
                target.var_type()
            );
        }
        let updated = assign(expression, variables)?;
        return Ok((Some(updated.name().to_string()), updated.value().clone()));
    }

    if expression.operator().is_some() {
        if expected.is_some_and(|ty| ty != VariableType::Boolean) {
            bail!("--expect does not apply to a comparison, which is always boolean");
        }
        return Ok((None, Value::Boolean(evaluate_condition(expression, variables)?)));
    }

    Ok((None, evaluate(expression.right(), expected, variables)?))
}
