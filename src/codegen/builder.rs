//! Lowering of token sequences into target expressions.

use crate::{
    codegen::ast::Expr,
    expression::{BinaryOp, Conversion, Expression, ExpressionElement, UnaryOp, Value, Variable, VariableType},
    parser::{build_expression, build_tree, ParseError, TreeBuilder},
};

/// [`TreeBuilder`] producing target [`Expr`]s.
///
/// Literals are typed by their surface form, variables become identifiers and
/// conversions become calls to the matching target builtin.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExprBuilder;

impl TreeBuilder for ExprBuilder {
    type Node = Expr;
    type Error = ParseError;

    fn empty(&mut self) -> Result<Expr, ParseError> {
        Ok(Expr::Empty)
    }

    fn literal(&mut self, _element: &ExpressionElement, text: &str) -> Result<Expr, ParseError> {
        Ok(Expr::Literal(Value::from_literal(text)))
    }

    fn variable(
        &mut self,
        _element: &ExpressionElement,
        variable: &Variable,
    ) -> Result<Expr, ParseError> {
        Ok(Expr::Identifier(variable.name().to_string()))
    }

    fn call(
        &mut self,
        _element: &ExpressionElement,
        conversion: Conversion,
        argument: Expr,
    ) -> Result<Expr, ParseError> {
        Ok(Expr::call(builtin(conversion.target_type()), vec![argument]))
    }

    fn unary(&mut self, op: UnaryOp, operand: Expr) -> Result<Expr, ParseError> {
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn binary(&mut self, op: BinaryOp, left: Expr, right: Expr) -> Result<Expr, ParseError> {
        Ok(Expr::binary(op, left, right))
    }
}

/// The target builtin converting to `var_type`.
pub(crate) fn builtin(var_type: VariableType) -> &'static str {
    match var_type {
        VariableType::Integer => "int",
        VariableType::Float => "float",
        VariableType::String => "str",
        VariableType::Boolean => "bool",
    }
}

/// Lowers a token sequence.
pub(crate) fn lower_tokens(tokens: &[ExpressionElement]) -> Result<Expr, ParseError> {
    build_tree(tokens, &mut ExprBuilder)
}

/// Lowers a whole expression; comparisons join both sides.
pub(crate) fn lower(expression: &Expression) -> Result<Expr, ParseError> {
    build_expression(expression, &mut ExprBuilder)
}

/// The expression reading a value of `var_type` from standard input.
pub(crate) fn read_input(var_type: VariableType) -> Expr {
    let read = Expr::call("input", Vec::new());
    match var_type {
        VariableType::String => read,
        other => Expr::call(builtin(other), vec![read]),
    }
}
