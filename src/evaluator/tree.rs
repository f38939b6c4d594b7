//! Expression trees as consumed by the evaluator.

use crate::{
    expression::{
        BinaryOp, Conversion, ExpressionElement, UnaryOp, Value, Variable,
    },
    parser::TreeBuilder,
    Error, Result,
};

/// A parsed expression ready for evaluation.
///
/// Literals are already typed, variable references carry the declaration they
/// resolve to, and conversion calls wrap their argument tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    /// An empty token sequence. Evaluating it is a type error.
    Empty,
    /// A typed literal.
    Literal(Value),
    /// A variable reference, resolved against the valued variables at evaluation time.
    Identifier(Variable),
    /// A prefix operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<ExprNode>,
    },
    /// An infix operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// The left operand.
        left: Box<ExprNode>,
        /// The right operand.
        right: Box<ExprNode>,
    },
    /// A conversion call.
    Call {
        /// The conversion.
        conversion: Conversion,
        /// The argument.
        argument: Box<ExprNode>,
    },
}

/// [`TreeBuilder`] producing [`ExprNode`] trees.
///
/// Construction never fails on its own; only parser failures are reported.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeBuilder;

impl TreeBuilder for NodeBuilder {
    type Node = ExprNode;
    type Error = Error;

    fn empty(&mut self) -> Result<ExprNode> {
        Ok(ExprNode::Empty)
    }

    fn literal(&mut self, _element: &ExpressionElement, text: &str) -> Result<ExprNode> {
        Ok(ExprNode::Literal(Value::from_literal(text)))
    }

    fn variable(&mut self, _element: &ExpressionElement, variable: &Variable) -> Result<ExprNode> {
        Ok(ExprNode::Identifier(variable.clone()))
    }

    fn call(
        &mut self,
        _element: &ExpressionElement,
        conversion: Conversion,
        argument: ExprNode,
    ) -> Result<ExprNode> {
        Ok(ExprNode::Call {
            conversion,
            argument: Box::new(argument),
        })
    }

    fn unary(&mut self, op: UnaryOp, operand: ExprNode) -> Result<ExprNode> {
        Ok(ExprNode::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn binary(&mut self, op: BinaryOp, left: ExprNode, right: ExprNode) -> Result<ExprNode> {
        Ok(ExprNode::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}
