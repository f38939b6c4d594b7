//! Operator-precedence conversion of infix tokens into postfix order.

use crate::{
    expression::{BinaryOp, ElementKind, ExpressionElement, Operator, UnaryOp},
    parser::ParseError,
};

/// One entry of the postfix sequence.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Postfix<'a> {
    /// A leaf: literal, variable or conversion call.
    Operand(&'a ExpressionElement),
    /// A prefix operator consuming one operand.
    Unary(UnaryOp),
    /// An infix operator consuming two operands.
    Binary(BinaryOp),
}

#[derive(Debug, Clone, Copy)]
enum Pending {
    Paren,
    Unary(UnaryOp),
    Binary(BinaryOp),
}

impl Pending {
    fn emit<'a>(self) -> Option<Postfix<'a>> {
        match self {
            Pending::Paren => None,
            Pending::Unary(op) => Some(Postfix::Unary(op)),
            Pending::Binary(op) => Some(Postfix::Binary(op)),
        }
    }
}

/// Returns `true` if a `-` or `!` at this position is a prefix operator.
///
/// That is the case at the start of the sequence and after any operator other
/// than `)`.
fn in_prefix_position(previous: Option<&ExpressionElement>) -> bool {
    match previous {
        None => true,
        Some(token) => match token.as_operator() {
            Some(op) => op != Operator::CloseParen,
            None => false,
        },
    }
}

/// Reorders infix tokens into postfix order (shunting-yard).
///
/// Binary operators are left associative; unary operators bind tighter than
/// any binary operator and are right associative.
///
/// # Errors
///
/// Returns [`ParseError::MismatchedParenthesis`] for unbalanced parentheses and
/// [`ParseError::UnexpectedOperator`] / [`ParseError::MissingOperand`] for
/// operators that cannot appear where they do.
pub(crate) fn to_postfix(tokens: &[ExpressionElement]) -> Result<Vec<Postfix<'_>>, ParseError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Pending> = Vec::new();
    let mut previous: Option<&ExpressionElement> = None;

    for token in tokens {
        match token.kind() {
            ElementKind::Operator(Operator::OpenParen) => stack.push(Pending::Paren),
            ElementKind::Operator(Operator::CloseParen) => loop {
                match stack.pop() {
                    Some(Pending::Paren) => break,
                    Some(pending) => output.extend(pending.emit()),
                    None => return Err(ParseError::MismatchedParenthesis),
                }
            },
            ElementKind::Operator(op) => {
                if in_prefix_position(previous) {
                    let unary = op
                        .as_unary()
                        .ok_or_else(|| ParseError::MissingOperand(op.to_string()))?;
                    stack.push(Pending::Unary(unary));
                } else {
                    let binary = op
                        .as_binary()
                        .ok_or_else(|| ParseError::UnexpectedOperator(op.to_string()))?;

                    while let Some(&top) = stack.last() {
                        let pops = match top {
                            Pending::Paren => false,
                            Pending::Unary(_) => true,
                            Pending::Binary(pending) => pending.precedence() >= binary.precedence(),
                        };
                        if !pops {
                            break;
                        }
                        stack.pop();
                        output.extend(top.emit());
                    }
                    stack.push(Pending::Binary(binary));
                }
            }
            ElementKind::Literal(_) | ElementKind::Variable(_) | ElementKind::Function { .. } => {
                output.push(Postfix::Operand(token));
            }
        }
        previous = Some(token);
    }

    while let Some(pending) = stack.pop() {
        match pending.emit() {
            Some(item) => output.push(item),
            None => return Err(ParseError::MismatchedParenthesis),
        }
    }

    Ok(output)
}
