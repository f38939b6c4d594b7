//! Infix-to-tree construction shared by the evaluator and the code generator.
//!
//! Both consumers of the token model need an expression tree, but not the same
//! tree: the evaluator wants typed literals and resolved variable references, the
//! code generator wants target-language expressions. The precedence handling is
//! identical, so it lives here once. A consumer describes its tree through the
//! [`TreeBuilder`] trait and [`build_tree`] drives it.
//!
//! # Algorithm
//!
//! 1. Shunting-yard reorders the tokens into postfix order, resolving each `-`
//!    and `!` into a unary or binary operator by position.
//! 2. The postfix sequence is folded into a tree by calling the builder for
//!    every leaf and operator. Conversion calls recurse into their nested
//!    expression before the call itself is built.
//!
//! # Precedence (high to low)
//!
//! | Operators | Associativity |
//! |-----------|---------------|
//! | unary `!`, unary `-` | right |
//! | `* / %` | left |
//! | `+ -` | left |
//! | `> < >= <=` | left |
//! | `== !=` | left |
//! | `&&` | left |
//! | `\|\|` | left |
//!
//! # Examples
//!
//! ```rust
//! use flowscope::{
//!     evaluator::{ExprNode, NodeBuilder},
//!     expression::ExpressionElement,
//!     parser::build_tree,
//! };
//!
//! let tokens = vec![
//!     ExpressionElement::literal("a", "2"),
//!     ExpressionElement::operator("b", "+")?,
//!     ExpressionElement::literal("c", "3"),
//! ];
//! let tree = build_tree(&tokens, &mut NodeBuilder)?;
//! assert!(matches!(tree, ExprNode::Binary { .. }));
//! # Ok::<(), flowscope::Error>(())
//! ```

mod error;
mod shunting;

pub use error::ParseError;

use crate::expression::{
    BinaryOp, Conversion, ElementKind, Expression, ExpressionElement, UnaryOp, Variable,
};
use shunting::{to_postfix, Postfix};

/// Constructs the nodes of a consumer-specific expression tree.
///
/// Every method receives fully built children. Returning an error aborts the
/// build; [`ParseError`]s raised by the parser itself are converted into the
/// builder's error type.
pub trait TreeBuilder {
    /// The tree node type.
    type Node;
    /// The error type; must absorb parser failures.
    type Error: From<ParseError>;

    /// Builds the node for an empty token sequence.
    fn empty(&mut self) -> Result<Self::Node, Self::Error>;

    /// Builds a literal leaf from its raw text.
    fn literal(
        &mut self,
        element: &ExpressionElement,
        text: &str,
    ) -> Result<Self::Node, Self::Error>;

    /// Builds a variable reference leaf.
    fn variable(
        &mut self,
        element: &ExpressionElement,
        variable: &Variable,
    ) -> Result<Self::Node, Self::Error>;

    /// Builds a conversion call around an already built argument.
    fn call(
        &mut self,
        element: &ExpressionElement,
        conversion: Conversion,
        argument: Self::Node,
    ) -> Result<Self::Node, Self::Error>;

    /// Builds a prefix operation.
    fn unary(&mut self, op: UnaryOp, operand: Self::Node) -> Result<Self::Node, Self::Error>;

    /// Builds an infix operation.
    fn binary(
        &mut self,
        op: BinaryOp,
        left: Self::Node,
        right: Self::Node,
    ) -> Result<Self::Node, Self::Error>;
}

/// Builds a tree from an infix token sequence.
///
/// An empty sequence produces whatever [`TreeBuilder::empty`] returns.
///
/// # Errors
///
/// Returns the builder's error for malformed sequences (see [`ParseError`]) and
/// for anything the builder itself rejects.
pub fn build_tree<B: TreeBuilder>(
    tokens: &[ExpressionElement],
    builder: &mut B,
) -> Result<B::Node, B::Error> {
    if tokens.is_empty() {
        return builder.empty();
    }

    let postfix = to_postfix(tokens)?;
    let mut operands: Vec<B::Node> = Vec::new();

    for item in postfix {
        match item {
            Postfix::Operand(element) => {
                let leaf = build_leaf(element, builder)?;
                operands.push(leaf);
            }
            Postfix::Unary(op) => {
                let operand = operands
                    .pop()
                    .ok_or_else(|| ParseError::MissingOperand(op.to_string()))?;
                operands.push(builder.unary(op, operand)?);
            }
            Postfix::Binary(op) => {
                let right = operands
                    .pop()
                    .ok_or_else(|| ParseError::MissingOperand(op.to_string()))?;
                let left = operands
                    .pop()
                    .ok_or_else(|| ParseError::MissingOperand(op.to_string()))?;
                operands.push(builder.binary(op, left, right)?);
            }
        }
    }

    let root = operands.pop().ok_or(ParseError::NoOperands)?;
    if !operands.is_empty() {
        return Err(ParseError::ExtraOperand.into());
    }

    Ok(root)
}

/// Builds a tree for a whole [`Expression`].
///
/// A comparison becomes a binary node joining the left and right trees; any
/// other shape (including assignments) builds the right side only.
///
/// # Errors
///
/// See [`build_tree`]. A comparison with an empty side fails with
/// [`ParseError::MissingOperand`].
pub fn build_expression<B: TreeBuilder>(
    expression: &Expression,
    builder: &mut B,
) -> Result<B::Node, B::Error> {
    match (expression.left_elements(), expression.operator()) {
        (Some(left), Some(op)) => {
            if left.is_empty() || expression.right().is_empty() {
                return Err(ParseError::MissingOperand(op.to_string()).into());
            }
            let left = build_tree(left, builder)?;
            let right = build_tree(expression.right(), builder)?;
            builder.binary(op, left, right)
        }
        _ => build_tree(expression.right(), builder),
    }
}

fn build_leaf<B: TreeBuilder>(
    element: &ExpressionElement,
    builder: &mut B,
) -> Result<B::Node, B::Error> {
    match element.kind() {
        ElementKind::Literal(text) => builder.literal(element, text),
        ElementKind::Variable(variable) => builder.variable(element, variable),
        ElementKind::Function {
            conversion,
            argument,
        } => {
            if argument.right().is_empty() && argument.left_elements().map_or(true, <[_]>::is_empty) {
                return Err(ParseError::EmptyArgument(conversion.to_string()).into());
            }
            let argument = build_expression(argument, builder)?;
            builder.call(element, *conversion, argument)
        }
        ElementKind::Operator(op) => Err(ParseError::UnexpectedOperator(op.to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{Operator, VariableType};

    /// Renders trees as s-expressions so the shape is easy to assert on.
    struct SexprBuilder;

    impl TreeBuilder for SexprBuilder {
        type Node = String;
        type Error = ParseError;

        fn empty(&mut self) -> Result<String, ParseError> {
            Ok("<empty>".to_string())
        }

        fn literal(&mut self, _: &ExpressionElement, text: &str) -> Result<String, ParseError> {
            Ok(text.to_string())
        }

        fn variable(&mut self, _: &ExpressionElement, var: &Variable) -> Result<String, ParseError> {
            Ok(format!("${}", var.name()))
        }

        fn call(
            &mut self,
            _: &ExpressionElement,
            conversion: Conversion,
            argument: String,
        ) -> Result<String, ParseError> {
            Ok(format!("({conversion} {argument})"))
        }

        fn unary(&mut self, op: UnaryOp, operand: String) -> Result<String, ParseError> {
            Ok(format!("({op} {operand})"))
        }

        fn binary(&mut self, op: BinaryOp, left: String, right: String) -> Result<String, ParseError> {
            Ok(format!("({op} {left} {right})"))
        }
    }

    /// Tokenizes a space separated string: operators by text, everything else literal.
    fn tokens(source: &str) -> Vec<ExpressionElement> {
        source
            .split_whitespace()
            .enumerate()
            .map(|(i, text)| match text.parse::<Operator>() {
                Ok(op) => ExpressionElement::op(format!("t{i}"), op),
                Err(_) => ExpressionElement::literal(format!("t{i}"), text),
            })
            .collect()
    }

    fn parse(source: &str) -> Result<String, ParseError> {
        build_tree(&tokens(source), &mut SexprBuilder)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(parse("2 + 3 * 4").unwrap(), "(+ 2 (* 3 4))");
        assert_eq!(parse("( 2 + 3 ) * 4").unwrap(), "(* (+ 2 3) 4)");
        assert_eq!(parse("1 - 2 - 3").unwrap(), "(- (- 1 2) 3)");
        assert_eq!(parse("8 / 4 % 3").unwrap(), "(% (/ 8 4) 3)");
        assert_eq!(
            parse("a > 1 && b < 2 || c == 3").unwrap(),
            "(|| (&& (> a 1) (< b 2)) (== c 3))"
        );
        assert_eq!(parse("1 + 2 == 3").unwrap(), "(== (+ 1 2) 3)");
        assert_eq!(parse("a != b > c").unwrap(), "(!= a (> b c))");
    }

    #[test]
    fn test_unary_disambiguation() {
        assert_eq!(parse("- 2 * 3").unwrap(), "(* (- 2) 3)");
        assert_eq!(parse("2 * - 3").unwrap(), "(* 2 (- 3))");
        assert_eq!(parse("2 - - 3").unwrap(), "(- 2 (- 3))");
        assert_eq!(parse("! ! a").unwrap(), "(! (! a))");
        assert_eq!(parse("( - 1 )").unwrap(), "(- 1)");
        assert_eq!(parse("( 1 ) - 1").unwrap(), "(- 1 1)");
        assert_eq!(parse("! a && b").unwrap(), "(&& (! a) b)");
    }

    #[test]
    fn test_malformed_sequences() {
        assert_eq!(parse("( 1 + 2"), Err(ParseError::MismatchedParenthesis));
        assert_eq!(parse("1 + 2 )"), Err(ParseError::MismatchedParenthesis));
        assert_eq!(parse("1 +"), Err(ParseError::MissingOperand("+".into())));
        assert_eq!(parse("* 1"), Err(ParseError::MissingOperand("*".into())));
        assert_eq!(parse("1 2"), Err(ParseError::ExtraOperand));
        assert_eq!(parse("a !"), Err(ParseError::UnexpectedOperator("!".into())));
        assert_eq!(parse("( )"), Err(ParseError::NoOperands));
    }

    #[test]
    fn test_empty_sequence_uses_builder() {
        assert_eq!(parse("").unwrap(), "<empty>");
    }

    #[test]
    fn test_empty_call_argument() {
        let call = ExpressionElement::function("f", Conversion::Integer, Expression::value(Vec::new()));
        assert_eq!(
            build_tree(&[call], &mut SexprBuilder),
            Err(ParseError::EmptyArgument("integer".into()))
        );
    }

    #[test]
    fn test_comparison_with_empty_side() {
        let no_left = Expression::condition(Vec::new(), BinaryOp::Equal, tokens("5"));
        assert_eq!(
            build_expression(&no_left, &mut SexprBuilder),
            Err(ParseError::MissingOperand("==".into()))
        );

        let no_right = Expression::condition(tokens("5"), BinaryOp::Less, Vec::new());
        assert_eq!(
            build_expression(&no_right, &mut SexprBuilder),
            Err(ParseError::MissingOperand("<".into()))
        );
    }

    #[test]
    fn test_nested_calls_and_comparisons() {
        let s = Variable::new("v", VariableType::String, "s", "n");
        let inner = Expression::value(vec![ExpressionElement::variable("e1", s)]);
        let call = ExpressionElement::function(
            "f1",
            Conversion::Integer,
            Expression::value(vec![ExpressionElement::function("f2", Conversion::Float, inner)]),
        );

        let expr = Expression::condition(
            vec![call, ExpressionElement::op("o", Operator::Plus), ExpressionElement::literal("l", "1")],
            BinaryOp::Greater,
            tokens("10"),
        );
        assert_eq!(
            build_expression(&expr, &mut SexprBuilder).unwrap(),
            "(> (+ (integer (float $s)) 1) 10)"
        );
    }
}
