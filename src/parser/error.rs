use thiserror::Error;

/// Failure to turn a token sequence into an expression tree.
///
/// These are always recoverable: the code generator turns them into
/// unsupported placeholders, the evaluator reports them as [`crate::Error::Parse`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A `(` without `)` or a `)` without `(`.
    #[error("mismatched parenthesis")]
    MismatchedParenthesis,

    /// An operator does not have enough operands.
    #[error("operator '{0}' is missing an operand")]
    MissingOperand(String),

    /// Two operands follow each other without an operator in between.
    #[error("operands are not separated by an operator")]
    ExtraOperand,

    /// An operator token appeared where it cannot be applied.
    #[error("'{0}' cannot be used in this position")]
    UnexpectedOperator(String),

    /// The tokens contain parentheses but no operands.
    #[error("expression has no operands")]
    NoOperands,

    /// A conversion call has no argument.
    #[error("'{0}' is called without an argument")]
    EmptyArgument(String),
}
