use thiserror::Error;

use crate::parser::ParseError;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! type_error {
    ($msg:expr) => {
        crate::Error::Type($msg.to_string())
    };

    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Type(format!($fmt, $($arg)*))
    };
}

macro_rules! runtime_error {
    ($msg:expr) => {
        crate::Error::Runtime($msg.to_string())
    };

    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Runtime(format!($fmt, $($arg)*))
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The variants follow the four failure classes of the core. Parse failures come from the
/// shared tree builder, type and runtime errors from the evaluator, and structural errors
/// from CFG construction. The compiler path never returns these to its caller for problems
/// in the diagram data; it converts them into unsupported placeholders inside the generated
/// program instead (see [`crate::codegen`]).
///
/// # Error Categories
///
/// ## Expression Errors
/// - [`Error::Parse`] - Malformed token sequence
/// - [`Error::Type`] - Operator or conversion applied to unsupported operand types
/// - [`Error::Runtime`] - Unbound variable, division by zero, overflow
///
/// ## Diagram Errors
/// - [`Error::MissingStart`] - The diagram has no Start node
/// - [`Error::Structural`] - Invalid node reference during synthesis
/// - [`Error::GraphError`] - Edge references a node outside the graph
///
/// ## Snapshot Errors
/// - [`Error::Malformed`] - Snapshot data violates the data model
/// - [`Error::Json`] - Snapshot could not be (de)serialized
///
/// # Examples
///
/// ```rust
/// use flowscope::{evaluator::evaluate, expression::ExpressionElement, Error};
///
/// let tokens = vec![
///     ExpressionElement::literal("l1", "10"),
///     ExpressionElement::operator("o1", "/")?,
///     ExpressionElement::literal("l2", "0"),
/// ];
///
/// match evaluate(&tokens, None, &[]) {
///     Err(Error::Runtime(message)) => assert!(message.contains("Division by zero")),
///     other => panic!("unexpected result: {other:?}"),
/// }
/// # Ok::<(), flowscope::Error>(())
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The token sequence could not be turned into an expression tree.
    ///
    /// Raised for mismatched parentheses, operators without enough operands,
    /// operands without an operator between them and empty nested calls.
    #[error("Parse error - {0}")]
    Parse(#[from] ParseError),

    /// An operator, conversion or assignment was applied to incompatible types.
    ///
    /// The evaluator never coerces silently; every mismatch outside the explicit
    /// numeric rules ends up here.
    #[error("Type error - {0}")]
    Type(String),

    /// Evaluation failed for a reason other than types.
    ///
    /// Covers unbound variables, division or modulo by zero and integer overflow.
    #[error("Runtime error - {0}")]
    Runtime(String),

    /// The diagram does not contain a Start node.
    #[error("The diagram does not contain a Start node")]
    MissingStart,

    /// The diagram structure could not be processed.
    #[error("Structural error - {0}")]
    Structural(String),

    /// The snapshot data is damaged and could not be interpreted.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Snapshot (de)serialization failed.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Graph construction error.
    ///
    /// Raised when an edge is added between nodes that do not exist in the graph.
    #[error("{0}")]
    GraphError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_macro_records_location() {
        let err = malformed_error!("bad element {}", 3);
        match err {
            Error::Malformed {
                message,
                file,
                line,
            } => {
                assert_eq!(message, "bad element 3");
                assert!(file.ends_with("error.rs"));
                assert!(line > 0);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            type_error!("cannot add {} and {}", "string", "integer").to_string(),
            "Type error - cannot add string and integer"
        );
        assert_eq!(
            runtime_error!("Division by zero").to_string(),
            "Runtime error - Division by zero"
        );
        assert_eq!(
            Error::MissingStart.to_string(),
            "The diagram does not contain a Start node"
        );
    }

    #[test]
    fn test_parse_error_conversion() {
        let err: Error = ParseError::MismatchedParenthesis.into();
        assert!(matches!(err, Error::Parse(ParseError::MismatchedParenthesis)));
    }
}
