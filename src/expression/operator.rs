//! Operator tokens and the operator kinds they resolve to.
//!
//! An [`Operator`] is what appears in a token sequence. Whether a `-` means
//! subtraction or negation is only known once its position is considered, so
//! the parser resolves operator tokens into [`UnaryOp`] or [`BinaryOp`] values,
//! and those are what expression trees carry.

use strum::{Display, EnumIter, EnumString};

use crate::expression::VariableType;

/// An operator token as it appears inside an expression.
///
/// The textual form is the only representation used in snapshots.
///
/// # Examples
///
/// ```rust
/// use std::str::FromStr;
/// use flowscope::expression::Operator;
///
/// assert_eq!(Operator::from_str(">=").unwrap(), Operator::GreaterEqual);
/// assert_eq!(Operator::And.to_string(), "&&");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum Operator {
    /// `+`
    #[strum(serialize = "+")]
    Plus,
    /// `-` (binary subtraction or unary negation)
    #[strum(serialize = "-")]
    Minus,
    /// `*`
    #[strum(serialize = "*")]
    Star,
    /// `/`
    #[strum(serialize = "/")]
    Slash,
    /// `%`
    #[strum(serialize = "%")]
    Percent,
    /// `!`
    #[strum(serialize = "!")]
    Not,
    /// `&&`
    #[strum(serialize = "&&")]
    And,
    /// `||`
    #[strum(serialize = "||")]
    Or,
    /// `==`
    #[strum(serialize = "==")]
    Equal,
    /// `!=`
    #[strum(serialize = "!=")]
    NotEqual,
    /// `>`
    #[strum(serialize = ">")]
    Greater,
    /// `<`
    #[strum(serialize = "<")]
    Less,
    /// `>=`
    #[strum(serialize = ">=")]
    GreaterEqual,
    /// `<=`
    #[strum(serialize = "<=")]
    LessEqual,
    /// `(`
    #[strum(serialize = "(")]
    OpenParen,
    /// `)`
    #[strum(serialize = ")")]
    CloseParen,
}

impl Operator {
    /// Returns the unary operator this token denotes in prefix position.
    #[must_use]
    pub fn as_unary(self) -> Option<UnaryOp> {
        match self {
            Operator::Minus => Some(UnaryOp::Negate),
            Operator::Not => Some(UnaryOp::Not),
            _ => None,
        }
    }

    /// Returns the binary operator this token denotes in infix position.
    #[must_use]
    pub fn as_binary(self) -> Option<BinaryOp> {
        let op = match self {
            Operator::Plus => BinaryOp::Add,
            Operator::Minus => BinaryOp::Subtract,
            Operator::Star => BinaryOp::Multiply,
            Operator::Slash => BinaryOp::Divide,
            Operator::Percent => BinaryOp::Modulo,
            Operator::And => BinaryOp::And,
            Operator::Or => BinaryOp::Or,
            Operator::Equal => BinaryOp::Equal,
            Operator::NotEqual => BinaryOp::NotEqual,
            Operator::Greater => BinaryOp::Greater,
            Operator::Less => BinaryOp::Less,
            Operator::GreaterEqual => BinaryOp::GreaterEqual,
            Operator::LessEqual => BinaryOp::LessEqual,
            Operator::Not | Operator::OpenParen | Operator::CloseParen => return None,
        };
        Some(op)
    }
}

/// A prefix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum UnaryOp {
    /// Arithmetic negation (`-x`).
    #[strum(serialize = "-")]
    Negate,
    /// Logical negation (`!x`).
    #[strum(serialize = "!")]
    Not,
}

/// An infix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum BinaryOp {
    /// `+`
    #[strum(serialize = "+")]
    Add,
    /// `-`
    #[strum(serialize = "-")]
    Subtract,
    /// `*`
    #[strum(serialize = "*")]
    Multiply,
    /// `/`
    #[strum(serialize = "/")]
    Divide,
    /// `%`
    #[strum(serialize = "%")]
    Modulo,
    /// `&&`
    #[strum(serialize = "&&")]
    And,
    /// `||`
    #[strum(serialize = "||")]
    Or,
    /// `==`
    #[strum(serialize = "==")]
    Equal,
    /// `!=`
    #[strum(serialize = "!=")]
    NotEqual,
    /// `>`
    #[strum(serialize = ">")]
    Greater,
    /// `<`
    #[strum(serialize = "<")]
    Less,
    /// `>=`
    #[strum(serialize = ">=")]
    GreaterEqual,
    /// `<=`
    #[strum(serialize = "<=")]
    LessEqual,
}

impl BinaryOp {
    /// Binding strength, higher binds tighter. Unary operators sit above all of these.
    ///
    /// | Level | Operators |
    /// |-------|-----------|
    /// | 6 | `* / %` |
    /// | 5 | `+ -` |
    /// | 4 | `> < >= <=` |
    /// | 3 | `== !=` |
    /// | 2 | `&&` |
    /// | 1 | `\|\|` |
    #[must_use]
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => 6,
            BinaryOp::Add | BinaryOp::Subtract => 5,
            BinaryOp::Greater | BinaryOp::Less | BinaryOp::GreaterEqual | BinaryOp::LessEqual => 4,
            BinaryOp::Equal | BinaryOp::NotEqual => 3,
            BinaryOp::And => 2,
            BinaryOp::Or => 1,
        }
    }

    /// Returns `true` for `==`, `!=`, `>`, `<`, `>=` and `<=`.
    #[must_use]
    pub fn is_comparison(self) -> bool {
        self.is_equality() || self.is_relational()
    }

    /// Returns `true` for `==` and `!=`.
    #[must_use]
    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOp::Equal | BinaryOp::NotEqual)
    }

    /// Returns `true` for `>`, `<`, `>=` and `<=`.
    #[must_use]
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            BinaryOp::Greater | BinaryOp::Less | BinaryOp::GreaterEqual | BinaryOp::LessEqual
        )
    }

    /// Returns `true` for `&&` and `||`.
    #[must_use]
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    /// Returns `true` if the operator yields a boolean regardless of operand types.
    #[must_use]
    pub fn yields_boolean(self) -> bool {
        self.is_comparison() || self.is_logical()
    }

    /// Returns the token form of this operator.
    #[must_use]
    pub fn token(self) -> Operator {
        match self {
            BinaryOp::Add => Operator::Plus,
            BinaryOp::Subtract => Operator::Minus,
            BinaryOp::Multiply => Operator::Star,
            BinaryOp::Divide => Operator::Slash,
            BinaryOp::Modulo => Operator::Percent,
            BinaryOp::And => Operator::And,
            BinaryOp::Or => Operator::Or,
            BinaryOp::Equal => Operator::Equal,
            BinaryOp::NotEqual => Operator::NotEqual,
            BinaryOp::Greater => Operator::Greater,
            BinaryOp::Less => Operator::Less,
            BinaryOp::GreaterEqual => Operator::GreaterEqual,
            BinaryOp::LessEqual => Operator::LessEqual,
        }
    }
}

/// A type conversion function usable as a `function` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Conversion {
    /// `integer(x)`
    Integer,
    /// `string(x)`
    String,
    /// `float(x)`
    Float,
    /// `boolean(x)`
    Boolean,
}

impl Conversion {
    /// Returns the type the conversion produces.
    #[must_use]
    pub fn target_type(self) -> VariableType {
        match self {
            Conversion::Integer => VariableType::Integer,
            Conversion::String => VariableType::String,
            Conversion::Float => VariableType::Float,
            Conversion::Boolean => VariableType::Boolean,
        }
    }
}
