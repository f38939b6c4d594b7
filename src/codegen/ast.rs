//! The structured target program.

use crate::expression::{BinaryOp, UnaryOp, Value};

/// A synthesized program.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level statements.
    pub body: Vec<Statement>,
}

impl Program {
    /// Returns `true` if the program has no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// One statement, tagged with the diagram node it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Display id of the originating diagram node; `None` for program-level
    /// statements.
    pub origin: Option<String>,
    /// What the statement does.
    pub kind: StatementKind,
}

impl Statement {
    /// Creates a statement.
    pub fn new(origin: Option<String>, kind: StatementKind) -> Self {
        Statement { origin, kind }
    }

    /// Creates a placeholder for something that could not be synthesized.
    pub fn unsupported(origin: Option<String>, reason: impl Into<String>) -> Self {
        Statement::new(
            origin,
            StatementKind::Unsupported {
                reason: reason.into(),
            },
        )
    }
}

/// Statement variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// `target = value`
    Assignment {
        /// Assigned variable name.
        target: String,
        /// Assigned value.
        value: Expr,
    },
    /// `if condition: then_body else: else_body`
    If {
        /// Branch condition.
        condition: Expr,
        /// Statements run when the condition holds.
        then_body: Vec<Statement>,
        /// Statements run otherwise; empty means no `else`.
        else_body: Vec<Statement>,
    },
    /// `while condition: body`
    While {
        /// Loop condition.
        condition: Expr,
        /// Loop body.
        body: Vec<Statement>,
    },
    /// A group of statements emitted at the current level.
    Block(Vec<Statement>),
    /// `print(value)`; [`Expr::Empty`] prints an empty line.
    Print(Expr),
    /// A call evaluated for its effect, such as `exit()`.
    Call(Expr),
    /// Leaves the innermost loop.
    Break,
    /// Placeholder for a node that could not be synthesized.
    Unsupported {
        /// Human-readable reason.
        reason: String,
    },
}

/// Target expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A variable reference.
    Identifier(String),
    /// A constant.
    Literal(Value),
    /// An infix operation.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// A prefix operation.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },
    /// A builtin call.
    Call {
        /// Function name.
        name: String,
        /// Arguments in order.
        args: Vec<Expr>,
    },
    /// An empty token sequence.
    Empty,
    /// An expression that could not be built, with the reason.
    Unsupported(String),
}

impl Expr {
    /// `left op right`.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `name(args...)`.
    pub fn call(name: &str, args: Vec<Expr>) -> Self {
        Expr::Call {
            name: name.to_string(),
            args,
        }
    }

    /// `(self == False)`, the negation used for `no`-side loops and branches.
    #[must_use]
    pub fn negated(self) -> Self {
        Expr::binary(BinaryOp::Equal, self, Expr::Literal(Value::Boolean(false)))
    }

    /// The first unsupported reason inside this expression.
    #[must_use]
    pub fn unsupported_reason(&self) -> Option<&str> {
        match self {
            Expr::Unsupported(reason) => Some(reason),
            Expr::Binary { left, right, .. } => left
                .unsupported_reason()
                .or_else(|| right.unsupported_reason()),
            Expr::Unary { operand, .. } => operand.unsupported_reason(),
            Expr::Call { args, .. } => args.iter().find_map(Expr::unsupported_reason),
            Expr::Identifier(_) | Expr::Literal(_) | Expr::Empty => None,
        }
    }
}
