//! The token model of the expression language.
//!
//! Expressions in a diagram are flat token sequences rather than source text.
//! The editing layer assembles them element by element (a variable, an operator,
//! a literal, a nested conversion call), and both consumers in this crate, the
//! [`evaluator`](crate::evaluator) and the [`codegen`](crate::codegen) front end,
//! read the same model through the shared [`parser`](crate::parser).
//!
//! # Key Types
//!
//! - [`Variable`] / [`ValuedVariable`] - Declared slots and their runtime bindings
//! - [`VariableType`] / [`Value`] - The four value kinds
//! - [`ExpressionElement`] / [`ElementKind`] - One token
//! - [`Operator`], [`UnaryOp`], [`BinaryOp`], [`Conversion`] - Operator vocabulary
//! - [`Expression`] / [`LeftSide`] - Assignments, conditions and values
//!
//! # Snapshot Form
//!
//! All types convert to and from the JSON object form used by the editing
//! layer through `serde`. Conversion validates the data-model invariants, so a
//! successfully loaded [`Expression`] never holds a variable element without a
//! variable or a function element without its argument.

mod element;
mod expr;
mod operator;
mod types;
mod variable;

pub use element::{ElementKind, ExpressionElement};
pub use expr::{Expression, LeftSide};
pub use operator::{BinaryOp, Conversion, Operator, UnaryOp};
pub use types::{Value, VariableType};
pub use variable::{ValuedVariable, Variable};
