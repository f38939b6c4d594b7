//! # flowscope Prelude
//!
//! The most commonly used types and functions, for glob import.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all flowscope operations
pub use crate::Error;

/// The result type used throughout flowscope
pub use crate::Result;

// ================================================================================================
// Expression Model
// ================================================================================================

pub use crate::expression::{
    BinaryOp, Conversion, ElementKind, Expression, ExpressionElement, LeftSide, Operator, UnaryOp,
    ValuedVariable, Value, Variable, VariableType,
};

// ================================================================================================
// Evaluation
// ================================================================================================

pub use crate::evaluator::{assign, compare, evaluate, evaluate_condition, Evaluator, ExprNode};

// ================================================================================================
// Diagrams and Analysis
// ================================================================================================

pub use crate::analysis::cfg::{Cfg, LoopForest, NaturalLoop};
pub use crate::diagram::{BranchLabel, Diagram, DiagramEdge, DiagramNode, NodeKind};

// ================================================================================================
// Code Generation
// ================================================================================================

pub use crate::codegen::{
    compile, compile_to_source, compile_to_source_with, CodegenConfig, Program, Statement,
    StatementKind,
};
