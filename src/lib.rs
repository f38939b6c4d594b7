// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # flowscope
//!
//! Expression evaluation and structured code synthesis for flowchart-style
//! algorithm diagrams.
//!
//! A diagram is a directed graph of typed blocks (start, end, variable
//! declaration, assignment, conditional, input, output) joined by control-flow
//! edges. `flowscope` provides the two engines that work on such diagrams:
//!
//! - **Evaluation** - a strictly typed interpreter for the expression token
//!   sequences carried by blocks, used to execute a diagram step by step.
//! - **Compilation** - CFG construction, dominator and natural-loop analysis,
//!   and synthesis of nested `while`/`if` source code from an arbitrary,
//!   possibly cyclic, diagram.
//!
//! ## Quick Start
//!
//! ### Evaluating an expression
//!
//! ```rust
//! use flowscope::prelude::*;
//!
//! let x = Variable::new("v1", VariableType::Integer, "x", "n1");
//! let vars = vec![ValuedVariable::new(x.clone(), Value::Integer(4))?];
//!
//! let tokens = vec![
//!     ExpressionElement::literal("l1", "2"),
//!     ExpressionElement::operator("o1", "+")?,
//!     ExpressionElement::variable("e1", x),
//!     ExpressionElement::operator("o2", "*")?,
//!     ExpressionElement::literal("l2", "3"),
//! ];
//! assert_eq!(evaluate(&tokens, None, &vars)?, Value::Integer(14));
//! # Ok::<(), flowscope::Error>(())
//! ```
//!
//! ### Compiling a diagram
//!
//! ```rust
//! use flowscope::prelude::*;
//!
//! let diagram = Diagram::from_json(r#"{
//!     "nodes": [
//!         {"id": "s", "type": "start"},
//!         {"id": "o", "type": "output", "data": {"expression": {
//!             "leftSide": null,
//!             "rightSide": [{"id": "l", "type": "literal", "value": "\"hi\""}],
//!             "operator": null
//!         }}},
//!         {"id": "e", "type": "end"}
//!     ],
//!     "edges": [
//!         {"id": "1", "source": "s", "target": "o"},
//!         {"id": "2", "source": "o", "target": "e"}
//!     ]
//! }"#)?;
//!
//! assert_eq!(compile_to_source(&diagram), "# Node: o\nprint(\"hi\")\n");
//! # Ok::<(), flowscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! diagram ──> Cfg ──> dominators / natural loops ──> Synthesizer ──> Program ──> Emitter ──> text
//!                                                        │
//! tokens ──> parser::build_tree ─────────────────────────┘
//!                  │
//!                  └──> evaluator ──> Value
//! ```
//!
//! The shunting-yard parser in [`parser`] is shared: the evaluator and the code
//! generator each plug their own [`parser::TreeBuilder`] into it.
//!
//! ## Error Handling
//!
//! Fallible operations return [`Result`]. The evaluator fails the whole call on
//! any type or runtime error. The compiler never fails: problems in the diagram
//! become placeholder lines starting with `# UNSUPPORTED` in the generated code.
//!
//! ## Logging
//!
//! The library logs through the [`log`] facade and never installs a logger.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and functions.
///
/// # Example
///
/// ```rust
/// use flowscope::prelude::*;
///
/// let diagram = Diagram::default();
/// assert!(compile(&diagram).body.len() == 1);
/// ```
pub mod prelude;

/// The expression token model shared by the evaluator and the compiler.
///
/// # Key Types
///
/// - [`expression::Variable`] and [`expression::ValuedVariable`] - typed slots and their values
/// - [`expression::ExpressionElement`] - one token (literal, operator, variable, conversion call)
/// - [`expression::Expression`] - an assignment, a condition, or a plain value
pub mod expression;

/// Shunting-yard construction of expression trees from token sequences.
pub mod parser;

/// Strictly typed evaluation of expressions against a set of valued variables.
///
/// # Main Functions
///
/// - [`evaluator::evaluate`] - evaluate a token sequence
/// - [`evaluator::compare`] - evaluate two token sequences joined by a comparison
/// - [`evaluator::evaluate_condition`] - decide a Conditional node
/// - [`evaluator::assign`] - compute the new value of an assignment target
pub mod evaluator;

/// Diagram snapshots: nodes, edges and their JSON form.
pub mod diagram;

/// Control-flow graph, dominator and loop analysis.
pub mod analysis;

/// Structured code synthesis and emission.
pub mod codegen;

/// Generic graph infrastructure and small helpers.
pub mod utils;

/// `flowscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
///
/// # Examples
///
/// ```rust
/// use flowscope::{diagram::Diagram, Result};
///
/// fn load(json: &str) -> Result<Diagram> {
///     Diagram::from_json(json)
/// }
/// assert!(load("{}").is_ok());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `flowscope` Error type
///
/// # Examples
///
/// ```rust
/// use flowscope::{diagram::Diagram, analysis::cfg::Cfg, Error};
///
/// let diagram = Diagram::default();
/// match Cfg::build(&diagram) {
///     Err(Error::MissingStart) => println!("no entry"),
///     Err(e) => println!("Error: {}", e),
///     Ok(cfg) => println!("{} nodes", cfg.node_count()),
/// }
/// ```
pub use error::Error;
