//! Diagram to structured source compilation.
//!
//! The pipeline is:
//!
//! 1. [`crate::analysis::cfg::Cfg::build`] indexes the diagram.
//! 2. The [`Synthesizer`] walks the CFG, using its dominators and natural
//!    loops to produce a [`Program`] of nested `while`/`if` statements.
//! 3. The [`Emitter`] renders the program as indented source text.
//!
//! Compilation never fails. Anything that cannot be translated becomes an
//! [`StatementKind::Unsupported`] placeholder scoped to the smallest region
//! possible, and a diagram without a Start node compiles to a single
//! program-level placeholder.
//!
//! # Examples
//!
//! ```rust
//! use flowscope::{codegen, diagram::Diagram};
//!
//! let diagram = Diagram::from_json(r#"{
//!     "nodes": [{"id": "s", "type": "start"}, {"id": "e", "type": "end"}],
//!     "edges": [{"id": "1", "source": "s", "target": "e"}]
//! }"#)?;
//! assert_eq!(codegen::compile_to_source(&diagram), "");
//! # Ok::<(), flowscope::Error>(())
//! ```

mod ast;
mod builder;
mod config;
mod emitter;
mod synthesizer;

pub use ast::{Expr, Program, Statement, StatementKind};
pub use builder::ExprBuilder;
pub use config::CodegenConfig;
pub use emitter::{render_expr, Emitter};
pub use synthesizer::Synthesizer;

use log::{debug, warn};

use crate::{analysis::cfg::Cfg, diagram::Diagram};

/// Compiles `diagram` into a target program.
#[must_use]
pub fn compile(diagram: &Diagram) -> Program {
    match Cfg::build(diagram) {
        Ok(cfg) => {
            let program = Synthesizer::new(&cfg).synthesize();
            debug!(
                "Synthesized {} top-level statements from {} nodes",
                program.body.len(),
                cfg.node_count()
            );
            program
        }
        Err(err) => {
            warn!("Cannot compile diagram: {}", err);
            Program {
                body: vec![Statement::unsupported(None, err.to_string())],
            }
        }
    }
}

/// Compiles `diagram` to source text with the default [`CodegenConfig`].
#[must_use]
pub fn compile_to_source(diagram: &Diagram) -> String {
    compile_to_source_with(diagram, &CodegenConfig::default())
}

/// Compiles `diagram` to source text.
#[must_use]
pub fn compile_to_source_with(diagram: &Diagram, config: &CodegenConfig) -> String {
    Emitter::new(config).emit(&compile(diagram))
}
