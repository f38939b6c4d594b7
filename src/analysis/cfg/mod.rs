//! Control-flow graph construction and loop analysis.
//!
//! [`Cfg`] indexes a [`crate::diagram::Diagram`] over the generic
//! [`crate::utils::graph::DirectedGraph`] and caches the analyses the code
//! generator needs:
//!
//! - dominator sets ([`crate::utils::graph::algorithms::DominatorSets`])
//! - natural loops ([`LoopForest`])
//!
//! Both are computed lazily on first access through [`std::sync::OnceLock`].

mod graph;
mod loops;

pub use graph::Cfg;
pub use loops::{detect_loops, LoopExit, LoopForest, NaturalLoop};
