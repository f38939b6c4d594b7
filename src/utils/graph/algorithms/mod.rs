//! Graph algorithms used by the control-flow analysis.
//!
//! - [`dfs`], [`postorder`], [`reverse_postorder`] - traversals
//! - [`compute_dominator_sets`] - iterative dominator sets
//! - [`back_edges`] - edges whose target dominates their source
//!
//! All algorithms are written against the [`traits`](crate::utils::graph) and
//! work on any graph implementing them.

mod dominators;
mod traversal;

pub use dominators::{back_edges, compute_dominator_sets, DominatorSets};
pub use traversal::{dfs, postorder, reverse_postorder, DfsIterator};
