//! Directed graph infrastructure.
//!
//! [`DirectedGraph`] is a small adjacency-list graph over dense [`NodeId`]s and
//! [`EdgeId`]s. Algorithms in [`algorithms`] are generic over the capability
//! traits ([`GraphBase`], [`Successors`], [`Predecessors`], [`RootedGraph`]) so
//! they run unchanged on the CFG wrapper.

mod directed;
mod edge;
mod node;
mod traits;

pub mod algorithms;

pub use directed::DirectedGraph;
pub use edge::EdgeId;
pub use node::NodeId;
pub use traits::{GraphBase, Predecessors, RootedGraph, Successors};
