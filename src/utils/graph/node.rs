//! Node identifiers for [`DirectedGraph`](crate::utils::graph::DirectedGraph).

use std::fmt;

/// Dense index of a node within a graph.
///
/// Ids are handed out by [`DirectedGraph::add_node`](crate::utils::graph::DirectedGraph::add_node)
/// in insertion order, starting at 0, so per-node analysis data can live in a
/// plain `Vec` indexed by [`NodeId::index`]. Ordering follows the index, which is
/// what makes "lowest id first" tie-breaks deterministic.
///
/// # Examples
///
/// ```rust
/// use flowscope::utils::graph::NodeId;
///
/// let node = NodeId::new(3);
/// assert_eq!(node.index(), 3);
/// assert_eq!(node.to_string(), "n3");
/// assert!(NodeId::new(1) < node);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Wraps a raw index.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// The raw index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(index: usize) -> Self {
        NodeId(index)
    }
}

impl From<NodeId> for usize {
    #[inline]
    fn from(node: NodeId) -> Self {
        node.0
    }
}
