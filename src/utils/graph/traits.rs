//! Capability traits graph algorithms are written against.
//!
//! - [`GraphBase`] - node count and node iteration
//! - [`Successors`] - outgoing adjacency
//! - [`Predecessors`] - incoming adjacency
//! - [`RootedGraph`] - a designated entry node
//!
//! [`DirectedGraph`](crate::utils::graph::DirectedGraph) implements the first
//! three; [`Cfg`](crate::analysis::cfg::Cfg) implements all four by delegation.

use crate::utils::graph::NodeId;

/// Node count and node iteration.
pub trait GraphBase {
    /// Number of nodes. Valid ids are `0..node_count()`.
    fn node_count(&self) -> usize;

    /// All node ids in index order.
    fn node_ids(&self) -> impl Iterator<Item = NodeId>;
}

/// Forward adjacency.
pub trait Successors: GraphBase {
    /// Targets of the outgoing edges of `node`, in edge insertion order.
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Backward adjacency.
pub trait Predecessors: GraphBase {
    /// Sources of the incoming edges of `node`, in edge insertion order.
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// A graph with a single entry node.
pub trait RootedGraph: Successors + Predecessors {
    /// The entry node.
    fn entry(&self) -> NodeId;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EdgeList {
        nodes: usize,
        edges: Vec<(usize, usize)>,
    }

    impl GraphBase for EdgeList {
        fn node_count(&self) -> usize {
            self.nodes
        }

        fn node_ids(&self) -> impl Iterator<Item = NodeId> {
            (0..self.nodes).map(NodeId::new)
        }
    }

    impl Successors for EdgeList {
        fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
            self.edges
                .iter()
                .filter(move |(s, _)| *s == node.index())
                .map(|&(_, t)| NodeId::new(t))
        }
    }

    impl Predecessors for EdgeList {
        fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
            self.edges
                .iter()
                .filter(move |(_, t)| *t == node.index())
                .map(|&(s, _)| NodeId::new(s))
        }
    }

    impl RootedGraph for EdgeList {
        fn entry(&self) -> NodeId {
            NodeId::new(0)
        }
    }

    #[test]
    fn test_adjacency_through_traits() {
        let graph = EdgeList {
            nodes: 3,
            edges: vec![(0, 1), (0, 2), (2, 1)],
        };

        assert_eq!(graph.node_ids().count(), 3);
        let succ: Vec<NodeId> = graph.successors(NodeId::new(0)).collect();
        assert_eq!(succ, vec![NodeId::new(1), NodeId::new(2)]);
        let pred: Vec<NodeId> = graph.predecessors(NodeId::new(1)).collect();
        assert_eq!(pred, vec![NodeId::new(0), NodeId::new(2)]);
        assert_eq!(graph.entry(), NodeId::new(0));
    }
}
