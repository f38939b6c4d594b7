//! Depth-first traversals.
//!
//! [`dfs`] is lazy; [`postorder`] and [`reverse_postorder`] collect, since the
//! order requires a full traversal anyway. Successors are visited in their
//! adjacency order, so every result is deterministic for a given graph.

use crate::utils::graph::{NodeId, Successors};

/// Iterator returned by [`dfs`].
pub struct DfsIterator<'g, G: Successors> {
    graph: &'g G,
    stack: Vec<NodeId>,
    visited: Vec<bool>,
}

impl<G: Successors> Iterator for DfsIterator<'_, G> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;

        // Reverse so the first successor is popped first
        let successors: Vec<NodeId> = self.graph.successors(node).collect();
        for &succ in successors.iter().rev() {
            if let Some(seen) = self.visited.get_mut(succ.index()) {
                if !*seen {
                    *seen = true;
                    self.stack.push(succ);
                }
            }
        }

        Some(node)
    }
}

/// Pre-order depth-first traversal from `start`.
///
/// An out-of-range `start` yields nothing.
pub fn dfs<G: Successors>(graph: &G, start: NodeId) -> DfsIterator<'_, G> {
    let mut visited = vec![false; graph.node_count()];
    let stack = match visited.get_mut(start.index()) {
        Some(seen) => {
            *seen = true;
            vec![start]
        }
        None => Vec::new(),
    };

    DfsIterator {
        graph,
        stack,
        visited,
    }
}

/// Nodes reachable from `start` in post-order.
///
/// Iterative, so deep graphs cannot overflow the call stack.
#[allow(clippy::items_after_statements)]
pub fn postorder<G: Successors>(graph: &G, start: NodeId) -> Vec<NodeId> {
    let node_count = graph.node_count();
    if start.index() >= node_count {
        return Vec::new();
    }

    #[derive(Clone, Copy)]
    enum Visit {
        Enter,
        Exit,
    }

    let mut visited = vec![false; node_count];
    let mut result = Vec::with_capacity(node_count);
    let mut stack = vec![(start, Visit::Enter)];

    while let Some((node, visit)) = stack.pop() {
        match visit {
            Visit::Enter => {
                if visited[node.index()] {
                    continue;
                }
                visited[node.index()] = true;
                stack.push((node, Visit::Exit));

                let successors: Vec<NodeId> = graph.successors(node).collect();
                for &succ in successors.iter().rev() {
                    if succ.index() < node_count && !visited[succ.index()] {
                        stack.push((succ, Visit::Enter));
                    }
                }
            }
            Visit::Exit => result.push(node),
        }
    }

    result
}

/// Nodes reachable from `start` in reverse post-order.
///
/// Every node appears before its successors except along back edges, which is
/// the iteration order that makes forward dataflow converge fastest.
pub fn reverse_postorder<G: Successors>(graph: &G, start: NodeId) -> Vec<NodeId> {
    let mut order = postorder(graph, start);
    order.reverse();
    order
}
