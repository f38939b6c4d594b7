//! Iterative dominator sets.
//!
//! A node `d` dominates `n` if every path from the entry to `n` passes through
//! `d`. Every node dominates itself.
//!
//! # Algorithm
//!
//! The classic dataflow fixed point:
//!
//! ```text
//! Dom(entry) = {entry}
//! Dom(n)     = all nodes                          (n != entry)
//! repeat until nothing changes:
//!     Dom(n) = {n} ∪ ⋂ Dom(p) for p in preds(n)
//! ```
//!
//! Nodes are visited in reverse postorder from the entry, then every node the
//! traversal did not reach in index order. Reverse postorder makes acyclic
//! regions converge in a single sweep; the extra sweep over unreachable nodes
//! leaves them with the universal set, which is what marks them as
//! unreachable to consumers.
//!
//! Sets are [`BitSet`]s, so each intersection is one word operation per 64
//! nodes. Diagrams are small enough that the quadratic space is irrelevant.

use crate::utils::{
    bitset::BitSet,
    graph::{algorithms::traversal::reverse_postorder, NodeId, RootedGraph, Successors},
};

/// Per-node dominator sets of a rooted graph.
#[derive(Debug, Clone)]
pub struct DominatorSets {
    entry: NodeId,
    sets: Vec<BitSet>,
    reachable: BitSet,
}

impl DominatorSets {
    /// The entry node the sets were computed from.
    #[must_use]
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// Number of nodes covered.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.sets.len()
    }

    /// Returns `true` if `node` is reachable from the entry.
    #[must_use]
    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.reachable.contains(node.index())
    }

    /// Returns `true` if `a` dominates `b`.
    ///
    /// For a node unreachable from the entry every node is reported as a
    /// dominator; check [`is_reachable`](Self::is_reachable) first where that
    /// matters. Out-of-range ids dominate nothing.
    #[must_use]
    pub fn dominates(&self, a: NodeId, b: NodeId) -> bool {
        self.sets
            .get(b.index())
            .is_some_and(|set| set.contains(a.index()))
    }

    /// Returns `true` if `a` dominates `b` and `a != b`.
    #[must_use]
    pub fn strictly_dominates(&self, a: NodeId, b: NodeId) -> bool {
        a != b && self.dominates(a, b)
    }

    /// The raw dominator set of `node`.
    #[must_use]
    pub fn set(&self, node: NodeId) -> Option<&BitSet> {
        self.sets.get(node.index())
    }

    /// Dominators of `node` in ascending id order, `node` included.
    pub fn dominators(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.sets
            .get(node.index())
            .into_iter()
            .flat_map(BitSet::iter)
            .map(NodeId::new)
    }

    /// The immediate dominator of `node`.
    ///
    /// That is the strict dominator closest to `node`, the one whose own set
    /// is exactly one smaller. `None` for the entry and unreachable nodes.
    #[must_use]
    pub fn immediate_dominator(&self, node: NodeId) -> Option<NodeId> {
        if node == self.entry || !self.is_reachable(node) {
            return None;
        }
        let depth = self.sets.get(node.index())?.count();
        self.dominators(node)
            .filter(|&d| d != node)
            .find(|&d| self.sets[d.index()].count() + 1 == depth)
    }
}

/// Computes dominator sets for `graph` from its entry node.
///
/// An entry outside the graph yields sets where no node is reachable.
///
/// # Examples
///
/// ```rust
/// use flowscope::{
///     analysis::cfg::Cfg,
///     diagram::Diagram,
///     utils::graph::{algorithms::compute_dominator_sets, RootedGraph},
/// };
///
/// let diagram = Diagram::from_json(r#"{
///     "nodes": [
///         {"id": "s", "type": "start"},
///         {"id": "e", "type": "end"}
///     ],
///     "edges": [{"id": "x", "source": "s", "target": "e"}]
/// }"#)?;
/// let cfg = Cfg::build(&diagram)?;
/// let doms = compute_dominator_sets(&cfg);
/// let end = cfg.node_id("e").unwrap();
/// assert!(doms.dominates(cfg.entry(), end));
/// # Ok::<(), flowscope::Error>(())
/// ```
#[must_use]
pub fn compute_dominator_sets<G>(graph: &G) -> DominatorSets
where
    G: RootedGraph,
{
    let node_count = graph.node_count();
    let entry = graph.entry();

    let rpo = reverse_postorder(graph, entry);
    let mut reachable = BitSet::new(node_count);
    for node in &rpo {
        reachable.insert(node.index());
    }

    let mut sets = vec![BitSet::full(node_count); node_count];
    if entry.index() < node_count {
        let mut only_entry = BitSet::new(node_count);
        only_entry.insert(entry.index());
        sets[entry.index()] = only_entry;
    }

    let order: Vec<NodeId> = rpo
        .iter()
        .copied()
        .chain(graph.node_ids().filter(|n| !reachable.contains(n.index())))
        .filter(|&n| n != entry)
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for &node in &order {
            let mut next = BitSet::full(node_count);
            for pred in graph.predecessors(node) {
                if let Some(pred_set) = sets.get(pred.index()) {
                    next.intersect_with(pred_set);
                }
            }
            next.insert(node.index());

            if next != sets[node.index()] {
                sets[node.index()] = next;
                changed = true;
            }
        }
    }

    DominatorSets {
        entry,
        sets,
        reachable,
    }
}

/// Iterates `graph`'s back edges `(source, header)`: edges from a reachable
/// node to a node that dominates it.
pub fn back_edges<'a, G>(graph: &'a G, dominators: &'a DominatorSets) -> impl Iterator<Item = (NodeId, NodeId)> + 'a
where
    G: Successors,
{
    graph
        .node_ids()
        .filter(move |&n| dominators.is_reachable(n))
        .flat_map(move |node| {
            graph
                .successors(node)
                .filter(move |&succ| dominators.dominates(succ, node))
                .map(move |succ| (node, succ))
        })
}
