//! Natural loop detection.
//!
//! An edge `n -> h` is a back edge when `h` dominates `n`. Its natural loop is
//! `h` plus every node that reaches `n` backwards without passing through `h`.
//! Back edges sharing a header are merged into one loop, which is how a
//! conditional whose two branches both return to it is seen as a single loop.
//!
//! ```text
//!          |
//!          v
//!     [header] <------+
//!       |    |        |
//!       v    |   [body ...]
//!    [exit]  |        |
//!            +-> [latch]
//! ```
//!
//! [`detect_loops`] works on any graph implementing the graph traits.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::utils::graph::{
    algorithms::{back_edges, DominatorSets},
    NodeId, Predecessors, Successors,
};

/// An edge leaving a loop body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoopExit {
    /// The body node the edge leaves from.
    pub exiting: NodeId,
    /// The node outside the body the edge enters.
    pub target: NodeId,
}

/// A natural loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaturalLoop {
    /// The loop header, the single entry of the body.
    pub header: NodeId,
    /// All body nodes, header included.
    pub body: BTreeSet<NodeId>,
    /// Sources of the back edges, ascending.
    pub latches: Vec<NodeId>,
    /// Edges leaving the body, ascending by `(exiting, target)`.
    pub exits: Vec<LoopExit>,
}

impl NaturalLoop {
    fn new(header: NodeId) -> Self {
        NaturalLoop {
            header,
            body: BTreeSet::from([header]),
            latches: Vec::new(),
            exits: Vec::new(),
        }
    }

    /// Returns `true` if `node` is in the body.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.body.contains(&node)
    }

    /// Number of body nodes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.body.len()
    }

    /// Distinct exit targets, ascending.
    #[must_use]
    pub fn exit_targets(&self) -> BTreeSet<NodeId> {
        self.exits.iter().map(|exit| exit.target).collect()
    }
}

/// All natural loops of a graph, ordered by header.
#[derive(Debug, Clone, Default)]
pub struct LoopForest {
    loops: Vec<NaturalLoop>,
}

impl LoopForest {
    /// Loops ordered by header id.
    #[must_use]
    pub fn loops(&self) -> &[NaturalLoop] {
        &self.loops
    }

    /// Number of loops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.loops.len()
    }

    /// Returns `true` if the graph has no loops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    /// The loop headed by `header`.
    #[must_use]
    pub fn loop_for(&self, header: NodeId) -> Option<&NaturalLoop> {
        self.loops
            .binary_search_by_key(&header, |l| l.header)
            .ok()
            .map(|i| &self.loops[i])
    }

    /// Returns `true` if `node` heads a loop.
    #[must_use]
    pub fn is_header(&self, node: NodeId) -> bool {
        self.loop_for(node).is_some()
    }

    /// The smallest loop whose body contains `node`.
    ///
    /// Natural loops with distinct headers are either disjoint or nested, so
    /// the smallest containing body is the innermost loop.
    #[must_use]
    pub fn innermost_containing(&self, node: NodeId) -> Option<&NaturalLoop> {
        self.loops
            .iter()
            .filter(|l| l.contains(node))
            .min_by_key(|l| (l.size(), l.header))
    }

    /// Number of loops containing `node`.
    #[must_use]
    pub fn depth(&self, node: NodeId) -> usize {
        self.loops.iter().filter(|l| l.contains(node)).count()
    }
}

/// Finds the natural loops of `graph`.
///
/// Only back edges leaving nodes reachable from the entry are considered, and
/// bodies never grow into unreachable nodes.
pub fn detect_loops<G>(graph: &G, dominators: &DominatorSets) -> LoopForest
where
    G: Successors + Predecessors,
{
    let mut by_header: BTreeMap<NodeId, NaturalLoop> = BTreeMap::new();

    let edges: Vec<(NodeId, NodeId)> = back_edges(graph, dominators).collect();
    for (latch, header) in edges {
        let natural = by_header
            .entry(header)
            .or_insert_with(|| NaturalLoop::new(header));
        if !natural.latches.contains(&latch) {
            natural.latches.push(latch);
        }
        expand_body(graph, dominators, natural, latch);
    }

    let mut loops: Vec<NaturalLoop> = by_header.into_values().collect();
    for natural in &mut loops {
        natural.latches.sort();
        compute_exits(graph, natural);
        debug!(
            "Natural loop at {}: {} nodes, {} latches, {} exits",
            natural.header,
            natural.size(),
            natural.latches.len(),
            natural.exits.len()
        );
    }

    LoopForest { loops }
}

fn expand_body<G>(graph: &G, dominators: &DominatorSets, natural: &mut NaturalLoop, latch: NodeId)
where
    G: Predecessors,
{
    let mut worklist = vec![latch];
    while let Some(node) = worklist.pop() {
        if node != natural.header && !natural.body.insert(node) {
            continue;
        }
        if node == natural.header {
            continue;
        }
        for pred in graph.predecessors(node) {
            if dominators.is_reachable(pred) && !natural.body.contains(&pred) {
                worklist.push(pred);
            }
        }
    }
}

fn compute_exits<G>(graph: &G, natural: &mut NaturalLoop)
where
    G: Successors,
{
    let mut exits = BTreeSet::new();
    for &node in &natural.body {
        for succ in graph.successors(node) {
            if !natural.body.contains(&succ) {
                exits.insert(LoopExit {
                    exiting: node,
                    target: succ,
                });
            }
        }
    }
    natural.exits = exits.into_iter().collect();
}
