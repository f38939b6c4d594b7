//! The control-flow graph of a diagram.

use std::{
    collections::{BTreeSet, HashMap},
    sync::OnceLock,
};

use log::{debug, warn};

use crate::{
    analysis::cfg::loops::{detect_loops, LoopForest},
    diagram::{BranchLabel, Diagram, DiagramNode, NodeKind},
    utils::{
        dot::DotWriter,
        graph::{
            algorithms::{self, compute_dominator_sets, DominatorSets},
            DirectedGraph, GraphBase, NodeId, Predecessors, RootedGraph, Successors,
        },
    },
    Error, Result,
};

/// Indexed, read-only view of a [`Diagram`] for analysis.
///
/// Each diagram node becomes a graph node with a dense [`NodeId`] in snapshot
/// order; each edge keeps its branch label as edge data. The entry is the first
/// Start node.
///
/// Dominator sets and the loop forest are computed lazily on first access and
/// cached.
///
/// # Examples
///
/// ```rust
/// use flowscope::{analysis::cfg::Cfg, diagram::Diagram};
///
/// let diagram = Diagram::from_json(r#"{
///     "nodes": [
///         {"id": "s", "type": "start"},
///         {"id": "c", "type": "conditional"},
///         {"id": "e", "type": "end"}
///     ],
///     "edges": [
///         {"id": "1", "source": "s", "target": "c"},
///         {"id": "2", "source": "c", "target": "c", "label": "yes"},
///         {"id": "3", "source": "c", "target": "e", "label": "no"}
///     ]
/// }"#)?;
///
/// let cfg = Cfg::build(&diagram)?;
/// let c = cfg.node_id("c").unwrap();
/// assert_eq!(cfg.loops().len(), 1);
/// assert!(cfg.loops().loop_for(c).is_some());
/// # Ok::<(), flowscope::Error>(())
/// ```
#[derive(Debug)]
pub struct Cfg<'d> {
    graph: DirectedGraph<&'d DiagramNode, Option<BranchLabel>>,
    entry: NodeId,
    ids: HashMap<&'d str, NodeId>,
    dominators: OnceLock<DominatorSets>,
    loops: OnceLock<LoopForest>,
}

impl<'d> Cfg<'d> {
    /// Builds the CFG of `diagram`.
    ///
    /// Edges naming unknown node ids are skipped. When node ids repeat, edges
    /// attach to the first node with that id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingStart`] if the diagram has no Start node.
    pub fn build(diagram: &'d Diagram) -> Result<Self> {
        let mut graph = DirectedGraph::with_capacity(diagram.nodes().len(), diagram.edges().len());
        let mut ids: HashMap<&'d str, NodeId> = HashMap::with_capacity(diagram.nodes().len());

        for node in diagram.nodes() {
            let id = graph.add_node(node);
            if ids.contains_key(node.id()) {
                warn!("Duplicate node id '{}', edges attach to the first one", node.id());
            } else {
                ids.insert(node.id(), id);
            }
        }

        let starts: Vec<NodeId> = graph
            .nodes()
            .filter(|(_, node)| node.is_start())
            .map(|(id, _)| id)
            .collect();
        let entry = *starts.first().ok_or(Error::MissingStart)?;
        if starts.len() > 1 {
            warn!(
                "Diagram has more than one Start node, using '{}'",
                diagram.nodes()[entry.index()].id()
            );
        }

        for edge in diagram.edges() {
            match (ids.get(edge.source()), ids.get(edge.target())) {
                (Some(&source), Some(&target)) => {
                    graph.add_edge(source, target, edge.label())?;
                }
                _ => warn!(
                    "Edge '{}' references an unknown node ('{}' -> '{}'), skipping",
                    edge.id(),
                    edge.source(),
                    edge.target()
                ),
            }
        }

        let cfg = Cfg {
            graph,
            entry,
            ids,
            dominators: OnceLock::new(),
            loops: OnceLock::new(),
        };
        cfg.check_out_edges();

        debug!(
            "Built CFG with {} nodes and {} edges, entry '{}'",
            cfg.graph.node_count(),
            cfg.graph.edge_count(),
            cfg.display_id(entry)
        );

        Ok(cfg)
    }

    fn check_out_edges(&self) {
        for (id, node) in self.graph.nodes() {
            if node.is_conditional() {
                for label in [BranchLabel::Yes, BranchLabel::No] {
                    let count = self
                        .graph
                        .outgoing_edges(id)
                        .filter(|(_, _, l)| **l == Some(label))
                        .count();
                    if count > 1 {
                        warn!(
                            "Conditional '{}' has {} '{}' edges, using the first",
                            node.id(),
                            count,
                            label
                        );
                    }
                }
            } else if self.graph.out_degree(id) > 1 {
                warn!(
                    "Node '{}' is not a conditional but has {} outgoing edges, following the first",
                    node.id(),
                    self.graph.out_degree(id)
                );
            }
        }
    }

    /// The entry (Start) node.
    #[must_use]
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges that were kept.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The diagram node behind `id`.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&'d DiagramNode> {
        self.graph.node(id).copied()
    }

    /// The kind of the diagram node behind `id`.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<&'d NodeKind> {
        self.node(id).map(DiagramNode::kind)
    }

    /// Looks up the graph node of a diagram node id.
    #[must_use]
    pub fn node_id(&self, diagram_id: &str) -> Option<NodeId> {
        self.ids.get(diagram_id).copied()
    }

    /// The diagram id of `id`, or its graph id if out of range.
    #[must_use]
    pub fn display_id(&self, id: NodeId) -> String {
        self.node(id)
            .map_or_else(|| id.to_string(), |node| node.id().to_string())
    }

    /// The underlying graph.
    #[must_use]
    pub fn graph(&self) -> &DirectedGraph<&'d DiagramNode, Option<BranchLabel>> {
        &self.graph
    }

    /// Successors of `id` in edge order.
    pub fn successors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.successors(id)
    }

    /// Predecessors of `id` in edge order.
    pub fn predecessors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.predecessors(id)
    }

    /// Outgoing edges of `id` as `(target, label)`.
    pub fn out_edges(&self, id: NodeId) -> impl Iterator<Item = (NodeId, Option<BranchLabel>)> + '_ {
        self.graph
            .outgoing_edges(id)
            .map(|(_, target, label)| (target, *label))
    }

    /// The single successor followed from a non-conditional node.
    #[must_use]
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.graph.successors(id).next()
    }

    /// The `(yes, no)` targets of a Conditional.
    ///
    /// Labelled edges win; the first labelled edge per label is used. Unlabelled
    /// edges fill in whatever labels are still missing, yes first.
    #[must_use]
    pub fn branches(&self, id: NodeId) -> (Option<NodeId>, Option<NodeId>) {
        let mut yes = None;
        let mut no = None;
        let mut unlabelled = Vec::new();

        for (target, label) in self.out_edges(id) {
            match label {
                Some(BranchLabel::Yes) => {
                    yes.get_or_insert(target);
                }
                Some(BranchLabel::No) => {
                    no.get_or_insert(target);
                }
                None => unlabelled.push(target),
            }
        }

        let mut rest = unlabelled.into_iter();
        if yes.is_none() {
            yes = rest.next();
        }
        if no.is_none() {
            no = rest.next();
        }
        (yes, no)
    }

    /// Nodes reachable from the entry.
    #[must_use]
    pub fn reachable(&self) -> BTreeSet<NodeId> {
        algorithms::dfs(&self.graph, self.entry).collect()
    }

    /// Reachable nodes in reverse postorder.
    #[must_use]
    pub fn reverse_postorder(&self) -> Vec<NodeId> {
        algorithms::reverse_postorder(&self.graph, self.entry)
    }

    /// Dominator sets, computed on first use.
    pub fn dominators(&self) -> &DominatorSets {
        self.dominators.get_or_init(|| compute_dominator_sets(self))
    }

    /// Natural loops, computed on first use.
    pub fn loops(&self) -> &LoopForest {
        self.loops.get_or_init(|| detect_loops(self, self.dominators()))
    }

    /// Renders the CFG as a DOT digraph.
    ///
    /// Nodes show their diagram id and type; back edges are dashed.
    #[must_use]
    pub fn to_dot(&self, title: &str) -> String {
        let mut dot = DotWriter::new(title);
        let doms = self.dominators();

        for (id, node) in self.graph.nodes() {
            let label = match node.kind().expression() {
                Some(expression) => format!("{}\n{}\n{}", node.id(), node.kind().type_name(), expression),
                None => format!("{}\n{}", node.id(), node.kind().type_name()),
            };
            let shape = match node.kind() {
                NodeKind::Start | NodeKind::End => Some("ellipse"),
                NodeKind::Conditional(_) => Some("diamond"),
                _ => None,
            };
            dot.node(&id.to_string(), &label, shape);
        }

        for (source, _) in self.graph.nodes() {
            for (target, label) in self.out_edges(source) {
                let back = doms.is_reachable(source) && doms.dominates(target, source);
                let label = label.map(|l| l.to_string());
                dot.edge(
                    &source.to_string(),
                    &target.to_string(),
                    label.as_deref(),
                    back.then_some("dashed"),
                );
            }
        }

        dot.finish()
    }
}

impl GraphBase for Cfg<'_> {
    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        GraphBase::node_ids(&self.graph)
    }
}

impl Successors for Cfg<'_> {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.graph.successors(node)
    }
}

impl Predecessors for Cfg<'_> {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.graph.predecessors(node)
    }
}

impl RootedGraph for Cfg<'_> {
    fn entry(&self) -> NodeId {
        self.entry
    }
}
