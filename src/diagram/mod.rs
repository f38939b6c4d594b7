//! Flowchart diagram snapshots.
//!
//! A [`Diagram`] is the immutable input of the compiler: typed nodes plus
//! control-flow edges, exactly as the editing layer hands them over.
//!
//! # Snapshot format
//!
//! ```json
//! {
//!   "nodes": [
//!     {"id": "n1", "type": "start"},
//!     {"id": "n2", "type": "output", "data": {"expression": {...}}},
//!     {"id": "n3", "type": "end"}
//!   ],
//!   "edges": [
//!     {"id": "e1", "source": "n1", "target": "n2"},
//!     {"id": "e2", "source": "n2", "target": "n3"}
//!   ]
//! }
//! ```
//!
//! Node `type` is one of `start`, `end`, `declareVariable`, `assignVariable`,
//! `conditional`, `input` and `output`; other types load as
//! [`NodeKind::Unknown`]. Edge `label` is `yes` or `no` and only meaningful on
//! edges leaving a Conditional.

mod edge;
mod node;

pub use edge::{BranchLabel, DiagramEdge};
pub use node::{DiagramNode, NodeKind, NodeType};

use serde::{Deserialize, Serialize};

use crate::Result;

/// A complete diagram: nodes and edges in snapshot order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(default)]
    nodes: Vec<DiagramNode>,
    #[serde(default)]
    edges: Vec<DiagramEdge>,
}

impl Diagram {
    /// Creates a diagram from its parts.
    #[must_use]
    pub fn new(nodes: Vec<DiagramNode>, edges: Vec<DiagramEdge>) -> Self {
        Diagram { nodes, edges }
    }

    /// Parses a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] for invalid JSON or payloads violating the
    /// data model.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Converts a parsed JSON value.
    ///
    /// # Errors
    ///
    /// See [`Diagram::from_json`].
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serializes the diagram back to its snapshot form.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Nodes in snapshot order.
    #[must_use]
    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }

    /// Edges in snapshot order.
    #[must_use]
    pub fn edges(&self) -> &[DiagramEdge] {
        &self.edges
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    /// The first Start node, if any.
    #[must_use]
    pub fn start(&self) -> Option<&DiagramNode> {
        self.nodes.iter().find(|node| node.is_start())
    }
}
