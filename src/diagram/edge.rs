use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{Error, Result};

/// Branch label on an edge leaving a Conditional node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BranchLabel {
    /// Taken when the condition holds.
    Yes,
    /// Taken when the condition does not hold.
    No,
}

impl BranchLabel {
    /// The opposite branch.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            BranchLabel::Yes => BranchLabel::No,
            BranchLabel::No => BranchLabel::Yes,
        }
    }
}

/// A directed control-flow arrow between two diagram nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EdgeObject", into = "EdgeObject")]
pub struct DiagramEdge {
    id: String,
    source: String,
    target: String,
    label: Option<BranchLabel>,
}

impl DiagramEdge {
    /// Creates an edge from `source` to `target`.
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        label: Option<BranchLabel>,
    ) -> Self {
        DiagramEdge {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label,
        }
    }

    /// Edge id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id of the node the edge leaves.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Id of the node the edge enters.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Branch label, if any.
    #[must_use]
    pub fn label(&self) -> Option<BranchLabel> {
        self.label
    }
}

/// Wire form. An empty label is the same as no label.
#[derive(Serialize, Deserialize)]
struct EdgeObject {
    id: String,
    source: String,
    target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl TryFrom<EdgeObject> for DiagramEdge {
    type Error = Error;

    fn try_from(object: EdgeObject) -> Result<Self> {
        let label = match object.label.as_deref() {
            None | Some("") => None,
            Some(text) => Some(text.parse::<BranchLabel>().map_err(|_| {
                malformed_error!("Edge '{}' has unknown branch label '{}'", object.id, text)
            })?),
        };

        Ok(DiagramEdge {
            id: object.id,
            source: object.source,
            target: object.target,
            label,
        })
    }
}

impl From<DiagramEdge> for EdgeObject {
    fn from(edge: DiagramEdge) -> Self {
        EdgeObject {
            id: edge.id,
            source: edge.source,
            target: edge.target,
            label: edge.label.map(|l| l.to_string()),
        }
    }
}
