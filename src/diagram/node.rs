use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::{
    expression::{Expression, Variable},
    Error, Result,
};

/// The kind tag of a diagram node as it appears in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum NodeType {
    /// Program entry.
    Start,
    /// Program exit.
    End,
    /// Variable declaration.
    DeclareVariable,
    /// Assignment.
    AssignVariable,
    /// Two-way branch.
    Conditional,
    /// Read a value into a variable.
    Input,
    /// Print a value.
    Output,
}

/// A diagram node's kind together with its payload.
///
/// Payloads are optional because the editor can hand over half-configured
/// blocks; the code generator turns a missing payload into an unsupported
/// placeholder and the evaluator never sees such nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Program entry.
    Start,
    /// Program exit.
    End,
    /// Declares a variable. Carries no runtime action.
    DeclareVariable(Option<Variable>),
    /// Assigns the expression's right side to its target.
    AssignVariable(Option<Expression>),
    /// Branches on the expression.
    Conditional(Option<Expression>),
    /// Reads a value into the variable.
    Input(Option<Variable>),
    /// Prints the expression.
    Output(Option<Expression>),
    /// A node type this library does not know, kept by name.
    Unknown(String),
}

impl NodeKind {
    /// The snapshot type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        let known = match self {
            NodeKind::Start => NodeType::Start,
            NodeKind::End => NodeType::End,
            NodeKind::DeclareVariable(_) => NodeType::DeclareVariable,
            NodeKind::AssignVariable(_) => NodeType::AssignVariable,
            NodeKind::Conditional(_) => NodeType::Conditional,
            NodeKind::Input(_) => NodeType::Input,
            NodeKind::Output(_) => NodeType::Output,
            NodeKind::Unknown(name) => return name,
        };
        let name: &'static str = known.into();
        name
    }

    /// The expression payload, for kinds that carry one.
    #[must_use]
    pub fn expression(&self) -> Option<&Expression> {
        match self {
            NodeKind::AssignVariable(e) | NodeKind::Conditional(e) | NodeKind::Output(e) => {
                e.as_ref()
            }
            _ => None,
        }
    }

    /// The variable payload, for kinds that carry one.
    #[must_use]
    pub fn variable(&self) -> Option<&Variable> {
        match self {
            NodeKind::DeclareVariable(v) | NodeKind::Input(v) => v.as_ref(),
            _ => None,
        }
    }
}

/// One block of the flowchart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodeObject", into = "NodeObject")]
pub struct DiagramNode {
    id: String,
    kind: NodeKind,
}

impl DiagramNode {
    /// Creates a node.
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        DiagramNode {
            id: id.into(),
            kind,
        }
    }

    /// Node id, unique within a diagram.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Kind and payload.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns `true` for Start nodes.
    #[must_use]
    pub fn is_start(&self) -> bool {
        matches!(self.kind, NodeKind::Start)
    }

    /// Returns `true` for End nodes.
    #[must_use]
    pub fn is_end(&self) -> bool {
        matches!(self.kind, NodeKind::End)
    }

    /// Returns `true` for Conditional nodes.
    #[must_use]
    pub fn is_conditional(&self) -> bool {
        matches!(self.kind, NodeKind::Conditional(_))
    }
}

#[derive(Default, Serialize, Deserialize)]
struct NodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expression: Option<Expression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    variable: Option<Variable>,
}

#[derive(Serialize, Deserialize)]
struct NodeObject {
    id: String,
    #[serde(rename = "type")]
    node_type: String,
    #[serde(default)]
    data: NodeData,
}

impl TryFrom<NodeObject> for DiagramNode {
    type Error = Error;

    fn try_from(object: NodeObject) -> Result<Self> {
        let NodeObject {
            id,
            node_type,
            data,
        } = object;

        let Ok(known) = node_type.parse::<NodeType>() else {
            return Ok(DiagramNode::new(id, NodeKind::Unknown(node_type)));
        };

        let kind = match known {
            NodeType::Start => NodeKind::Start,
            NodeType::End => NodeKind::End,
            NodeType::DeclareVariable => NodeKind::DeclareVariable(data.variable),
            NodeType::Input => NodeKind::Input(data.variable),
            NodeType::AssignVariable => {
                if let Some(expression) = &data.expression {
                    if expression.target().is_none() {
                        return Err(malformed_error!(
                            "Assignment node '{}' has no target variable",
                            id
                        ));
                    }
                }
                NodeKind::AssignVariable(data.expression)
            }
            NodeType::Conditional => NodeKind::Conditional(data.expression),
            NodeType::Output => NodeKind::Output(data.expression),
        };

        Ok(DiagramNode::new(id, kind))
    }
}

impl From<DiagramNode> for NodeObject {
    fn from(node: DiagramNode) -> Self {
        let node_type = node.kind.type_name().to_string();
        let data = match node.kind {
            NodeKind::DeclareVariable(variable) | NodeKind::Input(variable) => NodeData {
                expression: None,
                variable,
            },
            NodeKind::AssignVariable(expression)
            | NodeKind::Conditional(expression)
            | NodeKind::Output(expression) => NodeData {
                expression,
                variable: None,
            },
            NodeKind::Start | NodeKind::End | NodeKind::Unknown(_) => NodeData::default(),
        };

        NodeObject {
            id: node.id,
            node_type,
            data,
        }
    }
}
