//! Builders shared by unit tests.

use crate::{
    diagram::{BranchLabel, Diagram, DiagramEdge, DiagramNode, NodeKind},
    expression::{BinaryOp, Expression, ExpressionElement, Operator, Variable, VariableType},
};

/// Creates a variable declared by node `decl_<name>`.
pub fn var(name: &str, var_type: VariableType) -> Variable {
    Variable::new(format!("var_{name}"), var_type, name, format!("decl_{name}"))
}

/// Tokenizes a space separated source string.
///
/// Operator text becomes an operator element, a word naming one of `vars`
/// becomes a variable element and everything else is a literal.
pub fn tokens(source: &str, vars: &[Variable]) -> Vec<ExpressionElement> {
    source
        .split_whitespace()
        .enumerate()
        .map(|(i, text)| {
            let id = format!("t{i}");
            if let Ok(op) = text.parse::<Operator>() {
                ExpressionElement::op(id, op)
            } else if let Some(v) = vars.iter().find(|v| v.name() == text) {
                ExpressionElement::variable(id, v.clone())
            } else {
                ExpressionElement::literal(id, text)
            }
        })
        .collect()
}

/// `left op right` over tokenized sources.
pub fn cond(left: &str, op: BinaryOp, right: &str, vars: &[Variable]) -> Expression {
    Expression::condition(tokens(left, vars), op, tokens(right, vars))
}

/// `target = source`.
pub fn assign(target: &Variable, source: &str, vars: &[Variable]) -> Expression {
    Expression::assignment(target.clone(), tokens(source, vars))
}

/// A value-only expression.
pub fn value(source: &str, vars: &[Variable]) -> Expression {
    Expression::value(tokens(source, vars))
}

/// Fluent diagram construction with generated edge ids.
#[derive(Default)]
pub struct DiagramBuilder {
    nodes: Vec<DiagramNode>,
    edges: Vec<DiagramEdge>,
}

impl DiagramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The condition `true`.
    pub fn always() -> Expression {
        Expression::value(vec![ExpressionElement::literal("true", "true")])
    }

    pub fn node(mut self, id: &str, kind: NodeKind) -> Self {
        self.nodes.push(DiagramNode::new(id, kind));
        self
    }

    pub fn start(self, id: &str) -> Self {
        self.node(id, NodeKind::Start)
    }

    pub fn end(self, id: &str) -> Self {
        self.node(id, NodeKind::End)
    }

    /// An Output node printing its own id as a string literal.
    pub fn output(self, id: &str) -> Self {
        let literal = ExpressionElement::literal(format!("{id}_lit"), format!("\"{id}\""));
        self.node(id, NodeKind::Output(Some(Expression::value(vec![literal]))))
    }

    pub fn print(self, id: &str, expression: Expression) -> Self {
        self.node(id, NodeKind::Output(Some(expression)))
    }

    pub fn assign(self, id: &str, expression: Expression) -> Self {
        self.node(id, NodeKind::AssignVariable(Some(expression)))
    }

    pub fn declare(self, id: &str, variable: Variable) -> Self {
        self.node(id, NodeKind::DeclareVariable(Some(variable)))
    }

    pub fn input(self, id: &str, variable: Variable) -> Self {
        self.node(id, NodeKind::Input(Some(variable)))
    }

    pub fn conditional(self, id: &str, condition: Expression) -> Self {
        self.node(id, NodeKind::Conditional(Some(condition)))
    }

    fn link(mut self, source: &str, target: &str, label: Option<BranchLabel>) -> Self {
        let id = format!("edge{}", self.edges.len());
        self.edges.push(DiagramEdge::new(id, source, target, label));
        self
    }

    pub fn edge(self, source: &str, target: &str) -> Self {
        self.link(source, target, None)
    }

    pub fn yes(self, source: &str, target: &str) -> Self {
        self.link(source, target, Some(BranchLabel::Yes))
    }

    pub fn no(self, source: &str, target: &str) -> Self {
        self.link(source, target, Some(BranchLabel::No))
    }

    pub fn build(self) -> Diagram {
        Diagram::new(self.nodes, self.edges)
    }
}
