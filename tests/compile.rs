//! Compiler integration tests.
//!
//! Diagrams are assembled through the public data model and compiled to
//! source text; most tests disable trace comments so the expected output
//! shows the structure only.

use flowscope::{
    analysis::cfg::Cfg,
    codegen::{compile, compile_to_source, compile_to_source_with, CodegenConfig, StatementKind},
    diagram::{BranchLabel, Diagram, DiagramEdge, DiagramNode, NodeKind},
    expression::{
        BinaryOp, Conversion, Expression, ExpressionElement, Operator, Variable, VariableType,
    },
};

struct Builder {
    vars: Vec<Variable>,
    nodes: Vec<DiagramNode>,
    edges: Vec<DiagramEdge>,
}

impl Builder {
    fn new(names: &[&str]) -> Self {
        let vars = names
            .iter()
            .map(|name| Variable::new(format!("var_{name}"), VariableType::Integer, *name, "decl"))
            .collect();
        Builder {
            vars,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    fn var(&self, name: &str) -> Variable {
        self.vars
            .iter()
            .find(|v| v.name() == name)
            .cloned()
            .unwrap()
    }

    fn tokens(&self, source: &str) -> Vec<ExpressionElement> {
        source
            .split_whitespace()
            .enumerate()
            .map(|(i, text)| {
                let id = format!("t{i}");
                if let Ok(op) = text.parse::<Operator>() {
                    ExpressionElement::op(id, op)
                } else if let Some(v) = self.vars.iter().find(|v| v.name() == text) {
                    ExpressionElement::variable(id, v.clone())
                } else {
                    ExpressionElement::literal(id, text)
                }
            })
            .collect()
    }

    fn node(mut self, id: &str, kind: NodeKind) -> Self {
        self.nodes.push(DiagramNode::new(id, kind));
        self
    }

    fn start(self, id: &str) -> Self {
        self.node(id, NodeKind::Start)
    }

    fn end(self, id: &str) -> Self {
        self.node(id, NodeKind::End)
    }

    fn assign(self, id: &str, target: &str, source: &str) -> Self {
        let expression = Expression::assignment(self.var(target), self.tokens(source));
        self.node(id, NodeKind::AssignVariable(Some(expression)))
    }

    fn print(self, id: &str, source: &str) -> Self {
        let expression = Expression::value(self.tokens(source));
        self.node(id, NodeKind::Output(Some(expression)))
    }

    fn input(self, id: &str, target: &str) -> Self {
        let variable = self.var(target);
        self.node(id, NodeKind::Input(Some(variable)))
    }

    fn cond(self, id: &str, left: &str, op: BinaryOp, right: &str) -> Self {
        let expression = Expression::condition(self.tokens(left), op, self.tokens(right));
        self.node(id, NodeKind::Conditional(Some(expression)))
    }

    fn link(mut self, source: &str, target: &str, label: Option<BranchLabel>) -> Self {
        let id = format!("edge{}", self.edges.len());
        self.edges.push(DiagramEdge::new(id, source, target, label));
        self
    }

    fn edge(self, source: &str, target: &str) -> Self {
        self.link(source, target, None)
    }

    fn yes(self, source: &str, target: &str) -> Self {
        self.link(source, target, Some(BranchLabel::Yes))
    }

    fn no(self, source: &str, target: &str) -> Self {
        self.link(source, target, Some(BranchLabel::No))
    }

    fn build(self) -> Diagram {
        Diagram::new(self.nodes, self.edges)
    }
}

fn source(diagram: &Diagram) -> String {
    compile_to_source_with(diagram, &CodegenConfig::default().with_trace_comments(false))
}

#[test]
fn test_start_to_end_is_empty() {
    let diagram = Builder::new(&[]).start("s").end("e").edge("s", "e").build();
    assert_eq!(compile_to_source(&diagram), "");
    assert!(compile(&diagram).is_empty());
}

#[test]
fn test_missing_start() {
    let diagram = Builder::new(&[]).print("o", "1").end("e").edge("o", "e").build();
    let program = compile(&diagram);

    assert_eq!(program.body.len(), 1);
    assert!(matches!(program.body[0].kind, StatementKind::Unsupported { .. }));
    assert_eq!(
        compile_to_source(&diagram),
        "# UNSUPPORTED [program]: The diagram does not contain a Start node\n"
    );
}

#[test]
fn test_linear_with_trace_comments() {
    let diagram = Builder::new(&["x"])
        .start("s")
        .input("in", "x")
        .assign("dbl", "x", "x * 2")
        .print("out", "x")
        .end("e")
        .edge("s", "in")
        .edge("in", "dbl")
        .edge("dbl", "out")
        .edge("out", "e")
        .build();

    assert_eq!(
        compile_to_source(&diagram),
        "# Node: in\nx = int(input())\n# Node: dbl\nx = (x * 2)\n# Node: out\nprint(x)\n"
    );
}

#[test]
fn test_while_yes_loop() {
    let diagram = Builder::new(&["x"])
        .start("s")
        .assign("init", "x", "0")
        .cond("c", "x", BinaryOp::Less, "10")
        .assign("inc", "x", "x + 1")
        .print("out", "x")
        .end("e")
        .edge("s", "init")
        .edge("init", "c")
        .yes("c", "inc")
        .edge("inc", "c")
        .no("c", "out")
        .edge("out", "e")
        .build();

    assert_eq!(
        source(&diagram),
        "x = 0\nwhile (x < 10):\n  x = (x + 1)\nprint(x)\n"
    );
}

#[test]
fn test_while_no_loop() {
    let diagram = Builder::new(&["x"])
        .start("s")
        .cond("c", "x", BinaryOp::Less, "10")
        .assign("dec", "x", "x - 1")
        .end("e")
        .edge("s", "c")
        .no("c", "dec")
        .edge("dec", "c")
        .yes("c", "e")
        .build();

    assert_eq!(
        source(&diagram),
        "while ((x < 10) == False):\n  x = (x - 1)\n"
    );
}

#[test]
fn test_both_branches_loop_back() {
    let diagram = Builder::new(&["x"])
        .start("s")
        .cond("c", "x", BinaryOp::Less, "10")
        .assign("up", "x", "x + 1")
        .assign("down", "x", "x - 1")
        .edge("s", "c")
        .yes("c", "up")
        .no("c", "down")
        .edge("up", "c")
        .edge("down", "c")
        .build();

    assert_eq!(
        source(&diagram),
        "while True:\n  if (x < 10):\n    x = (x + 1)\n  else:\n    x = (x - 1)\n"
    );
}

#[test]
fn test_nested_loops() {
    let diagram = Builder::new(&["i", "j"])
        .start("s")
        .cond("outer", "i", BinaryOp::Less, "3")
        .assign("reset", "j", "0")
        .cond("inner", "j", BinaryOp::Less, "2")
        .assign("step_j", "j", "j + 1")
        .assign("step_i", "i", "i + 1")
        .end("e")
        .edge("s", "outer")
        .yes("outer", "reset")
        .no("outer", "e")
        .edge("reset", "inner")
        .yes("inner", "step_j")
        .edge("step_j", "inner")
        .no("inner", "step_i")
        .edge("step_i", "outer")
        .build();

    assert_eq!(
        source(&diagram),
        "while (i < 3):\n  j = 0\n  while (j < 2):\n    j = (j + 1)\n  i = (i + 1)\n"
    );

    let cfg = Cfg::build(&diagram).unwrap();
    assert_eq!(cfg.loops().len(), 2);
}

#[test]
fn test_inner_exit_breaks() {
    let diagram = Builder::new(&["x"])
        .start("s")
        .cond("c", "x", BinaryOp::Less, "10")
        .cond("g", "x", BinaryOp::Equal, "5")
        .assign("inc", "x", "x + 1")
        .print("out", "x")
        .end("e")
        .edge("s", "c")
        .yes("c", "g")
        .no("c", "out")
        .yes("g", "out")
        .no("g", "inc")
        .edge("inc", "c")
        .edge("out", "e")
        .build();

    assert_eq!(
        source(&diagram),
        "while (x < 10):\n  if (x == 5):\n    break\n  else:\n    x = (x + 1)\nprint(x)\n"
    );
}

#[test]
fn test_exit_to_other_target_inlines() {
    let diagram = Builder::new(&["x"])
        .start("s")
        .cond("c", "x", BinaryOp::Less, "10")
        .cond("g", "x", BinaryOp::Equal, "5")
        .print("err", "x")
        .assign("inc", "x", "x + 1")
        .end("e")
        .end("e2")
        .edge("s", "c")
        .yes("c", "g")
        .no("c", "e")
        .yes("g", "err")
        .no("g", "inc")
        .edge("inc", "c")
        .edge("err", "e2")
        .build();

    assert_eq!(
        source(&diagram),
        "while (x < 10):\n  if (x == 5):\n    print(x)\n    exit()\n  else:\n    x = (x + 1)\n"
    );
}

#[test]
fn test_if_else_merge() {
    let diagram = Builder::new(&["x"])
        .start("s")
        .cond("c", "x", BinaryOp::Greater, "0")
        .print("pos", "1")
        .print("neg", "-1")
        .print("done", "x")
        .end("e")
        .edge("s", "c")
        .yes("c", "pos")
        .no("c", "neg")
        .edge("pos", "done")
        .edge("neg", "done")
        .edge("done", "e")
        .build();

    assert_eq!(
        source(&diagram),
        "if (x > 0):\n  print(1)\nelse:\n  print(-1)\nprint(x)\n"
    );
}

#[test]
fn test_unsupported_condition_keeps_structure() {
    let diagram = Builder::new(&["x"])
        .start("s")
        .cond("c", "( x", BinaryOp::Less, "10")
        .assign("inc", "x", "x + 1")
        .end("e")
        .edge("s", "c")
        .yes("c", "inc")
        .edge("inc", "c")
        .no("c", "e")
        .build();

    let text = source(&diagram);
    let mut lines = text.lines();
    assert!(lines.next().unwrap().starts_with("# UNSUPPORTED [c]: Could not parse condition"));
    assert_eq!(lines.next(), Some("while None:"));
    assert_eq!(lines.next(), Some("  x = (x + 1)"));
}

#[test]
fn test_indent_width() {
    let diagram = Builder::new(&["x"])
        .start("s")
        .cond("c", "x", BinaryOp::Less, "10")
        .assign("inc", "x", "x + 1")
        .end("e")
        .edge("s", "c")
        .yes("c", "inc")
        .edge("inc", "c")
        .no("c", "e")
        .build();

    let config = CodegenConfig::default()
        .with_indent_width(4)
        .with_trace_comments(false);
    assert_eq!(
        compile_to_source_with(&diagram, &config),
        "while (x < 10):\n    x = (x + 1)\n"
    );
}

#[test]
fn test_idempotent() {
    let diagram = Builder::new(&["x"])
        .start("s")
        .cond("c", "x", BinaryOp::Less, "10")
        .assign("up", "x", "x + 1")
        .assign("down", "x", "x - 1")
        .edge("s", "c")
        .yes("c", "up")
        .no("c", "down")
        .edge("up", "c")
        .edge("down", "c")
        .build();

    let first = compile_to_source(&diagram);
    let second = compile_to_source(&diagram);
    assert_eq!(first, second);
    assert_eq!(compile(&diagram), compile(&diagram));
}

#[test]
fn test_exit_through_two_loops_ends_program() {
    let diagram = Builder::new(&["i", "j", "x"])
        .start("s")
        .cond("outer", "i", BinaryOp::Less, "3")
        .cond("inner", "j", BinaryOp::Less, "2")
        .cond("g", "x", BinaryOp::Equal, "5")
        .assign("work", "j", "j + 1")
        .assign("step", "i", "i + 1")
        .print("done", "x")
        .end("e")
        .edge("s", "outer")
        .yes("outer", "inner")
        .no("outer", "done")
        .yes("inner", "g")
        .no("inner", "step")
        .yes("g", "done")
        .no("g", "work")
        .edge("work", "inner")
        .edge("step", "outer")
        .edge("done", "e")
        .build();

    assert_eq!(
        source(&diagram),
        "while (i < 3):\n  \
         while (j < 2):\n    \
         if (x == 5):\n      \
         print(x)\n      \
         exit()\n    \
         else:\n      \
         j = (j + 1)\n  \
         i = (i + 1)\n\
         print(x)\n"
    );
}

#[test]
fn test_continue_outer_from_inner_is_unsupported() {
    let diagram = Builder::new(&["i", "j", "x"])
        .start("s")
        .cond("outer", "i", BinaryOp::Less, "3")
        .cond("inner", "j", BinaryOp::Less, "2")
        .cond("g", "x", BinaryOp::Equal, "5")
        .print("skip", "x")
        .assign("work", "j", "j + 1")
        .assign("step", "i", "i + 1")
        .end("e")
        .edge("s", "outer")
        .yes("outer", "inner")
        .no("outer", "e")
        .yes("inner", "g")
        .no("inner", "step")
        .yes("g", "skip")
        .no("g", "work")
        .edge("skip", "outer")
        .edge("work", "inner")
        .edge("step", "outer")
        .build();

    let text = source(&diagram);
    assert!(text.contains(
        "      print(x)\n      # UNSUPPORTED [outer]: Cannot continue loop at 'outer' from a nested loop\n"
    ));
    assert!(!text.contains("break"));
}

#[test]
fn test_empty_call_argument_is_unsupported() {
    let empty_call = ExpressionElement::function("f", Conversion::Integer, Expression::value(Vec::new()));
    let diagram = Builder::new(&[])
        .start("s")
        .node("o", NodeKind::Output(Some(Expression::value(vec![empty_call]))))
        .end("e")
        .edge("s", "o")
        .edge("o", "e")
        .build();

    assert_eq!(
        source(&diagram),
        "# UNSUPPORTED [o]: Could not parse expression: 'integer' is called without an argument\n"
    );
}

#[test]
fn test_comparison_with_empty_side_is_unsupported() {
    let diagram = Builder::new(&["x"])
        .start("s")
        .cond("c", "", BinaryOp::Equal, "5")
        .print("a", "x")
        .end("e")
        .edge("s", "c")
        .yes("c", "a")
        .no("c", "e")
        .edge("a", "e")
        .build();

    let text = source(&diagram);
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("# UNSUPPORTED [c]: Could not parse condition: operator '==' is missing an operand")
    );
    assert_eq!(lines.next(), Some("if None:"));
}
