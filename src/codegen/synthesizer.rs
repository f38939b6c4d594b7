//! Structured synthesis of a CFG into nested `while`/`if` statements.
//!
//! The walk starts at the successor of the entry node and follows single
//! successors, emitting one statement per node. Structure comes from two
//! places:
//!
//! - **Loop headers.** A node heading a natural loop becomes a `while`. Its
//!   shape depends on which branches of the header stay inside the body:
//!
//!   | yes in body | no in body | emitted |
//!   |---|---|---|
//!   | yes | no | `while cond: <yes>` then the `no` target |
//!   | no | yes | `while (cond == False): <no>` then the `yes` target |
//!   | yes | yes | `while True: if cond: <yes> else: <no>` |
//!   | (not a conditional) | | `while True: <body>` |
//!
//!   Inside the body, reaching the header ends the path (the loop iterates).
//!   Any edge leaving the body is a loop exit: an exit to the loop's
//!   continuation emits `break`; any other exit inlines its target followed
//!   by `break`, or by `exit()` when the inlined path reaches End.
//!
//!   A `break` only leaves the innermost `while` around it. An inlined path
//!   that leaves an enclosing loop as well keeps inlining outward until it
//!   ends the program; one that returns to an enclosing loop's header cannot
//!   be expressed and becomes an unsupported placeholder.
//!
//! - **Other conditionals.** Branches that reconverge after one plain
//!   statement each are merged into an `if/else` and the walk continues once
//!   from the merge node. Otherwise each branch is synthesized separately.
//!
//! Every path carries its own visited set; a node already synthesized on the
//! current path stops it, which bounds the walk on cycles that are not
//! natural loops.

use std::collections::BTreeSet;

use log::{debug, trace};

use crate::{
    analysis::cfg::{Cfg, NaturalLoop},
    codegen::{
        ast::{Expr, Program, Statement, StatementKind},
        builder,
    },
    diagram::NodeKind,
    expression::{Expression, Value},
    utils::graph::NodeId,
};

/// How a synthesized path ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Ran out of successors or hit the revisit guard.
    Open,
    /// Reached an End node.
    Ended,
    /// Emitted a `break`.
    Broke,
    /// Returned to the header of the loop being synthesized.
    Looped,
}

impl Flow {
    fn is_terminal(self) -> bool {
        matches!(self, Flow::Ended | Flow::Broke)
    }
}

/// The loop whose body is being synthesized.
struct LoopCtx<'p> {
    header: NodeId,
    body: &'p BTreeSet<NodeId>,
    continuation: Option<NodeId>,
    parent: Option<&'p LoopCtx<'p>>,
}

impl LoopCtx<'_> {
    fn contains(&self, node: NodeId) -> bool {
        self.body.contains(&node)
    }
}

/// Per-path state.
#[derive(Debug, Clone, Default)]
struct Path {
    visited: BTreeSet<NodeId>,
    /// Header of the innermost emitted `while` around the current statement.
    enclosing: Option<NodeId>,
}

/// What a conditional handed back to the walk.
enum Step {
    Next(Option<NodeId>),
    Done(Flow),
}

/// Turns a [`Cfg`] into a structured [`Program`].
pub struct Synthesizer<'c, 'd> {
    cfg: &'c Cfg<'d>,
}

impl<'c, 'd> Synthesizer<'c, 'd> {
    /// Creates a synthesizer over `cfg`.
    #[must_use]
    pub fn new(cfg: &'c Cfg<'d>) -> Self {
        Synthesizer { cfg }
    }

    /// Synthesizes the program.
    ///
    /// Never fails: nodes that cannot be translated become
    /// [`StatementKind::Unsupported`] placeholders.
    #[must_use]
    pub fn synthesize(&self) -> Program {
        let entry = self.cfg.entry();
        let mut path = Path::default();
        path.visited.insert(entry);

        let mut body = Vec::new();
        self.sequence(self.cfg.next(entry), &mut path, None, &mut body);
        Program { body }
    }

    fn origin(&self, id: NodeId) -> Option<String> {
        Some(self.cfg.display_id(id))
    }

    fn sequence(
        &self,
        mut current: Option<NodeId>,
        path: &mut Path,
        ctx: Option<&LoopCtx<'_>>,
        out: &mut Vec<Statement>,
    ) -> Flow {
        while let Some(id) = current {
            if let Some(active) = ctx {
                if id == active.header {
                    if path.enclosing != Some(id) {
                        out.push(Statement::unsupported(
                            self.origin(id),
                            format!(
                                "Cannot continue loop at '{}' from a nested loop",
                                self.cfg.display_id(id)
                            ),
                        ));
                        return Flow::Broke;
                    }
                    return Flow::Looped;
                }
                if !active.contains(id) {
                    return self.exit(id, path, active, out);
                }
            }

            if !path.visited.insert(id) {
                trace!("'{}' already synthesized on this path", self.cfg.display_id(id));
                return Flow::Open;
            }

            let Some(kind) = self.cfg.kind(id) else {
                return Flow::Open;
            };
            trace!("Synthesizing '{}' ({})", self.cfg.display_id(id), kind.type_name());

            if matches!(kind, NodeKind::End) {
                if path.enclosing.is_some() {
                    out.push(Statement::new(
                        self.origin(id),
                        StatementKind::Call(Expr::call("exit", Vec::new())),
                    ));
                }
                return Flow::Ended;
            }

            if let Some(natural) = self.cfg.loops().loop_for(id) {
                current = self.while_loop(natural, path, ctx, out);
                continue;
            }

            current = match kind {
                NodeKind::Conditional(condition) => {
                    match self.conditional(id, condition.as_ref(), path, ctx, out) {
                        Step::Next(next) => next,
                        Step::Done(flow) => return flow,
                    }
                }
                _ => {
                    out.extend(self.statement(id, kind));
                    self.cfg.next(id)
                }
            };
        }

        // Falling off the diagram from inside a loop ends the program.
        if ctx.is_none() && path.enclosing.is_some() {
            out.push(Statement::new(
                None,
                StatementKind::Call(Expr::call("exit", Vec::new())),
            ));
            return Flow::Ended;
        }
        Flow::Open
    }

    /// Handles an edge leaving the body of `active` towards `target`.
    fn exit(
        &self,
        target: NodeId,
        path: &Path,
        active: &LoopCtx<'_>,
        out: &mut Vec<Statement>,
    ) -> Flow {
        if Some(target) == active.continuation && path.enclosing == Some(active.header) {
            out.push(Statement::new(None, StatementKind::Break));
            return Flow::Broke;
        }

        debug!(
            "Inlining exit from loop at '{}' to '{}'",
            self.cfg.display_id(active.header),
            self.cfg.display_id(target)
        );

        let mut inline_path = path.clone();
        let mut inlined = Vec::new();
        let flow = self.sequence(Some(target), &mut inline_path, active.parent, &mut inlined);
        if !flow.is_terminal() {
            inlined.push(Statement::new(None, StatementKind::Break));
        }
        out.push(Statement::new(None, StatementKind::Block(inlined)));

        if flow == Flow::Ended {
            Flow::Ended
        } else {
            Flow::Broke
        }
    }

    /// Emits the `while` for `natural` and returns the node synthesized after it.
    fn while_loop(
        &self,
        natural: &NaturalLoop,
        path: &Path,
        ctx: Option<&LoopCtx<'_>>,
        out: &mut Vec<Statement>,
    ) -> Option<NodeId> {
        let header = natural.header;
        let origin = self.origin(header);
        let lowest_exit = natural.exits.iter().map(|exit| exit.target).min();
        let always = Expr::Literal(Value::Boolean(true));

        let (condition, body, continuation, shape) = match self.cfg.kind(header) {
            Some(NodeKind::Conditional(expression)) => {
                let condition = self.condition(expression.as_ref());
                let (yes, no) = self.cfg.branches(header);
                let inside = |target: Option<NodeId>| target.is_some_and(|t| natural.contains(t));

                match (inside(yes), inside(no)) {
                    (true, false) => {
                        let body = self.loop_body(yes, natural, no, path, ctx);
                        (condition, body, no, "while (cond)")
                    }
                    (false, true) => {
                        let body = self.loop_body(no, natural, yes, path, ctx);
                        (condition.negated(), body, yes, "while (cond == False)")
                    }
                    _ => {
                        let then_body = self.loop_body(yes, natural, lowest_exit, path, ctx);
                        let else_body = self.loop_body(no, natural, lowest_exit, path, ctx);
                        let branch = Statement::new(
                            origin.clone(),
                            StatementKind::If {
                                condition,
                                then_body,
                                else_body,
                            },
                        );
                        (always, vec![branch], lowest_exit, "while True with if/else")
                    }
                }
            }
            kind => {
                let mut body: Vec<Statement> = kind
                    .and_then(|kind| self.statement(header, kind))
                    .into_iter()
                    .collect();
                body.extend(self.loop_body(self.cfg.next(header), natural, lowest_exit, path, ctx));
                (always, body, lowest_exit, "while True")
            }
        };

        debug!(
            "Loop at '{}' synthesized as {}, continuing at {}",
            self.cfg.display_id(header),
            shape,
            continuation.map_or_else(|| "<none>".to_string(), |c| self.cfg.display_id(c))
        );

        out.push(Statement::new(origin, StatementKind::While { condition, body }));
        continuation
    }

    fn loop_body(
        &self,
        start: Option<NodeId>,
        natural: &NaturalLoop,
        continuation: Option<NodeId>,
        path: &Path,
        ctx: Option<&LoopCtx<'_>>,
    ) -> Vec<Statement> {
        let loop_ctx = LoopCtx {
            header: natural.header,
            body: &natural.body,
            continuation,
            parent: ctx,
        };
        let mut body_path = path.clone();
        body_path.enclosing = Some(natural.header);
        let mut body = Vec::new();
        self.sequence(start, &mut body_path, Some(&loop_ctx), &mut body);
        body
    }

    fn conditional(
        &self,
        id: NodeId,
        expression: Option<&Expression>,
        path: &mut Path,
        ctx: Option<&LoopCtx<'_>>,
        out: &mut Vec<Statement>,
    ) -> Step {
        let condition = self.condition(expression);
        let origin = self.origin(id);
        let (yes, no) = self.cfg.branches(id);

        if let (Some(y), Some(n)) = (yes, no) {
            if y != n {
                let merged = match (self.plain_successor(y, path, ctx), self.plain_successor(n, path, ctx)) {
                    (Some(ym), Some(nm)) if ym == nm => Some((condition.clone(), vec![y, n], ym)),
                    (Some(ym), _) if ym == n => Some((condition.clone(), vec![y], n)),
                    (_, Some(nm)) if nm == y => Some((condition.clone().negated(), vec![n], y)),
                    _ => None,
                };

                if let Some((condition, arms, merge)) = merged {
                    debug!(
                        "Branches of '{}' merge at '{}'",
                        self.cfg.display_id(id),
                        self.cfg.display_id(merge)
                    );
                    let mut bodies = arms.iter().map(|&arm| {
                        path.visited.insert(arm);
                        self.cfg
                            .kind(arm)
                            .and_then(|kind| self.statement(arm, kind))
                            .into_iter()
                            .collect::<Vec<_>>()
                    });
                    let then_body = bodies.next().unwrap_or_default();
                    let else_body = bodies.next().unwrap_or_default();
                    out.push(Statement::new(
                        origin,
                        StatementKind::If {
                            condition,
                            then_body,
                            else_body,
                        },
                    ));
                    return Step::Next(Some(merge));
                }
            }
        }

        let mut then_body = Vec::new();
        let then_flow = self.sequence(yes, &mut path.clone(), ctx, &mut then_body);
        let mut else_body = Vec::new();
        let else_flow = self.sequence(no, &mut path.clone(), ctx, &mut else_body);

        out.push(Statement::new(
            origin,
            StatementKind::If {
                condition,
                then_body,
                else_body,
            },
        ));

        let flow = match (then_flow, else_flow) {
            (Flow::Ended, Flow::Ended) => Flow::Ended,
            (a, b) if a.is_terminal() && b.is_terminal() => Flow::Broke,
            _ => Flow::Open,
        };
        Step::Done(flow)
    }

    /// The single successor of `node` if it can be one arm of a merged `if`.
    fn plain_successor(
        &self,
        node: NodeId,
        path: &Path,
        ctx: Option<&LoopCtx<'_>>,
    ) -> Option<NodeId> {
        if path.visited.contains(&node) || self.cfg.loops().is_header(node) {
            return None;
        }
        if let Some(active) = ctx {
            if node == active.header || !active.contains(node) {
                return None;
            }
        }
        match self.cfg.kind(node)? {
            NodeKind::Start | NodeKind::End | NodeKind::Conditional(_) => return None,
            _ => {}
        }
        if self.cfg.graph().out_degree(node) != 1 {
            return None;
        }
        self.cfg.next(node)
    }

    fn condition(&self, expression: Option<&Expression>) -> Expr {
        let Some(expression) = expression else {
            return Expr::Unsupported("Conditional has no condition".to_string());
        };
        match builder::lower(expression) {
            Ok(Expr::Empty) => Expr::Unsupported("Condition is empty".to_string()),
            Ok(condition) => condition,
            Err(err) => Expr::Unsupported(format!("Could not parse condition: {err}")),
        }
    }

    /// The statement for a non-structural node, if it has one.
    fn statement(&self, id: NodeId, kind: &NodeKind) -> Option<Statement> {
        let origin = self.origin(id);
        let kind = match kind {
            NodeKind::Start | NodeKind::End | NodeKind::DeclareVariable(_) | NodeKind::Conditional(_) => {
                return None
            }
            NodeKind::AssignVariable(None) => {
                return Some(Statement::unsupported(origin, "Assignment has no expression"))
            }
            NodeKind::AssignVariable(Some(expression)) => {
                let Some(target) = expression.target() else {
                    return Some(Statement::unsupported(origin, "Assignment has no target variable"));
                };
                match builder::lower_tokens(expression.right()) {
                    Ok(Expr::Empty) => {
                        return Some(Statement::unsupported(
                            origin,
                            format!("Assignment to '{}' has no value", target.name()),
                        ))
                    }
                    Ok(value) => StatementKind::Assignment {
                        target: target.name().to_string(),
                        value,
                    },
                    Err(err) => {
                        return Some(Statement::unsupported(
                            origin,
                            format!("Could not parse expression: {err}"),
                        ))
                    }
                }
            }
            NodeKind::Input(None) => {
                return Some(Statement::unsupported(origin, "Input has no variable"))
            }
            NodeKind::Input(Some(variable)) => StatementKind::Assignment {
                target: variable.name().to_string(),
                value: builder::read_input(variable.var_type()),
            },
            NodeKind::Output(None) => StatementKind::Print(Expr::Empty),
            NodeKind::Output(Some(expression)) => match builder::lower(expression) {
                Ok(value) => StatementKind::Print(value),
                Err(err) => {
                    return Some(Statement::unsupported(
                        origin,
                        format!("Could not parse expression: {err}"),
                    ))
                }
            },
            NodeKind::Unknown(name) => {
                return Some(Statement::unsupported(
                    origin,
                    format!("Unknown node type '{name}'"),
                ))
            }
        };
        Some(Statement::new(origin, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        diagram::Diagram,
        expression::{BinaryOp, VariableType},
        test::{assign, cond, var, DiagramBuilder},
    };

    fn synthesize(diagram: &Diagram) -> Program {
        let cfg = Cfg::build(diagram).unwrap();
        Synthesizer::new(&cfg).synthesize()
    }

    fn kinds(body: &[Statement]) -> Vec<&'static str> {
        body.iter()
            .map(|s| match s.kind {
                StatementKind::Assignment { .. } => "assign",
                StatementKind::If { .. } => "if",
                StatementKind::While { .. } => "while",
                StatementKind::Block(_) => "block",
                StatementKind::Print(_) => "print",
                StatementKind::Call(_) => "call",
                StatementKind::Break => "break",
                StatementKind::Unsupported { .. } => "unsupported",
            })
            .collect()
    }

    #[test]
    fn test_linear() {
        let x = var("x", VariableType::Integer);
        let diagram = DiagramBuilder::new()
            .start("s")
            .declare("d", x.clone())
            .assign("a", assign(&x, "1", &[]))
            .output("o")
            .end("e")
            .edge("s", "d")
            .edge("d", "a")
            .edge("a", "o")
            .edge("o", "e")
            .build();
        let program = synthesize(&diagram);
        assert_eq!(kinds(&program.body), ["assign", "print"]);
        assert_eq!(program.body[0].origin.as_deref(), Some("a"));
    }

    #[test]
    fn test_while_condition_shape() {
        let x = var("x", VariableType::Integer);
        let vars = [x.clone()];
        let diagram = DiagramBuilder::new()
            .start("s")
            .conditional("c", cond("x", BinaryOp::Less, "10", &vars))
            .assign("inc", assign(&x, "x + 1", &vars))
            .output("done")
            .end("e")
            .edge("s", "c")
            .yes("c", "inc")
            .edge("inc", "c")
            .no("c", "done")
            .edge("done", "e")
            .build();
        let program = synthesize(&diagram);

        assert_eq!(kinds(&program.body), ["while", "print"]);
        let StatementKind::While { condition, body } = &program.body[0].kind else {
            panic!("expected while");
        };
        assert!(matches!(condition, Expr::Binary { op: BinaryOp::Less, .. }));
        assert_eq!(kinds(body), ["assign"]);
    }

    #[test]
    fn test_while_negated_shape() {
        let diagram = DiagramBuilder::new()
            .start("s")
            .conditional("c", DiagramBuilder::always())
            .output("body")
            .end("e")
            .edge("s", "c")
            .no("c", "body")
            .edge("body", "c")
            .yes("c", "e")
            .build();
        let program = synthesize(&diagram);

        let StatementKind::While { condition, body } = &program.body[0].kind else {
            panic!("expected while");
        };
        assert_eq!(condition, &Expr::Literal(Value::Boolean(true)).negated());
        assert_eq!(kinds(body), ["print"]);
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn test_both_branches_loop() {
        let diagram = DiagramBuilder::new()
            .start("s")
            .conditional("c", DiagramBuilder::always())
            .output("a")
            .output("b")
            .edge("s", "c")
            .yes("c", "a")
            .no("c", "b")
            .edge("a", "c")
            .edge("b", "c")
            .build();
        let program = synthesize(&diagram);

        let StatementKind::While { condition, body } = &program.body[0].kind else {
            panic!("expected while");
        };
        assert_eq!(condition, &Expr::Literal(Value::Boolean(true)));
        let StatementKind::If {
            then_body,
            else_body,
            ..
        } = &body[0].kind
        else {
            panic!("expected if");
        };
        assert_eq!(kinds(then_body), ["print"]);
        assert_eq!(kinds(else_body), ["print"]);
    }

    #[test]
    fn test_unconditional_loop() {
        let diagram = DiagramBuilder::new()
            .start("s")
            .output("a")
            .output("b")
            .edge("s", "a")
            .edge("a", "b")
            .edge("b", "a")
            .build();
        let program = synthesize(&diagram);

        let StatementKind::While { body, .. } = &program.body[0].kind else {
            panic!("expected while");
        };
        assert_eq!(program.body[0].origin.as_deref(), Some("a"));
        assert_eq!(kinds(body), ["print", "print"]);
    }

    #[test]
    fn test_exit_to_continuation_breaks() {
        // c: while (yes) with an inner conditional g leaving through the same exit
        let diagram = DiagramBuilder::new()
            .start("s")
            .conditional("c", DiagramBuilder::always())
            .conditional("g", DiagramBuilder::always())
            .output("work")
            .output("after")
            .end("e")
            .edge("s", "c")
            .yes("c", "g")
            .no("c", "after")
            .yes("g", "after")
            .no("g", "work")
            .edge("work", "c")
            .edge("after", "e")
            .build();
        let program = synthesize(&diagram);

        assert_eq!(kinds(&program.body), ["while", "print"]);
        let StatementKind::While { body, .. } = &program.body[0].kind else {
            panic!("expected while");
        };
        let StatementKind::If {
            then_body,
            else_body,
            ..
        } = &body[0].kind
        else {
            panic!("expected if");
        };
        assert_eq!(kinds(then_body), ["break"]);
        assert_eq!(kinds(else_body), ["print"]);
    }

    #[test]
    fn test_exit_to_other_target_inlines_and_exits() {
        let diagram = DiagramBuilder::new()
            .start("s")
            .conditional("c", DiagramBuilder::always())
            .conditional("g", DiagramBuilder::always())
            .output("err")
            .output("after")
            .end("e")
            .end("e2")
            .edge("s", "c")
            .yes("c", "g")
            .no("c", "after")
            .yes("g", "err")
            .no("g", "c")
            .edge("err", "e2")
            .edge("after", "e")
            .build();
        let program = synthesize(&diagram);

        let StatementKind::While { body, .. } = &program.body[0].kind else {
            panic!("expected while");
        };
        let StatementKind::If { then_body, .. } = &body[0].kind else {
            panic!("expected if");
        };
        let StatementKind::Block(inlined) = &then_body[0].kind else {
            panic!("expected inlined block");
        };
        assert_eq!(kinds(inlined), ["print", "call"]);
    }

    #[test]
    fn test_merge_elision() {
        let diagram = DiagramBuilder::new()
            .start("s")
            .conditional("c", DiagramBuilder::always())
            .output("a")
            .output("b")
            .output("m")
            .end("e")
            .edge("s", "c")
            .yes("c", "a")
            .no("c", "b")
            .edge("a", "m")
            .edge("b", "m")
            .edge("m", "e")
            .build();
        let program = synthesize(&diagram);
        assert_eq!(kinds(&program.body), ["if", "print"]);
        assert_eq!(program.body[1].origin.as_deref(), Some("m"));
    }

    #[test]
    fn test_one_sided_merge() {
        let diagram = DiagramBuilder::new()
            .start("s")
            .conditional("c", DiagramBuilder::always())
            .output("extra")
            .output("m")
            .end("e")
            .edge("s", "c")
            .no("c", "extra")
            .yes("c", "m")
            .edge("extra", "m")
            .edge("m", "e")
            .build();
        let program = synthesize(&diagram);

        assert_eq!(kinds(&program.body), ["if", "print"]);
        let StatementKind::If {
            condition,
            then_body,
            else_body,
        } = &program.body[0].kind
        else {
            panic!("expected if");
        };
        assert!(matches!(condition, Expr::Binary { op: BinaryOp::Equal, .. }));
        assert_eq!(kinds(then_body), ["print"]);
        assert!(else_body.is_empty());
    }

    #[test]
    fn test_unsupported_nodes() {
        let diagram = DiagramBuilder::new()
            .start("s")
            .node("u", NodeKind::Unknown("subroutine".into()))
            .node("a", NodeKind::AssignVariable(None))
            .node("c", NodeKind::Conditional(None))
            .end("e")
            .edge("s", "u")
            .edge("u", "a")
            .edge("a", "c")
            .yes("c", "e")
            .no("c", "e")
            .build();
        let program = synthesize(&diagram);

        assert_eq!(kinds(&program.body), ["unsupported", "unsupported", "if"]);
        let StatementKind::If { condition, .. } = &program.body[2].kind else {
            panic!("expected if");
        };
        assert_eq!(condition.unsupported_reason(), Some("Conditional has no condition"));
    }

    #[test]
    fn test_revisit_guard_terminates() {
        // b -> a is not a back edge: a does not dominate b
        let diagram = DiagramBuilder::new()
            .start("s")
            .conditional("c", DiagramBuilder::always())
            .output("a")
            .output("b")
            .edge("s", "c")
            .yes("c", "a")
            .no("c", "b")
            .edge("a", "b")
            .edge("b", "a")
            .build();
        let program = synthesize(&diagram);
        assert_eq!(kinds(&program.body), ["if", "print"]);
    }
}
