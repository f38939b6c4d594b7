//! Benchmarks for diagram compilation.
//!
//! Diagrams are generated as `depth` nested counting loops. Header `c{i}`
//! enters `c{i+1}` on `yes` (the innermost enters its increment) and leaves
//! to the enclosing loop's increment `inc{i-1}` on `no`; every `inc{i}`
//! returns to `c{i}`.
//!
//! ```text
//! start -> c0 -yes-> c1 -yes-> ... -> inc{n-1} -> c{n-1}
//!          |         |no
//!          |no       +-> inc0 -> c0
//!          +-> end
//! ```

extern crate flowscope;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use flowscope::{
    analysis::cfg::Cfg,
    codegen::compile_to_source,
    diagram::{BranchLabel, Diagram, DiagramEdge, DiagramNode, NodeKind},
    expression::{BinaryOp, Expression, ExpressionElement, Operator, Variable, VariableType},
};
use std::hint::black_box;

fn counter(index: usize) -> Variable {
    Variable::new(format!("v{index}"), VariableType::Integer, format!("i{index}"), "decl")
}

fn nested_loops(depth: usize) -> Diagram {
    let mut nodes = vec![
        DiagramNode::new("start", NodeKind::Start),
        DiagramNode::new("end", NodeKind::End),
    ];
    let mut edges = Vec::new();
    let mut edge = |source: String, target: String, label: Option<BranchLabel>| {
        let id = format!("e{}", edges.len());
        edges.push(DiagramEdge::new(id, source, target, label));
    };

    for i in 0..depth {
        let var = counter(i);
        let condition = Expression::condition(
            vec![ExpressionElement::variable(format!("l{i}"), var.clone())],
            BinaryOp::Less,
            vec![ExpressionElement::literal(format!("r{i}"), "10")],
        );
        nodes.push(DiagramNode::new(format!("c{i}"), NodeKind::Conditional(Some(condition))));

        let increment = Expression::assignment(
            var.clone(),
            vec![
                ExpressionElement::variable(format!("a{i}"), var),
                ExpressionElement::op(format!("p{i}"), Operator::Plus),
                ExpressionElement::literal(format!("o{i}"), "1"),
            ],
        );
        nodes.push(DiagramNode::new(format!("inc{i}"), NodeKind::AssignVariable(Some(increment))));
    }

    edge("start".into(), "c0".into(), None);
    for i in 0..depth {
        let inner = if i + 1 < depth {
            format!("c{}", i + 1)
        } else {
            format!("inc{i}")
        };
        edge(format!("c{i}"), inner, Some(BranchLabel::Yes));

        let exit = if i == 0 {
            "end".to_string()
        } else {
            format!("inc{}", i - 1)
        };
        edge(format!("c{i}"), exit, Some(BranchLabel::No));
        edge(format!("inc{i}"), format!("c{i}"), None);
    }

    Diagram::new(nodes, edges)
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_nested_loops");
    for depth in [2usize, 8, 32] {
        let diagram = nested_loops(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &diagram, |b, diagram| {
            b.iter(|| black_box(compile_to_source(black_box(diagram))));
        });
    }
    group.finish();
}

fn bench_loop_analysis(c: &mut Criterion) {
    let diagram = nested_loops(32);
    c.bench_function("loop_analysis_depth_32", |b| {
        b.iter(|| {
            let cfg = Cfg::build(black_box(&diagram)).unwrap();
            black_box(cfg.loops().len())
        });
    });
}

criterion_group!(benches, bench_compile, bench_loop_analysis);
criterion_main!(benches);
