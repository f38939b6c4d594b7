use std::path::Path;

use anyhow::bail;
use flowscope::{analysis::cfg::Cfg, utils::graph::NodeId};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{diagram_title, load_diagram},
    output::{Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct SuccessorOutput {
    node: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

#[derive(Debug, Serialize)]
struct NodeOutput {
    id: String,
    #[serde(rename = "type")]
    node_type: String,
    reachable: bool,
    idom: Option<String>,
    loop_depth: usize,
    successors: Vec<SuccessorOutput>,
}

#[derive(Debug, Serialize)]
struct LoopOutput {
    header: String,
    body: Vec<String>,
    latches: Vec<String>,
    exits: Vec<String>,
}

#[derive(Debug, Serialize)]
struct AnalyzeOutput {
    diagram: String,
    entry: String,
    node_count: usize,
    edge_count: usize,
    nodes: Vec<NodeOutput>,
    loops: Vec<LoopOutput>,
}

pub fn run(path: &Path, format: &str, global: &GlobalOptions) -> anyhow::Result<()> {
    let diagram = load_diagram(path)?;
    let cfg = Cfg::build(&diagram)?;
    let title = diagram_title(path);

    let format = if global.json { "json" } else { format };
    match format {
        "dot" => {
            print!("{}", cfg.to_dot(&title));
            Ok(())
        }
        "json" => {
            let output = collect(&cfg, title);
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        "text" => {
            print_text(&collect(&cfg, title));
            Ok(())
        }
        other => bail!("unknown format '{other}' (expected text, dot or json)"),
    }
}

fn collect(cfg: &Cfg<'_>, diagram: String) -> AnalyzeOutput {
    let doms = cfg.dominators();
    let forest = cfg.loops();
    let names = |ids: &mut dyn Iterator<Item = NodeId>| -> Vec<String> {
        ids.map(|id| cfg.display_id(id)).collect()
    };

    let nodes = cfg
        .graph()
        .nodes()
        .map(|(id, node)| NodeOutput {
            id: node.id().to_string(),
            node_type: node.kind().type_name().to_string(),
            reachable: doms.is_reachable(id),
            idom: doms.immediate_dominator(id).map(|d| cfg.display_id(d)),
            loop_depth: forest.depth(id),
            successors: cfg
                .out_edges(id)
                .map(|(target, label)| SuccessorOutput {
                    node: cfg.display_id(target),
                    label: label.map(|l| l.to_string()),
                })
                .collect(),
        })
        .collect();

    let loops = forest
        .loops()
        .iter()
        .map(|natural| LoopOutput {
            header: cfg.display_id(natural.header),
            body: names(&mut natural.body.iter().copied()),
            latches: names(&mut natural.latches.iter().copied()),
            exits: names(&mut natural.exit_targets().into_iter()),
        })
        .collect();

    AnalyzeOutput {
        diagram,
        entry: cfg.display_id(cfg.entry()),
        node_count: cfg.node_count(),
        edge_count: cfg.edge_count(),
        nodes,
        loops,
    }
}

fn print_text(output: &AnalyzeOutput) {
    println!(
        "{}: {} nodes, {} edges, entry {}",
        output.diagram, output.node_count, output.edge_count, output.entry
    );
    println!();

    let mut nodes = TabWriter::new(&[
        ("NODE", Align::Left),
        ("TYPE", Align::Left),
        ("IDOM", Align::Left),
        ("DEPTH", Align::Right),
        ("SUCCESSORS", Align::Left),
    ])
    .indent("  ");
    for node in &output.nodes {
        let successors: Vec<String> = node
            .successors
            .iter()
            .map(|s| match &s.label {
                Some(label) => format!("{}:{}", label, s.node),
                None => s.node.clone(),
            })
            .collect();
        let idom = match (&node.idom, node.reachable) {
            (Some(idom), _) => idom.clone(),
            (None, true) => "-".to_string(),
            (None, false) => "unreachable".to_string(),
        };
        nodes.row(vec![
            node.id.clone(),
            node.node_type.clone(),
            idom,
            node.loop_depth.to_string(),
            successors.join(", "),
        ]);
    }
    nodes.print();

    println!();
    if output.loops.is_empty() {
        println!("No natural loops.");
        return;
    }

    println!("Loops ({}):", output.loops.len());
    let mut loops = TabWriter::new(&[
        ("HEADER", Align::Left),
        ("SIZE", Align::Right),
        ("LATCHES", Align::Left),
        ("EXITS", Align::Left),
    ])
    .indent("  ");
    for natural in &output.loops {
        loops.row(vec![
            natural.header.clone(),
            natural.body.len().to_string(),
            natural.latches.join(", "),
            natural.exits.join(", "),
        ]);
    }
    loops.print();
}
