use std::path::Path;

use flowscope::codegen::{compile, CodegenConfig, Emitter, Statement, StatementKind};
use serde::Serialize;

use crate::{app::GlobalOptions, commands::common::load_diagram, output::print_output};

#[derive(Debug, Serialize)]
struct CompileOutput {
    statements: usize,
    unsupported: Vec<String>,
    source: String,
}

pub fn run(path: &Path, indent: usize, no_trace: bool, global: &GlobalOptions) -> anyhow::Result<()> {
    let diagram = load_diagram(path)?;
    let config = CodegenConfig::default()
        .with_indent_width(indent)
        .with_trace_comments(!no_trace);

    let program = compile(&diagram);
    let mut output = CompileOutput {
        statements: 0,
        unsupported: Vec::new(),
        source: Emitter::new(&config).emit(&program),
    };
    tally(&program.body, &mut output);

    for reason in &output.unsupported {
        log::warn!("unsupported: {reason}");
    }

    print_output(&output, global, |out| print!("{}", out.source))
}

fn tally(body: &[Statement], output: &mut CompileOutput) {
    for statement in body {
        match &statement.kind {
            StatementKind::Block(inner) => tally(inner, output),
            StatementKind::If {
                then_body,
                else_body,
                ..
            } => {
                output.statements += 1;
                tally(then_body, output);
                tally(else_body, output);
            }
            StatementKind::While { body, .. } => {
                output.statements += 1;
                tally(body, output);
            }
            StatementKind::Unsupported { reason } => {
                let origin = statement.origin.as_deref().unwrap_or("program");
                output.unsupported.push(format!("[{origin}] {reason}"));
            }
            _ => output.statements += 1,
        }
    }
}
