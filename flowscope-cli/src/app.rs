use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// flowscope - evaluate, analyze and compile flowchart algorithm diagrams
#[derive(Debug, Parser)]
#[command(name = "flowscope", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile a diagram snapshot into structured source code.
    Compile {
        /// Path to the diagram JSON snapshot.
        #[arg(value_name = "DIAGRAM")]
        path: PathBuf,

        /// Spaces per nesting level.
        #[arg(long, value_name = "N", default_value_t = 2)]
        indent: usize,

        /// Omit the `# Node: <id>` comment before each statement.
        #[arg(long)]
        no_trace: bool,
    },

    /// Evaluate an expression snapshot.
    Eval {
        /// Path to the expression JSON object.
        #[arg(value_name = "EXPRESSION")]
        path: PathBuf,

        /// JSON array of valued variables visible to the expression.
        #[arg(long, value_name = "VARS")]
        vars: Option<PathBuf>,

        /// Expected type of a plain value (string, integer, float, or boolean).
        /// Rejected for assignments and for comparisons unless `boolean`.
        #[arg(long, value_name = "TYPE")]
        expect: Option<String>,
    },

    /// Show the control-flow graph, dominators, and natural loops of a diagram.
    Analyze {
        /// Path to the diagram JSON snapshot.
        #[arg(value_name = "DIAGRAM")]
        path: PathBuf,

        /// Output format: text, dot, or json.
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}
