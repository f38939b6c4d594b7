mod app;
mod commands;
mod output;

use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Show flowscope info+ on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::new()
            .filter_module("flowscope", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::Compile {
            path,
            indent,
            no_trace,
        } => commands::compile::run(path, *indent, *no_trace, &cli.global),
        Command::Eval { path, vars, expect } => {
            commands::eval::run(path, vars.as_deref(), expect.as_deref(), &cli.global)
        }
        Command::Analyze { path, format } => commands::analyze::run(path, format, &cli.global),
    }
}
