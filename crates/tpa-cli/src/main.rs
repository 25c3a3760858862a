//! Tournament Possibilities Analyzer CLI.

mod cli;
mod commands;
mod data;
mod error;
mod output;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> error::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::ApplyResult(args) => commands::run_apply_result(args, cli.format),
        Commands::Recalc(args) => commands::run_recalc(args, cli.format),
        Commands::Analyze(args) => commands::run_analyze(args, cli.format),
    }
}
