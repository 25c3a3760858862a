//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "tpa")]
#[command(author, version, about = "Tournament Possibilities Analyzer")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (table or json)
    #[arg(long, global = true, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Default, Copy)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply a decided (or interim) game result to the bracket graph
    ApplyResult(ApplyResultArgs),

    /// Recompute every submitted bracket's score against the current results
    Recalc(RecalcArgs),

    /// Run the possibility-space analysis over the remaining tournament
    Analyze(AnalyzeArgs),
}

#[derive(Parser)]
pub struct ApplyResultArgs {
    /// Id of the matchup being decided
    pub matchup_id: u32,

    /// Name of the winning team
    pub winner: String,

    /// Seed of the winning team
    #[arg(long)]
    pub seed: u8,

    /// Final score as "A:B" (points for the matchup's team_a:team_b)
    #[arg(long)]
    pub score: Option<String>,

    /// Record the result as still in progress rather than final
    #[arg(long)]
    pub pending: bool,

    /// Path to tournament state JSON file (default: embedded fixture)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Write the updated tournament state back to this path (default: --data, or nowhere)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Parser)]
pub struct RecalcArgs {
    /// Path to tournament state JSON file (default: embedded fixture)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Path to bracket submissions JSON file (default: embedded fixture)
    #[arg(long)]
    pub brackets: Option<PathBuf>,
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Path to tournament state JSON file (default: embedded fixture)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Path to bracket submissions JSON file (default: embedded fixture)
    #[arg(long)]
    pub brackets: Option<PathBuf>,

    /// Show at most N podium contenders (default: 10)
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Include each shown bracket's per-round/per-region score breakdown
    #[arg(long)]
    pub detailed: bool,
}
