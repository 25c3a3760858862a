//! `tpa apply-result` -- apply one decided or interim game result.

use tpa_core::matchup::MatchupId;
use tpa_engine::propagator;

use crate::cli::{ApplyResultArgs, OutputFormat};
use crate::data;
use crate::error::{CliError, Result};
use crate::output::{self, Output};

fn parse_score(raw: &str) -> Result<(u16, u16)> {
    let (a, b) = raw
        .split_once(':')
        .ok_or_else(|| CliError::InvalidScoreFormat(raw.to_string()))?;
    let a: u16 = a.parse().map_err(|_| CliError::InvalidScoreFormat(raw.to_string()))?;
    let b: u16 = b.parse().map_err(|_| CliError::InvalidScoreFormat(raw.to_string()))?;
    Ok((a, b))
}

pub fn run_apply_result(args: &ApplyResultArgs, format: OutputFormat) -> Result<()> {
    let mut state = data::load_tournament(args.data.as_deref())?;
    let score = args.score.as_deref().map(parse_score).transpose()?;

    let displaced = propagator::apply_result(
        &mut state,
        MatchupId(args.matchup_id),
        &args.winner,
        args.seed,
        score,
        !args.pending,
    )?;

    let out_path = args.out.as_deref().or(args.data.as_deref());
    data::save_tournament(&state, out_path)?;

    let output = Output::new(format);
    if output.is_json() {
        output.print_json(&output::ApplyResultJsonOutput {
            matchup_id: args.matchup_id,
            winner: &args.winner,
            completed: !args.pending,
            displaced_successors: displaced.iter().map(|id| id.0).collect(),
        });
    } else {
        output::render_apply_result_table(args.matchup_id, &args.winner, !args.pending, &displaced);
    }

    Ok(())
}
