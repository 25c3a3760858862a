//! Output formatting for table and JSON modes.

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;

use tpa_core::matchup::MatchupId;
use tpa_core::state::TournamentState;
use tpa_core::submission::Bracket;
use tpa_engine::report::AnalysisReport;
use tpa_engine::scorer;

use crate::cli::OutputFormat;

/// Output handler based on format selection.
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    pub fn print_json<T: Serialize>(&self, data: &T) {
        println!("{}", serde_json::to_string_pretty(data).unwrap());
    }
}

/// JSON output for `apply-result`.
#[derive(Serialize)]
pub struct ApplyResultJsonOutput<'a> {
    pub matchup_id: u32,
    pub winner: &'a str,
    pub completed: bool,
    pub displaced_successors: Vec<u32>,
}

/// Render `apply-result`'s outcome as a table.
pub fn render_apply_result_table(matchup_id: u32, winner: &str, completed: bool, displaced: &[MatchupId]) {
    println!();
    println!("Applied result to matchup {matchup_id}");
    println!("{}", "=".repeat(40));
    println!("Winner: {winner}");
    println!("Status: {}", if completed { "final" } else { "in progress" });

    if completed {
        if displaced.is_empty() {
            println!("No successor matchups were displaced.");
        } else {
            let ids: Vec<String> = displaced.iter().map(|id| id.0.to_string()).collect();
            println!("Displaced successor matchups: {}", ids.join(", "));
        }
    }
    println!();
}

/// Render `recalc`'s score changes as a table.
pub fn render_recalc_table(changes: &[scorer::ScoreChange]) {
    println!();
    println!("Score Recalculation");
    println!("{}", "=".repeat(50));

    if changes.is_empty() {
        println!("No bracket scores changed.");
        println!();
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Participant"),
            Cell::new("Old Score"),
            Cell::new("New Score"),
        ]);

    for change in changes {
        table.add_row(vec![
            Cell::new(&change.participant_name),
            Cell::new(change.old_score),
            Cell::new(change.new_score),
        ]);
    }

    println!("{table}");
    println!("{} of {} brackets changed", changes.len(), changes.len());
    println!();
}

/// Render the full `AnalysisReport` as a table.
pub fn render_analysis_table(
    analysis: &AnalysisReport,
    top_n: usize,
    detailed: bool,
    state: &TournamentState,
    brackets: &[Bracket],
) {
    println!();
    println!(
        "Tournament Possibilities Analysis -- {} ({})",
        analysis.round_name, analysis.round_progress
    );
    println!("{}", "=".repeat(60));
    println!(
        "{} brackets, {} possible outcomes remaining",
        analysis.total_brackets, analysis.total_possible_outcomes
    );
    println!(
        "{} brackets with no podium chance, {} with a win chance",
        analysis.players_with_no_podium_chance, analysis.players_with_win_chance
    );
    if analysis.cancelled {
        println!("NOTE: analysis was cancelled before covering every possible outcome.");
    }
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Rank"),
            Cell::new("Participant"),
            Cell::new("Score"),
            Cell::new("Win %"),
            Cell::new("Podium %"),
            Cell::new("Best / Worst"),
        ]);

    for (i, contender) in analysis.podium_contenders.iter().take(top_n).enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&contender.participant_name),
            Cell::new(contender.current_score),
            Cell::new(format!("{:.2}%", contender.place_percentages.first)),
            Cell::new(format!("{:.2}%", contender.place_percentages.podium)),
            Cell::new(format!("{} / {}", contender.min_place, contender.max_place)),
        ]);
    }

    println!("{table}");
    println!();

    if detailed {
        for contender in analysis.podium_contenders.iter().take(top_n) {
            if let Some(bracket) = brackets.iter().find(|b| b.id == contender.id) {
                render_score_detail_table(&contender.participant_name, bracket, state);
            }
        }
    }

    println!("Championship Picks");
    println!("{}", "-".repeat(40));
    let mut pick_table = Table::new();
    pick_table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![Cell::new("Team"), Cell::new("Picks"), Cell::new("Share")]);
    for pick in &analysis.championship_picks {
        pick_table.add_row(vec![
            Cell::new(&pick.team),
            Cell::new(pick.count),
            Cell::new(format!("{:.1}%", pick.percentage)),
        ]);
    }
    println!("{pick_table}");
    println!();

    if !analysis.rare_correct_picks.is_empty() {
        println!("Rare Correct Picks (fewer than 10% of brackets got it right)");
        println!("{}", "-".repeat(40));
        let mut rare_table = Table::new();
        rare_table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Matchup"),
                Cell::new("Winner"),
                Cell::new("Region"),
                Cell::new("Correct"),
                Cell::new("Share"),
            ]);
        for pick in &analysis.rare_correct_picks {
            rare_table.add_row(vec![
                Cell::new(pick.matchup_id),
                Cell::new(&pick.winner),
                Cell::new(&pick.region),
                Cell::new(format!("{}/{}", pick.correct_picks, pick.total_picks)),
                Cell::new(format!("{:.1}%", pick.percentage)),
            ]);
        }
        println!("{rare_table}");
        println!();
    }

    if !analysis.warnings.is_empty() {
        println!("Warnings:");
        for warning in &analysis.warnings {
            println!("  - {warning}");
        }
        println!();
    }
}

fn render_score_detail_table(participant_name: &str, bracket: &Bracket, state: &TournamentState) {
    let detail = scorer::score_detailed(bracket, state);

    println!("Score breakdown for {participant_name}");
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![Cell::new("Round"), Cell::new("Points")]);

    let mut rounds: Vec<(&u8, &u32)> = detail.round_scores.iter().collect();
    rounds.sort_by_key(|(round, _)| **round);
    for (round, points) in rounds {
        table.add_row(vec![Cell::new(round), Cell::new(points)]);
    }
    table.add_row(vec![Cell::new("Total"), Cell::new(detail.total())]);
    println!("{table}");
    println!();
}
