//! Runs the full analysis pipeline against the bundled tournament fixture
//! and prints a short summary of the result.

use tpa_core::state::TournamentState;
use tpa_core::submission::Bracket;

const TOURNAMENT_JSON: &str = include_str!("../../../data/tournament.json");
const BRACKETS_JSON: &str = include_str!("../../../data/brackets.json");

fn main() {
    let state: TournamentState =
        serde_json::from_str(TOURNAMENT_JSON).expect("embedded tournament fixture is valid JSON");
    let brackets: Vec<Bracket> =
        serde_json::from_str(BRACKETS_JSON).expect("embedded brackets fixture is valid JSON");

    let report = match tpa_engine::report::analyze(&state, &brackets, None) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("analysis unavailable: {err}");
            return;
        }
    };

    println!("{} ({})", report.round_name, report.round_progress);
    println!(
        "{} brackets, {} possible outcomes remaining",
        report.total_brackets, report.total_possible_outcomes
    );
    println!(
        "{} brackets still have a podium chance, {} still have a win chance",
        report.total_brackets - report.players_with_no_podium_chance,
        report.players_with_win_chance
    );

    for contender in report.podium_contenders.iter().take(5) {
        println!(
            "  {:<20} podium {:>5.1}%  win {:>5.1}%",
            contender.participant_name, contender.place_percentages.podium, contender.place_percentages.first
        );
    }

    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
}
