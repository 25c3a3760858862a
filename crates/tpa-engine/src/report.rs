//! AnalysisReport Assembler: the single immutable value the core hands
//! back to its callers, packaging the enumerator/analyzer/statistics
//! stages behind the stable field names external consumers depend on.

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;

use chrono::Utc;
use serde::Serialize;

use tpa_core::error::{CoreError, Result};
use tpa_core::matchup::Round;
use tpa_core::state::TournamentState;
use tpa_core::submission::Bracket;

use crate::analyzer::{self, AnalyzerResult};
use crate::enumerator;
use crate::statistics::{self, ChampionshipPick, RareCorrectPick, TeamPath};

/// Which of the four analysis-eligible stages the tournament is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Sweet16,
    Elite8,
    Final4,
    Championship,
}

impl Stage {
    fn from_round(round: Round) -> Self {
        match round.0 {
            3 => Stage::Sweet16,
            4 => Stage::Elite8,
            5 => Stage::Final4,
            _ => Stage::Championship,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacePercentagesReport {
    #[serde(rename = "1")]
    pub first: f64,
    #[serde(rename = "2")]
    pub second: f64,
    #[serde(rename = "3")]
    pub third: f64,
    pub podium: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodiumContenderReport {
    pub id: String,
    pub participant_name: String,
    pub entry_number: u32,
    pub current_score: u32,
    pub place_percentages: PlacePercentagesReport,
    pub min_place: usize,
    pub max_place: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketResultReport {
    pub participant_name: String,
    pub entry_number: u32,
    pub current_score: u32,
    pub min_score: u32,
    pub max_score: u32,
    pub avg_score: f64,
    pub win_percentage: f64,
    pub place_percentages: PlacePercentagesReport,
    pub min_place: usize,
    pub max_place: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketOutcomesReport {
    pub sweet16: Vec<(String, usize)>,
    pub final_four: Vec<(String, usize)>,
    pub championship: Vec<(String, usize)>,
}

impl From<BracketOutcomes> for BracketOutcomesReport {
    fn from(o: BracketOutcomes) -> Self {
        Self {
            sweet16: o.sweet16,
            final_four: o.final_four,
            championship: o.championship,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodiumChangeReport {
    pub bracket_id: String,
    pub participant_name: String,
    pub podium_change: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPathReport {
    pub seed: u8,
    pub region: String,
    pub wins_championship: WinsChampionship,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinsChampionship {
    pub podium_changes: Vec<PodiumChangeReport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketImpactReport {
    pub bracket_id: String,
    pub participant_name: String,
    pub avg_place: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutcomeReport {
    pub winner: String,
    pub bracket_impacts: Vec<BracketImpactReport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionshipScenarioReport {
    pub matchup: (String, String),
    pub outcomes: Vec<ScenarioOutcomeReport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathAnalysisReport {
    pub team_paths: HashMap<String, TeamPathReport>,
    pub championship_scenarios: Vec<ChampionshipScenarioReport>,
}

/// The single value the core hands back to its callers: every decided and
/// residual-outcome-derived conclusion about the tournament, plus a
/// `warnings` channel for per-bracket issues that did not abort analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub timestamp: String,
    pub stage: Stage,
    pub current_round: u8,
    pub round_name: String,
    pub round_progress: String,
    pub total_brackets: usize,
    pub total_possible_outcomes: usize,
    pub podium_contenders: Vec<PodiumContenderReport>,
    pub players_with_no_podium_chance: usize,
    pub players_with_win_chance: usize,
    pub championship_picks: Vec<ChampionshipPick>,
    pub bracket_outcomes: BracketOutcomesReport,
    pub rare_correct_picks: Vec<RareCorrectPick>,
    pub path_analysis: PathAnalysisReport,
    pub bracket_results: HashMap<String, BracketResultReport>,
    pub warnings: Vec<String>,
    pub cancelled: bool,
}

/// Drops brackets with an incomplete prediction tree (no picks at all, or
/// no championship pick) before analysis, recording a warning for each.
/// The scorer tolerates missing individual picks fine; what it cannot
/// usefully analyze is a bracket with no predictions whatsoever.
fn validate_brackets(brackets: &[Bracket]) -> (Vec<Bracket>, Vec<String>) {
    let mut valid = Vec::with_capacity(brackets.len());
    let mut warnings = Vec::new();
    for bracket in brackets {
        if bracket.picks.is_empty() || bracket.championship_pick().is_none() {
            warnings.push(format!(
                "bracket '{}' ({}) has an incomplete prediction tree; dropped from analysis",
                bracket.id, bracket.participant_name
            ));
        } else {
            valid.push(bracket.clone());
        }
    }
    (valid, warnings)
}

fn to_place_percentages(p: statistics::PlacePercentages) -> PlacePercentagesReport {
    PlacePercentagesReport {
        first: p.first,
        second: p.second,
        third: p.third,
        podium: p.podium,
    }
}

/// Runs the full `(TournamentState, Brackets) -> AnalysisReport` pipeline:
/// enumerate the residual outcome space, score every surviving bracket
/// against every outcome, and derive the statistics and path analyses on
/// top. `state` is read-only here; callers that need to apply new game
/// results do so first via [`crate::propagator::apply_result`].
///
/// Fails with [`CoreError::NeedsSweet16`] before the Sweet 16 -- the
/// enumerator's guard -- which callers should treat as the documented
/// `{error: "needsSweet16", activeTeams}` precondition response rather
/// than an internal failure.
pub fn analyze(
    state: &TournamentState,
    brackets: &[Bracket],
    cancel: Option<&AtomicBool>,
) -> Result<AnalysisReport> {
    let (valid_brackets, mut warnings) = validate_brackets(brackets);

    let outcomes = enumerator::enumerate(state)?;

    let championship_id = state
        .graph
        .round(Round::CHAMPIONSHIP)
        .next()
        .map(|m| m.id)
        .ok_or_else(|| CoreError::Internal("no championship matchup in graph".to_string()))?;

    let analyzer_result: AnalyzerResult =
        analyzer::analyze_outcomes(state, &valid_brackets, &outcomes, championship_id, cancel);

    if analyzer_result.cancelled {
        warnings.push(format!(
            "analysis cancelled after {} of {} outcomes",
            analyzer_result.processed_outcomes, analyzer_result.total_outcomes
        ));
    }

    let podium_contenders: Vec<PodiumContenderReport> =
        statistics::podium_contenders(&valid_brackets, &analyzer_result)
            .into_iter()
            .map(|c| PodiumContenderReport {
                id: c.bracket_id,
                participant_name: c.participant_name,
                entry_number: c.entry_number,
                current_score: c.current_score,
                place_percentages: to_place_percentages(c.place_percentages),
                min_place: c.min_place,
                max_place: c.max_place,
            })
            .collect();

    let players_with_no_podium_chance =
        statistics::players_with_no_podium_chance(&valid_brackets, &analyzer_result);
    let players_with_win_chance = statistics::players_with_win_chance(&valid_brackets, &analyzer_result);
    let championship_picks: Vec<ChampionshipPick> = statistics::championship_picks(&valid_brackets);
    let bracket_outcomes: BracketOutcomesReport = statistics::bracket_outcomes(&valid_brackets).into();
    let rare_correct_picks: Vec<RareCorrectPick> = statistics::rare_correct_picks(state, &valid_brackets);

    let team_paths: HashMap<String, TeamPathReport> =
        statistics::team_paths(state, &valid_brackets, &analyzer_result)
            .into_iter()
            .map(|(team, path): (String, TeamPath)| {
                (
                    team,
                    TeamPathReport {
                        seed: path.seed,
                        region: path.region,
                        wins_championship: WinsChampionship {
                            podium_changes: path
                                .podium_changes
                                .into_iter()
                                .map(|c| PodiumChangeReport {
                                    bracket_id: c.bracket_id,
                                    participant_name: c.participant_name,
                                    podium_change: c.podium_change,
                                })
                                .collect(),
                        },
                    },
                )
            })
            .collect();

    let championship_scenarios: Vec<ChampionshipScenarioReport> =
        statistics::championship_scenarios(state, &valid_brackets, &analyzer_result)
            .into_iter()
            .map(|s| ChampionshipScenarioReport {
                matchup: (s.team_a, s.team_b),
                outcomes: s
                    .outcomes
                    .into_iter()
                    .map(|o| ScenarioOutcomeReport {
                        winner: o.winner,
                        bracket_impacts: o
                            .bracket_impacts
                            .into_iter()
                            .map(|i| BracketImpactReport {
                                bracket_id: i.bracket_id,
                                participant_name: i.participant_name,
                                avg_place: i.avg_place,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

    let bracket_results: HashMap<String, BracketResultReport> = valid_brackets
        .iter()
        .filter_map(|bracket| {
            let acc = analyzer_result.bracket_stats.get(&bracket.id)?;
            Some((
                bracket.id.clone(),
                BracketResultReport {
                    participant_name: bracket.participant_name.clone(),
                    entry_number: bracket.entry_number,
                    current_score: bracket.score,
                    min_score: acc.min_score,
                    max_score: acc.max_score,
                    avg_score: acc.avg_score(),
                    win_percentage: acc.win_percentage(),
                    place_percentages: PlacePercentagesReport {
                        first: acc.place_percentage(1),
                        second: acc.place_percentage(2),
                        third: acc.place_percentage(3),
                        podium: acc.podium_percentage(),
                    },
                    min_place: acc.min_place,
                    max_place: acc.max_place,
                },
            ))
        })
        .collect();

    let current_round = state.current_round();
    let done = state.graph.round(current_round).filter(|m| m.winner.is_some()).count();
    let total = current_round.num_matches();

    Ok(AnalysisReport {
        timestamp: Utc::now().to_rfc3339(),
        stage: Stage::from_round(current_round),
        current_round: current_round.0,
        round_name: current_round.display_name().to_string(),
        round_progress: format!("{done}/{total} games complete"),
        total_brackets: valid_brackets.len(),
        total_possible_outcomes: outcomes.len(),
        podium_contenders,
        players_with_no_podium_chance,
        players_with_win_chance,
        championship_picks,
        bracket_outcomes,
        rare_correct_picks,
        path_analysis: PathAnalysisReport {
            team_paths,
            championship_scenarios,
        },
        bracket_results,
        warnings,
        cancelled: analyzer_result.cancelled,
    })
}
