//! Statistics & Path Analysis: derives the human-facing conclusions --
//! podium contenders, contrarian correct picks, championship-pick
//! distributions, and conditional ("if this team wins it all") and
//! per-championship-matchup scenarios -- from the analyzer's raw
//! per-outcome aggregates.

use std::collections::HashMap;

use serde::Serialize;

use tpa_core::matchup::Round;
use tpa_core::state::TournamentState;
use tpa_core::submission::Bracket;
use tpa_core::team::Region;

use crate::analyzer::AnalyzerResult;
use crate::scorer::region_of;

/// A bracket that still has some chance of finishing on the podium,
/// sorted descending by podium percentage (participant name breaks ties).
#[derive(Debug, Clone)]
pub struct PodiumContender {
    pub bracket_id: String,
    pub participant_name: String,
    pub entry_number: u32,
    pub current_score: u32,
    pub place_percentages: PlacePercentages,
    pub min_place: usize,
    pub max_place: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct PlacePercentages {
    pub first: f64,
    pub second: f64,
    pub third: f64,
    pub podium: f64,
}

pub fn podium_contenders(brackets: &[Bracket], analyzer: &AnalyzerResult) -> Vec<PodiumContender> {
    let mut contenders: Vec<PodiumContender> = brackets
        .iter()
        .filter_map(|b| {
            let acc = analyzer.bracket_stats.get(&b.id)?;
            let podium = acc.podium_percentage();
            if podium <= 0.0 {
                return None;
            }
            Some(PodiumContender {
                bracket_id: b.id.clone(),
                participant_name: b.participant_name.clone(),
                entry_number: b.entry_number,
                current_score: b.score,
                place_percentages: PlacePercentages {
                    first: acc.place_percentage(1),
                    second: acc.place_percentage(2),
                    third: acc.place_percentage(3),
                    podium,
                },
                min_place: acc.min_place,
                max_place: acc.max_place,
            })
        })
        .collect();

    contenders.sort_by(|a, b| {
        b.place_percentages
            .podium
            .partial_cmp(&a.place_percentages.podium)
            .unwrap()
            .then_with(|| a.participant_name.cmp(&b.participant_name))
    });
    contenders
}

pub fn players_with_no_podium_chance(brackets: &[Bracket], analyzer: &AnalyzerResult) -> usize {
    brackets
        .iter()
        .filter(|b| {
            analyzer
                .bracket_stats
                .get(&b.id)
                .map(|acc| acc.podium_percentage() <= 0.0)
                .unwrap_or(true)
        })
        .count()
}

pub fn players_with_win_chance(brackets: &[Bracket], analyzer: &AnalyzerResult) -> usize {
    brackets
        .iter()
        .filter(|b| {
            analyzer
                .bracket_stats
                .get(&b.id)
                .map(|acc| acc.win_percentage() > 0.0)
                .unwrap_or(false)
        })
        .count()
}

/// Histogram over brackets' round-6 (championship) winner predictions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionshipPick {
    pub team: String,
    pub count: usize,
    pub percentage: f64,
}

pub fn championship_picks(brackets: &[Bracket]) -> Vec<ChampionshipPick> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for bracket in brackets {
        if let Some(pick) = bracket.championship_pick() {
            let label = format!("{} ({})", pick.winner, pick.winner_seed);
            *counts.entry(label).or_insert(0) += 1;
        }
    }
    let total = brackets.len().max(1);
    let mut picks: Vec<ChampionshipPick> = counts
        .into_iter()
        .map(|(team, count)| ChampionshipPick {
            team,
            count,
            percentage: count as f64 / total as f64 * 100.0,
        })
        .collect();
    picks.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.team.cmp(&b.team)));
    picks
}

/// The three "most common bracket shape" histograms surfaced to
/// participants: most-picked Sweet 16 results, most-picked Final Four
/// fields, and most-picked championship pairings. Each is capped at the
/// top 10 most frequent entries.
#[derive(Debug, Clone, Default)]
pub struct BracketOutcomes {
    pub sweet16: Vec<(String, usize)>,
    pub final_four: Vec<(String, usize)>,
    pub championship: Vec<(String, usize)>,
}

const TOP_N: usize = 10;

pub fn bracket_outcomes(brackets: &[Bracket]) -> BracketOutcomes {
    let mut sweet16_counts: HashMap<String, usize> = HashMap::new();
    let mut final_four_counts: HashMap<String, usize> = HashMap::new();
    let mut championship_counts: HashMap<String, usize> = HashMap::new();

    for bracket in brackets {
        for pick in bracket.picks.values().filter(|p| p.round == Round::SWEET_16) {
            let key = format!("{}:{}", pick.matchup_id.0, pick.winner);
            *sweet16_counts.entry(key).or_insert(0) += 1;
        }

        let mut final_four_teams: Vec<&str> = bracket
            .picks
            .values()
            .filter(|p| p.round == Round::ELITE_8)
            .map(|p| p.winner.as_str())
            .collect();
        if !final_four_teams.is_empty() {
            final_four_teams.sort_unstable();
            *final_four_counts.entry(final_four_teams.join(", ")).or_insert(0) += 1;
        }

        let mut championship_teams: Vec<&str> = bracket
            .picks
            .values()
            .filter(|p| p.round == Round::FINAL_FOUR)
            .map(|p| p.winner.as_str())
            .collect();
        if !championship_teams.is_empty() {
            championship_teams.sort_unstable();
            *championship_counts.entry(championship_teams.join(", ")).or_insert(0) += 1;
        }
    }

    BracketOutcomes {
        sweet16: top_n(sweet16_counts),
        final_four: top_n(final_four_counts),
        championship: top_n(championship_counts),
    }
}

fn top_n(counts: HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(TOP_N);
    entries
}

/// A completed matchup that most brackets got wrong -- the winner was
/// correctly predicted by fewer than 10% of submissions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RareCorrectPick {
    pub matchup_id: u32,
    pub round: u8,
    pub winner: String,
    pub region: String,
    pub teams: (String, String),
    pub correct_picks: usize,
    pub total_picks: usize,
    pub percentage: f64,
    pub correct_picks_by_users: Vec<(String, String)>,
}

pub fn rare_correct_picks(state: &TournamentState, brackets: &[Bracket]) -> Vec<RareCorrectPick> {
    let total_picks = brackets.len();
    if total_picks == 0 {
        return Vec::new();
    }

    let mut rare = Vec::new();
    for matchup in state.graph.all() {
        let (Some(winner), Some(winner_seed)) = (&matchup.winner, matchup.winner_seed) else {
            continue;
        };

        let correct: Vec<(String, String)> = brackets
            .iter()
            .filter(|b| {
                b.pick_for(matchup.id)
                    .map(|pick| pick.winner == *winner && pick.winner_seed == winner_seed)
                    .unwrap_or(false)
            })
            .map(|b| (b.id.clone(), b.participant_name.clone()))
            .collect();

        let percentage = correct.len() as f64 / total_picks as f64 * 100.0;
        if percentage > 0.0 && percentage < 10.0 {
            let region = match region_of(matchup) {
                tpa_core::team::RegionOrFinalFour::Region(r) => format!("{r:?}"),
                tpa_core::team::RegionOrFinalFour::FinalFour => "FinalFour".to_string(),
            };
            rare.push(RareCorrectPick {
                matchup_id: matchup.id.0,
                round: matchup.round.0,
                winner: winner.clone(),
                region,
                teams: (
                    matchup.team_a.clone().unwrap_or_default(),
                    matchup.team_b.clone().unwrap_or_default(),
                ),
                correct_picks: correct.len(),
                total_picks,
                percentage,
                correct_picks_by_users: correct,
            });
        }
    }

    rare.sort_by_key(|r| r.matchup_id);
    rare
}

/// How a bracket's podium chance would change under the hypothesis that
/// one specific active team wins the championship.
#[derive(Debug, Clone)]
pub struct PodiumChange {
    pub bracket_id: String,
    pub participant_name: String,
    pub podium_if_team_wins: f64,
    pub podium_change: f64,
}

#[derive(Debug, Clone)]
pub struct TeamPath {
    pub seed: u8,
    pub region: String,
    pub podium_changes: Vec<PodiumChange>,
}

/// Infers a team's region by scanning the bracket graph for any rounds
/// 1-4 matchup it participated in (as a participant or a recorded
/// winner); falls back to the seed-band convention when the team never
/// appears with an explicit region (e.g. a synthetic fixture).
fn team_region(state: &TournamentState, team: &str, seed: u8) -> Region {
    state
        .graph
        .all()
        .filter(|m| m.round.uses_region_bucket())
        .find(|m| {
            m.team_a.as_deref() == Some(team)
                || m.team_b.as_deref() == Some(team)
                || m.winner.as_deref() == Some(team)
        })
        .and_then(|m| m.region)
        .unwrap_or_else(|| Region::from_seed_band(seed as u16))
}

pub fn team_paths(
    state: &TournamentState,
    brackets: &[Bracket],
    analyzer: &AnalyzerResult,
) -> HashMap<String, TeamPath> {
    let mut paths = HashMap::new();

    for team in state.active_teams() {
        let Some(group) = analyzer.by_champion.get(team) else {
            continue;
        };
        let Some(status) = state.teams.get(team) else {
            continue;
        };

        let podium_changes: Vec<PodiumChange> = brackets
            .iter()
            .map(|b| {
                let unconditional = analyzer
                    .bracket_stats
                    .get(&b.id)
                    .map(|acc| acc.podium_percentage())
                    .unwrap_or(0.0);
                let conditional = group.podium_percentage(&b.id);
                PodiumChange {
                    bracket_id: b.id.clone(),
                    participant_name: b.participant_name.clone(),
                    podium_if_team_wins: conditional,
                    podium_change: conditional - unconditional,
                }
            })
            .collect();

        paths.insert(
            team.to_string(),
            TeamPath {
                seed: status.seed,
                region: format!("{:?}", team_region(state, team, status.seed)),
                podium_changes,
            },
        );
    }

    paths
}

/// One valid championship pairing between two Final Four teams whose
/// regions sit on opposite halves of the bracket, with the per-winner
/// bracket impact (top 5 brackets by best average finishing position).
#[derive(Debug, Clone)]
pub struct ChampionshipScenario {
    pub team_a: String,
    pub team_b: String,
    pub outcomes: Vec<ScenarioOutcome>,
}

#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub winner: String,
    pub bracket_impacts: Vec<BracketImpact>,
}

#[derive(Debug, Clone)]
pub struct BracketImpact {
    pub bracket_id: String,
    pub participant_name: String,
    pub avg_place: f64,
}

const SCENARIO_TOP_N: usize = 5;

/// The Final Four matchups' Elite Eight feeder regions, one `HashSet` per
/// matchup -- two regions sharing a set meet in the semifinal and can
/// never meet in the championship.
fn final_four_sides(state: &TournamentState) -> Vec<std::collections::HashSet<Region>> {
    state
        .graph
        .round(Round::FINAL_FOUR)
        .map(|ff| {
            state
                .graph
                .round(Round::ELITE_8)
                .filter(|e8| e8.next_matchup_id == Some(ff.id))
                .filter_map(|e8| e8.region)
                .collect()
        })
        .collect()
}

fn side_index(sides: &[std::collections::HashSet<Region>], region: Region) -> Option<usize> {
    sides.iter().position(|side| side.contains(&region))
}

pub fn championship_scenarios(
    state: &TournamentState,
    brackets: &[Bracket],
    analyzer: &AnalyzerResult,
) -> Vec<ChampionshipScenario> {
    if state.current_round() < Round::FINAL_FOUR {
        return Vec::new();
    }

    let sides = final_four_sides(state);

    let final_four_teams: Vec<(String, u8)> = state
        .graph
        .round(Round::FINAL_FOUR)
        .flat_map(|m| {
            [
                m.team_a.clone().zip(m.team_a_seed),
                m.team_b.clone().zip(m.team_b_seed),
            ]
        })
        .flatten()
        .collect();

    let mut scenarios = Vec::new();
    for i in 0..final_four_teams.len() {
        for j in (i + 1)..final_four_teams.len() {
            let (a, a_seed) = &final_four_teams[i];
            let (b, b_seed) = &final_four_teams[j];

            let a_region = team_region(state, a, *a_seed);
            let b_region = team_region(state, b, *b_seed);
            let a_side = side_index(&sides, a_region);
            let b_side = side_index(&sides, b_region);

            if a_side.is_none() || a_side == b_side {
                continue;
            }

            let pair_key = if a <= b {
                format!("{a}|{b}")
            } else {
                format!("{b}|{a}")
            };
            let Some(by_winner) = analyzer.by_finalist_pair.get(&pair_key) else {
                continue;
            };

            let outcomes: Vec<ScenarioOutcome> = [a, b]
                .into_iter()
                .filter_map(|winner| {
                    let group = by_winner.get(winner)?;
                    let mut impacts: Vec<BracketImpact> = brackets
                        .iter()
                        .filter_map(|br| {
                            let avg_place = group.avg_place(&br.id)?;
                            Some(BracketImpact {
                                bracket_id: br.id.clone(),
                                participant_name: br.participant_name.clone(),
                                avg_place,
                            })
                        })
                        .collect();
                    impacts.sort_by(|x, y| {
                        x.avg_place
                            .partial_cmp(&y.avg_place)
                            .unwrap()
                            .then_with(|| x.participant_name.cmp(&y.participant_name))
                    });
                    impacts.truncate(SCENARIO_TOP_N);
                    Some(ScenarioOutcome {
                        winner: winner.clone(),
                        bracket_impacts: impacts,
                    })
                })
                .collect();

            scenarios.push(ChampionshipScenario {
                team_a: a.clone(),
                team_b: b.clone(),
                outcomes,
            });
        }
    }

    scenarios
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap as StdHashMap, HashSet};

    use tpa_core::matchup::{Matchup, MatchupId};
    use tpa_core::state::ScoringConfig;
    use tpa_core::submission::MatchupPick;
    use tpa_core::{BracketGraph, TeamStatus};

    use super::*;

    fn decided_matchup(id: u32, round: Round, region: Option<Region>, winner: &str, seed: u8, loser: &str, loser_seed: u8) -> Matchup {
        Matchup {
            id: MatchupId(id),
            round,
            region,
            team_a: Some(winner.to_string()),
            team_a_seed: Some(seed),
            team_b: Some(loser.to_string()),
            team_b_seed: Some(loser_seed),
            winner: Some(winner.to_string()),
            winner_seed: Some(seed),
            next_matchup_id: None,
            position: 0,
            score: None,
        }
    }

    fn bracket_with_pick(id: &str, name: &str, matchup_id: u32, round: Round, winner: &str, seed: u8) -> Bracket {
        let mut picks = StdHashMap::new();
        picks.insert(
            MatchupId(matchup_id),
            MatchupPick {
                matchup_id: MatchupId(matchup_id),
                round,
                winner: winner.to_string(),
                winner_seed: seed,
            },
        );
        Bracket {
            id: id.to_string(),
            participant_name: name.to_string(),
            entry_number: 1,
            user_email: format!("{name}@example.com"),
            picks,
            is_locked: true,
            score: 0,
            edit_token: "tok".into(),
        }
    }

    #[test]
    fn test_rare_correct_picks_respects_ten_percent_band() {
        let matchup = decided_matchup(1, Round::FIRST, Some(Region::South), "Norfolk State", 15, "Duke", 2);
        let state = TournamentState {
            year: 2026,
            graph: BracketGraph::new(vec![matchup]),
            teams: StdHashMap::new(),
            completed_rounds: HashSet::new(),
            scoring_config: ScoringConfig::default(),
            last_updated: "2026-01-01T00:00:00Z".into(),
        };

        // 20/200 = 10.0% exactly -- not strictly below the threshold, excluded.
        let mut brackets: Vec<Bracket> = (0..180)
            .map(|i| bracket_with_pick(&format!("b{i}"), &format!("p{i}"), 1, Round::FIRST, "Duke", 2))
            .collect();
        brackets.extend(
            (0..20).map(|i| bracket_with_pick(&format!("r{i}"), &format!("q{i}"), 1, Round::FIRST, "Norfolk State", 15)),
        );
        assert!(rare_correct_picks(&state, &brackets).is_empty());

        // Drop one correct pick to 19/200 = 9.5% -- now included.
        brackets.pop();
        let rare = rare_correct_picks(&state, &brackets);
        assert_eq!(rare.len(), 1);
        assert_eq!(rare[0].correct_picks, 19);
        assert_eq!(rare[0].total_picks, 199);
        assert!((rare[0].percentage - 9.5477).abs() < 1e-3);
    }

    #[test]
    fn test_championship_picks_histogram() {
        let brackets = vec![
            bracket_with_pick("b1", "Ada", 63, Round::CHAMPIONSHIP, "Duke", 1),
            bracket_with_pick("b2", "Grace", 63, Round::CHAMPIONSHIP, "Duke", 1),
            bracket_with_pick("b3", "Alan", 63, Round::CHAMPIONSHIP, "Houston", 1),
        ];
        let picks = championship_picks(&brackets);
        assert_eq!(picks[0].team, "Duke (1)");
        assert_eq!(picks[0].count, 2);
    }
}
