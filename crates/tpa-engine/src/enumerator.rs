//! Outcome Enumerator: expands the residual, undecided portion of the
//! bracket into every possible way it could finish.

use std::collections::HashSet;

use tpa_core::error::{CoreError, Result};
use tpa_core::matchup::{Matchup, MatchupId, Round, Slot};
use tpa_core::state::TournamentState;

use crate::outcome::{Outcome, OutcomeWinner, ProjectedMatchup};

/// Enumerates every possible outcome of the remaining tournament.
///
/// Refuses with [`CoreError::NeedsSweet16`] while more than 16 teams remain
/// active -- the round-by-round 2^k expansion below that point would blow
/// past any outcome count worth materializing in full.
pub fn enumerate(state: &TournamentState) -> Result<Vec<Outcome>> {
    let active = state.active_teams().len();
    if active > 16 {
        return Err(CoreError::NeedsSweet16 { active_teams: active });
    }

    let current_round = state.current_round();
    let mut outcomes = vec![seed_outcome(state)];

    for r in current_round.0..=Round::CHAMPIONSHIP.0 {
        outcomes = process_round(state, outcomes, Round(r));
    }

    validate_champion_coverage(state, &outcomes)?;
    Ok(outcomes)
}

fn seed_outcome(state: &TournamentState) -> Outcome {
    let mut outcome = Outcome::new();

    for matchup in state.graph.all() {
        if let (Some(winner), Some(winner_seed)) = (&matchup.winner, matchup.winner_seed) {
            outcome.matchup_results.insert(
                matchup.id,
                OutcomeWinner {
                    winner: winner.clone(),
                    winner_seed,
                    round: matchup.round,
                },
            );
        } else if matchup.team_a.is_some() || matchup.team_b.is_some() {
            outcome.projected_matchups.insert(
                matchup.id,
                ProjectedMatchup {
                    round: matchup.round,
                    team_a: matchup.team_a.clone(),
                    team_a_seed: matchup.team_a_seed,
                    team_b: matchup.team_b.clone(),
                    team_b_seed: matchup.team_b_seed,
                },
            );
        }
    }

    // Forward-propagate every already-decided matchup's winner into its
    // successor's slot explicitly, rather than assuming the live graph
    // already carries it there -- keeps seeding self-consistent even a
    // step behind whatever the propagator last wrote.
    for matchup in state.graph.all() {
        if let (Some(winner), Some(winner_seed), Some(next_id)) =
            (&matchup.winner, matchup.winner_seed, matchup.next_matchup_id)
        {
            propagate(&mut outcome, matchup, next_id, winner, winner_seed);
        }
    }

    outcome
}

fn process_round(state: &TournamentState, outcomes: Vec<Outcome>, round: Round) -> Vec<Outcome> {
    outcomes
        .into_iter()
        .flat_map(|outcome| expand_outcome(state, outcome, round))
        .collect()
}

fn expand_outcome(state: &TournamentState, outcome: Outcome, round: Round) -> Vec<Outcome> {
    let candidates: Vec<&Matchup> = state
        .graph
        .round(round)
        .filter(|m| m.winner.is_none())
        .filter(|m| both_teams_known(&outcome, m))
        .collect();

    let k = candidates.len();
    if k == 0 {
        return vec![outcome];
    }

    (0u32..(1u32 << k))
        .map(|bits| {
            let mut next = outcome.clone();
            for (i, matchup) in candidates.iter().enumerate() {
                let bit = (bits >> i) & 1;
                let (winner, winner_seed) = team_for_bit(&next, matchup, bit);
                next.matchup_results.insert(
                    matchup.id,
                    OutcomeWinner {
                        winner: winner.clone(),
                        winner_seed,
                        round,
                    },
                );
                if let Some(next_id) = matchup.next_matchup_id {
                    propagate(&mut next, matchup, next_id, &winner, winner_seed);
                }
            }
            next
        })
        .collect()
}

fn both_teams_known(outcome: &Outcome, matchup: &Matchup) -> bool {
    if matchup.team_a.is_some() && matchup.team_b.is_some() {
        return true;
    }
    outcome
        .projected_matchups
        .get(&matchup.id)
        .map(|p| p.team_a.is_some() && p.team_b.is_some())
        .unwrap_or(false)
}

fn team_for_bit(outcome: &Outcome, matchup: &Matchup, bit: u32) -> (String, u8) {
    let (a, a_seed, b, b_seed) = if matchup.team_a.is_some() && matchup.team_b.is_some() {
        (
            matchup.team_a.clone(),
            matchup.team_a_seed,
            matchup.team_b.clone(),
            matchup.team_b_seed,
        )
    } else {
        let projected = outcome
            .projected_matchups
            .get(&matchup.id)
            .expect("candidate was filtered by both_teams_known");
        (
            projected.team_a.clone(),
            projected.team_a_seed,
            projected.team_b.clone(),
            projected.team_b_seed,
        )
    };

    if bit == 0 {
        (a.expect("candidate has team_a"), a_seed.expect("candidate has team_a_seed"))
    } else {
        (b.expect("candidate has team_b"), b_seed.expect("candidate has team_b_seed"))
    }
}

fn propagate(outcome: &mut Outcome, from: &Matchup, next_id: MatchupId, winner: &str, winner_seed: u8) {
    let slot = Slot::from_position(from.position);
    let entry = outcome.projected_matchups.entry(next_id).or_insert_with(|| ProjectedMatchup {
        round: from.round.next().unwrap_or(from.round),
        team_a: None,
        team_a_seed: None,
        team_b: None,
        team_b_seed: None,
    });
    match slot {
        Slot::A => {
            entry.team_a = Some(winner.to_string());
            entry.team_a_seed = Some(winner_seed);
        }
        Slot::B => {
            entry.team_b = Some(winner.to_string());
            entry.team_b_seed = Some(winner_seed);
        }
    }
}

/// Every currently-active team must appear as champion in at least one
/// outcome; a gap here means the propagation or expansion logic dropped a
/// path, not that the bracket genuinely eliminates a team still marked
/// active.
fn validate_champion_coverage(state: &TournamentState, outcomes: &[Outcome]) -> Result<()> {
    let championship_id = state
        .graph
        .round(Round::CHAMPIONSHIP)
        .next()
        .map(|m| m.id)
        .ok_or_else(|| CoreError::Internal("no championship matchup in graph".into()))?;

    let champions: HashSet<&str> = outcomes
        .iter()
        .filter_map(|o| o.matchup_results.get(&championship_id))
        .map(|w| w.winner.as_str())
        .collect();

    for team in state.active_teams() {
        if !champions.contains(team) {
            return Err(CoreError::Internal(format!(
                "active team '{team}' never appears as champion across {} outcomes",
                outcomes.len()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use tpa_core::state::ScoringConfig;
    use tpa_core::team::Region;
    use tpa_core::{BracketGraph, Matchup, MatchupId, TeamStatus};

    use super::*;

    fn leaf(id: u32, round: Round, region: Option<Region>, a: &str, a_seed: u8, b: &str, b_seed: u8, next: Option<u32>, position: u32) -> Matchup {
        Matchup {
            id: MatchupId(id),
            round,
            region,
            team_a: Some(a.into()),
            team_a_seed: Some(a_seed),
            team_b: Some(b.into()),
            team_b_seed: Some(b_seed),
            winner: None,
            winner_seed: None,
            next_matchup_id: next.map(MatchupId),
            position,
            score: None,
        }
    }

    fn decided(mut m: Matchup, winner: &str, seed: u8) -> Matchup {
        m.winner = Some(winner.to_string());
        m.winner_seed = Some(seed);
        m
    }

    fn alive_teams(names: &[(&str, u8)]) -> HashMap<String, TeamStatus> {
        names
            .iter()
            .map(|(n, s)| (n.to_string(), TeamStatus::alive(*s)))
            .collect()
    }

    #[test]
    fn test_championship_only_produces_two_outcomes() {
        let champ = leaf(63, Round::CHAMPIONSHIP, None, "Duke", 1, "Houston", 1, None, 62);
        let state = TournamentState {
            year: 2026,
            graph: BracketGraph::new(vec![champ]),
            teams: alive_teams(&[("Duke", 1), ("Houston", 1)]),
            completed_rounds: HashSet::new(),
            scoring_config: ScoringConfig::default(),
            last_updated: "2026-01-01T00:00:00Z".into(),
        };
        let outcomes = enumerate(&state).unwrap();
        assert_eq!(outcomes.len(), 2);
    }

    #[test]
    fn test_enumerate_refuses_when_more_than_sixteen_active() {
        let teams: Vec<(&str, u8)> = (1..=17).map(|_| ("Team", 1)).collect();
        let mut map = HashMap::new();
        for (i, (_, seed)) in teams.iter().enumerate() {
            map.insert(format!("Team{i}"), TeamStatus::alive(*seed));
        }
        let state = TournamentState {
            year: 2026,
            graph: BracketGraph::new(vec![]),
            teams: map,
            completed_rounds: HashSet::new(),
            scoring_config: ScoringConfig::default(),
            last_updated: "2026-01-01T00:00:00Z".into(),
        };
        let err = enumerate(&state).unwrap_err();
        assert!(matches!(err, CoreError::NeedsSweet16 { active_teams: 17 }));
    }

    #[test]
    fn test_elite_eight_propagates_into_final_four_slot() {
        let e1 = decided(
            leaf(57, Round::ELITE_8, Some(Region::South), "Duke", 1, "Arizona", 2, Some(61), 0),
            "Duke",
            1,
        );
        let e2 = leaf(58, Round::ELITE_8, Some(Region::West), "Gonzaga", 1, "Baylor", 2, Some(61), 1);
        let ff = leaf(61, Round::FINAL_FOUR, None, "placeholder", 0, "placeholder2", 0, Some(63), 60);
        let mut ff = ff;
        ff.team_a = None;
        ff.team_a_seed = None;
        ff.team_b = None;
        ff.team_b_seed = None;

        let champ = leaf(63, Round::CHAMPIONSHIP, None, "placeholder", 0, "placeholder2", 0, None, 0);
        let mut champ = champ;
        champ.team_a = None;
        champ.team_a_seed = None;
        champ.team_b = None;
        champ.team_b_seed = None;

        let state = TournamentState {
            year: 2026,
            graph: BracketGraph::new(vec![e1, e2, ff, champ]),
            teams: alive_teams(&[("Duke", 1), ("Gonzaga", 1), ("Baylor", 2)]),
            completed_rounds: HashSet::new(),
            scoring_config: ScoringConfig::default(),
            last_updated: "2026-01-01T00:00:00Z".into(),
        };

        let outcomes = enumerate(&state).unwrap();
        // One live Elite Eight game (Gonzaga/Baylor) feeding a Final Four
        // matchup whose other slot is already Duke from the decided game.
        assert_eq!(outcomes.len(), 2);
        for outcome in &outcomes {
            let ff_projection = outcome.matchup_results.get(&MatchupId(61));
            assert!(ff_projection.is_some());
        }
    }
}
