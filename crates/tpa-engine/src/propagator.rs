//! Results Propagator: ingests one completed (or amended) game result and
//! forward-propagates the winner into the bracket graph.

use chrono::Utc;

use tpa_core::error::{CoreError, Result};
use tpa_core::matchup::{MatchupId, MatchupScore, Round, Slot};
use tpa_core::state::TournamentState;

/// Applies a game result to `state` in place.
///
/// When `completed` is `true`, `winner`/`winner_seed` must match one of the
/// matchup's two participants -- by seed exactly and by name after
/// trim/lowercase -- or the call fails with [`CoreError::InvalidWinner`]. The
/// matchup's own stored spelling of the name is written back (not the raw
/// `winner` argument), so elimination bookkeeping and successor propagation
/// stay keyed consistently with `TournamentState::teams`. Elimination
/// bookkeeping updates for both participants, and the winner is propagated
/// into the successor matchup's A/B slot (chosen by
/// [`Slot::from_position`]).
///
/// When `completed` is `false` this is treated as an interim score update:
/// the matchup's score is overwritten but no winner is recorded, nothing is
/// eliminated, and nothing propagates.
///
/// Returns the ids of successor matchups whose slot held a *different* team
/// before this call overwrote it. The propagator does not cascade an unwind
/// through a displaced matchup's own descendants -- callers that care about
/// downstream consequences of an amendment re-apply results for whatever is
/// returned here.
pub fn apply_result(
    state: &mut TournamentState,
    matchup_id: MatchupId,
    winner: &str,
    winner_seed: u8,
    score: Option<(u16, u16)>,
    completed: bool,
) -> Result<Vec<MatchupId>> {
    if !completed {
        let matchup = state
            .graph
            .get_mut(matchup_id)
            .ok_or(CoreError::MatchupNotFound(matchup_id))?;
        matchup.score = score.map(|(a, b)| MatchupScore { a, b });
        state.last_updated = Utc::now().to_rfc3339();
        return Ok(Vec::new());
    }

    let (round, next_matchup_id, position, loser, canonical_winner) = {
        let matchup = state
            .graph
            .get_mut(matchup_id)
            .ok_or(CoreError::MatchupNotFound(matchup_id))?;

        let canonical_winner = match matchup.participant_name(winner, winner_seed) {
            Some(name) => name.to_string(),
            None => {
                return Err(CoreError::InvalidWinner {
                    matchup: matchup_id,
                    winner: winner.to_string(),
                })
            }
        };

        let loser = if matchup.team_a.as_deref() == Some(canonical_winner.as_str()) {
            matchup.team_b.clone()
        } else {
            matchup.team_a.clone()
        };

        matchup.winner = Some(canonical_winner.clone());
        matchup.winner_seed = Some(winner_seed);
        matchup.score = score.map(|(a, b)| MatchupScore { a, b });

        (matchup.round, matchup.next_matchup_id, matchup.position, loser, canonical_winner)
    };

    if let Some(loser_name) = &loser {
        if let Some(status) = state.teams.get_mut(loser_name) {
            status.eliminated = true;
            status.elimination_round = Some(round);
            status.elimination_matchup_id = Some(matchup_id);
        }
    }
    if let Some(status) = state.teams.get_mut(&canonical_winner) {
        status.eliminated = false;
        status.elimination_round = None;
        status.elimination_matchup_id = None;
    }

    let mut displaced = Vec::new();
    if let Some(next_id) = next_matchup_id {
        let slot = Slot::from_position(position);
        if let Some(next) = state.graph.get_mut(next_id) {
            let (slot_name, slot_seed) = match slot {
                Slot::A => (&mut next.team_a, &mut next.team_a_seed),
                Slot::B => (&mut next.team_b, &mut next.team_b_seed),
            };
            if slot_name.is_some() && slot_name.as_deref() != Some(canonical_winner.as_str()) {
                displaced.push(next_id);
            }
            *slot_name = Some(canonical_winner.clone());
            *slot_seed = Some(winner_seed);
        }
    }

    recompute_completed_rounds(state);
    state.last_updated = Utc::now().to_rfc3339();

    Ok(displaced)
}

fn recompute_completed_rounds(state: &mut TournamentState) {
    for round in (Round::FIRST.0..=Round::CHAMPIONSHIP.0).map(Round) {
        let mut games = state.graph.round(round).peekable();
        let complete = games.peek().is_some() && games.all(|m| m.winner.is_some());
        if complete {
            state.completed_rounds.insert(round);
        } else {
            state.completed_rounds.remove(&round);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use tpa_core::matchup::Matchup;
    use tpa_core::state::ScoringConfig;
    use tpa_core::team::Region;
    use tpa_core::{BracketGraph, TeamStatus};

    use super::*;

    fn pair(id: u32, next: Option<u32>, position: u32) -> Matchup {
        Matchup {
            id: MatchupId(id),
            round: Round::FIRST,
            region: Some(Region::South),
            team_a: Some("Duke".into()),
            team_a_seed: Some(1),
            team_b: Some("Norfolk State".into()),
            team_b_seed: Some(16),
            winner: None,
            winner_seed: None,
            next_matchup_id: next.map(MatchupId),
            position,
            score: None,
        }
    }

    fn successor(id: u32) -> Matchup {
        Matchup {
            id: MatchupId(id),
            round: Round::SECOND,
            region: Some(Region::South),
            team_a: None,
            team_a_seed: None,
            team_b: None,
            team_b_seed: None,
            winner: None,
            winner_seed: None,
            next_matchup_id: None,
            position: 0,
            score: None,
        }
    }

    fn state_with(matchups: Vec<Matchup>) -> TournamentState {
        let mut teams = HashMap::new();
        teams.insert("Duke".to_string(), TeamStatus::alive(1));
        teams.insert("Norfolk State".to_string(), TeamStatus::alive(16));
        TournamentState {
            year: 2026,
            graph: BracketGraph::new(matchups),
            teams,
            completed_rounds: HashSet::new(),
            scoring_config: ScoringConfig::default(),
            last_updated: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_apply_result_eliminates_loser_and_propagates() {
        let mut state = state_with(vec![pair(1, Some(100), 0), successor(100)]);
        let displaced = apply_result(&mut state, MatchupId(1), "Duke", 1, Some((70, 60)), true).unwrap();
        assert!(displaced.is_empty());

        let matchup = state.graph.get(MatchupId(1)).unwrap();
        assert_eq!(matchup.winner.as_deref(), Some("Duke"));

        let successor = state.graph.get(MatchupId(100)).unwrap();
        assert_eq!(successor.team_a.as_deref(), Some("Duke"));

        assert!(state.teams["Norfolk State"].eliminated);
        assert!(!state.teams["Duke"].eliminated);
    }

    #[test]
    fn test_apply_result_rejects_unknown_winner() {
        let mut state = state_with(vec![pair(1, None, 0)]);
        let err = apply_result(&mut state, MatchupId(1), "Gonzaga", 3, None, true).unwrap_err();
        assert!(matches!(err, CoreError::InvalidWinner { .. }));
    }

    #[test]
    fn test_apply_result_accepts_winner_name_after_trim_and_lowercase() {
        let mut state = state_with(vec![pair(1, Some(100), 0), successor(100)]);
        let displaced = apply_result(&mut state, MatchupId(1), " duke ", 1, None, true).unwrap();
        assert!(displaced.is_empty());

        // The matchup and successor both store the canonical spelling, not
        // the raw input, so elimination bookkeeping stays keyed correctly.
        let matchup = state.graph.get(MatchupId(1)).unwrap();
        assert_eq!(matchup.winner.as_deref(), Some("Duke"));
        let successor = state.graph.get(MatchupId(100)).unwrap();
        assert_eq!(successor.team_a.as_deref(), Some("Duke"));
        assert!(!state.teams["Duke"].eliminated);
        assert!(state.teams["Norfolk State"].eliminated);
    }

    #[test]
    fn test_apply_result_reports_displacement_on_amendment() {
        let mut state = state_with(vec![pair(1, Some(100), 0), successor(100)]);
        apply_result(&mut state, MatchupId(1), "Duke", 1, None, true).unwrap();
        let displaced = apply_result(&mut state, MatchupId(1), "Norfolk State", 16, None, true).unwrap();
        assert_eq!(displaced, vec![MatchupId(100)]);
    }

    #[test]
    fn test_apply_result_is_idempotent_on_repeat() {
        let mut state = state_with(vec![pair(1, Some(100), 0), successor(100)]);
        apply_result(&mut state, MatchupId(1), "Duke", 1, None, true).unwrap();
        let displaced = apply_result(&mut state, MatchupId(1), "Duke", 1, None, true).unwrap();
        assert!(displaced.is_empty());
    }

    #[test]
    fn test_completed_false_updates_score_only() {
        let mut state = state_with(vec![pair(1, None, 0)]);
        apply_result(&mut state, MatchupId(1), "Duke", 1, Some((10, 8)), false).unwrap();
        let matchup = state.graph.get(MatchupId(1)).unwrap();
        assert!(matchup.winner.is_none());
        assert_eq!(matchup.score, Some(MatchupScore { a: 10, b: 8 }));
    }
}
