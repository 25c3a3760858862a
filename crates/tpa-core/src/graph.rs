//! The bracket graph: an arena of [`Matchup`] nodes indexed by id and round.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::matchup::{Matchup, MatchupId, Round, Slot};

/// Flat, round-indexed view of every matchup in the tournament.
///
/// Matchups are owned by the arena (`by_id`); `by_round` is a derived index
/// kept in sync by [`BracketGraph::rebuild_indices`]. The graph serializes
/// as a plain matchup list and rebuilds its indices on deserialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<Matchup>", into = "Vec<Matchup>")]
pub struct BracketGraph {
    by_id: HashMap<MatchupId, Matchup>,
    by_round: HashMap<Round, Vec<MatchupId>>,
}

impl From<Vec<Matchup>> for BracketGraph {
    fn from(matchups: Vec<Matchup>) -> Self {
        BracketGraph::new(matchups)
    }
}

impl From<BracketGraph> for Vec<Matchup> {
    fn from(graph: BracketGraph) -> Self {
        let mut matchups: Vec<Matchup> = graph.by_id.into_values().collect();
        matchups.sort_by_key(|m| m.id.0);
        matchups
    }
}

impl BracketGraph {
    pub fn new(matchups: Vec<Matchup>) -> Self {
        let mut graph = Self {
            by_id: matchups.into_iter().map(|m| (m.id, m)).collect(),
            by_round: HashMap::new(),
        };
        graph.rebuild_indices();
        graph
    }

    pub fn rebuild_indices(&mut self) {
        let mut by_round: HashMap<Round, Vec<MatchupId>> = HashMap::new();
        for m in self.by_id.values() {
            by_round.entry(m.round).or_default().push(m.id);
        }
        for ids in by_round.values_mut() {
            ids.sort_by_key(|id| id.0);
        }
        self.by_round = by_round;
    }

    pub fn get(&self, id: MatchupId) -> Option<&Matchup> {
        self.by_id.get(&id)
    }

    pub fn get_mut(&mut self, id: MatchupId) -> Option<&mut Matchup> {
        self.by_id.get_mut(&id)
    }

    pub fn round(&self, round: Round) -> impl Iterator<Item = &Matchup> {
        self.by_round
            .get(&round)
            .into_iter()
            .flatten()
            .filter_map(move |id| self.by_id.get(id))
    }

    pub fn all(&self) -> impl Iterator<Item = &Matchup> {
        self.by_id.values()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn slot_of_child(&self, parent: &Matchup) -> Slot {
        parent.slot_of_child()
    }

    /// Whether a matchup is ready to be played: both teams known, no
    /// winner recorded.
    pub fn is_live(&self, id: MatchupId) -> bool {
        self.get(id).is_some_and(Matchup::is_live)
    }

    /// Names of every team still alive at or after `round`, deduplicated.
    ///
    /// A team counts as active when it appears as a participant of some
    /// matchup at round >= `round` and has not been eliminated. Elimination
    /// state lives on [`crate::state::TournamentState`]; this method only
    /// looks at graph membership, so callers typically cross-reference with
    /// `TournamentState::active_teams`.
    pub fn teams_from_round(&self, round: Round) -> HashSet<(String, u8)> {
        let mut teams = HashSet::new();
        for m in self.by_id.values().filter(|m| m.round >= round) {
            if let (Some(name), Some(seed)) = (&m.team_a, m.team_a_seed) {
                teams.insert((name.clone(), seed));
            }
            if let (Some(name), Some(seed)) = (&m.team_b, m.team_b_seed) {
                teams.insert((name.clone(), seed));
            }
        }
        teams
    }

    /// Largest round `r` such that every matchup of round `r-1` has a
    /// winner, defaulting to [`Round::SWEET_16`] (analysis never starts
    /// before the Sweet 16).
    pub fn determine_current_round(&self, completed_rounds: &HashSet<Round>) -> Round {
        let mut current = Round::SWEET_16;
        for r in (Round::SWEET_16.0..=Round::CHAMPIONSHIP.0).map(Round) {
            let previous = Round(r.0 - 1);
            if completed_rounds.contains(&previous) {
                current = r;
            } else {
                break;
            }
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::Region;

    fn leaf(id: u32, position: u32, next: Option<u32>) -> Matchup {
        Matchup {
            id: MatchupId(id),
            round: Round::FIRST,
            region: Some(Region::South),
            team_a: Some("A".into()),
            team_a_seed: Some(1),
            team_b: Some("B".into()),
            team_b_seed: Some(16),
            winner: None,
            winner_seed: None,
            next_matchup_id: next.map(MatchupId),
            position,
            score: None,
        }
    }

    #[test]
    fn test_round_index() {
        let graph = BracketGraph::new(vec![leaf(1, 0, Some(100)), leaf(2, 1, Some(100))]);
        assert_eq!(graph.round(Round::FIRST).count(), 2);
    }

    #[test]
    fn test_is_live() {
        let graph = BracketGraph::new(vec![leaf(1, 0, None)]);
        assert!(graph.is_live(MatchupId(1)));
    }

    #[test]
    fn test_determine_current_round_defaults_to_sweet_16() {
        let graph = BracketGraph::new(vec![]);
        let completed = HashSet::new();
        assert_eq!(graph.determine_current_round(&completed), Round::SWEET_16);
    }

    #[test]
    fn test_determine_current_round_advances() {
        let graph = BracketGraph::new(vec![]);
        let mut completed = HashSet::new();
        completed.insert(Round::SWEET_16);
        completed.insert(Round::ELITE_8);
        assert_eq!(graph.determine_current_round(&completed), Round::FINAL_FOUR);
    }
}
