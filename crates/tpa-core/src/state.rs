//! Tournament state: the bracket graph plus elimination bookkeeping.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::graph::BracketGraph;
use crate::matchup::Round;

/// Per-round point weight. Defaults double each round, matching a typical
/// bracket pool's scoring table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    weights: HashMap<u8, u32>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let weights = [(1, 1), (2, 2), (3, 4), (4, 8), (5, 16), (6, 32)]
            .into_iter()
            .collect();
        Self { weights }
    }
}

impl ScoringConfig {
    pub fn weight(&self, round: Round) -> u32 {
        self.weights.get(&round.0).copied().unwrap_or(0)
    }

    pub fn with_weight(mut self, round: Round, weight: u32) -> Self {
        self.weights.insert(round.0, weight);
        self
    }
}

/// Elimination bookkeeping for one team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamStatus {
    pub seed: u8,
    pub eliminated: bool,
    pub elimination_round: Option<Round>,
    pub elimination_matchup_id: Option<crate::matchup::MatchupId>,
}

impl TeamStatus {
    pub fn alive(seed: u8) -> Self {
        Self {
            seed,
            eliminated: false,
            elimination_round: None,
            elimination_matchup_id: None,
        }
    }
}

/// The full, mutable state of a tournament: the bracket graph, per-team
/// elimination status, and which rounds have fully completed.
///
/// Mutated exclusively through [`crate::propagator`]-style operations
/// provided by the engine crate; never mutated directly by the analyzer,
/// which deep-clones before projecting outcomes onto it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentState {
    pub year: u16,
    pub graph: BracketGraph,
    pub teams: HashMap<String, TeamStatus>,
    pub completed_rounds: HashSet<Round>,
    pub scoring_config: ScoringConfig,
    pub last_updated: String,
}

impl TournamentState {
    /// Teams that have not been eliminated. `team_of(name)` keys the map,
    /// so a team appearing in two different rows under the same name would
    /// collide; in practice team names are unique within a tournament.
    pub fn active_teams(&self) -> Vec<&str> {
        self.teams
            .iter()
            .filter(|(_, status)| !status.eliminated)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn current_round(&self) -> Round {
        self.graph.determine_current_round(&self.completed_rounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchup::Round;

    #[test]
    fn test_default_scoring_config_doubles_each_round() {
        let config = ScoringConfig::default();
        assert_eq!(config.weight(Round::FIRST), 1);
        assert_eq!(config.weight(Round::CHAMPIONSHIP), 32);
    }

    #[test]
    fn test_custom_weight_override() {
        let config = ScoringConfig::default().with_weight(Round::CHAMPIONSHIP, 100);
        assert_eq!(config.weight(Round::CHAMPIONSHIP), 100);
    }

    #[test]
    fn test_active_teams_excludes_eliminated() {
        let mut teams = HashMap::new();
        teams.insert("Duke".to_string(), TeamStatus::alive(1));
        let mut eliminated = TeamStatus::alive(2);
        eliminated.eliminated = true;
        teams.insert("Houston".to_string(), eliminated);

        let state = TournamentState {
            year: 2026,
            graph: BracketGraph::new(vec![]),
            teams,
            completed_rounds: HashSet::new(),
            scoring_config: ScoringConfig::default(),
            last_updated: "2026-03-01T00:00:00Z".to_string(),
        };

        assert_eq!(state.active_teams(), vec!["Duke"]);
    }
}
