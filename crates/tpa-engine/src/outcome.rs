//! A single point in the residual outcome space: one way the remaining
//! games could play out, expressed as a delta against [`tpa_core::state::TournamentState`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use tpa_core::matchup::{MatchupId, Round};

/// The decided winner of one matchup under this outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeWinner {
    pub winner: String,
    pub winner_seed: u8,
    pub round: Round,
}

/// A matchup whose participants are known under this outcome but which has
/// not yet been decided (it may still be live in the real bracket, or it may
/// only exist because an earlier round's hypothetical winner was propagated
/// into it).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectedMatchup {
    pub round: Round,
    pub team_a: Option<String>,
    pub team_a_seed: Option<u8>,
    pub team_b: Option<String>,
    pub team_b_seed: Option<u8>,
}

/// One leaf of the enumerated outcome tree.
///
/// `matchup_results` covers every matchup that has a winner under this
/// outcome, including ones already decided in the real bracket.
/// `projected_matchups` covers matchups with at least one participant known
/// but no winner yet -- the live fringe of the bracket under this outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub matchup_results: HashMap<MatchupId, OutcomeWinner>,
    pub projected_matchups: HashMap<MatchupId, ProjectedMatchup>,
}

impl Outcome {
    pub fn new() -> Self {
        Self {
            matchup_results: HashMap::new(),
            projected_matchups: HashMap::new(),
        }
    }

    pub fn champion(&self, championship_id: MatchupId) -> Option<&OutcomeWinner> {
        self.matchup_results.get(&championship_id)
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Self::new()
    }
}
