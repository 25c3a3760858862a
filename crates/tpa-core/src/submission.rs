//! Submitted brackets: a participant's prediction tree.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::matchup::{MatchupId, Round};

/// One participant's predicted winner for a single matchup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupPick {
    pub matchup_id: MatchupId,
    pub round: Round,
    pub winner: String,
    pub winner_seed: u8,
}

/// A participant's full bracket submission.
///
/// `picks` is expected to cover every matchup at every round, forming a
/// complete prediction tree; the scorer tolerates missing picks (they
/// simply earn no points) rather than failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bracket {
    pub id: String,
    pub participant_name: String,
    pub entry_number: u32,
    pub user_email: String,
    pub picks: HashMap<MatchupId, MatchupPick>,
    pub is_locked: bool,
    pub score: u32,
    pub edit_token: String,
}

impl Bracket {
    pub fn pick_for(&self, matchup_id: MatchupId) -> Option<&MatchupPick> {
        self.picks.get(&matchup_id)
    }

    /// The participant's predicted champion, if the championship pick
    /// exists in this bracket's prediction tree.
    pub fn championship_pick(&self) -> Option<&MatchupPick> {
        self.picks
            .values()
            .find(|p| p.round == Round::CHAMPIONSHIP)
    }
}
