//! Error taxonomy shared by the domain layer and the analysis engine.

use thiserror::Error;

use crate::matchup::MatchupId;

/// Errors surfaced by the core domain model, the propagator, and the
/// analysis engine built on top of it.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("matchup not found: {0:?}")]
    MatchupNotFound(MatchupId),

    #[error("winner '{winner}' is not a participant of matchup {matchup:?}")]
    InvalidWinner { matchup: MatchupId, winner: String },

    #[error("analysis requires Sweet 16 or later: {active_teams} teams still active")]
    NeedsSweet16 { active_teams: usize },

    #[error("internal invariant violated: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
