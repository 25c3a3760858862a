//! Matchup nodes of the bracket graph.

use serde::{Deserialize, Serialize};

use crate::team::{Region, RegionOrFinalFour};

/// One of the six rounds of a 64-team single-elimination bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Round(pub u8);

impl Round {
    pub const FIRST: Round = Round(1);
    pub const SECOND: Round = Round(2);
    pub const SWEET_16: Round = Round(3);
    pub const ELITE_8: Round = Round(4);
    pub const FINAL_FOUR: Round = Round(5);
    pub const CHAMPIONSHIP: Round = Round(6);

    /// Number of matchups played in this round of a full 64-team bracket.
    pub fn num_matches(&self) -> usize {
        match self.0 {
            1 => 32,
            2 => 16,
            3 => 8,
            4 => 4,
            5 => 2,
            6 => 1,
            _ => 0,
        }
    }

    pub fn next(&self) -> Option<Round> {
        if self.0 < 6 {
            Some(Round(self.0 + 1))
        } else {
            None
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self.0 {
            1 => "First Round",
            2 => "Second Round",
            3 => "Sweet 16",
            4 => "Elite Eight",
            5 => "Final Four",
            6 => "Championship",
            _ => "Unknown Round",
        }
    }

    /// Whether scoring for this round is attributed to a region (1-4) or
    /// to the distinguished Final Four bucket (5-6).
    pub fn uses_region_bucket(&self) -> bool {
        self.0 <= 4
    }
}

/// Which slot of its successor matchup a matchup's winner feeds into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    /// Derived from `position % 2`: even positions feed slot A, odd feed B.
    pub fn from_position(position: u32) -> Slot {
        if position % 2 == 0 {
            Slot::A
        } else {
            Slot::B
        }
    }
}

/// Final score attached to a completed matchup, for reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchupScore {
    pub a: u16,
    pub b: u16,
}

/// A stable identifier for a matchup node, unique across the whole
/// tournament graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchupId(pub u32);

/// A node in the bracket graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matchup {
    pub id: MatchupId,
    pub round: Round,
    /// Region for rounds 1-4; `None` for rounds 5-6 (Final Four bucket).
    pub region: Option<Region>,
    pub team_a: Option<String>,
    pub team_a_seed: Option<u8>,
    pub team_b: Option<String>,
    pub team_b_seed: Option<u8>,
    pub winner: Option<String>,
    pub winner_seed: Option<u8>,
    pub next_matchup_id: Option<MatchupId>,
    pub position: u32,
    pub score: Option<MatchupScore>,
}

impl Matchup {
    pub fn slot_of_child(&self) -> Slot {
        Slot::from_position(self.position)
    }

    /// A matchup is live when both teams are seeded and no winner has been
    /// recorded.
    pub fn is_live(&self) -> bool {
        self.team_a.is_some() && self.team_b.is_some() && self.winner.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.winner.is_some()
    }

    pub fn region_bucket(&self) -> RegionOrFinalFour {
        match self.region {
            Some(r) => RegionOrFinalFour::Region(r),
            None => RegionOrFinalFour::FinalFour,
        }
    }

    /// `true` iff `name`/`seed` is one of this matchup's two participants.
    /// Name matching trims whitespace and is case-insensitive; seed matching
    /// is exact.
    pub fn has_participant(&self, name: &str, seed: u8) -> bool {
        self.participant_name(name, seed).is_some()
    }

    /// The matchup's own stored spelling of whichever participant matches
    /// `name`/`seed` (trim/lowercase on name, exact on seed), or `None` if
    /// neither slot matches. Callers that accept externally-typed winner
    /// names should write this canonical form back, not the raw input, so it
    /// stays consistent with `TournamentState::teams`'s keys.
    pub fn participant_name(&self, name: &str, seed: u8) -> Option<&str> {
        let normalized = normalize_name(name);
        if self.team_a_seed == Some(seed) && self.team_a.as_deref().is_some_and(|a| normalize_name(a) == normalized) {
            return self.team_a.as_deref();
        }
        if self.team_b_seed == Some(seed) && self.team_b.as_deref().is_some_and(|b| normalize_name(b) == normalized) {
            return self.team_b.as_deref();
        }
        None
    }
}

/// Trim + lowercase used for name-equality comparisons throughout the
/// propagator's winner validation (per the applyResult contract).
fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_progression() {
        assert_eq!(Round::FIRST.next(), Some(Round::SECOND));
        assert_eq!(Round::CHAMPIONSHIP.next(), None);
    }

    #[test]
    fn test_round_num_matches() {
        assert_eq!(Round::SWEET_16.num_matches(), 8);
        assert_eq!(Round::CHAMPIONSHIP.num_matches(), 1);
    }

    #[test]
    fn test_slot_from_position() {
        assert_eq!(Slot::from_position(0), Slot::A);
        assert_eq!(Slot::from_position(1), Slot::B);
        assert_eq!(Slot::from_position(4), Slot::A);
    }

    #[test]
    fn test_region_bucket() {
        let m = Matchup {
            id: MatchupId(1),
            round: Round::FINAL_FOUR,
            region: None,
            team_a: None,
            team_a_seed: None,
            team_b: None,
            team_b_seed: None,
            winner: None,
            winner_seed: None,
            next_matchup_id: None,
            position: 0,
            score: None,
        };
        assert_eq!(m.region_bucket(), RegionOrFinalFour::FinalFour);
    }

    fn pair() -> Matchup {
        Matchup {
            id: MatchupId(1),
            round: Round::FIRST,
            region: Some(crate::team::Region::South),
            team_a: Some("Duke".into()),
            team_a_seed: Some(1),
            team_b: Some("Norfolk State".into()),
            team_b_seed: Some(16),
            winner: None,
            winner_seed: None,
            next_matchup_id: None,
            position: 0,
            score: None,
        }
    }

    #[test]
    fn test_has_participant_is_trim_and_case_insensitive() {
        let m = pair();
        assert!(m.has_participant("Duke", 1));
        assert!(m.has_participant("duke", 1));
        assert!(m.has_participant(" Duke ", 1));
        assert!(m.has_participant("DUKE", 1));
        assert!(!m.has_participant("Duke", 16));
        assert!(!m.has_participant("Gonzaga", 3));
    }

    #[test]
    fn test_participant_name_returns_canonical_spelling() {
        let m = pair();
        assert_eq!(m.participant_name("duke", 1), Some("Duke"));
        assert_eq!(m.participant_name(" DUKE ", 1), Some("Duke"));
        assert_eq!(m.participant_name("Duke", 2), None);
    }
}
