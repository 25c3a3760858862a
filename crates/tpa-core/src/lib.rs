//! Core domain types for a 64-team single-elimination bracket pool.
//!
//! This crate provides the fundamental types shared by the propagation and
//! analysis engine and the CLI, with no I/O of its own:
//! - The bracket graph: matchup nodes, rounds, slots
//! - Tournament state: elimination bookkeeping, scoring configuration
//! - Submitted brackets: a participant's prediction tree
//! - Teams and regions

pub mod error;
pub mod graph;
pub mod matchup;
pub mod state;
pub mod submission;
pub mod team;

pub use error::{CoreError, Result};
pub use graph::BracketGraph;
pub use matchup::{Matchup, MatchupId, MatchupScore, Round, Slot};
pub use state::{ScoringConfig, TeamStatus, TournamentState};
pub use submission::{Bracket, MatchupPick};
pub use team::{Region, RegionOrFinalFour};
