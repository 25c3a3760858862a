//! Propagation, scoring and possibility-space analysis engine for a
//! single-elimination bracket pool.
//!
//! This crate provides:
//! - `propagator` - applies a decided game result to a [`tpa_core::state::TournamentState`]
//! - `scorer` - scores a bracket against decided or projected results
//! - `enumerator` - expands the undecided remainder of the bracket into every possible outcome
//! - `analyzer` - scores every bracket against every enumerated outcome
//! - `statistics` - derives podium contenders, pick histograms and conditional path analyses
//! - `report` - assembles the above into the `AnalysisReport` callers consume

pub mod analyzer;
pub mod enumerator;
pub mod outcome;
pub mod propagator;
pub mod report;
pub mod scorer;
pub mod statistics;

pub use analyzer::{analyze_outcomes, project_state, AnalyzerResult};
pub use enumerator::enumerate;
pub use outcome::Outcome;
pub use propagator::apply_result;
pub use report::{analyze, AnalysisReport};
pub use scorer::{possible_score, score_bracket, score_detailed, score_projected};
