//! Tournament state and bracket submission loading.

use std::path::Path;

use tpa_core::state::TournamentState;
use tpa_core::submission::Bracket;

use crate::error::{CliError, Result};

/// Embedded default tournament fixture.
pub const EMBEDDED_TOURNAMENT: &str = include_str!("../../../data/tournament.json");

/// Embedded default bracket submissions fixture.
pub const EMBEDDED_BRACKETS: &str = include_str!("../../../data/brackets.json");

/// Loads a [`TournamentState`] from `path`, or the embedded fixture when
/// `path` is `None`.
pub fn load_tournament(path: Option<&Path>) -> Result<TournamentState> {
    match path {
        Some(p) => {
            let content = std::fs::read_to_string(p).map_err(|_| CliError::InvalidDataFile(p.to_path_buf()))?;
            Ok(serde_json::from_str(&content)?)
        }
        None => Ok(serde_json::from_str(EMBEDDED_TOURNAMENT)?),
    }
}

/// Loads submitted [`Bracket`]s from `path`, or the embedded fixture when
/// `path` is `None`.
pub fn load_brackets(path: Option<&Path>) -> Result<Vec<Bracket>> {
    match path {
        Some(p) => {
            let content = std::fs::read_to_string(p).map_err(|_| CliError::InvalidDataFile(p.to_path_buf()))?;
            Ok(serde_json::from_str(&content)?)
        }
        None => Ok(serde_json::from_str(EMBEDDED_BRACKETS)?),
    }
}

/// Writes `state` back to `path` as pretty-printed JSON. With no explicit
/// path this is a no-op; the CLI has no writable location for the
/// embedded fixture, so callers re-run `apply-result` against a file they
/// point at with `--data`.
pub fn save_tournament(state: &TournamentState, path: Option<&Path>) -> Result<()> {
    if let Some(p) = path {
        let content = serde_json::to_string_pretty(state)?;
        std::fs::write(p, content)?;
    }
    Ok(())
}
