//! CLI error types.

use std::path::PathBuf;

/// CLI errors.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Invalid data file: {0}")]
    InvalidDataFile(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Matchup score must be formatted as A:B, got: {0}")]
    InvalidScoreFormat(String),

    #[error(transparent)]
    Core(#[from] tpa_core::error::CoreError),
}

pub type Result<T> = std::result::Result<T, CliError>;
