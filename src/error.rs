use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while bringing the game up. The per-frame core never fails;
/// losing a round is a state transition, not an error.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
