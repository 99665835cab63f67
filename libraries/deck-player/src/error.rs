//! Error types for the player facade.

use deck_playback::PlaybackError;
use deck_search::SearchError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PlayerError {
    /// The picked track has no playable source; the UI should offer its
    /// external link instead of a generic failure.
    pub fn is_unsupported_source(&self) -> bool {
        matches!(self, Self::Playback(e) if e.is_unsupported_source())
    }
}

impl From<config::ConfigError> for PlayerError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlayerError>;
