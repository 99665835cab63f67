//! Error types for playback management

use thiserror::Error;

/// Playback errors
///
/// Every variant is locally recoverable: a new selection (or, for catalog
/// errors, a corrected catalog source) is enough to continue.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    /// The track has no directly streamable source; it never reaches the engine
    #[error("Track {track_id} cannot be played here (source: {uri})")]
    UnsupportedSource { track_id: String, uri: String },

    /// The engine failed while loading a source (missing, corrupt, refused)
    #[error("Failed to load track {track_id}: {cause}")]
    Load { track_id: String, cause: String },

    /// The engine failed during active playback
    #[error("Playback of track {track_id} failed: {cause}")]
    Playback { track_id: String, cause: String },

    /// Two catalog entries share the same id
    #[error("Duplicate track id in catalog: {0}")]
    DuplicateTrackId(String),

    /// A catalog entry is not a local track
    #[error("Invalid catalog entry {id}: {reason}")]
    InvalidCatalogEntry { id: String, reason: String },

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Catalog is empty, nothing to navigate to
    #[error("Queue is empty")]
    QueueEmpty,
}

impl PlaybackError {
    /// True when the UI should offer an external link instead of retrying
    pub fn is_unsupported_source(&self) -> bool {
        matches!(self, Self::UnsupportedSource { .. })
    }

    /// True for failures reported by the media engine
    pub fn is_engine_failure(&self) -> bool {
        matches!(self, Self::Load { .. } | Self::Playback { .. })
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
