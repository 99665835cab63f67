//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where a track comes from, and whether the media engine can open it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Track from the startup catalog
    Local,

    /// Search result with a resolved, directly streamable URI
    RemotePlayable,

    /// Search result without a stream URI (e.g. a video page link)
    RemoteUnplayable,
}

impl SourceKind {
    /// Whether the media engine may be asked to load this source
    pub fn is_playable(self) -> bool {
        !matches!(self, Self::RemoteUnplayable)
    }

    /// Whether the track came from the search service
    pub fn is_remote(self) -> bool {
        !matches!(self, Self::Local)
    }
}

/// One playable (or potentially playable) audio item
///
/// Catalog entries and search results share this shape; `source_kind`
/// tells them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique, stable identifier
    pub id: String,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Track duration (zero when unknown, e.g. fresh search results)
    pub duration: Duration,

    /// Locator handed to the media engine, or the external page link for
    /// unplayable remote items
    pub source_uri: String,

    /// Cover art location (optional)
    pub artwork_uri: Option<String>,

    /// Source discriminant
    pub source_kind: SourceKind,
}

impl Track {
    /// Build a catalog track
    pub fn local(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration: Duration,
        source_uri: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            duration,
            source_uri: source_uri.into(),
            artwork_uri: None,
            source_kind: SourceKind::Local,
        }
    }

    /// Attach cover art
    #[must_use]
    pub fn with_artwork(mut self, artwork_uri: impl Into<String>) -> Self {
        self.artwork_uri = Some(artwork_uri.into());
        self
    }

    /// Whether the media engine may be asked to load this track
    pub fn is_playable(&self) -> bool {
        self.source_kind.is_playable()
    }
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No track selected
    Idle,

    /// Track handed to the engine, waiting for `ready` or `error`
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Engine failed; only a new selection leaves this state
    Error,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the catalog is exhausted
    #[serde(rename = "none", alias = "off")]
    Off,

    /// Loop the entire catalog
    All,

    /// Loop current track only
    One,
}

impl RepeatMode {
    /// Next mode in the none -> all -> one cycle
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }
}

impl Default for RepeatMode {
    fn default() -> Self {
        Self::Off
    }
}

/// Configuration for the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0.0-1.0, default: 0.7)
    pub volume: f32,

    /// Initial repeat mode (default: none)
    pub repeat: RepeatMode,

    /// Initial shuffle flag (default: false)
    pub shuffle: bool,

    /// Start playing as soon as the engine is ready (default: true).
    /// When false, a freshly loaded track lands in `Paused`.
    pub autoplay: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 0.7,
            repeat: RepeatMode::Off,
            shuffle: false,
            autoplay: true,
        }
    }
}

/// Format a position as `m:ss` for progress labels
pub fn format_position(position: Duration) -> String {
    let total = position.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}
