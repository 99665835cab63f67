//! Playback Events
//!
//! Two event streams meet in the controller:
//! - `EngineEvent`s flow *in* from the media engine, stamped with the load
//!   generation that produced them
//! - `PlaybackEvent`s flow *out* to the UI layer, queued by the controller
//!   and drained with `PlaybackController::drain_events`

use crate::generation::Generation;
use crate::types::{PlaybackState, RepeatMode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Events emitted by the media engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Engine can play the loaded source. Carries the real duration when the
    /// engine knows it.
    Ready { duration: Option<Duration> },

    /// Playback position changed (metadata load, periodic time update)
    PositionUpdate(Duration),

    /// Playback reached the natural end of the source
    Ended,

    /// Engine failed to load or play the source
    Error(String),
}

/// Engine event tagged with the load generation it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct StampedEvent {
    pub generation: Generation,
    pub event: EngineEvent,
}

/// Events emitted by the playback controller for UI synchronization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// Selected track changed
    TrackChanged {
        /// ID of the new track, `None` when the session went idle
        track_id: Option<String>,
        /// ID of the previous track (if any)
        previous_track_id: Option<String>,
    },

    /// Position update
    PositionUpdate {
        /// Current playback position
        position_ms: u64,
        /// Effective track duration (0 when unknown)
        duration_ms: u64,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0.0-1.0)
        level: f32,
    },

    /// Repeat mode changed
    RepeatChanged { mode: RepeatMode },

    /// Shuffle toggled
    ShuffleChanged { enabled: bool },

    /// A selection or the engine failed
    Error {
        /// Error message
        message: String,
        /// The track has no playable source; offer an external link
        unsupported_source: bool,
    },
}
