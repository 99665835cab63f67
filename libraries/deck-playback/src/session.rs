//! Observable playback session

use crate::error::PlaybackError;
use crate::types::{PlaybackConfig, PlaybackState, RepeatMode, Track};
use serde::Serialize;
use std::time::Duration;

/// Mutable playback state, owned by the controller
///
/// The UI reads it through `PlaybackController::session`; only the
/// controller mutates it.
///
/// Invariants:
/// - `position <= duration` whenever `duration` is known (non-zero)
/// - `state == Playing` implies `is_playing` and an attached track
/// - `state == Idle` implies no attached track
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackSession {
    /// Detached copy of the selected track
    pub current_track: Option<Track>,

    /// Catalog position of the selected track, `None` for search results
    pub current_index: Option<usize>,

    /// Playback position within the selected track
    pub position: Duration,

    /// Effective duration: the engine-reported one once known, otherwise
    /// the descriptor's (zero when unknown)
    pub duration: Duration,

    /// Output volume (0.0-1.0)
    pub volume: f32,

    pub is_playing: bool,

    pub repeat: RepeatMode,

    pub shuffle: bool,

    pub state: PlaybackState,

    /// Cause carried by the `Error` state
    #[serde(skip)]
    pub last_error: Option<PlaybackError>,
}

impl PlaybackSession {
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            current_track: None,
            current_index: None,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            volume: config.volume,
            is_playing: false,
            repeat: config.repeat,
            shuffle: config.shuffle,
            state: PlaybackState::Idle,
            last_error: None,
        }
    }

    /// Whether a track is selected
    pub fn is_attached(&self) -> bool {
        self.current_track.is_some()
    }

    /// Id of the selected track
    pub fn current_track_id(&self) -> Option<&str> {
        self.current_track.as_ref().map(|track| track.id.as_str())
    }

    /// Position as a fraction of the effective duration (0.0 when unknown)
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.position.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle() {
        let session = PlaybackSession::new(&PlaybackConfig::default());
        assert_eq!(session.state, PlaybackState::Idle);
        assert!(!session.is_attached());
        assert!(!session.is_playing);
        assert_eq!(session.volume, 0.7);
        assert_eq!(session.progress(), 0.0);
    }

    #[test]
    fn progress_is_fraction_of_duration() {
        let mut session = PlaybackSession::new(&PlaybackConfig::default());
        session.duration = Duration::from_secs(200);
        session.position = Duration::from_secs(50);
        assert!((session.progress() - 0.25).abs() < f32::EPSILON);
    }
}
