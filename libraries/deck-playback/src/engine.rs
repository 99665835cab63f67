//! Media engine boundary
//!
//! `MediaEngine` is the contract a platform media primitive must satisfy
//! (an HTML audio element bridge, a rodio sink, a mobile player). It is
//! fire-and-forget: commands return immediately and outcomes arrive later as
//! events sent through the `EngineNotifier` handed over on `load`.
//!
//! `EngineAdapter` wraps exactly one engine and adds the guarantees the
//! controller relies on: unplayable sources never reach the engine, seek and
//! volume are clamped, and every event is stamped with the generation of the
//! load that produced it.

use crate::error::{PlaybackError, Result};
use crate::events::{EngineEvent, StampedEvent};
use crate::generation::Generation;
use crate::types::Track;
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Platform media playback primitive
///
/// Implementors may fire events from any thread through the notifier; the
/// controller applies them one at a time on its own processing point.
pub trait MediaEngine: Send {
    /// Start loading `uri`. Report `ready`/`error` through `notifier`.
    fn load(&mut self, uri: &str, notifier: EngineNotifier);

    /// Start or resume playback
    fn play(&mut self);

    /// Pause playback
    fn pause(&mut self);

    /// Jump to `position` (already clamped by the adapter)
    fn seek(&mut self, position: Duration);

    /// Set output volume in [0.0, 1.0] (already clamped by the adapter)
    fn set_volume(&mut self, volume: f32);

    /// Current playback position, polled while playing
    fn current_time(&self) -> Duration;

    /// Duration of the loaded source, if known. Consulted when `ready`
    /// arrives without one.
    fn duration(&self) -> Option<Duration>;
}

/// Cloneable, thread-safe handle an engine uses to report events
///
/// Every notifier is bound to one load generation; events sent through a
/// notifier from an older load are recognised as stale by the controller.
#[derive(Debug, Clone)]
pub struct EngineNotifier {
    generation: Generation,
    tx: Sender<StampedEvent>,
}

impl EngineNotifier {
    /// Generation of the load this notifier belongs to
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Send an event. Returns false if the controller is gone.
    pub fn send(&self, event: EngineEvent) -> bool {
        let stamped = StampedEvent {
            generation: self.generation,
            event,
        };
        if self.tx.send(stamped).is_err() {
            trace!(generation = %self.generation, "Engine event dropped, controller gone");
            return false;
        }
        true
    }

    pub fn ready(&self, duration: Option<Duration>) -> bool {
        self.send(EngineEvent::Ready { duration })
    }

    pub fn position(&self, position: Duration) -> bool {
        self.send(EngineEvent::PositionUpdate(position))
    }

    pub fn ended(&self) -> bool {
        self.send(EngineEvent::Ended)
    }

    pub fn error(&self, cause: impl Into<String>) -> bool {
        self.send(EngineEvent::Error(cause.into()))
    }
}

/// Clamp a position to `[0, duration]`; a zero (unknown) duration only
/// bounds from below
pub fn clamp_position(position: Duration, duration: Duration) -> Duration {
    if duration.is_zero() {
        position
    } else {
        position.min(duration)
    }
}

/// Clamp a volume to `[0.0, 1.0]`; NaN becomes silence
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// Convert engine-reported seconds into a position, mapping negative and
/// non-finite values to zero
pub fn position_from_secs(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
}

#[derive(Debug, Clone)]
struct LoadedSource {
    track_id: String,
    duration: Duration,
    generation: Generation,
}

/// Owner of the single media engine instance
pub struct EngineAdapter {
    engine: Box<dyn MediaEngine>,
    events_tx: Sender<StampedEvent>,
    events_rx: Receiver<StampedEvent>,
    loaded: Option<LoadedSource>,
    volume: f32,
}

impl EngineAdapter {
    pub fn new(engine: Box<dyn MediaEngine>, volume: f32) -> Self {
        let (events_tx, events_rx) = unbounded();
        let mut adapter = Self {
            engine,
            events_tx,
            events_rx,
            loaded: None,
            volume: clamp_volume(volume),
        };
        adapter.engine.set_volume(adapter.volume);
        adapter
    }

    /// Hand `track` to the engine under `generation`
    ///
    /// Unplayable tracks fail immediately with `UnsupportedSource` and leave
    /// the engine untouched.
    pub fn load(&mut self, track: &Track, generation: Generation) -> Result<()> {
        if !track.is_playable() {
            warn!(track_id = %track.id, uri = %track.source_uri, "Refusing to load unplayable source");
            return Err(PlaybackError::UnsupportedSource {
                track_id: track.id.clone(),
                uri: track.source_uri.clone(),
            });
        }

        debug!(track_id = %track.id, uri = %track.source_uri, generation = %generation, "Loading source");

        self.loaded = Some(LoadedSource {
            track_id: track.id.clone(),
            duration: track.duration,
            generation,
        });

        let notifier = EngineNotifier {
            generation,
            tx: self.events_tx.clone(),
        };
        self.engine.set_volume(self.volume);
        self.engine.load(&track.source_uri, notifier);
        Ok(())
    }

    /// Stop using the current source
    pub fn unload(&mut self) {
        if let Some(loaded) = self.loaded.take() {
            debug!(track_id = %loaded.track_id, generation = %loaded.generation, "Unloading source");
            self.engine.pause();
        }
    }

    pub fn play(&mut self) {
        if self.loaded.is_some() {
            self.engine.play();
        }
    }

    pub fn pause(&mut self) {
        if self.loaded.is_some() {
            self.engine.pause();
        }
    }

    /// Seek within the loaded source. Returns the clamped position, or
    /// `None` when nothing is loaded.
    pub fn seek(&mut self, position: Duration) -> Option<Duration> {
        let loaded = self.loaded.as_ref()?;
        let clamped = clamp_position(position, loaded.duration);
        self.engine.seek(clamped);
        Some(clamped)
    }

    /// Set output volume, returning the clamped value
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        self.volume = clamp_volume(volume);
        self.engine.set_volume(self.volume);
        self.volume
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Replace the descriptor duration with one reported by the engine
    pub fn set_duration(&mut self, duration: Duration) {
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.duration = duration;
        }
    }

    /// Non-zero duration reported by the engine for the loaded source
    pub fn engine_duration(&self) -> Option<Duration> {
        self.loaded.as_ref()?;
        self.engine.duration().filter(|duration| !duration.is_zero())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Position as reported by the engine, clamped to the effective duration
    pub fn current_time(&self) -> Duration {
        match &self.loaded {
            Some(loaded) => clamp_position(self.engine.current_time(), loaded.duration),
            None => Duration::ZERO,
        }
    }

    /// Next pending engine event, if any
    pub fn try_next_event(&self) -> Option<StampedEvent> {
        match self.events_rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("Engine event channel disconnected");
                None
            }
        }
    }
}
