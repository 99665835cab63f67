//! Playback controller - the session state machine
//!
//! ```text
//!            select                ready (autoplay)
//!   Idle ─────────────▶ Loading ───────────────────▶ Playing ◀──┐
//!    ▲                     │  │    ready (no autoplay)    │ toggle │
//!    │ queue exhausted     │  └─────────────────────▶ Paused ───┘
//!    │                     │ error                       │
//!    └──── Playing         ▼                             │
//!                        Error ◀──────── error ──────────┘
//! ```
//!
//! Selecting from any non-idle state restarts the load sequence. Each
//! selection advances the load generation; engine events stamped with an
//! older generation are dropped before they can touch the session.

use crate::{
    catalog::Catalog,
    engine::{clamp_position, EngineAdapter, MediaEngine},
    error::{PlaybackError, Result},
    events::{EngineEvent, PlaybackEvent, StampedEvent},
    generation::{Generation, GenerationCounter},
    navigator::{next_index, previous_index},
    session::PlaybackSession,
    types::{PlaybackConfig, PlaybackState, RepeatMode, Track},
};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Central playback management
///
/// Single consumer of user intents and engine events. All mutation of the
/// session happens through `&mut self`, one intent or event at a time.
pub struct PlaybackController {
    catalog: Catalog,
    session: PlaybackSession,
    engine: EngineAdapter,
    load_generation: GenerationCounter,

    // Engine reported `ready` for the current load
    engine_ready: bool,
    autoplay: bool,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackController {
    pub fn new(catalog: Catalog, engine: Box<dyn MediaEngine>, config: PlaybackConfig) -> Self {
        let engine = EngineAdapter::new(engine, config.volume);
        let mut session = PlaybackSession::new(&config);
        session.volume = engine.volume();

        Self {
            catalog,
            session,
            engine,
            load_generation: GenerationCounter::new(),
            engine_ready: false,
            autoplay: config.autoplay,
            pending_events: Vec::new(),
        }
    }

    // ===== State Queries =====

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn state(&self) -> PlaybackState {
        self.session.state
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.session.current_track.as_ref()
    }

    /// Generation of the most recent selection
    pub fn load_generation(&self) -> Generation {
        self.load_generation.current()
    }

    /// Whether the engine reported `ready` for the current selection
    pub fn is_engine_ready(&self) -> bool {
        self.engine_ready
    }

    // ===== Selection =====

    /// Select `track` and start loading it
    ///
    /// Unplayable tracks are refused with `UnsupportedSource`; the session
    /// and the engine are left exactly as they were.
    pub fn select(&mut self, track: Track) -> Result<()> {
        if !track.is_playable() {
            let err = PlaybackError::UnsupportedSource {
                track_id: track.id.clone(),
                uri: track.source_uri.clone(),
            };
            warn!(track_id = %track.id, state = ?self.session.state, "Selection refused, source not playable");
            self.emit_error(&err);
            return Err(err);
        }

        let generation = self.load_generation.advance();
        self.engine.load(&track, generation)?;
        self.engine_ready = false;

        let previous_track_id = self.session.current_track.take().map(|t| t.id);
        // Search results may reuse catalog ids; only local tracks have a catalog slot
        self.session.current_index = if track.source_kind.is_remote() {
            None
        } else {
            self.catalog.index_of(&track.id)
        };
        self.session.position = Duration::ZERO;
        self.session.duration = track.duration;
        self.session.last_error = None;

        info!(
            track_id = %track.id,
            title = %track.title,
            generation = %generation,
            "Track selected"
        );

        let track_id = track.id.clone();
        self.session.current_track = Some(track);
        self.emit_track_changed(Some(track_id), previous_track_id);
        self.set_state(PlaybackState::Loading);
        Ok(())
    }

    /// Select the catalog track at `index`
    pub fn select_index(&mut self, index: usize) -> Result<()> {
        let track = self
            .catalog
            .get(index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;
        self.select(track)
    }

    /// Play button: pick the first catalog track when idle, otherwise toggle
    pub fn start(&mut self) -> Result<()> {
        if self.session.state == PlaybackState::Idle {
            if self.catalog.is_empty() {
                return Err(PlaybackError::QueueEmpty);
            }
            return self.select_index(0);
        }
        self.toggle();
        Ok(())
    }

    /// Skip to the next catalog track (manual skip always wraps)
    pub fn next(&mut self) -> Result<()> {
        let step = next_index(
            self.session.current_index,
            self.catalog.len(),
            self.session.shuffle,
        )
        .ok_or(PlaybackError::QueueEmpty)?;
        self.select_index(step.index)
    }

    /// Go to the previous catalog track in sequential order
    pub fn previous(&mut self) -> Result<()> {
        let index = previous_index(self.session.current_index, self.catalog.len())
            .ok_or(PlaybackError::QueueEmpty)?;
        self.select_index(index)
    }

    // ===== Playback Control =====

    /// Toggle between `Playing` and `Paused`
    pub fn toggle(&mut self) {
        if !self.controls_active() {
            debug!(state = ?self.session.state, "Toggle ignored, no ready track");
            return;
        }

        match self.session.state {
            PlaybackState::Playing => {
                self.engine.pause();
                self.set_state(PlaybackState::Paused);
            }
            PlaybackState::Paused => {
                self.engine.play();
                self.set_state(PlaybackState::Playing);
            }
            PlaybackState::Idle | PlaybackState::Loading | PlaybackState::Error => {}
        }
    }

    // ===== Seek =====

    /// Seek to `position`, clamped to the track duration
    pub fn seek(&mut self, position: Duration) {
        if !self.controls_active() {
            debug!(state = ?self.session.state, "Seek ignored, no ready track");
            return;
        }

        if let Some(clamped) = self.engine.seek(position) {
            self.session.position = clamped;
            self.emit_position_update();
        }
    }

    /// Seek to a fraction (0.0-1.0) of the track duration
    pub fn seek_to_fraction(&mut self, fraction: f32) {
        if self.session.duration.is_zero() {
            debug!("Fractional seek ignored, duration unknown");
            return;
        }
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self.seek(self.session.duration.mul_f32(fraction));
    }

    // ===== Volume =====

    /// Set volume, clamped to 0.0-1.0
    pub fn set_volume(&mut self, volume: f32) {
        let level = self.engine.set_volume(volume);
        self.session.volume = level;
        self.pending_events.push(PlaybackEvent::VolumeChanged { level });
    }

    pub fn volume(&self) -> f32 {
        self.session.volume
    }

    // ===== Shuffle & Repeat =====

    pub fn set_repeat(&mut self, mode: RepeatMode) {
        if self.session.repeat == mode {
            return;
        }
        self.session.repeat = mode;
        self.pending_events.push(PlaybackEvent::RepeatChanged { mode });
    }

    /// Advance none -> all -> one -> none, returning the new mode
    pub fn cycle_repeat(&mut self) -> RepeatMode {
        let mode = self.session.repeat.cycle();
        self.set_repeat(mode);
        mode
    }

    pub fn set_shuffle(&mut self, enabled: bool) {
        if self.session.shuffle == enabled {
            return;
        }
        self.session.shuffle = enabled;
        self.pending_events.push(PlaybackEvent::ShuffleChanged { enabled });
    }

    // ===== Engine Events =====

    /// Apply every queued engine event in arrival order, then poll the
    /// engine clock while playing
    ///
    /// Returns the number of events that advanced the state machine.
    pub fn process_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some(stamped) = self.engine.try_next_event() {
            if self.handle_event(stamped) {
                applied += 1;
            }
        }
        if self.session.state == PlaybackState::Playing {
            self.sync_position();
        }
        applied
    }

    /// Read the position from the engine clock into the session
    ///
    /// For engines that report time sparsely. Does nothing unless a ready
    /// track is attached.
    pub fn sync_position(&mut self) -> Duration {
        if self.controls_active() {
            let position = self.engine.current_time();
            if position != self.session.position {
                self.session.position = position;
                self.emit_position_update();
            }
        }
        self.session.position
    }

    /// Apply one engine event. Returns false if it was stale or irrelevant
    /// to the current state.
    pub fn handle_event(&mut self, stamped: StampedEvent) -> bool {
        if !self.load_generation.is_current(stamped.generation) {
            debug!(
                event_generation = %stamped.generation,
                current_generation = %self.load_generation.current(),
                event = ?stamped.event,
                "Dropping stale engine event"
            );
            return false;
        }

        match (self.session.state, stamped.event) {
            (PlaybackState::Loading, EngineEvent::Ready { duration }) => {
                self.engine_ready = true;
                let reported = duration
                    .filter(|d| !d.is_zero())
                    .or_else(|| self.engine.engine_duration());
                if let Some(duration) = reported {
                    self.engine.set_duration(duration);
                    self.session.duration = duration;
                    self.session.position = clamp_position(self.session.position, duration);
                }
                if self.autoplay {
                    self.engine.play();
                    self.set_state(PlaybackState::Playing);
                } else {
                    self.set_state(PlaybackState::Paused);
                }
            }
            (
                PlaybackState::Loading | PlaybackState::Playing | PlaybackState::Paused,
                EngineEvent::PositionUpdate(position),
            ) => {
                self.session.position = clamp_position(position, self.session.duration);
                self.emit_position_update();
            }
            // A source can end before it ever reports ready (empty file)
            (PlaybackState::Loading | PlaybackState::Playing, EngineEvent::Ended) => {
                self.on_track_ended();
            }
            (PlaybackState::Loading, EngineEvent::Error(cause)) => {
                let track_id = self.session.current_track_id().unwrap_or_default().to_string();
                self.fail(PlaybackError::Load { track_id, cause });
            }
            (PlaybackState::Playing | PlaybackState::Paused, EngineEvent::Error(cause)) => {
                let track_id = self.session.current_track_id().unwrap_or_default().to_string();
                self.fail(PlaybackError::Playback { track_id, cause });
            }
            (state, event) => {
                debug!(state = ?state, event = ?event, "Engine event ignored in current state");
                return false;
            }
        }

        true
    }

    /// Drain queued UI events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal =====

    fn controls_active(&self) -> bool {
        self.session.is_attached() && self.engine_ready
    }

    fn on_track_ended(&mut self) {
        // Repeating a source that never became ready would loop forever
        if self.session.repeat == RepeatMode::One && self.engine_ready {
            // Same source, same generation: no reselection, no reload
            debug!(track_id = ?self.session.current_track_id(), "Repeating track");
            self.engine.seek(Duration::ZERO);
            self.engine.play();
            self.session.position = Duration::ZERO;
            self.emit_position_update();
            self.set_state(PlaybackState::Playing);
            return;
        }

        let step = next_index(
            self.session.current_index,
            self.catalog.len(),
            self.session.shuffle,
        );

        match step {
            Some(step)
                if !(step.wrapped
                    && self.session.repeat == RepeatMode::Off
                    && !self.session.shuffle) =>
            {
                if let Err(err) = self.select_index(step.index) {
                    warn!(error = %err, index = step.index, "Advancing after track end failed");
                    self.go_idle();
                }
            }
            _ => {
                info!("Queue exhausted, stopping");
                self.go_idle();
            }
        }
    }

    fn fail(&mut self, err: PlaybackError) {
        warn!(error = %err, "Playback failed");
        self.engine_ready = false;
        self.engine.unload();
        self.emit_error(&err);
        self.session.last_error = Some(err);
        self.set_state(PlaybackState::Error);
    }

    fn go_idle(&mut self) {
        // Late events from the finished source must not reach the idle session
        self.load_generation.advance();
        self.engine_ready = false;
        self.engine.unload();

        let previous_track_id = self.session.current_track.take().map(|t| t.id);
        self.session.current_index = None;
        self.session.position = Duration::ZERO;
        self.session.duration = Duration::ZERO;

        self.emit_track_changed(None, previous_track_id);
        self.set_state(PlaybackState::Idle);
    }

    fn set_state(&mut self, state: PlaybackState) {
        self.session.is_playing = state == PlaybackState::Playing;
        if self.session.state == state {
            return;
        }
        debug!(from = ?self.session.state, to = ?state, "State transition");
        self.session.state = state;
        self.pending_events.push(PlaybackEvent::StateChanged { state });
    }

    fn emit_track_changed(&mut self, track_id: Option<String>, previous_track_id: Option<String>) {
        self.pending_events.push(PlaybackEvent::TrackChanged {
            track_id,
            previous_track_id,
        });
    }

    fn emit_position_update(&mut self) {
        self.pending_events.push(PlaybackEvent::PositionUpdate {
            position_ms: self.session.position.as_millis() as u64,
            duration_ms: self.session.duration.as_millis() as u64,
        });
    }

    fn emit_error(&mut self, err: &PlaybackError) {
        self.pending_events.push(PlaybackEvent::Error {
            message: err.to_string(),
            unsupported_source: err.is_unsupported_source(),
        });
    }
}
