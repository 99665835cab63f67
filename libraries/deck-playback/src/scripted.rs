//! Headless media engine
//!
//! `ScriptedEngine` records every command it receives and never produces
//! events on its own. A test (or a UI preview) drives it through the paired
//! `ScriptedEngineHandle`, firing `ready`/`ended`/`error` exactly when it
//! wants them, including late events from superseded loads.
//!
//! Only built with the `test-util` feature.

use crate::engine::{EngineNotifier, MediaEngine};
use crate::events::EngineEvent;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Command received by the scripted engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    Load(String),
    Play,
    Pause,
    Seek(Duration),
    SetVolume(f32),
}

#[derive(Debug, Default)]
struct ScriptState {
    commands: Vec<EngineCommand>,
    notifiers: Vec<EngineNotifier>,
    position: Duration,
    duration: Option<Duration>,
}

/// Engine side, handed to the adapter
#[derive(Debug)]
pub struct ScriptedEngine {
    state: Arc<Mutex<ScriptState>>,
}

/// Script side, kept by the caller
#[derive(Debug, Clone)]
pub struct ScriptedEngineHandle {
    state: Arc<Mutex<ScriptState>>,
}

fn lock(state: &Mutex<ScriptState>) -> MutexGuard<'_, ScriptState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScriptedEngine {
    pub fn new() -> (Self, ScriptedEngineHandle) {
        let state = Arc::new(Mutex::new(ScriptState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            ScriptedEngineHandle { state },
        )
    }
}

impl MediaEngine for ScriptedEngine {
    fn load(&mut self, uri: &str, notifier: EngineNotifier) {
        let mut state = lock(&self.state);
        state.commands.push(EngineCommand::Load(uri.to_string()));
        state.notifiers.push(notifier);
        state.position = Duration::ZERO;
        state.duration = None;
    }

    fn play(&mut self) {
        lock(&self.state).commands.push(EngineCommand::Play);
    }

    fn pause(&mut self) {
        lock(&self.state).commands.push(EngineCommand::Pause);
    }

    fn seek(&mut self, position: Duration) {
        let mut state = lock(&self.state);
        state.commands.push(EngineCommand::Seek(position));
        state.position = position;
    }

    fn set_volume(&mut self, volume: f32) {
        lock(&self.state).commands.push(EngineCommand::SetVolume(volume));
    }

    fn current_time(&self) -> Duration {
        lock(&self.state).position
    }

    fn duration(&self) -> Option<Duration> {
        lock(&self.state).duration
    }
}

impl ScriptedEngineHandle {
    /// Commands received so far
    pub fn commands(&self) -> Vec<EngineCommand> {
        lock(&self.state).commands.clone()
    }

    pub fn clear_commands(&self) {
        lock(&self.state).commands.clear();
    }

    /// Number of `load` calls received
    pub fn load_count(&self) -> usize {
        lock(&self.state)
            .commands
            .iter()
            .filter(|command| matches!(command, EngineCommand::Load(_)))
            .count()
    }

    /// Notifier of the most recent load
    pub fn latest_notifier(&self) -> Option<EngineNotifier> {
        lock(&self.state).notifiers.last().cloned()
    }

    /// Notifier of the `n`-th load (0-based), for replaying stale events
    pub fn notifier(&self, n: usize) -> Option<EngineNotifier> {
        lock(&self.state).notifiers.get(n).cloned()
    }

    /// Fire `event` for the most recent load. Returns false if nothing was
    /// loaded yet.
    ///
    /// A position update also moves the engine clock, as a real engine's
    /// `timeupdate` would.
    pub fn fire(&self, event: EngineEvent) -> bool {
        if let EngineEvent::PositionUpdate(position) = event {
            self.set_position(position);
        }
        match self.latest_notifier() {
            Some(notifier) => notifier.send(event),
            None => false,
        }
    }

    /// Set what the engine reports as its playback position
    pub fn set_position(&self, position: Duration) {
        lock(&self.state).position = position;
    }

    /// Set what the engine reports as the source duration
    pub fn set_duration(&self, duration: Option<Duration>) {
        lock(&self.state).duration = duration;
    }
}
