//! Deck Player - Playback Management
//!
//! Platform-agnostic playback core for the Deck Player music widget.
//!
//! This crate provides:
//! - An immutable startup catalog of local tracks
//! - Queue navigation (sequential, weak shuffle, previous)
//! - Repeat modes (None, All, One)
//! - A media engine adapter (clamped seek/volume, unplayable sources refused)
//! - The playback state machine (Idle, Loading, Playing, Paused, Error)
//! - Generation counters that discard events from superseded loads
//!
//! # Architecture
//!
//! `deck-playback` performs no audio decoding and no network I/O. The
//! platform supplies a `MediaEngine`; the controller drives it and consumes
//! its events one at a time.
//!
//! # Example
//!
//! ```rust
//! use deck_playback::{
//!     Catalog, EngineEvent, PlaybackConfig, PlaybackController, PlaybackState, ScriptedEngine,
//!     Track,
//! };
//! use std::time::Duration;
//!
//! let catalog = Catalog::new(vec![
//!     Track::local("1", "Patience", "Guns N' Roses", Duration::from_secs(354), "/audio/patience.mp3"),
//! ])
//! .unwrap();
//!
//! let (engine, script) = ScriptedEngine::new();
//! let mut controller = PlaybackController::new(catalog, Box::new(engine), PlaybackConfig::default());
//!
//! controller.select_index(0).unwrap();
//! assert_eq!(controller.state(), PlaybackState::Loading);
//!
//! // The engine reports readiness asynchronously
//! script.fire(EngineEvent::Ready { duration: None });
//! controller.process_events();
//! assert_eq!(controller.state(), PlaybackState::Playing);
//! ```

mod catalog;
mod controller;
mod engine;
mod error;
mod events;
mod generation;
pub mod navigator;
#[cfg(any(test, feature = "test-util"))]
mod scripted;
mod session;
pub mod types;

// Public exports
pub use catalog::{Catalog, CatalogEntry};
pub use controller::PlaybackController;
pub use engine::{
    clamp_position, clamp_volume, position_from_secs, EngineAdapter, EngineNotifier, MediaEngine,
};
pub use error::{PlaybackError, Result};
pub use events::{EngineEvent, PlaybackEvent, StampedEvent};
pub use generation::{Generation, GenerationCounter};
pub use navigator::Step;
#[cfg(any(test, feature = "test-util"))]
pub use scripted::{EngineCommand, ScriptedEngine, ScriptedEngineHandle};
pub use session::PlaybackSession;
pub use types::{format_position, PlaybackConfig, PlaybackState, RepeatMode, SourceKind, Track};
