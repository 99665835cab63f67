//! Deck Player
//!
//! Entry point for the UI layer hosting the music player: loads settings,
//! installs logging and wires the search gateway to the playback controller.
//!
//! # Example
//!
//! ```ignore
//! use deck_player::{logging, Player, PlayerSettings};
//!
//! logging::init_tracing(logging::DEFAULT_DIRECTIVES);
//!
//! let settings = PlayerSettings::load(None)?;
//! let mut player = Player::new(settings, Box::new(platform_engine))?;
//!
//! player.search("patience").await?;
//! if let Err(e) = player.play_search_result(0) {
//!     if e.is_unsupported_source() {
//!         // offer the external link instead
//!     }
//! }
//! ```

mod error;
pub mod logging;
mod player;
mod settings;

pub use error::{PlayerError, Result};
pub use player::Player;
pub use settings::{PlayerSettings, ENV_PREFIX};
