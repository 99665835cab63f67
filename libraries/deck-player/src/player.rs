//! Player facade wiring search picks into the playback controller.

use crate::error::Result;
use crate::settings::PlayerSettings;
use deck_playback::{MediaEngine, PlaybackController, PlaybackError, PlaybackEvent};
use deck_search::{HttpSearchClient, SearchBackend, SearchGateway, SearchOutcome, SearchResultSet};
use std::sync::Arc;
use tracing::{debug, info};

/// The music player core as seen by the UI layer.
///
/// Owns the playback controller (and through it the single media engine)
/// plus the search gateway. Searches run through a shared gateway handle so
/// the UI can keep issuing playback intents while a query is in flight.
pub struct Player {
    controller: PlaybackController,
    search: Arc<SearchGateway>,
}

impl Player {
    /// Create a player searching over HTTP as configured in `settings`.
    pub fn new(settings: PlayerSettings, engine: Box<dyn MediaEngine>) -> Result<Self> {
        settings.validate()?;
        let client = HttpSearchClient::new(settings.search.clone())?;
        info!(endpoint = %client.endpoint(), "Search client configured");
        Self::with_search_backend(settings, engine, Arc::new(client))
    }

    /// Create a player with a custom search backend.
    pub fn with_search_backend(
        settings: PlayerSettings,
        engine: Box<dyn MediaEngine>,
        backend: Arc<dyn SearchBackend>,
    ) -> Result<Self> {
        let catalog = settings.catalog()?;
        info!(
            tracks = catalog.len(),
            volume = settings.playback.volume,
            repeat = ?settings.playback.repeat,
            shuffle = settings.playback.shuffle,
            "Player initialized"
        );

        Ok(Self {
            controller: PlaybackController::new(catalog, engine, settings.playback),
            search: Arc::new(SearchGateway::new(backend)),
        })
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    /// Playback intents (toggle, seek, volume, repeat, shuffle, skip)
    pub fn controller_mut(&mut self) -> &mut PlaybackController {
        &mut self.controller
    }

    /// Shared handle for running searches off the UI task.
    pub fn search_gateway(&self) -> Arc<SearchGateway> {
        Arc::clone(&self.search)
    }

    /// Run a search; superseded responses never touch the result set.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome> {
        Ok(self.search.search(query).await?)
    }

    pub fn search_results(&self) -> SearchResultSet {
        self.search.results()
    }

    /// Play the catalog track at `index`.
    pub fn play_catalog_index(&mut self, index: usize) -> Result<()> {
        Ok(self.controller.select_index(index)?)
    }

    /// Play the search result at `index`.
    ///
    /// The controller receives a detached copy, so a later search replacing
    /// the result set does not affect the selected track. Unplayable results
    /// fail with an unsupported-source error and leave playback untouched.
    pub fn play_search_result(&mut self, index: usize) -> Result<()> {
        let track = self
            .search
            .track(index)
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;
        debug!(index, track_id = %track.id, kind = ?track.source_kind, "Search result picked");
        Ok(self.controller.select(track)?)
    }

    /// Apply queued engine events; returns how many were applied.
    pub fn process_events(&mut self) -> usize {
        self.controller.process_events()
    }

    /// Take the UI events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.controller.drain_events()
    }
}
