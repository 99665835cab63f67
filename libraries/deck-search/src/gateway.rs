//! Search gateway: owns the live result set and discards superseded responses.

use crate::client::SearchBackend;
use crate::error::{Result, SearchError};
use crate::types::{build_tracks, SearchOutcome, SearchResultSet};
use deck_playback::{Generation, GenerationCounter, Track};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct GatewayState {
    generation: GenerationCounter,
    results: SearchResultSet,
    /// Generation of the request still awaited, if any
    in_flight: Option<Generation>,
    last_error: Option<SearchError>,
}

/// Runs searches against a backend and keeps the most recent result set.
///
/// Every `search` call advances the search generation before the request is
/// sent. When a response arrives it is applied only if no newer `search` was
/// issued in the meantime; otherwise it is dropped, whether it succeeded or
/// failed. Check and apply happen under one lock.
pub struct SearchGateway {
    backend: Arc<dyn SearchBackend>,
    state: Mutex<GatewayState>,
}

impl SearchGateway {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(GatewayState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GatewayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Search for `query`, replacing the result set if this is still the
    /// latest search when the response arrives.
    ///
    /// A blank query clears the result set without any request. On failure
    /// the previous result set is kept and the error is returned; a failure
    /// of a superseded search is swallowed and reported as `Superseded`.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome> {
        if query.trim().is_empty() {
            let mut state = self.lock();
            let generation = state.generation.advance();
            state.results = SearchResultSet {
                generation,
                ..SearchResultSet::default()
            };
            state.in_flight = None;
            state.last_error = None;
            debug!(generation = %generation, "Blank query, search results cleared");
            return Ok(SearchOutcome::Cleared);
        }

        let generation = {
            let mut state = self.lock();
            let generation = state.generation.advance();
            state.in_flight = Some(generation);
            generation
        };
        debug!(query = %query, generation = %generation, "Search issued");

        let fetched = self.backend.fetch(query).await;

        let mut state = self.lock();
        if !state.generation.is_current(generation) {
            debug!(
                query = %query,
                generation = %generation,
                current = %state.generation.current(),
                failed = fetched.is_err(),
                "Discarding superseded search response"
            );
            return Ok(SearchOutcome::Superseded { generation });
        }
        state.in_flight = None;

        match fetched {
            Ok(raw) => {
                let tracks = build_tracks(raw);
                let results = tracks.len();
                state.results = SearchResultSet {
                    query: query.to_string(),
                    generation,
                    tracks,
                };
                state.last_error = None;
                info!(query = %query, results, "Search results applied");
                Ok(SearchOutcome::Applied {
                    generation,
                    results,
                })
            }
            Err(e) => {
                warn!(query = %query, error = %e, "Search failed, keeping previous results");
                state.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Snapshot of the current result set.
    pub fn results(&self) -> SearchResultSet {
        self.lock().results.clone()
    }

    /// Detached copy of the result at `index`.
    ///
    /// The copy stays valid after the result set is replaced.
    pub fn track(&self, index: usize) -> Option<Track> {
        self.lock().results.get(index).cloned()
    }

    /// Detached copy of the result with `id`.
    pub fn find(&self, id: &str) -> Option<Track> {
        self.lock().results.find(id).cloned()
    }

    /// Generation of the most recently issued search.
    pub fn current_generation(&self) -> Generation {
        self.lock().generation.current()
    }

    /// Whether the latest search is still awaiting its response.
    pub fn is_searching(&self) -> bool {
        self.lock().in_flight.is_some()
    }

    /// Error of the latest completed search, cleared by the next success.
    pub fn last_error(&self) -> Option<SearchError> {
        self.lock().last_error.clone()
    }
}
