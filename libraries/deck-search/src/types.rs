//! Types for the search service requests and responses.

use deck_playback::{position_from_secs, Generation, SourceKind, Track};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Configuration for the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Full URL of the search endpoint
    pub endpoint: String,
    /// Name of the query-string parameter carrying the search term
    pub query_param: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl SearchConfig {
    /// Create a config for `endpoint` with default parameter name and timeout.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://applet-suite-backend.onrender.com/api/musica/buscar".to_string(),
            query_param: "query".to_string(),
            timeout_secs: 15,
        }
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// Track descriptor as returned by the search service.
///
/// Accepts both the documented field names and the legacy service's
/// (`videoId`, `titulo`, `artista`, `duracion`, `url`, `portada`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTrack {
    #[serde(alias = "videoId", deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, alias = "titulo")]
    pub title: String,
    #[serde(default, alias = "artista")]
    pub artist: String,
    #[serde(default, alias = "duracion")]
    pub duration_seconds: Option<f64>,
    /// Directly streamable audio URL, when the service resolved one
    #[serde(default, alias = "streamUrl")]
    pub stream_uri: Option<String>,
    /// Page link for items without a stream (e.g. a video page)
    #[serde(default, alias = "url")]
    pub page_uri: Option<String>,
    #[serde(default, alias = "portada")]
    pub artwork_uri: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

impl RemoteTrack {
    /// Map into a `Track`, deciding playability from the stream URI.
    pub fn into_track(self) -> Track {
        let stream = self.stream_uri.filter(|uri| !uri.trim().is_empty());
        let (source_uri, source_kind) = match stream {
            Some(uri) => (uri, SourceKind::RemotePlayable),
            None => (
                self.page_uri.unwrap_or_default(),
                SourceKind::RemoteUnplayable,
            ),
        };

        Track {
            id: self.id,
            title: self.title,
            artist: self.artist,
            duration: position_from_secs(self.duration_seconds.unwrap_or(0.0)),
            source_uri,
            artwork_uri: self.artwork_uri.filter(|uri| !uri.is_empty()),
            source_kind,
        }
    }
}

/// Deduplicate by id (first occurrence wins, order preserved) and map to tracks.
pub fn build_tracks(raw: Vec<RemoteTrack>) -> Vec<Track> {
    let mut seen = HashSet::with_capacity(raw.len());
    raw.into_iter()
        .filter(|entry| seen.insert(entry.id.clone()))
        .map(RemoteTrack::into_track)
        .collect()
}

// =============================================================================
// Result Types
// =============================================================================

/// Tracks found by the most recent applied search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResultSet {
    /// Query that produced these results (empty for a cleared set)
    pub query: String,
    /// Search generation that produced these results
    pub generation: Generation,
    pub tracks: Vec<Track>,
}

impl SearchResultSet {
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|track| track.id == id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// What happened to a `search` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results replaced the result set
    Applied { generation: Generation, results: usize },
    /// Blank query; the result set was cleared without a request
    Cleared,
    /// A newer search was issued meanwhile; this response was discarded
    Superseded { generation: Generation },
}
