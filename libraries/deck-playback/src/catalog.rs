//! Immutable startup track catalog

use crate::error::{PlaybackError, Result};
use crate::types::{SourceKind, Track};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Track descriptor as supplied by the catalog source (static configuration)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub duration_secs: f64,
    pub source_uri: String,
    #[serde(default)]
    pub artwork_uri: Option<String>,
}

impl CatalogEntry {
    fn into_track(self) -> Result<Track> {
        let duration = Duration::try_from_secs_f64(self.duration_secs).map_err(|_| {
            PlaybackError::InvalidCatalogEntry {
                id: self.id.clone(),
                reason: format!("invalid duration {}", self.duration_secs),
            }
        })?;

        Ok(Track {
            id: self.id,
            title: self.title,
            artist: self.artist,
            duration,
            source_uri: self.source_uri,
            artwork_uri: self.artwork_uri,
            source_kind: SourceKind::Local,
        })
    }
}

/// Ordered, read-only sequence of local tracks
///
/// Built once at startup; nothing can add, remove or reorder entries
/// afterwards. Track ids are unique.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Build a catalog from tracks, rejecting duplicate ids and non-local entries
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(tracks.len());

        for track in &tracks {
            if track.source_kind != SourceKind::Local {
                return Err(PlaybackError::InvalidCatalogEntry {
                    id: track.id.clone(),
                    reason: "catalog entries must be local tracks".to_string(),
                });
            }
            if !seen.insert(track.id.as_str()) {
                return Err(PlaybackError::DuplicateTrackId(track.id.clone()));
            }
        }

        Ok(Self { tracks })
    }

    /// Build a catalog from configuration descriptors
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self> {
        let tracks = entries
            .into_iter()
            .map(CatalogEntry::into_track)
            .collect::<Result<Vec<_>>>()?;
        Self::new(tracks)
    }

    /// Track at `index`
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Position of the track with `id`
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|track| track.id == id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> Track {
        Track::local(
            id,
            format!("Track {}", id),
            "Test Artist",
            Duration::from_secs(180),
            format!("/audio/{}.mp3", id),
        )
    }

    #[test]
    fn lookup_by_index_and_id() {
        let catalog = Catalog::new(vec![track("a"), track("b"), track("c")]).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(1).map(|t| t.id.as_str()), Some("b"));
        assert_eq!(catalog.index_of("c"), Some(2));
        assert_eq!(catalog.index_of("missing"), None);
        assert!(catalog.get(3).is_none());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let result = Catalog::new(vec![track("a"), track("b"), track("a")]);
        assert_eq!(
            result.unwrap_err(),
            PlaybackError::DuplicateTrackId("a".to_string())
        );
    }

    #[test]
    fn remote_tracks_rejected() {
        let mut remote = track("r");
        remote.source_kind = SourceKind::RemotePlayable;

        let result = Catalog::new(vec![track("a"), remote]);
        assert!(matches!(
            result,
            Err(PlaybackError::InvalidCatalogEntry { ref id, .. }) if id == "r"
        ));
    }

    #[test]
    fn entries_become_local_tracks() {
        let entries = vec![CatalogEntry {
            id: "1".to_string(),
            title: "Patience".to_string(),
            artist: "Guns N' Roses".to_string(),
            duration_secs: 354.0,
            source_uri: "/audio/patience.mp3".to_string(),
            artwork_uri: None,
        }];

        let catalog = Catalog::from_entries(entries).unwrap();
        let first = catalog.get(0).unwrap();
        assert_eq!(first.source_kind, SourceKind::Local);
        assert_eq!(first.duration, Duration::from_secs(354));
    }

    #[test]
    fn negative_duration_rejected() {
        let entries = vec![CatalogEntry {
            id: "1".to_string(),
            title: "Broken".to_string(),
            artist: "Nobody".to_string(),
            duration_secs: -3.0,
            source_uri: "/audio/broken.mp3".to_string(),
            artwork_uri: None,
        }];

        assert!(matches!(
            Catalog::from_entries(entries),
            Err(PlaybackError::InvalidCatalogEntry { .. })
        ));
    }

    #[test]
    fn empty_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.get(0).is_none());
    }
}
