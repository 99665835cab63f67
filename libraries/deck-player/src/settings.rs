//! Layered player settings

use crate::error::{PlayerError, Result};
use config::{Config, Environment, File, FileFormat};
use deck_playback::{Catalog, CatalogEntry, PlaybackConfig};
use deck_search::SearchConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

const DEFAULT_SETTINGS: &str = include_str!("default_settings.toml");

/// Prefix for environment overrides, e.g. `DECK__PLAYBACK__VOLUME=0.4`
pub const ENV_PREFIX: &str = "DECK";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerSettings {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub catalog: Vec<CatalogEntry>,
}

impl PlayerSettings {
    /// Load settings: built-in defaults, then `path` (if given, it must
    /// exist), then `DECK__*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_layers(
            path,
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        )
    }

    /// Built-in defaults only
    pub fn defaults() -> Result<Self> {
        Ok(Config::builder()
            .add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml))
            .build()?
            .try_deserialize()?)
    }

    fn load_layers(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml));

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading settings file");
            builder = builder.add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(true),
            );
        }

        let settings: Self = builder.add_source(env).build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        let volume = self.playback.volume;
        if !volume.is_finite() || !(0.0..=1.0).contains(&volume) {
            return Err(PlayerError::Config(format!(
                "playback.volume must be between 0.0 and 1.0, got {}",
                volume
            )));
        }

        if self.search.endpoint.trim().is_empty() {
            return Err(PlayerError::Config(
                "search.endpoint is required (set DECK__SEARCH__ENDPOINT)".to_string(),
            ));
        }

        if self.search.query_param.is_empty() {
            return Err(PlayerError::Config(
                "search.query_param cannot be empty".to_string(),
            ));
        }

        if self.search.timeout_secs == 0 {
            return Err(PlayerError::Config(
                "search.timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Build the startup catalog from the configured entries
    pub fn catalog(&self) -> Result<Catalog> {
        Ok(Catalog::from_entries(self.catalog.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_playback::RepeatMode;
    use std::collections::HashMap;

    fn env_from(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .source(Some(map))
    }

    #[test]
    fn defaults_contain_eight_track_catalog() {
        let settings = PlayerSettings::defaults().unwrap();

        assert_eq!(settings.catalog.len(), 8);
        assert_eq!(settings.catalog[0].title, "Estranged");
        assert_eq!(settings.catalog[7].id, "8");
        assert_eq!(settings.playback.volume, 0.7);
        assert_eq!(settings.playback.repeat, RepeatMode::Off);
        assert!(settings.playback.autoplay);
        assert_eq!(settings.search.timeout_secs, 15);
        settings.validate().unwrap();
        assert_eq!(settings.catalog().unwrap().len(), 8);
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = PlayerSettings::load_layers(
            None,
            env_from(&[
                ("DECK__PLAYBACK__REPEAT", "all"),
                ("DECK__PLAYBACK__SHUFFLE", "true"),
                ("DECK__SEARCH__TIMEOUT_SECS", "3"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.playback.repeat, RepeatMode::All);
        assert!(settings.playback.shuffle);
        assert_eq!(settings.search.timeout_secs, 3);
        assert_eq!(settings.catalog.len(), 8);
    }

    #[test]
    fn environment_values_are_validated() {
        let result =
            PlayerSettings::load_layers(None, env_from(&[("DECK__SEARCH__TIMEOUT_SECS", "0")]));

        assert!(matches!(result, Err(PlayerError::Config(_))));
    }

    #[test]
    fn validate_rejects_out_of_range_volume() {
        let mut settings = PlayerSettings::defaults().unwrap();
        settings.playback.volume = 1.5;
        assert!(settings.validate().is_err());

        settings.playback.volume = f32::NAN;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_endpoint() {
        let mut settings = PlayerSettings::defaults().unwrap();
        settings.search.endpoint = "  ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn duplicate_catalog_ids_are_rejected() {
        let mut settings = PlayerSettings::defaults().unwrap();
        settings.catalog[1].id = settings.catalog[0].id.clone();

        assert!(matches!(
            settings.catalog(),
            Err(PlayerError::Playback(
                deck_playback::PlaybackError::DuplicateTrackId(_)
            ))
        ));
    }
}
