use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunables for the brain and its navigator.
///
/// Loaded once at startup from RON. Missing fields take their defaults, so a
/// config file only needs to list what it overrides.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BrainConfig {
    /// How often a path towards a moving entity is recomputed.
    pub entity_poll_interval_secs: f32,
    /// Fraction of the shorter tile edge within which a waypoint counts as reached.
    pub snap_fraction: f32,
    /// Searches slower than this are reported with `warn!`.
    pub slow_search_warn_ms: u64,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            entity_poll_interval_secs: 1.0,
            snap_fraction: 0.25,
            slow_search_warn_ms: 50,
        }
    }
}

impl BrainConfig {
    pub fn from_ron(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(contents)
    }

    /// Read the config at `path`, falling back to defaults on any failure.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_ron(&contents) {
                Ok(config) => {
                    info!("Loaded brain config from {}", path.display());
                    config
                }
                Err(e) => {
                    error!("Failed to parse brain config: {}", e);
                    error!("Using default BrainConfig");
                    Self::default()
                }
            },
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                error!("Using default BrainConfig");
                Self::default()
            }
        }
    }

    /// Negative values clamp to zero; values too large for a `Duration` fall
    /// back to the default interval.
    pub fn entity_poll_interval(&self) -> Duration {
        match Duration::try_from_secs_f32(self.entity_poll_interval_secs.max(0.0)) {
            Ok(interval) => interval,
            Err(e) => {
                let fallback = Self::default().entity_poll_interval_secs;
                warn!("Invalid entity_poll_interval_secs {}: {}, using {}s",
                      self.entity_poll_interval_secs, e, fallback);
                Duration::from_secs_f32(fallback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = BrainConfig::from_ron("(snap_fraction: 0.5)").unwrap();
        assert_eq!(config.snap_fraction, 0.5);
        assert_eq!(config.entity_poll_interval_secs, 1.0);
        assert_eq!(config.slow_search_warn_ms, 50);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(BrainConfig::from_ron("(snap_fraction: \"wide\")").is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = BrainConfig::load("does/not/exist/brain_config.ron");
        assert_eq!(config, BrainConfig::default());
    }

    #[test]
    fn test_poll_interval_duration() {
        let config = BrainConfig {
            entity_poll_interval_secs: 0.25,
            ..default()
        };
        assert_eq!(config.entity_poll_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_out_of_range_poll_interval_uses_default() {
        for secs in [1e30, f32::INFINITY] {
            let config = BrainConfig {
                entity_poll_interval_secs: secs,
                ..default()
            };
            assert_eq!(config.entity_poll_interval(), Duration::from_secs(1));
        }

        let config = BrainConfig {
            entity_poll_interval_secs: -3.0,
            ..default()
        };
        assert_eq!(config.entity_poll_interval(), Duration::ZERO);
    }
}
