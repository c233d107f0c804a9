//! Generation and rule parameters.
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::Resources;

/// World generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorldConfig {
    /// Grid width in tiles.
    pub cols: u16,
    /// Grid height in tiles.
    pub rows: u16,
    /// Rendered hex size.
    pub spacing: f64,
    /// Frequency of the elevation field.
    pub elevation_frequency: f64,
    /// Frequency of the biome field.
    pub biome_frequency: f64,
    /// Octaves of both fields.
    pub octaves: usize,
    /// Upper edges of elevation bands 1-3 on the normalized sample.
    pub band_edges: [f64; 3],
    /// Chance that a band-4 mountain starts a river.
    pub river_source_chance: f64,
    /// Longest river walk.
    pub river_max_steps: u32,
    /// Step from which a river may end in a lake.
    pub river_decay_start: u32,
    /// Smallest hex distance between the start and the fortress.
    pub min_fortress_distance: u32,
    /// Raiders garrisoned at the fortress at generation.
    pub initial_raiders: usize,
    /// Neutral drifter camps to place.
    pub neutral_sites: usize,
    /// Smallest hex distance between the start and a drifter camp.
    pub neutral_min_distance: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            cols: 24,
            rows: 18,
            spacing: crate::game::DEFAULT_SPACING,
            elevation_frequency: 0.12,
            biome_frequency: 0.2,
            octaves: 4,
            band_edges: [0.38, 0.5, 0.62],
            river_source_chance: 0.04,
            river_max_steps: 10,
            river_decay_start: 8,
            min_fortress_distance: 6,
            initial_raiders: 2,
            neutral_sites: 3,
            neutral_min_distance: 3,
        }
    }
}

/// Turn and economy rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RulesConfig {
    /// Per-fortress chance to spawn a raider each turn.
    pub spawn_chance: f64,
    /// Raiders a fortress supports before it stops spawning.
    pub max_pack_size: usize,
    /// Outposts allowed per shelter.
    pub outposts_per_shelter: usize,
    /// Stockpile at generation.
    pub starting_resources: Resources,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            spawn_chance: 0.10,
            max_pack_size: 4,
            outposts_per_shelter: 3,
            starting_resources: Resources::new(20, 30, 5),
        }
    }
}

/// Complete configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Generation parameters.
    pub world: WorldConfig,
    /// Rule parameters.
    pub rules: RulesConfig,
}

/// Failure to read a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Config path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid config document.
    #[error("invalid config {path}: {source}")]
    Parse {
        /// Config path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

impl GameConfig {
    /// Load a JSON config file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"world": {"cols": 10}, "rules": {"spawnChance": 0.5}}"#)
                .unwrap();
        assert_eq!(config.world.cols, 10);
        assert_eq!(config.world.rows, WorldConfig::default().rows);
        assert!((config.rules.spawn_chance - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.rules.max_pack_size, 4);
    }

    #[test]
    fn test_load_missing_file() {
        let err = GameConfig::load(Path::new("/nonexistent/frontier.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
