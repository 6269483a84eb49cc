//! Scenario configuration.
//!
//! Every section falls back to its defaults, so a configuration file only
//! needs to name the values it changes:
//!
//! ```json
//! { "biome": "Dfc", "building": { "stories": 8 }, "seed": 7 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::building::{BuildingSpec, DynamicsParameters};
use crate::debris::DebrisConfig;
use crate::loads::{SeismicConfig, WindConfig};
use crate::terrain::DEFAULT_BIOME_CODE;
use crate::{
    DEFAULT_PIXELS_PER_METRE, DEFAULT_TIMESTEP, DEFAULT_WORLD_HEIGHT, DEFAULT_WORLD_WIDTH,
    MAX_STORIES,
};

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The contents were not valid configuration JSON.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is outside its meaningful range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Pixel dimensions of the world and how metres map onto them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World width in pixels.
    pub width: f64,
    /// World height in pixels.
    pub height: f64,
    /// Pixels per metre of building and debris.
    pub pixels_per_metre: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WORLD_WIDTH,
            height: DEFAULT_WORLD_HEIGHT,
            pixels_per_metre: DEFAULT_PIXELS_PER_METRE,
        }
    }
}

impl WorldConfig {
    /// Converts a length in metres to world pixels.
    #[must_use]
    pub fn to_pixels(&self, metres: f64) -> f64 {
        metres * self.pixels_per_metre
    }

    /// Converts a length in world pixels to metres.
    #[must_use]
    pub fn to_metres(&self, pixels: f64) -> f64 {
        pixels / self.pixels_per_metre
    }
}

/// Complete description of a simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// World dimensions and scale.
    pub world: WorldConfig,
    /// Biome code selecting the terrain profile.
    pub biome: String,
    /// Seed for debris generation.
    pub seed: u64,
    /// Fixed frame timestep in seconds.
    pub timestep: f64,
    /// Building geometry and material.
    pub building: BuildingSpec,
    /// Spring, damper and failure settings.
    pub dynamics: DynamicsParameters,
    /// Wind load settings.
    pub wind: WindConfig,
    /// Seismic event settings.
    pub seismic: SeismicConfig,
    /// Fragment generation and settling.
    pub debris: DebrisConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            biome: DEFAULT_BIOME_CODE.to_owned(),
            seed: 42,
            timestep: DEFAULT_TIMESTEP,
            building: BuildingSpec::default(),
            dynamics: DynamicsParameters::default(),
            wind: WindConfig::default(),
            seismic: SeismicConfig::default(),
            debris: DebrisConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the JSON file at `path`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`SimulationConfig::from_json_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks values the simulation cannot recover from.
    ///
    /// Unknown biome codes are not an error; they fall back at lookup time.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("world.width", self.world.width),
            ("world.height", self.world.height),
            ("world.pixels_per_metre", self.world.pixels_per_metre),
            ("timestep", self.timestep),
            ("seismic.duration", self.seismic.duration),
            ("debris.time_budget", self.debris.time_budget),
            ("dynamics.stiffness", self.dynamics.stiffness),
            ("dynamics.max_safe_angle", self.dynamics.max_safe_angle),
            (
                "seismic.liquefaction_stiffness_multiplier",
                self.seismic.liquefaction_stiffness_multiplier,
            ),
            (
                "seismic.liquefaction_threshold_g",
                self.seismic.liquefaction_threshold_g,
            ),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let non_negative = [
            ("dynamics.damping", self.dynamics.damping),
            ("seismic.shake_frequency_hz", self.seismic.shake_frequency_hz),
            ("wind.air_density", self.wind.air_density),
            ("wind.drag_coefficient", self.wind.drag_coefficient),
            ("debris.jitter_fraction", self.debris.jitter_fraction),
            ("debris.upward_kick", self.debris.upward_kick),
            ("debris.lean_bias", self.debris.lean_bias),
            ("debris.lateral_spread", self.debris.lateral_spread),
            ("debris.max_spin", self.debris.max_spin),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        if self.building.stories > MAX_STORIES {
            return Err(ConfigError::Invalid(format!(
                "building.stories must be at most {MAX_STORIES}, got {}",
                self.building.stories
            )));
        }
        if self.debris.slices_per_story == 0 {
            return Err(ConfigError::Invalid(
                "debris.slices_per_story must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_object_yields_defaults() {
        let config = SimulationConfig::from_json_str("{}");
        assert!(matches!(config, Ok(ref c) if *c == SimulationConfig::default()));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let json = r#"{ "biome": "ET", "building": { "stories": 8, "material": "wood" } }"#;
        let Ok(config) = SimulationConfig::from_json_str(json) else {
            panic!("partial config should parse");
        };
        assert_eq!(config.biome, "ET");
        assert_eq!(config.building.stories, 8);
        assert_eq!(config.building.material, crate::MaterialKind::Wood);
        assert!((config.building.story_height - 3.0).abs() < f64::EPSILON);
        assert_eq!(config.dynamics, DynamicsParameters::default());
    }

    #[rstest]
    #[case(r#"{ "timestep": 0.0 }"#, "timestep")]
    #[case(r#"{ "world": { "width": -5.0 } }"#, "world.width")]
    #[case(r#"{ "debris": { "slices_per_story": 0 } }"#, "slices_per_story")]
    #[case(r#"{ "debris": { "max_spin": -1.0 } }"#, "debris.max_spin")]
    #[case(r#"{ "dynamics": { "max_safe_angle": -0.1 } }"#, "dynamics.max_safe_angle")]
    #[case(r#"{ "dynamics": { "stiffness": 0.0 } }"#, "dynamics.stiffness")]
    #[case(r#"{ "dynamics": { "damping": -1.0 } }"#, "dynamics.damping")]
    #[case(
        r#"{ "seismic": { "liquefaction_stiffness_multiplier": -0.2 } }"#,
        "liquefaction_stiffness_multiplier"
    )]
    #[case(r#"{ "building": { "stories": 4294967295 } }"#, "building.stories")]
    fn invalid_values_are_named(#[case] json: &str, #[case] field: &str) {
        match SimulationConfig::from_json_str(json) {
            Err(ConfigError::Invalid(message)) => assert!(message.contains(field), "{message}"),
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            SimulationConfig::from_json_str("{ biome: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = SimulationConfig::load(Path::new("/nonexistent/quakesway.json"));
        match err {
            Err(ConfigError::Io { path, .. }) => assert!(path.ends_with("quakesway.json")),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
