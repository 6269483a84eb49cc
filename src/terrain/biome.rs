//! Static biome table and total code resolution.
//!
//! Codes loosely follow the Köppen climate classification. Only the
//! terrain-shaping fields live here; sky and ground colours belong to the
//! presentation layer.

use log::warn;
use serde::{Deserialize, Serialize};

/// Biome used whenever a requested code is unknown.
pub const DEFAULT_BIOME_CODE: &str = "Af";

/// Shape of the periodic ground profile for one biome.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainParameters {
    /// Peak deviation from the base height, in world pixels.
    pub amplitude: f64,
    /// Angular frequency of the profile in radians per pixel.
    pub frequency: f64,
    /// Phase offset in radians.
    pub phase_shift: f64,
    /// Average ground level as a fraction of world height.
    pub base_height_factor: f64,
}

struct BiomeEntry {
    code: &'static str,
    terrain: TerrainParameters,
}

const BIOMES: [BiomeEntry; 5] = [
    // Tropical rainforest
    BiomeEntry {
        code: "Af",
        terrain: TerrainParameters {
            amplitude: 40.0,
            frequency: 0.005,
            phase_shift: 1.0,
            base_height_factor: 2.0 / 3.0,
        },
    },
    // Hot desert: lower base for dunes
    BiomeEntry {
        code: "BWh",
        terrain: TerrainParameters {
            amplitude: 25.0,
            frequency: 0.003,
            phase_shift: 0.5,
            base_height_factor: 0.7,
        },
    },
    // Tundra
    BiomeEntry {
        code: "ET",
        terrain: TerrainParameters {
            amplitude: 15.0,
            frequency: 0.002,
            phase_shift: 2.0,
            base_height_factor: 0.75,
        },
    },
    // Humid subtropical
    BiomeEntry {
        code: "Cfa",
        terrain: TerrainParameters {
            amplitude: 30.0,
            frequency: 0.004,
            phase_shift: 1.5,
            base_height_factor: 0.68,
        },
    },
    // Subarctic taiga
    BiomeEntry {
        code: "Dfc",
        terrain: TerrainParameters {
            amplitude: 50.0,
            frequency: 0.006,
            phase_shift: 0.0,
            base_height_factor: 0.75,
        },
    },
];

const DEFAULT_TERRAIN: TerrainParameters = BIOMES[0].terrain;

/// Looks up `code` without any fallback.
#[must_use]
pub fn lookup(code: &str) -> Option<TerrainParameters> {
    BIOMES
        .iter()
        .find(|entry| entry.code == code)
        .map(|entry| entry.terrain)
}

/// Resolves `code` to its terrain parameters.
///
/// Unknown codes are reported with a warning and resolve to the parameters of
/// [`DEFAULT_BIOME_CODE`]. The function never fails.
///
/// # Examples
/// ```
/// use quakesway::terrain::{resolve, DEFAULT_BIOME_CODE};
/// assert_eq!(resolve("Xyz"), resolve(DEFAULT_BIOME_CODE));
/// ```
#[must_use]
pub fn resolve(code: &str) -> TerrainParameters {
    lookup(code).unwrap_or_else(|| {
        warn!("biome code '{code}' not found; using default biome '{DEFAULT_BIOME_CODE}'");
        DEFAULT_TERRAIN
    })
}

/// Returns `true` when `code` names a biome in the table.
#[must_use]
pub fn is_known(code: &str) -> bool {
    lookup(code).is_some()
}

/// Lists the available biome codes in table order.
#[must_use]
pub fn available_biomes() -> Vec<&'static str> {
    BIOMES.iter().map(|entry| entry.code).collect()
}
