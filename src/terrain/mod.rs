//! Procedural side-view terrain.
//!
//! The ground is a sinusoid whose shape comes from the active biome. Heights
//! use screen convention: `y` grows downward from the top of the world, so a
//! larger height value means lower ground. Both the debris settling code and
//! the renderer query the same function.

mod biome;

pub use biome::{
    available_biomes, is_known, lookup, resolve, TerrainParameters, DEFAULT_BIOME_CODE,
};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::numeric::{count_to_f64, floor_to_usize};
use crate::{LIQUEFACTION_AMPLITUDE_BOOST, LIQUEFACTION_OFFSET};

/// Minimum number of samples in a generated ground polygon.
const MIN_POLYGON_SAMPLES: usize = 50;
/// World pixels covered by each polygon sample by default.
const PIXELS_PER_SAMPLE: f64 = 10.0;

/// Soil-softening modulation applied on top of the biome profile.
///
/// `scale` runs from 0 (firm ground) to 1 (fully liquefied). `phase` is
/// advanced by the caller's clock; the terrain stores no time of its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Liquefaction {
    /// Strength of the effect in `0.0..=1.0`.
    pub scale: f64,
    /// Phase of the jiggle sinusoid in radians.
    pub phase: f64,
}

impl Liquefaction {
    /// Firm ground.
    pub const NONE: Self = Self {
        scale: 0.0,
        phase: 0.0,
    };

    /// Returns `true` when the modulation has a visible effect.
    #[must_use]
    pub fn is_active(self) -> bool {
        self.scale > 0.0
    }
}

/// Height queries over a world of fixed pixel dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    world_width: f64,
    world_height: f64,
}

impl Terrain {
    /// Creates a terrain spanning `world_width` × `world_height` pixels.
    #[must_use]
    pub const fn new(world_width: f64, world_height: f64) -> Self {
        Self {
            world_width,
            world_height,
        }
    }

    /// World width in pixels.
    #[must_use]
    pub const fn world_width(&self) -> f64 {
        self.world_width
    }

    /// World height in pixels.
    #[must_use]
    pub const fn world_height(&self) -> f64 {
        self.world_height
    }

    /// Ground height at `x` for the biome named by `biome_code`.
    ///
    /// The result is clamped into `[0, world_height - 1]`. Unknown biome codes
    /// fall back to [`DEFAULT_BIOME_CODE`].
    ///
    /// # Examples
    /// ```
    /// use quakesway::terrain::{Liquefaction, Terrain};
    /// let terrain = Terrain::new(1280.0, 720.0);
    /// let y = terrain.height_at(0.0, "ET", Liquefaction::NONE);
    /// assert!(y > 500.0 && y < 560.0);
    /// ```
    #[must_use]
    pub fn height_at(&self, x: f64, biome_code: &str, liquefaction: Liquefaction) -> f64 {
        self.height_with(&resolve(biome_code), x, liquefaction)
    }

    /// Ground height at `x` for already resolved parameters.
    #[must_use]
    pub fn height_with(&self, params: &TerrainParameters, x: f64, liquefaction: Liquefaction) -> f64 {
        let base = self.world_height * params.base_height_factor;
        let (amplitude, offset) = if liquefaction.is_active() {
            let wobble = liquefaction.phase.sin();
            (
                params.amplitude * (1.0 + liquefaction.scale * LIQUEFACTION_AMPLITUDE_BOOST * wobble),
                liquefaction.scale * LIQUEFACTION_OFFSET * wobble,
            )
        } else {
            (params.amplitude, 0.0)
        };
        let y = base + offset + amplitude * (params.frequency * x + params.phase_shift).sin();
        y.clamp(0.0, (self.world_height - 1.0).max(0.0))
    }

    /// Default number of polygon samples: one every ten pixels, at least 50.
    #[must_use]
    pub fn default_sample_count(&self) -> usize {
        floor_to_usize(self.world_width / PIXELS_PER_SAMPLE)
            .unwrap_or(0)
            .max(MIN_POLYGON_SAMPLES)
    }

    /// Samples the ground across the world width as a closed fill polygon.
    ///
    /// The first `num_points + 1` points trace the surface from `x = 0` to
    /// `x = world_width`; the last two are the bottom-right and bottom-left
    /// world corners. `None` selects [`Terrain::default_sample_count`].
    #[must_use]
    pub fn ground_polygon(&self, biome_code: &str, num_points: Option<usize>) -> Vec<DVec2> {
        self.liquefied_ground_polygon(biome_code, num_points, Liquefaction::NONE)
    }

    /// Same as [`Terrain::ground_polygon`] with a liquefaction modulation.
    #[must_use]
    pub fn liquefied_ground_polygon(
        &self,
        biome_code: &str,
        num_points: Option<usize>,
        liquefaction: Liquefaction,
    ) -> Vec<DVec2> {
        let params = resolve(biome_code);
        let samples = num_points
            .unwrap_or_else(|| self.default_sample_count())
            .max(1);
        let step = self.world_width / count_to_f64(samples);
        let mut points: Vec<DVec2> = (0..=samples)
            .map(|i| {
                let x = step * count_to_f64(i);
                DVec2::new(x, self.height_with(&params, x, liquefaction))
            })
            .collect();
        points.push(DVec2::new(self.world_width, self.world_height));
        points.push(DVec2::new(0.0, self.world_height));
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};
    use std::f64::consts::TAU;

    #[fixture]
    fn terrain() -> Terrain {
        Terrain::new(1280.0, 720.0)
    }

    #[rstest]
    #[case("Af")]
    #[case("BWh")]
    #[case("Dfc")]
    fn profile_repeats_every_period(terrain: Terrain, #[case] code: &str) {
        let period = TAU / resolve(code).frequency;
        for x in [0.0, 17.5, 333.0, 901.25] {
            assert_relative_eq!(
                terrain.height_at(x, code, Liquefaction::NONE),
                terrain.height_at(x + period, code, Liquefaction::NONE),
                epsilon = 1e-6
            );
        }
    }

    #[rstest]
    fn heights_are_clamped_into_world() {
        let tiny = Terrain::new(100.0, 30.0);
        for x in (0..100).map(f64::from) {
            let y = tiny.height_at(x, "Dfc", Liquefaction { scale: 1.0, phase: 1.2 });
            assert!((0.0..=29.0).contains(&y), "height {y} escaped the world");
        }
    }

    #[rstest]
    fn flat_phase_matches_closed_form(terrain: Terrain) {
        let expected = 720.0 * 0.7 + 25.0 * (0.003 * 100.0_f64 + 0.5).sin();
        assert_relative_eq!(
            terrain.height_at(100.0, "BWh", Liquefaction::NONE),
            expected,
            epsilon = 1e-9
        );
    }

    #[rstest]
    fn liquefaction_moves_the_ground(terrain: Terrain) {
        let firm = terrain.height_at(50.0, "Af", Liquefaction::NONE);
        let soft = terrain.height_at(
            50.0,
            "Af",
            Liquefaction {
                scale: 1.0,
                phase: std::f64::consts::FRAC_PI_2,
            },
        );
        assert!((firm - soft).abs() > 1.0);
    }

    #[rstest]
    fn zero_phase_liquefaction_is_neutral(terrain: Terrain) {
        let firm = terrain.height_at(75.0, "Cfa", Liquefaction::NONE);
        let soft = terrain.height_at(75.0, "Cfa", Liquefaction { scale: 1.0, phase: 0.0 });
        assert_relative_eq!(firm, soft, epsilon = 1e-12);
    }

    #[rstest]
    fn polygon_is_closed_along_the_bottom(terrain: Terrain) {
        let points = terrain.ground_polygon("ET", None);
        assert_eq!(terrain.default_sample_count(), 128);
        assert_eq!(points.len(), 128 + 1 + 2);
        assert_eq!(points.first().map(|p| p.x), Some(0.0));
        let surface_end = points.get(128).copied().unwrap_or_default();
        assert_relative_eq!(surface_end.x, 1280.0, epsilon = 1e-9);
        assert_eq!(points.get(129).copied(), Some(DVec2::new(1280.0, 720.0)));
        assert_eq!(points.last().copied(), Some(DVec2::new(0.0, 720.0)));
    }

    #[test]
    fn narrow_worlds_still_get_fifty_samples() {
        let narrow = Terrain::new(200.0, 100.0);
        assert_eq!(narrow.default_sample_count(), 50);
        assert_eq!(narrow.ground_polygon("Af", None).len(), 53);
    }

    #[rstest]
    fn explicit_sample_count_is_honoured(terrain: Terrain) {
        let points = terrain.ground_polygon("Af", Some(4));
        let xs: Vec<f64> = points.iter().take(5).map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 320.0, 640.0, 960.0, 1280.0]);
    }
}
