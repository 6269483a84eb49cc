//! Post-collapse rubble.
//!
//! When the building fails, [`fragment_building`] slices every story into
//! jagged rigid pieces. A [`DebrisField`] owns those pieces and advances them
//! until all have settled or the animation budget runs out. The field lives
//! beside the building, never inside it.

mod fragment;

pub use fragment::{FlatGround, Fragment, FragmentMotion, Ground};

use std::f64::consts::FRAC_PI_2;

use glam::DVec2;
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::building::Building;
use crate::vector_math::{rotate, vertex_centroid};
use crate::{
    COLLAPSE_TIME_BUDGET, DEFAULT_SLICES_PER_STORY, FRAGMENT_ANGULAR_FRICTION,
    FRAGMENT_GROUND_FRICTION, FRAGMENT_JITTER_FRACTION, FRAGMENT_RESTITUTION, MAX_STORIES,
    SETTLE_ANGULAR_THRESHOLD, SETTLE_LINEAR_THRESHOLD,
};

/// Tuning for fragment generation and settling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebrisConfig {
    /// Horizontal slices each story breaks into.
    pub slices_per_story: u32,
    /// Maximum vertex jitter as a fraction of the half extents.
    pub jitter_fraction: f64,
    /// Factor applied to vertical velocity on ground contact.
    pub restitution: f64,
    /// Factor applied to horizontal velocity on ground contact.
    pub ground_friction: f64,
    /// Factor applied to angular velocity on ground contact.
    pub angular_friction: f64,
    /// Vertical speed in m/s below which a grounded fragment settles.
    pub settle_linear_threshold: f64,
    /// Angular speed in rad/s below which a grounded fragment settles.
    pub settle_angular_threshold: f64,
    /// Simulated seconds after which the animation stops.
    pub time_budget: f64,
    /// Upward launch speed in m/s for the topmost slice.
    pub upward_kick: f64,
    /// Horizontal speed in m/s toward the lean for the topmost slice.
    pub lean_bias: f64,
    /// Random horizontal speed in m/s added to every slice.
    pub lateral_spread: f64,
    /// Bound on the initial spin in rad/s.
    pub max_spin: f64,
}

impl Default for DebrisConfig {
    fn default() -> Self {
        Self {
            slices_per_story: DEFAULT_SLICES_PER_STORY,
            jitter_fraction: FRAGMENT_JITTER_FRACTION,
            restitution: FRAGMENT_RESTITUTION,
            ground_friction: FRAGMENT_GROUND_FRICTION,
            angular_friction: FRAGMENT_ANGULAR_FRICTION,
            settle_linear_threshold: SETTLE_LINEAR_THRESHOLD,
            settle_angular_threshold: SETTLE_ANGULAR_THRESHOLD,
            time_budget: COLLAPSE_TIME_BUDGET,
            upward_kick: 3.0,
            lean_bias: 4.0,
            lateral_spread: 1.0,
            max_spin: FRAC_PI_2,
        }
    }
}

/// Uniform sample in `[-magnitude, magnitude]`; zero for a degenerate bound.
fn symmetric<R: Rng + ?Sized>(rng: &mut R, magnitude: f64) -> f64 {
    if magnitude > 0.0 {
        rng.gen_range(-magnitude..=magnitude)
    } else {
        0.0
    }
}

/// Rectangle corners and edge midpoints, clockwise from the top-left, each
/// nudged by up to `jitter` of the half extents.
fn jagged_outline<R: Rng + ?Sized>(
    rng: &mut R,
    half_width: f64,
    half_height: f64,
    jitter: f64,
) -> Vec<DVec2> {
    const OUTLINE: [(f64, f64); 8] = [
        (-1.0, -1.0),
        (0.0, -1.0),
        (1.0, -1.0),
        (1.0, 0.0),
        (1.0, 1.0),
        (0.0, 1.0),
        (-1.0, 1.0),
        (-1.0, 0.0),
    ];
    OUTLINE
        .iter()
        .map(|&(sx, sy)| {
            DVec2::new(
                sx * half_width + symmetric(rng, jitter * half_width),
                sy * half_height + symmetric(rng, jitter * half_height),
            )
        })
        .collect()
}

/// Breaks `building` into rigid fragments.
///
/// `base` is the world position, in metres, of the centre of the building's
/// footprint at ground level. Each story yields
/// [`DebrisConfig::slices_per_story`] fragments, placed along the lean at the
/// moment of failure. Higher slices are thrown harder upward and further
/// toward the lean.
pub fn fragment_building<R: Rng + ?Sized>(
    building: &Building,
    base: DVec2,
    config: &DebrisConfig,
    rng: &mut R,
) -> Vec<Fragment> {
    let spec = building.spec();
    let slices = config.slices_per_story;
    let total_height = building.total_height();
    let slice_height = if slices > 0 {
        spec.story_height / f64::from(slices)
    } else {
        0.0
    };
    let half_width = spec.footprint_length.max(0.0) / 2.0;
    let half_height = slice_height.max(0.0) / 2.0;
    let lean = building.angle();
    let lean_sign = if lean == 0.0 { 0.0 } else { lean.signum() };
    let lean_slope = lean.tan();

    let count = spec.stories.min(MAX_STORIES).saturating_mul(slices);
    let mut fragments = Vec::with_capacity(usize::try_from(count).unwrap_or_default());
    for index in 0..count {
        let height = slice_height * (f64::from(index) + 0.5);
        let height_fraction = if total_height > 0.0 {
            (height / total_height).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let outline = jagged_outline(rng, half_width, half_height, config.jitter_fraction);
        let centroid = vertex_centroid(&outline);
        let vertices = outline.iter().map(|vertex| *vertex - centroid).collect();

        let slice_centre = base + DVec2::new(height * lean_slope, -height);
        let position = slice_centre + rotate(centroid, lean);

        let velocity = DVec2::new(
            lean_sign * config.lean_bias * height_fraction
                + symmetric(rng, config.lateral_spread),
            -config.upward_kick * height_fraction * rng.gen_range(0.5..=1.0),
        );
        let angular_velocity = symmetric(rng, config.max_spin);

        fragments.push(Fragment::new(
            vertices,
            position,
            lean,
            velocity,
            angular_velocity,
        ));
    }
    fragments
}

/// The fragments of one collapse and the clock of their animation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DebrisField {
    fragments: Vec<Fragment>,
    elapsed: f64,
    spawned: bool,
    config: DebrisConfig,
}

impl DebrisField {
    /// An empty field that will use `config` when spawning.
    #[must_use]
    pub const fn new(config: DebrisConfig) -> Self {
        Self {
            fragments: Vec::new(),
            elapsed: 0.0,
            spawned: false,
            config,
        }
    }

    /// Spawns the fragments of `building`; later calls are ignored.
    ///
    /// Returns the number of fragments created by this call.
    pub fn spawn<R: Rng + ?Sized>(&mut self, building: &Building, base: DVec2, rng: &mut R) -> usize {
        if self.spawned {
            debug!("collapse debris already spawned; ignoring");
            return 0;
        }
        self.fragments = fragment_building(building, base, &self.config, rng);
        self.spawned = true;
        info!("building collapsed into {} fragments", self.fragments.len());
        self.fragments.len()
    }

    /// Advances every unsettled fragment by `dt` seconds.
    ///
    /// Does nothing before spawning or once the animation has finished.
    pub fn update<G: Ground + ?Sized>(&mut self, dt: f64, ground: &G) {
        if !self.spawned || self.is_finished() {
            return;
        }
        self.elapsed += dt;
        let mut settled_now = 0_usize;
        for fragment in &mut self.fragments {
            if fragment.update(dt, ground, &self.config) == FragmentMotion::Settled {
                settled_now += 1;
            }
        }
        if settled_now > 0 {
            debug!(
                "{settled_now} fragments settled at t = {:.2} s",
                self.elapsed
            );
        }
        if self.is_finished() {
            info!(
                "collapse animation finished after {:.2} s ({} of {} settled)",
                self.elapsed,
                self.settled_count(),
                self.fragments.len()
            );
        }
    }

    /// Returns `true` once every fragment rests or the time budget is spent.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.spawned
            && (self.elapsed >= self.config.time_budget
                || self.fragments.iter().all(Fragment::is_settled))
    }

    /// Returns `true` once a collapse has produced this field.
    #[must_use]
    pub const fn is_spawned(&self) -> bool {
        self.spawned
    }

    /// The fragments in spawn order, bottom slice first.
    #[must_use]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Number of fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns `true` when the field holds no fragments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Number of fragments at rest.
    #[must_use]
    pub fn settled_count(&self) -> usize {
        self.fragments.iter().filter(|f| f.is_settled()).count()
    }

    /// Simulated seconds since the first update after spawning.
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Generation and settling settings.
    #[must_use]
    pub const fn config(&self) -> &DebrisConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::{BuildingSpec, DynamicsParameters};
    use crate::material::MaterialKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    fn toppled(stories: u32) -> Building {
        let mut building = Building::new(
            BuildingSpec::new(stories, 12.0, 8.0, MaterialKind::Steel),
            DynamicsParameters::default(),
        );
        building.perturb(0.34, 5.0);
        building.step(0.1);
        building
    }

    #[rstest]
    #[case(1, 2)]
    #[case(3, 6)]
    #[case(7, 14)]
    fn two_fragments_per_story(#[case] stories: u32, #[case] expected: usize) {
        let mut rng = StdRng::seed_from_u64(7);
        let fragments =
            fragment_building(&toppled(stories), DVec2::ZERO, &DebrisConfig::default(), &mut rng);
        assert_eq!(fragments.len(), expected);
    }

    #[test]
    fn fragment_count_is_bounded_by_the_story_cap() {
        let building = Building::new(
            BuildingSpec {
                stories: u32::MAX,
                ..BuildingSpec::default()
            },
            DynamicsParameters::default(),
        );
        let mut rng = StdRng::seed_from_u64(1);
        let fragments = fragment_building(&building, DVec2::ZERO, &DebrisConfig::default(), &mut rng);
        assert_eq!(fragments.len(), 2 * 200);
    }

    #[test]
    fn jitter_stays_within_thirty_percent() {
        let mut rng = StdRng::seed_from_u64(11);
        let building = toppled(4);
        let fragments = fragment_building(&building, DVec2::ZERO, &DebrisConfig::default(), &mut rng);
        // half extents 6 m × 0.75 m; centring moves vertices by at most the jitter bound
        let max_x = 6.0 * 1.6;
        let max_y = 0.75 * 1.6;
        for fragment in &fragments {
            assert_eq!(fragment.vertices().len(), 8);
            for vertex in fragment.vertices() {
                assert!(vertex.x.abs() <= max_x && vertex.y.abs() <= max_y);
            }
            let centroid = vertex_centroid(fragment.vertices());
            assert!(centroid.length() < 1e-9);
            assert!(fragment.angular_velocity().abs() <= FRAC_PI_2);
            assert!((fragment.rotation() - building.angle()).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn higher_slices_follow_the_lean() {
        let mut rng = StdRng::seed_from_u64(3);
        let building = toppled(5);
        let config = DebrisConfig {
            jitter_fraction: 0.0,
            lateral_spread: 0.0,
            ..DebrisConfig::default()
        };
        let fragments = fragment_building(&building, DVec2::new(50.0, 60.0), &config, &mut rng);
        let xs: Vec<f64> = fragments.iter().map(|f| f.position().x).collect();
        assert!(xs.windows(2).all(|pair| matches!(pair, [low, high] if high > low)));
        let top = fragments.last().map(Fragment::position).unwrap_or_default();
        let height = 60.0 - top.y;
        assert!((top.x - 50.0 - height * building.angle().tan()).abs() < 1e-9);
        assert!(fragments.iter().all(|f| f.velocity().x > 0.0 && f.velocity().y < 0.0));
    }

    #[test]
    fn same_seed_replays_the_same_collapse() {
        let building = toppled(3);
        let config = DebrisConfig::default();
        let first = fragment_building(&building, DVec2::ZERO, &config, &mut StdRng::seed_from_u64(99));
        let second = fragment_building(&building, DVec2::ZERO, &config, &mut StdRng::seed_from_u64(99));
        assert_eq!(first, second);
    }

    #[test]
    fn field_spawns_once_and_finishes() {
        let mut rng = StdRng::seed_from_u64(5);
        let building = toppled(3);
        let mut field = DebrisField::new(DebrisConfig::default());
        assert!(!field.is_finished());
        assert_eq!(field.spawn(&building, DVec2::new(0.0, 10.0), &mut rng), 6);
        assert_eq!(field.spawn(&building, DVec2::new(0.0, 10.0), &mut rng), 0);
        let ground = FlatGround(10.0);
        let mut ticks = 0;
        while !field.is_finished() {
            field.update(1.0 / 60.0, &ground);
            ticks += 1;
        }
        assert!(ticks <= 301, "animation overran its budget: {ticks} ticks");
        let frozen = field.clone();
        field.update(1.0 / 60.0, &ground);
        assert_eq!(field, frozen);
    }

    #[test]
    fn budget_stops_unsettled_debris() {
        let mut rng = StdRng::seed_from_u64(5);
        let building = toppled(2);
        let mut field = DebrisField::new(DebrisConfig::default());
        field.spawn(&building, DVec2::ZERO, &mut rng);
        // ground far below: nothing can settle within five seconds
        let ground = FlatGround(1e6);
        for _ in 0..10 {
            field.update(0.5, &ground);
        }
        assert!(field.is_finished());
        assert_eq!(field.settled_count(), 0);
        assert!((field.elapsed() - 5.0).abs() < 1e-9);
    }
}
