//! The simulation loop state.
//!
//! [`SimulationState`] owns everything that changes between frames: the
//! building, its debris, the active loads and the random generator. Callers
//! feed it [`SimulationEvent`]s and advance it with [`SimulationState::tick`];
//! each tick applies queued events and loads, integrates the building,
//! spawns debris on failure and finally integrates the debris.

use glam::{DVec2, Vec2};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::building::{Building, BuildingSpec, GeometryChange, StepOutcome};
use crate::config::{SimulationConfig, WorldConfig};
use crate::debris::{DebrisField, Ground};
use crate::loads::{LoadGenerator, SeismicEvent, WindLoad};
use crate::numeric::expect_f32;
use crate::terrain::{self, Liquefaction, Terrain, TerrainParameters, DEFAULT_BIOME_CODE};
use crate::vector_math::to_world;

/// User-triggered input consumed by the simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationEvent {
    /// Blow steady wind at `speed` m/s; the sign sets the direction and zero
    /// calms it.
    ApplyWind {
        /// Signed wind speed in m/s; positive blows toward +x.
        speed: f64,
    },
    /// Start shaking at peak ground acceleration `pga`, in g.
    TriggerEarthquake {
        /// Peak ground acceleration in g.
        pga: f64,
    },
    /// Edit the standing building.
    ChangeGeometry(GeometryChange),
    /// Switch the terrain to another biome.
    SelectBiome(String),
    /// Rebuild the building and clear all debris and loads.
    Restart,
}

/// Firm terrain sampled in metres for debris settling.
///
/// The liquefaction jiggle is visual only; rubble rests on the unmodulated
/// profile so it stays on the ground once the shaking stops.
struct TerrainGround<'a> {
    terrain: &'a Terrain,
    params: &'a TerrainParameters,
    world: &'a WorldConfig,
}

impl Ground for TerrainGround<'_> {
    fn height_at(&self, x: f64) -> f64 {
        let pixels =
            self.terrain
                .height_with(self.params, self.world.to_pixels(x), Liquefaction::NONE);
        self.world.to_metres(pixels)
    }
}

/// A fragment as the renderer sees it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FragmentView {
    /// World-space outline in pixels.
    pub polygon: Vec<Vec2>,
    /// Whether the fragment has come to rest.
    pub settled: bool,
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Simulated seconds since the last (re)start.
    pub elapsed: f64,
    /// Active biome code.
    pub biome: String,
    /// Whether the building has collapsed.
    pub destroyed: bool,
    /// Sway angle in radians.
    pub angle: f64,
    /// Building geometry.
    pub building: BuildingSpec,
    /// Building outline in pixels; empty once destroyed.
    pub outline: Vec<Vec2>,
    /// Ground fill polygon in pixels.
    pub ground: Vec<Vec2>,
    /// Current ground modulation.
    pub liquefaction: Liquefaction,
    /// Active wind speed in m/s.
    pub wind_speed: f64,
    /// Whether an earthquake is under way.
    pub shaking: bool,
    /// Collapse debris.
    pub fragments: Vec<FragmentView>,
    /// Whether the collapse animation has ended.
    pub collapse_finished: bool,
}

/// Owner of all mutable simulation state.
#[derive(Clone, Debug)]
pub struct SimulationState {
    config: SimulationConfig,
    terrain: Terrain,
    biome: String,
    terrain_params: TerrainParameters,
    building: Building,
    debris: DebrisField,
    wind: Option<WindLoad>,
    earthquake: Option<SeismicEvent>,
    rng: StdRng,
    elapsed: f64,
    pending: Vec<SimulationEvent>,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl SimulationState {
    /// Creates a standing building on fresh terrain as described by `config`.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        let terrain = Terrain::new(config.world.width, config.world.height);
        let (biome, terrain_params) = resolve_biome(&config.biome);
        let building = Building::new(config.building.clone(), config.dynamics);
        let debris = DebrisField::new(config.debris);
        let rng = StdRng::seed_from_u64(config.seed);
        info!(
            "simulation ready: {} stories of {} on biome {biome}",
            building.spec().stories,
            building.spec().material
        );
        Self {
            config,
            terrain,
            biome,
            terrain_params,
            building,
            debris,
            wind: None,
            earthquake: None,
            rng,
            elapsed: 0.0,
            pending: Vec::new(),
        }
    }

    /// The configuration this state was built from.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The building.
    #[must_use]
    pub const fn building(&self) -> &Building {
        &self.building
    }

    /// The collapse debris, empty while the building stands.
    #[must_use]
    pub const fn debris(&self) -> &DebrisField {
        &self.debris
    }

    /// The terrain height model.
    #[must_use]
    pub const fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// Active biome code after fallback resolution.
    #[must_use]
    pub fn biome(&self) -> &str {
        &self.biome
    }

    /// The active wind, if any.
    #[must_use]
    pub const fn wind(&self) -> Option<&WindLoad> {
        self.wind.as_ref()
    }

    /// The active earthquake, if any.
    #[must_use]
    pub const fn earthquake(&self) -> Option<&SeismicEvent> {
        self.earthquake.as_ref()
    }

    /// Simulated seconds since the last (re)start.
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Current ground modulation from any liquefying earthquake.
    #[must_use]
    pub fn liquefaction(&self) -> Liquefaction {
        self.earthquake
            .as_ref()
            .map_or(Liquefaction::NONE, SeismicEvent::liquefaction)
    }

    /// Ground height in pixels at `x` pixels for the active biome.
    #[must_use]
    pub fn ground_height_at(&self, x: f64) -> f64 {
        self.terrain
            .height_with(&self.terrain_params, x, self.liquefaction())
    }

    /// Ground height in pixels at `x` pixels without any liquefaction.
    ///
    /// This is the surface debris settles on.
    #[must_use]
    pub fn firm_ground_height_at(&self, x: f64) -> f64 {
        self.terrain
            .height_with(&self.terrain_params, x, Liquefaction::NONE)
    }

    /// Centre of the building footprint at ground level, in metres.
    #[must_use]
    pub fn base_position(&self) -> DVec2 {
        let x = self.config.world.width / 2.0;
        let world = &self.config.world;
        DVec2::new(world.to_metres(x), world.to_metres(self.ground_height_at(x)))
    }

    /// Queues `event` for the start of the next tick.
    pub fn push_event(&mut self, event: SimulationEvent) {
        self.pending.push(event);
    }

    /// Applies `event` immediately.
    pub fn handle(&mut self, event: SimulationEvent) {
        debug!("handling {event:?}");
        match event {
            SimulationEvent::ApplyWind { speed } => {
                self.wind = (speed != 0.0).then(|| WindLoad::new(speed, self.config.wind));
            }
            SimulationEvent::TriggerEarthquake { pga } => {
                if let Some(mut previous) = self.earthquake.take() {
                    previous.cancel(&mut self.building);
                }
                info!("earthquake triggered at {pga:.2} g");
                self.earthquake = Some(SeismicEvent::new(pga, self.config.seismic));
            }
            SimulationEvent::ChangeGeometry(change) => {
                if let Err(err) = self.building.apply_change(change) {
                    warn!("{err}");
                }
            }
            SimulationEvent::SelectBiome(code) => {
                let (biome, params) = resolve_biome(&code);
                self.biome = biome;
                self.terrain_params = params;
            }
            SimulationEvent::Restart => self.restart(),
        }
    }

    /// Replaces the building with a fresh one of the same geometry and
    /// discards all debris and loads.
    pub fn restart(&mut self) {
        let spec = self.building.spec().clone();
        self.building = Building::new(spec, self.config.dynamics);
        self.debris = DebrisField::new(self.config.debris);
        self.wind = None;
        self.earthquake = None;
        self.elapsed = 0.0;
        info!("simulation restarted");
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Order: queued events, loads, building integration, debris spawning on
    /// failure, debris integration.
    pub fn tick(&mut self, dt: f64) {
        for event in std::mem::take(&mut self.pending) {
            self.handle(event);
        }

        if let Some(wind) = self.wind.as_mut() {
            if !wind.apply(&mut self.building, dt) {
                self.wind = None;
            }
        }
        if let Some(quake) = self.earthquake.as_mut() {
            if !quake.apply(&mut self.building, dt) {
                self.earthquake = None;
            }
        }

        if self.building.step(dt) == StepOutcome::Failed {
            let base = self.base_position();
            self.debris.spawn(&self.building, base, &mut self.rng);
        }

        let ground = TerrainGround {
            terrain: &self.terrain,
            params: &self.terrain_params,
            world: &self.config.world,
        };
        self.debris.update(dt, &ground);
        self.elapsed += dt;
    }

    /// Ticks at the configured timestep until `seconds` more have passed.
    ///
    /// Returns the number of ticks taken.
    pub fn run_for(&mut self, seconds: f64) -> usize {
        let dt = self.config.timestep;
        let target = self.elapsed + seconds;
        let mut ticks = 0;
        while self.elapsed + dt / 2.0 < target {
            self.tick(dt);
            ticks += 1;
        }
        ticks
    }

    /// Building outline in world pixels, rotated about its base.
    ///
    /// Empty once the building is destroyed.
    #[must_use]
    pub fn building_outline(&self) -> Vec<DVec2> {
        if self.building.is_destroyed() {
            return Vec::new();
        }
        let world = &self.config.world;
        let half = world.to_pixels(self.building.spec().footprint_length) / 2.0;
        let height = world.to_pixels(self.building.total_height());
        let base = self.base_position() * world.pixels_per_metre;
        let corners = [
            DVec2::new(-half, 0.0),
            DVec2::new(-half, -height),
            DVec2::new(half, -height),
            DVec2::new(half, 0.0),
        ];
        to_world(&corners, base, self.building.angle())
    }

    /// Captures the state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let ppm = self.config.world.pixels_per_metre;
        let fragments = self
            .debris
            .fragments()
            .iter()
            .map(|fragment| FragmentView {
                polygon: to_screen(fragment.world_vertices().iter().map(|v| *v * ppm)),
                settled: fragment.is_settled(),
            })
            .collect();
        let liquefaction = self.liquefaction();
        Snapshot {
            elapsed: self.elapsed,
            biome: self.biome.clone(),
            destroyed: self.building.is_destroyed(),
            angle: self.building.angle(),
            building: self.building.spec().clone(),
            outline: to_screen(self.building_outline().into_iter()),
            ground: to_screen(
                self.terrain
                    .liquefied_ground_polygon(&self.biome, None, liquefaction)
                    .into_iter(),
            ),
            liquefaction,
            wind_speed: self.wind.as_ref().map_or(0.0, WindLoad::speed),
            shaking: self.earthquake.as_ref().is_some_and(SeismicEvent::is_active),
            fragments,
            collapse_finished: self.debris.is_finished(),
        }
    }
}

fn resolve_biome(code: &str) -> (String, TerrainParameters) {
    if terrain::is_known(code) {
        (code.to_owned(), terrain::resolve(code))
    } else {
        // resolve() warns about the fallback
        (DEFAULT_BIOME_CODE.to_owned(), terrain::resolve(code))
    }
}

fn to_screen(points: impl Iterator<Item = DVec2>) -> Vec<Vec2> {
    points
        .map(|p| Vec2::new(expect_f32(p.x), expect_f32(p.y)))
        .collect()
}
