//! Convenience constructors for buildings and scenarios used in tests.

use quakesway::{
    Building, BuildingSpec, DynamicsParameters, MaterialKind, SimulationConfig, SimulationState,
};

/// Five stories on a 15 × 10 m concrete footprint.
///
/// # Examples
/// ```
/// use test_utils::physics::reference_spec;
/// assert_eq!(reference_spec().stories, 5);
/// ```
pub fn reference_spec() -> BuildingSpec {
    BuildingSpec::new(5, 15.0, 10.0, MaterialKind::Concrete)
}

/// Standing reference building with stiffness 8e7 Nm/rad and damping
/// 5e6 Nm·s/rad.
pub fn reference_building() -> Building {
    Building::new(reference_spec(), DynamicsParameters::default())
}

/// Standing building with `stories` stories and default everything else.
pub fn building_with_stories(stories: u32) -> Building {
    Building::new(
        BuildingSpec {
            stories,
            ..BuildingSpec::default()
        },
        DynamicsParameters::default(),
    )
}

/// Simulation of the reference building with a fixed seed.
pub fn reference_simulation() -> SimulationState {
    SimulationState::new(SimulationConfig {
        building: reference_spec(),
        seed: 1234,
        ..SimulationConfig::default()
    })
}

/// Simulation of a building with `stories` stories and a fixed seed.
pub fn simulation_with_stories(stories: u32) -> SimulationState {
    SimulationState::new(SimulationConfig {
        building: BuildingSpec {
            stories,
            ..BuildingSpec::default()
        },
        seed: 99,
        ..SimulationConfig::default()
    })
}

/// Steps `building` `steps` times, applying `torque` before every step.
pub fn step_with_torque(building: &mut Building, torque: f64, dt: f64, steps: usize) {
    for _ in 0..steps {
        building.apply_torque(torque);
        building.step(dt);
    }
}

/// Ticks `state` until `done` holds or `max_seconds` of simulated time pass.
///
/// Returns `true` when `done` was reached.
pub fn tick_until(
    state: &mut SimulationState,
    max_seconds: f64,
    mut done: impl FnMut(&SimulationState) -> bool,
) -> bool {
    let dt = state.config().timestep;
    let deadline = state.elapsed() + max_seconds;
    while state.elapsed() < deadline {
        if done(state) {
            return true;
        }
        state.tick(dt);
    }
    done(state)
}
