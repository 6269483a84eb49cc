//! Rotational spring-damper model of a swaying building.
//!
//! The building is a single rigid body hinged at its base. Applied horizontal
//! forces accumulate as torque between steps; [`Building::step`] integrates
//! that torque against a linear restoring spring and a viscous damper. When
//! the sway angle exceeds the safe limit the building fails, after which its
//! dynamic state and geometry are frozen.

mod geometry;

pub use geometry::{BuildingSpec, GeometryChange};

use std::f64::consts::TAU;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DEFAULT_MAX_SAFE_ANGLE, DEFAULT_ROTATIONAL_DAMPING, DEFAULT_ROTATIONAL_STIFFNESS};

/// Spring, damper and failure settings of the sway model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicsParameters {
    /// Rotational stiffness in Nm/rad.
    pub stiffness: f64,
    /// Rotational damping in Nm·s/rad.
    pub damping: f64,
    /// Sway angle in radians beyond which the building fails.
    pub max_safe_angle: f64,
}

impl Default for DynamicsParameters {
    fn default() -> Self {
        Self {
            stiffness: DEFAULT_ROTATIONAL_STIFFNESS,
            damping: DEFAULT_ROTATIONAL_DAMPING,
            max_safe_angle: DEFAULT_MAX_SAFE_ANGLE,
        }
    }
}

/// Lifecycle of a building. The transition to `Destroyed` is one-way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingState {
    /// Intact and responding to loads.
    #[default]
    Standing,
    /// Failed; only debris moves from here on.
    Destroyed,
}

/// Result of a single integration step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing was integrated.
    Skipped,
    /// The building swayed and is still standing.
    Swaying,
    /// The sway limit was crossed during this step.
    Failed,
}

/// Errors raised by building edits.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum BuildingError {
    /// Geometry is frozen once the building has collapsed.
    #[error("cannot apply {0:?} to a destroyed building")]
    Frozen(GeometryChange),
}

/// A single building and its sway state.
#[derive(Clone, Debug, PartialEq)]
pub struct Building {
    spec: BuildingSpec,
    dynamics: DynamicsParameters,
    mass: f64,
    moment_of_inertia: f64,
    angle: f64,
    angular_velocity: f64,
    accumulated_torque: f64,
    stiffness_scale: f64,
    state: BuildingState,
}

impl Default for Building {
    fn default() -> Self {
        Self::new(BuildingSpec::default(), DynamicsParameters::default())
    }
}

impl Building {
    /// Builds a standing, motionless building from `spec`.
    #[must_use]
    pub fn new(spec: BuildingSpec, dynamics: DynamicsParameters) -> Self {
        let mass = spec.mass();
        let moment_of_inertia = spec.moment_of_inertia(mass);
        Self {
            spec,
            dynamics,
            mass,
            moment_of_inertia,
            angle: 0.0,
            angular_velocity: 0.0,
            accumulated_torque: 0.0,
            stiffness_scale: 1.0,
            state: BuildingState::Standing,
        }
    }

    /// Parameters the building was built from, including later edits.
    #[must_use]
    pub const fn spec(&self) -> &BuildingSpec {
        &self.spec
    }

    /// Spring, damper and failure settings.
    #[must_use]
    pub const fn dynamics(&self) -> &DynamicsParameters {
        &self.dynamics
    }

    /// Total mass in kilograms.
    #[must_use]
    pub const fn mass(&self) -> f64 {
        self.mass
    }

    /// Moment of inertia about the base in kg·m².
    #[must_use]
    pub const fn moment_of_inertia(&self) -> f64 {
        self.moment_of_inertia
    }

    /// Total height in metres.
    #[must_use]
    pub fn total_height(&self) -> f64 {
        self.spec.total_height()
    }

    /// Sway angle in radians; positive leans toward +x.
    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    /// Angular velocity in rad/s.
    #[must_use]
    pub const fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// Torque accumulated since the last step, in Nm.
    #[must_use]
    pub const fn accumulated_torque(&self) -> f64 {
        self.accumulated_torque
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> BuildingState {
        self.state
    }

    /// Returns `true` once the building has failed.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.state == BuildingState::Destroyed
    }

    /// Stiffness including any temporary softening.
    #[must_use]
    pub fn effective_stiffness(&self) -> f64 {
        self.dynamics.stiffness * self.stiffness_scale
    }

    /// Multiplier currently applied to the nominal stiffness.
    #[must_use]
    pub const fn stiffness_scale(&self) -> f64 {
        self.stiffness_scale
    }

    /// Undamped natural period `2π·√(I/k)` in seconds.
    ///
    /// Returns `+∞` when the effective stiffness is not positive.
    #[must_use]
    pub fn natural_period(&self) -> f64 {
        let stiffness = self.effective_stiffness();
        if stiffness > 0.0 {
            TAU * (self.moment_of_inertia / stiffness).sqrt()
        } else {
            f64::INFINITY
        }
    }

    /// Fraction of critical damping, `c / (2·√(k·I))`.
    #[must_use]
    pub fn oscillator_damping_ratio(&self) -> f64 {
        let critical = 2.0 * (self.effective_stiffness() * self.moment_of_inertia).sqrt();
        if critical > 0.0 {
            self.dynamics.damping / critical
        } else {
            f64::INFINITY
        }
    }

    /// Accumulates the torque of a horizontal `force` applied `height` metres
    /// above the base.
    ///
    /// `None` applies the force at half the total height. Forces on a
    /// destroyed building are ignored.
    pub fn apply_horizontal_force(&mut self, force: f64, height: Option<f64>) {
        let lever = height.unwrap_or_else(|| self.total_height() / 2.0);
        self.apply_torque(force * lever);
    }

    /// Accumulates a raw `torque` in Nm for the next step.
    pub fn apply_torque(&mut self, torque: f64) {
        if self.is_destroyed() {
            return;
        }
        self.accumulated_torque += torque;
    }

    /// Overwrites the angular state of a standing building.
    ///
    /// Intended for scripted scenarios and tests; ignored once destroyed.
    pub fn perturb(&mut self, angle: f64, angular_velocity: f64) {
        if self.is_destroyed() {
            return;
        }
        self.angle = angle;
        self.angular_velocity = angular_velocity;
    }

    /// Integrates the accumulated torque over `dt` seconds.
    ///
    /// Uses semi-implicit Euler: velocity is updated first and the new
    /// velocity advances the angle. Accumulated torque is cleared afterwards.
    /// Crossing the safe angle destroys the building, clamps the angle to the
    /// limit on the same side and stops the rotation.
    pub fn step(&mut self, dt: f64) -> StepOutcome {
        if self.is_destroyed() || self.moment_of_inertia <= 0.0 || dt <= 0.0 {
            return StepOutcome::Skipped;
        }

        let restoring = -self.effective_stiffness() * self.angle;
        let damping = -self.dynamics.damping * self.angular_velocity;
        let net = self.accumulated_torque + restoring + damping;
        let angular_acceleration = net / self.moment_of_inertia;

        self.angular_velocity += angular_acceleration * dt;
        self.angle += self.angular_velocity * dt;
        self.accumulated_torque = 0.0;

        let limit = self.dynamics.max_safe_angle;
        if self.angle.abs() > limit {
            info!(
                "building failed at sway {:.3} rad (limit {limit:.3} rad)",
                self.angle
            );
            self.angle = limit.copysign(self.angle);
            self.angular_velocity = 0.0;
            self.state = BuildingState::Destroyed;
            return StepOutcome::Failed;
        }
        StepOutcome::Swaying
    }

    /// Scales the stiffness by `multiplier` until [`Building::restore_stiffness`].
    pub fn soften(&mut self, multiplier: f64) {
        debug!("softening building stiffness by {multiplier}");
        self.stiffness_scale = multiplier;
    }

    /// Returns the stiffness to its nominal value.
    pub fn restore_stiffness(&mut self) {
        self.stiffness_scale = 1.0;
    }

    /// Applies a geometry edit and recomputes mass and inertia.
    ///
    /// # Errors
    /// Returns [`BuildingError::Frozen`] once the building is destroyed; the
    /// building is left untouched.
    pub fn apply_change(&mut self, change: GeometryChange) -> Result<(), BuildingError> {
        if self.is_destroyed() {
            return Err(BuildingError::Frozen(change));
        }
        self.spec.apply(change);
        self.recompute_mass_properties();
        debug!(
            "geometry change {change:?}: mass {:.0} kg, inertia {:.3e} kg·m²",
            self.mass, self.moment_of_inertia
        );
        Ok(())
    }

    /// Sets the number of stories.
    ///
    /// # Errors
    /// See [`Building::apply_change`].
    pub fn set_stories(&mut self, stories: u32) -> Result<(), BuildingError> {
        self.apply_change(GeometryChange::Stories(stories))
    }

    /// Sets the story height in metres.
    ///
    /// # Errors
    /// See [`Building::apply_change`].
    pub fn set_story_height(&mut self, height: f64) -> Result<(), BuildingError> {
        self.apply_change(GeometryChange::StoryHeight(height))
    }

    /// Sets the footprint length in metres.
    ///
    /// # Errors
    /// See [`Building::apply_change`].
    pub fn set_footprint_length(&mut self, length: f64) -> Result<(), BuildingError> {
        self.apply_change(GeometryChange::FootprintLength(length))
    }

    /// Sets the footprint width in metres.
    ///
    /// # Errors
    /// See [`Building::apply_change`].
    pub fn set_footprint_width(&mut self, width: f64) -> Result<(), BuildingError> {
        self.apply_change(GeometryChange::FootprintWidth(width))
    }

    fn recompute_mass_properties(&mut self) {
        self.mass = self.spec.mass();
        self.moment_of_inertia = self.spec.moment_of_inertia(self.mass);
    }
}
