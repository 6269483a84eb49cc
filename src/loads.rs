//! Environmental loads that push on the building.
//!
//! Each generator converts an environmental input into a horizontal force
//! applied at mid-height. Generators are stepped once per tick before the
//! building integrates.

use std::f64::consts::TAU;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::building::Building;
use crate::terrain::Liquefaction;
use crate::{
    AIR_DENSITY, DEFAULT_LIQUEFACTION_STIFFNESS_MULTIPLIER, DEFAULT_LIQUEFACTION_THRESHOLD_G,
    DEFAULT_SHAKE_DURATION, DEFAULT_SHAKE_FREQUENCY_HZ, DRAG_COEFFICIENT, GRAVITY,
    LIQUEFACTION_JIGGLE_HZ,
};

/// A source of torque on the building.
pub trait LoadGenerator {
    /// Applies this tick's load to `building` and advances the generator by
    /// `dt` seconds.
    ///
    /// Returns `false` once the load has run its course.
    fn apply(&mut self, building: &mut Building, dt: f64) -> bool;
}

/// Aerodynamic settings for wind loads.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    /// Air density in kg/m³.
    pub air_density: f64,
    /// Drag coefficient of the facade.
    pub drag_coefficient: f64,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            air_density: AIR_DENSITY,
            drag_coefficient: DRAG_COEFFICIENT,
        }
    }
}

/// Steady wind blowing along the x axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindLoad {
    speed: f64,
    config: WindConfig,
}

impl WindLoad {
    /// Wind at `speed` metres per second.
    #[must_use]
    pub const fn new(speed: f64, config: WindConfig) -> Self {
        Self { speed, config }
    }

    /// Wind speed in m/s.
    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Drag force on `building` in newtons:
    /// `0.5·ρ·v·|v|·A·C_d` with `A = height × footprint length`.
    ///
    /// The sign of the speed sets the direction: negative wind blows
    /// toward −x.
    ///
    /// # Examples
    /// ```
    /// use quakesway::{Building, WindConfig, WindLoad};
    /// let wind = WindLoad::new(10.0, WindConfig::default());
    /// let force = wind.force_on(&Building::default());
    /// assert!((force - 0.5 * 1.225 * 100.0 * 90.0 * 1.3).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn force_on(&self, building: &Building) -> f64 {
        let exposed_area = building.total_height() * building.spec().footprint_length;
        0.5 * self.config.air_density
            * self.speed
            * self.speed.abs()
            * exposed_area
            * self.config.drag_coefficient
    }
}

impl LoadGenerator for WindLoad {
    fn apply(&mut self, building: &mut Building, _dt: f64) -> bool {
        building.apply_horizontal_force(self.force_on(building), None);
        self.speed != 0.0
    }
}

/// Settings shared by all seismic events.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeismicConfig {
    /// Ground shaking frequency in hertz.
    pub shake_frequency_hz: f64,
    /// Event length in seconds.
    pub duration: f64,
    /// PGA, in g, above which the soil liquefies.
    pub liquefaction_threshold_g: f64,
    /// Stiffness multiplier applied while liquefied.
    pub liquefaction_stiffness_multiplier: f64,
}

impl Default for SeismicConfig {
    fn default() -> Self {
        Self {
            shake_frequency_hz: DEFAULT_SHAKE_FREQUENCY_HZ,
            duration: DEFAULT_SHAKE_DURATION,
            liquefaction_threshold_g: DEFAULT_LIQUEFACTION_THRESHOLD_G,
            liquefaction_stiffness_multiplier: DEFAULT_LIQUEFACTION_STIFFNESS_MULTIPLIER,
        }
    }
}

/// A finite bout of sinusoidal ground shaking.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeismicEvent {
    pga: f64,
    elapsed: f64,
    config: SeismicConfig,
    softened: bool,
}

impl SeismicEvent {
    /// Shaking with peak ground acceleration `pga` in multiples of g.
    #[must_use]
    pub const fn new(pga: f64, config: SeismicConfig) -> Self {
        Self {
            pga,
            elapsed: 0.0,
            config,
            softened: false,
        }
    }

    /// Peak ground acceleration in g.
    #[must_use]
    pub const fn pga(&self) -> f64 {
        self.pga
    }

    /// Simulated seconds since the event began.
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Returns `true` while shaking continues.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.elapsed < self.config.duration
    }

    /// Returns `true` when the event is strong enough to liquefy the soil.
    #[must_use]
    pub fn liquefies(&self) -> bool {
        self.pga > self.config.liquefaction_threshold_g
    }

    /// Ground acceleration in m/s² at `t` seconds into the event.
    ///
    /// Zero outside `[0, duration]`.
    #[must_use]
    pub fn ground_acceleration(&self, t: f64) -> f64 {
        if !(0.0..=self.config.duration).contains(&t) {
            return 0.0;
        }
        self.pga * GRAVITY * (TAU * self.config.shake_frequency_hz * t).sin()
    }

    /// Visual ground modulation for the terrain while the event runs.
    #[must_use]
    pub fn liquefaction(&self) -> Liquefaction {
        let threshold = self.config.liquefaction_threshold_g;
        if !self.is_active() || !self.liquefies() || threshold <= 0.0 {
            return Liquefaction::NONE;
        }
        Liquefaction {
            scale: ((self.pga - threshold) / threshold).clamp(0.0, 1.0),
            phase: TAU * LIQUEFACTION_JIGGLE_HZ * self.elapsed,
        }
    }

    /// Ends the event early, undoing any softening of `building`.
    pub fn cancel(&mut self, building: &mut Building) {
        self.elapsed = self.config.duration;
        self.finish(building);
    }

    fn finish(&mut self, building: &mut Building) {
        if self.softened {
            building.restore_stiffness();
            self.softened = false;
            debug!("soil firm again; stiffness restored");
        }
        info!("seismic event of {:.2} g ended", self.pga);
    }
}

impl LoadGenerator for SeismicEvent {
    fn apply(&mut self, building: &mut Building, dt: f64) -> bool {
        if !self.is_active() {
            return false;
        }
        if self.liquefies() && !self.softened {
            building.soften(self.config.liquefaction_stiffness_multiplier);
            self.softened = true;
            info!("soil liquefying under {:.2} g shaking", self.pga);
        }

        let force = -building.mass() * self.ground_acceleration(self.elapsed);
        building.apply_horizontal_force(force, None);
        self.elapsed += dt;

        if self.is_active() {
            true
        } else {
            self.finish(building);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::{BuildingSpec, DynamicsParameters};
    use crate::material::MaterialKind;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn building() -> Building {
        Building::new(
            BuildingSpec::new(5, 15.0, 10.0, MaterialKind::Concrete),
            DynamicsParameters::default(),
        )
    }

    #[rstest]
    fn wind_torque_acts_at_mid_height(mut building: Building) {
        let mut wind = WindLoad::new(40.0, WindConfig::default());
        let force = wind.force_on(&building);
        assert_relative_eq!(force, 0.5 * 1.225 * 1600.0 * 225.0 * 1.3, max_relative = 1e-12);
        assert!(wind.apply(&mut building, 0.1));
        assert_relative_eq!(building.accumulated_torque(), force * 7.5, max_relative = 1e-12);
    }

    #[rstest]
    fn negative_speed_blows_the_other_way(mut building: Building) {
        let east = WindLoad::new(30.0, WindConfig::default());
        let mut west = WindLoad::new(-30.0, WindConfig::default());
        assert_relative_eq!(west.force_on(&building), -east.force_on(&building));
        assert!(west.apply(&mut building, 0.1));
        assert!(building.accumulated_torque() < 0.0);
        building.step(0.1);
        assert!(building.angle() < 0.0);
    }

    #[rstest]
    fn calm_wind_reports_inactive(mut building: Building) {
        let mut wind = WindLoad::new(0.0, WindConfig::default());
        assert!(!wind.apply(&mut building, 0.1));
        assert_relative_eq!(building.accumulated_torque(), 0.0);
    }

    #[test]
    fn ground_acceleration_is_bounded_to_the_event() {
        let event = SeismicEvent::new(0.5, SeismicConfig::default());
        assert_relative_eq!(event.ground_acceleration(-0.1), 0.0);
        assert_relative_eq!(event.ground_acceleration(3.5), 0.0);
        // a quarter period at 0.4 Hz peaks the sinusoid
        assert_relative_eq!(event.ground_acceleration(0.625), 0.5 * GRAVITY, max_relative = 1e-12);
    }

    #[rstest]
    fn inertial_force_opposes_ground_motion(mut building: Building) {
        let mut event = SeismicEvent::new(0.3, SeismicConfig::default());
        event.apply(&mut building, 0.625);
        // t = 0 contributes nothing; the next tick samples the peak
        assert_relative_eq!(building.accumulated_torque(), 0.0);
        event.apply(&mut building, 0.1);
        let expected = -building.mass() * 0.3 * GRAVITY * 7.5;
        assert_relative_eq!(building.accumulated_torque(), expected, max_relative = 1e-9);
    }

    #[rstest]
    fn liquefaction_softens_then_restores(mut building: Building) {
        let nominal = building.effective_stiffness();
        let mut event = SeismicEvent::new(0.8, SeismicConfig::default());
        assert!(event.liquefies());
        assert!(event.apply(&mut building, 1.0));
        assert_relative_eq!(building.effective_stiffness(), nominal * 0.6);
        assert!(event.liquefaction().is_active());
        assert!(event.apply(&mut building, 1.0));
        assert!(!event.apply(&mut building, 1.0));
        assert!(!event.is_active());
        assert!((building.effective_stiffness() - nominal).abs() < f64::EPSILON);
        assert_eq!(event.liquefaction(), Liquefaction::NONE);
        assert!(!event.apply(&mut building, 1.0));
    }

    #[rstest]
    fn weak_shaking_keeps_soil_firm(mut building: Building) {
        let nominal = building.effective_stiffness();
        let mut event = SeismicEvent::new(0.2, SeismicConfig::default());
        event.apply(&mut building, 0.5);
        assert!((building.effective_stiffness() - nominal).abs() < f64::EPSILON);
        assert_eq!(event.liquefaction(), Liquefaction::NONE);
    }

    #[rstest]
    fn cancel_restores_stiffness(mut building: Building) {
        let nominal = building.effective_stiffness();
        let mut event = SeismicEvent::new(1.0, SeismicConfig::default());
        event.apply(&mut building, 0.5);
        event.cancel(&mut building);
        assert!(!event.is_active());
        assert!((building.effective_stiffness() - nominal).abs() < f64::EPSILON);
    }
}
