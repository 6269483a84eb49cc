//! Integration tests for the sway model's stepping contract.

use approx::assert_relative_eq;
use quakesway::{Building, StepOutcome, DEFAULT_MAX_SAFE_ANGLE};
use rstest::rstest;
use test_utils::physics::{reference_building, step_with_torque};

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "count is checked to be a small positive integer"
)]
fn steps_for(seconds: f64, dt: f64) -> usize {
    let count = (seconds / dt).round();
    assert!(count > 0.0 && count < 1e7);
    count as usize
}

#[rstest]
#[case(0.001)]
#[case(0.01)]
#[case(1.0 / 60.0)]
#[case(0.05)]
fn free_sway_decays_to_rest(#[case] dt: f64) {
    let mut building = reference_building();
    building.perturb(0.2, 0.0);
    let early_peak = peak_angle(&mut building, dt, 20.0);
    let _ = peak_angle(&mut building, dt, 160.0);
    let late_peak = peak_angle(&mut building, dt, 20.0);
    assert!(late_peak < early_peak / 10.0, "{late_peak} vs {early_peak}");
    assert!(building.angle().abs() < 0.01);
    assert!(building.angular_velocity().abs() < 0.01);
    assert!(!building.is_destroyed());
}

fn peak_angle(building: &mut Building, dt: f64, seconds: f64) -> f64 {
    let mut peak = 0.0_f64;
    for _ in 0..steps_for(seconds, dt) {
        building.step(dt);
        peak = peak.max(building.angle().abs());
    }
    peak
}

#[test]
fn torque_counts_once_per_step() {
    let mut split = reference_building();
    let mut single = reference_building();
    split.apply_horizontal_force(2e5, None);
    split.apply_horizontal_force(1e5, Some(3.0));
    split.apply_horizontal_force(-5e4, Some(15.0));
    single.apply_torque(2e5 * 7.5 + 1e5 * 3.0 - 5e4 * 15.0);
    assert_relative_eq!(split.accumulated_torque(), single.accumulated_torque());

    split.step(0.02);
    single.step(0.02);
    assert_relative_eq!(split.accumulated_torque(), 0.0);
    assert_relative_eq!(split.angle(), single.angle(), max_relative = 1e-12);

    // nothing carries over into the following step
    let mut untouched = single.clone();
    split.step(0.02);
    single.step(0.02);
    untouched.step(0.02);
    assert_relative_eq!(split.angle(), untouched.angle(), max_relative = 1e-12);
    assert_relative_eq!(
        split.angular_velocity(),
        untouched.angular_velocity(),
        max_relative = 1e-12
    );
}

#[test]
fn failure_flips_on_the_crossing_step() {
    let mut building = reference_building();
    let torque = 1.2e8;
    let dt = 1.0 / 60.0;
    let inertia = building.moment_of_inertia();
    let stiffness = building.dynamics().stiffness;
    let damping = building.dynamics().damping;

    for step in 0..600 {
        let (angle, velocity) = (building.angle(), building.angular_velocity());
        let net = torque + -stiffness * angle + -damping * velocity;
        let next_velocity = velocity + net / inertia * dt;
        let next_angle = angle + next_velocity * dt;

        building.apply_torque(torque);
        let outcome = building.step(dt);

        if next_angle.abs() > DEFAULT_MAX_SAFE_ANGLE {
            assert_eq!(outcome, StepOutcome::Failed, "step {step}");
            assert!(building.is_destroyed());
            assert_relative_eq!(building.angle(), DEFAULT_MAX_SAFE_ANGLE);
            assert_relative_eq!(building.angular_velocity(), 0.0);
            return;
        }
        assert_eq!(outcome, StepOutcome::Swaying, "step {step}");
        assert!(!building.is_destroyed());
    }
    panic!("sustained torque never toppled the building");
}

#[test]
fn destroyed_state_ignores_everything() {
    let mut building = reference_building();
    step_with_torque(&mut building, -2e8, 0.02, 500);
    assert!(building.is_destroyed());
    assert_relative_eq!(building.angle(), -DEFAULT_MAX_SAFE_ANGLE);

    let frozen = building.clone();
    step_with_torque(&mut building, 5e8, 0.02, 100);
    building.apply_horizontal_force(1e9, None);
    assert_eq!(building.step(0.02), StepOutcome::Skipped);
    assert_eq!(building, frozen);
}
