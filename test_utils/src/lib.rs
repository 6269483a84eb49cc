//! Utility helpers for tests.
pub mod physics;

/// Assert that `value` is within `tolerance` of `expected`.
///
/// # Panics
/// Panics with both values when they differ by more than `tolerance`.
#[track_caller]
pub fn assert_close(value: f64, expected: f64, tolerance: f64) {
    assert!(
        (value - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {value}"
    );
}
