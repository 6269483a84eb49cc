//! Numeric conversion helpers used across the project.
//!
//! These utilities guard conversions between floating-point and integer
//! domains. They rely on debug assertions to flag unexpected overflows while
//! keeping the call-sites ergonomic.

/// Convert a finite `f64` into `f32`, asserting that it fits the target type.
#[expect(
    clippy::cast_possible_truncation,
    reason = "Callers assert that the value fits within f32 bounds."
)]
#[must_use]
pub fn expect_f32(value: f64) -> f32 {
    debug_assert!(value.is_finite(), "expected finite f64 for f32 conversion");
    debug_assert!(
        value <= f64::from(f32::MAX),
        "f64 value {value} exceeds f32::MAX"
    );
    debug_assert!(
        value >= f64::from(f32::MIN),
        "f64 value {value} is below f32::MIN"
    );
    value as f32
}

/// Floor the value and convert to `usize`, returning `None` when out of range.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "The floored value is validated against the usize domain."
)]
#[must_use]
pub fn floor_to_usize(value: f64) -> Option<usize> {
    if !value.is_finite() {
        return None;
    }
    let floored = value.floor();
    if floored < 0.0 || floored > usize::MAX as f64 {
        return None;
    }
    Some(floored as usize)
}

/// Convert a sample or fragment count into `f64`.
#[expect(
    clippy::cast_precision_loss,
    reason = "Counts stay far below 2^52 in practice."
)]
#[must_use]
pub const fn count_to_f64(count: usize) -> f64 {
    count as f64
}
