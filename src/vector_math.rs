//! Small helpers for rotating and placing 2D polygons.
use glam::DVec2;

/// Rotates `point` about the origin by `angle` radians.
///
/// With y growing downward, a positive angle turns clockwise on screen.
///
/// # Examples
/// ```
/// use glam::DVec2;
/// use quakesway::vector_math::rotate;
/// let turned = rotate(DVec2::new(1.0, 0.0), std::f64::consts::FRAC_PI_2);
/// assert!((turned.x - 0.0).abs() < 1e-12);
/// assert!((turned.y - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn rotate(point: DVec2, angle: f64) -> DVec2 {
    DVec2::from_angle(angle).rotate(point)
}

/// Transforms centroid-relative vertices into world space.
///
/// Each vertex is rotated by `angle` and then translated by `origin`.
#[must_use]
pub fn to_world(vertices: &[DVec2], origin: DVec2, angle: f64) -> Vec<DVec2> {
    let rotation = DVec2::from_angle(angle);
    vertices
        .iter()
        .map(|vertex| origin + rotation.rotate(*vertex))
        .collect()
}

/// Returns the arithmetic mean of the supplied vertices.
///
/// An empty slice yields the origin.
///
/// # Examples
/// ```
/// use glam::DVec2;
/// use quakesway::vertex_centroid;
/// let square = [
///     DVec2::new(0.0, 0.0),
///     DVec2::new(2.0, 0.0),
///     DVec2::new(2.0, 2.0),
///     DVec2::new(0.0, 2.0),
/// ];
/// assert_eq!(vertex_centroid(&square), DVec2::new(1.0, 1.0));
/// assert_eq!(vertex_centroid(&[]), DVec2::ZERO);
/// ```
#[must_use]
pub fn vertex_centroid(vertices: &[DVec2]) -> DVec2 {
    if vertices.is_empty() {
        return DVec2::ZERO;
    }
    let sum: DVec2 = vertices.iter().copied().sum();
    sum / crate::numeric::count_to_f64(vertices.len())
}
