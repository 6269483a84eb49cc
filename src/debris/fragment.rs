//! Rigid rubble pieces and their per-tick integration.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::DebrisConfig;
use crate::vector_math::to_world;
use crate::GRAVITY;

/// Surface that debris comes to rest on.
///
/// Coordinates are metres with y growing downward.
pub trait Ground {
    /// Ground height beneath `x`.
    fn height_at(&self, x: f64) -> f64;
}

/// A horizontal ground plane at a fixed height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlatGround(pub f64);

impl Ground for FlatGround {
    fn height_at(&self, _x: f64) -> f64 {
        self.0
    }
}

/// Outcome of integrating one fragment for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentMotion {
    /// Already at rest; nothing moved.
    Resting,
    /// In flight without touching the ground.
    Airborne,
    /// Touched the ground and bounced.
    Bounced,
    /// Touched the ground and came to rest this tick.
    Settled,
}

/// An independent rigid polygon broken off the building.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    vertices: Vec<DVec2>,
    position: DVec2,
    rotation: f64,
    velocity: DVec2,
    angular_velocity: f64,
    settled: bool,
}

impl Fragment {
    /// Creates a moving fragment.
    ///
    /// `vertices` are relative to the fragment centroid; `position` is the
    /// centroid in world metres.
    #[must_use]
    pub const fn new(
        vertices: Vec<DVec2>,
        position: DVec2,
        rotation: f64,
        velocity: DVec2,
        angular_velocity: f64,
    ) -> Self {
        Self {
            vertices,
            position,
            rotation,
            velocity,
            angular_velocity,
            settled: false,
        }
    }

    /// Centroid-relative vertices.
    #[must_use]
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    /// World position of the centroid.
    #[must_use]
    pub const fn position(&self) -> DVec2 {
        self.position
    }

    /// Rotation in radians.
    #[must_use]
    pub const fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Linear velocity in m/s.
    #[must_use]
    pub const fn velocity(&self) -> DVec2 {
        self.velocity
    }

    /// Angular velocity in rad/s.
    #[must_use]
    pub const fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// Returns `true` once the fragment has come to rest.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.settled
    }

    /// Vertices rotated and placed in world space.
    #[must_use]
    pub fn world_vertices(&self) -> Vec<DVec2> {
        to_world(&self.vertices, self.position, self.rotation)
    }

    /// Advances the fragment by `dt` seconds against `ground`.
    ///
    /// Gravity feeds the vertical velocity before position and rotation are
    /// integrated. If any vertex ends up below the ground beneath the
    /// centroid, the fragment is lifted by the deepest penetration, loses
    /// most of its energy and settles once slow enough.
    pub fn update<G: Ground + ?Sized>(
        &mut self,
        dt: f64,
        ground: &G,
        config: &DebrisConfig,
    ) -> FragmentMotion {
        if self.settled {
            return FragmentMotion::Resting;
        }

        self.velocity.y += GRAVITY * dt;
        self.position += self.velocity * dt;
        self.rotation += self.angular_velocity * dt;

        let ground_y = ground.height_at(self.position.x);
        let penetration = self
            .world_vertices()
            .iter()
            .map(|vertex| vertex.y - ground_y)
            .fold(f64::NEG_INFINITY, f64::max);
        if penetration <= 0.0 {
            return FragmentMotion::Airborne;
        }

        self.position.y -= penetration;
        self.velocity.y *= config.restitution;
        self.velocity.x *= config.ground_friction;
        self.angular_velocity *= config.angular_friction;

        if self.velocity.y.abs() < config.settle_linear_threshold
            && self.angular_velocity.abs() < config.settle_angular_threshold
        {
            self.settled = true;
            self.velocity = DVec2::ZERO;
            self.angular_velocity = 0.0;
            return FragmentMotion::Settled;
        }
        FragmentMotion::Bounced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn block() -> Fragment {
        let vertices = vec![
            DVec2::new(-1.0, -0.5),
            DVec2::new(1.0, -0.5),
            DVec2::new(1.0, 0.5),
            DVec2::new(-1.0, 0.5),
        ];
        Fragment::new(vertices, DVec2::new(0.0, 0.0), 0.0, DVec2::new(2.0, 0.0), 0.0)
    }

    #[rstest]
    fn free_fall_gains_g_dt_each_tick(mut block: Fragment) {
        let config = DebrisConfig::default();
        let ground = FlatGround(100.0);
        let dt = 0.02;
        for _ in 0..10 {
            let before = block.velocity().y;
            assert_eq!(block.update(dt, &ground, &config), FragmentMotion::Airborne);
            assert_relative_eq!(block.velocity().y, before + GRAVITY * dt, max_relative = 1e-12);
        }
        assert_relative_eq!(block.position().x, 0.4, max_relative = 1e-12);
    }

    #[rstest]
    fn contact_lifts_and_damps(mut block: Fragment) {
        let config = DebrisConfig::default();
        // bottom edge sits at y = 0.5; ground at 0.55 is reached within one tick
        let ground = FlatGround(0.55);
        block.velocity = DVec2::new(2.0, 5.0);
        block.angular_velocity = 1.0;
        assert_eq!(block.update(0.1, &ground, &config), FragmentMotion::Bounced);
        let lowest = block
            .world_vertices()
            .iter()
            .map(|v| v.y)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(lowest, 0.55, epsilon = 1e-9);
        assert_relative_eq!(block.velocity().y, (5.0 + GRAVITY * 0.1) * -0.1, max_relative = 1e-12);
        assert_relative_eq!(block.velocity().x, 1.0);
        assert_relative_eq!(block.angular_velocity(), 0.3);
    }

    #[rstest]
    fn slow_contact_settles_for_good(mut block: Fragment) {
        let config = DebrisConfig::default();
        let ground = FlatGround(0.5);
        block.velocity = DVec2::ZERO;
        assert_eq!(block.update(1.0 / 60.0, &ground, &config), FragmentMotion::Settled);
        assert!(block.is_settled());
        assert_eq!(block.velocity(), DVec2::ZERO);
        let resting = block.clone();
        assert_eq!(block.update(1.0, &ground, &config), FragmentMotion::Resting);
        assert_eq!(block, resting);
    }
}
