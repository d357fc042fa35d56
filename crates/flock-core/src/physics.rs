//! Integration of steering accelerations into motion.

use crate::boid::Boid;
use glam::DVec3;

/// Turns a tick's acceleration into new velocity and position.
///
/// Velocity is read and written directly through [`Boid::velocity`]. Implementations
/// own any world-axis constraints.
pub trait PhysicsIntegrator {
    fn integrate(&mut self, boid: &mut Boid, acceleration: DVec3, dt: f64);
}

/// Semi-implicit Euler with per-boid linear damping.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EulerIntegrator {
    /// Zero the vertical velocity component every tick.
    pub freeze_vertical: bool,
}

impl EulerIntegrator {
    pub fn new(freeze_vertical: bool) -> Self {
        Self { freeze_vertical }
    }
}

impl PhysicsIntegrator for EulerIntegrator {
    fn integrate(&mut self, boid: &mut Boid, acceleration: DVec3, dt: f64) {
        let damping = (1.0 - boid.linear_damping * dt).clamp(0.0, 1.0);
        let mut velocity = (boid.velocity + acceleration * dt) * damping;
        if self.freeze_vertical {
            velocity.y = 0.0;
        }
        boid.velocity = velocity;
        boid.position += velocity * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoidParams;

    #[test]
    fn integrates_velocity_then_position() {
        let mut boid = Boid::new(0, DVec3::ZERO, DVec3::X, BoidParams::default());
        EulerIntegrator::default().integrate(&mut boid, DVec3::new(0.0, 0.0, 2.0), 0.5);
        assert_eq!(boid.velocity, DVec3::new(1.0, 0.0, 1.0));
        assert_eq!(boid.position, DVec3::new(0.5, 0.0, 0.5));
    }

    #[test]
    fn damping_slows_velocity() {
        let velocity = DVec3::new(4.0, 0.0, 0.0);
        let mut boid = Boid::new(0, DVec3::ZERO, velocity, BoidParams::default());
        boid.linear_damping = 2.0;
        EulerIntegrator::default().integrate(&mut boid, DVec3::ZERO, 0.25);
        assert_eq!(boid.velocity, DVec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn frozen_vertical_axis_stays_put() {
        let mut boid = Boid::new(0, DVec3::new(0.0, 5.0, 0.0), DVec3::Y, BoidParams::default());
        EulerIntegrator::new(true).integrate(&mut boid, DVec3::new(1.0, 3.0, 0.0), 1.0);
        assert_eq!(boid.velocity.y, 0.0);
        assert_eq!(boid.position.y, 5.0);
    }
}
