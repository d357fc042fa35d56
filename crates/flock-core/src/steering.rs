use crate::config::BoidParams;
use crate::rng::SteeringRng;
use glam::DVec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Steering {
    pub acceleration: DVec3,
    /// The boid ignored the flock this tick and picked a random heading.
    pub independent: bool,
}

/// Combine a behavior force and the soft boundary force into one acceleration.
///
/// One uniform draw decides whether the boid acts independently; if so every computed
/// force is replaced by a random direction of `random_force_strength`. Otherwise the
/// sum is clamped to `max_steer_force`.
pub fn compose<R: SteeringRng + ?Sized>(
    params: &BoidParams,
    behavior_force: DVec3,
    boundary_force: DVec3,
    rng: &mut R,
) -> Steering {
    if rng.uniform() < params.independence_factor {
        return Steering {
            acceleration: rng.random_unit_vector() * params.random_force_strength,
            independent: true,
        };
    }
    Steering {
        acceleration: (behavior_force + boundary_force).clamp_length_max(params.max_steer_force),
        independent: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays fixed draws.
    struct Scripted {
        uniforms: Vec<f64>,
        direction: DVec3,
    }

    impl SteeringRng for Scripted {
        fn uniform(&mut self) -> f64 {
            self.uniforms.remove(0)
        }

        fn random_unit_vector(&mut self) -> DVec3 {
            self.direction
        }
    }

    fn scripted(u: f64) -> Scripted {
        Scripted {
            uniforms: vec![u],
            direction: DVec3::Y,
        }
    }

    #[test]
    fn sums_and_clamps_to_max_steer_force() {
        let params = BoidParams::default();
        let steering = compose(
            &params,
            DVec3::new(10.0, 0.0, 0.0),
            DVec3::new(0.0, 0.0, 10.0),
            &mut scripted(0.9),
        );
        assert!(!steering.independent);
        assert!((steering.acceleration.length() - 3.0).abs() < 1e-12);
        assert!((steering.acceleration.x - steering.acceleration.z).abs() < 1e-12);
    }

    #[test]
    fn small_forces_pass_through() {
        let params = BoidParams::default();
        let steering = compose(&params, DVec3::X, DVec3::Z, &mut scripted(0.9));
        assert_eq!(steering.acceleration, DVec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn independent_draw_replaces_forces() {
        let params = BoidParams::default();
        let steering = compose(
            &params,
            DVec3::new(10.0, 0.0, 0.0),
            DVec3::ZERO,
            &mut scripted(0.1),
        );
        assert!(steering.independent);
        assert_eq!(steering.acceleration, DVec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn zero_independence_never_goes_independent() {
        let params = BoidParams {
            independence_factor: 0.0,
            ..BoidParams::default()
        };
        let steering = compose(&params, DVec3::X, DVec3::ZERO, &mut scripted(0.0));
        assert!(!steering.independent);
    }
}
