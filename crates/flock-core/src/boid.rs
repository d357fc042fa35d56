use crate::config::BoidParams;
use crate::food::FoodId;
use crate::hunger::Hunger;
use glam::DVec3;

/// Time a freshly spawned boid spends flying in before it starts steering.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Entrance {
    elapsed: f64,
    duration: f64,
}

impl Entrance {
    pub fn new(duration: f64) -> Self {
        Self {
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    /// An entrance that has already finished.
    pub fn complete() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.elapsed < self.duration
    }

    /// Advance by `dt`. Returns the progress in `(0, 1]` if this tick belongs to the
    /// entrance, `None` once it has finished.
    pub fn advance(&mut self, dt: f64) -> Option<f64> {
        if !self.is_active() {
            return None;
        }
        self.elapsed += dt;
        Some((self.elapsed / self.duration).min(1.0))
    }

    /// Linear damping for a given entrance progress: `start` for the first half, then a
    /// linear ramp to `end`.
    pub fn damping(progress: f64, start: f64, end: f64) -> f64 {
        if progress < 0.5 {
            start
        } else {
            let t = ((progress - 0.5) * 2.0).clamp(0.0, 1.0);
            start + (end - start) * t
        }
    }
}

#[derive(Clone, Debug)]
pub struct Boid {
    /// Stable identity; also the boid's index order in the world.
    pub id: u32,
    pub position: DVec3,
    pub velocity: DVec3,
    /// Unit facing direction; follows velocity whenever it is non-zero.
    pub heading: DVec3,
    pub params: BoidParams,
    pub hunger: Hunger,
    /// Weak reference to the food item being pursued.
    pub forage_target: Option<FoodId>,
    pub entrance: Entrance,
    /// Linear damping used by the integrator.
    pub linear_damping: f64,
    /// Follower state for the damped height controller.
    pub vertical_smoothing: f64,
}

impl Boid {
    pub fn new(id: u32, position: DVec3, velocity: DVec3, params: BoidParams) -> Self {
        Self {
            id,
            position,
            velocity,
            heading: velocity.try_normalize().unwrap_or(DVec3::Z),
            params,
            hunger: Hunger::SATED,
            forage_target: None,
            entrance: Entrance::complete(),
            linear_damping: 0.0,
            vertical_smoothing: 0.0,
        }
    }

    pub fn with_hunger(mut self, hunger: f64) -> Self {
        self.hunger = Hunger::new(hunger);
        self
    }

    pub fn with_entrance(mut self, duration: f64) -> Self {
        self.entrance = Entrance::new(duration);
        self
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Clamp speed into `[min_speed, max_speed]` and turn the heading to match.
    ///
    /// A stationary boid is pushed along its current heading.
    pub fn enforce_speed_limits(&mut self) {
        let speed = self.velocity.length();
        if speed > self.params.max_speed {
            self.velocity *= self.params.max_speed / speed;
        } else if speed < self.params.min_speed {
            let direction = self.velocity.try_normalize().unwrap_or(self.heading);
            self.velocity = direction * self.params.min_speed;
        }
        if let Some(direction) = self.velocity.try_normalize() {
            self.heading = direction;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn boid(velocity: DVec3) -> Boid {
        Boid::new(0, DVec3::ZERO, velocity, BoidParams::default())
    }

    #[test]
    fn fast_boid_is_slowed_to_max_speed() {
        let mut b = boid(DVec3::new(10.0, 0.0, 0.0));
        b.enforce_speed_limits();
        assert!((b.speed() - 5.0).abs() < 1e-12);
        assert_eq!(b.heading, DVec3::X);
    }

    #[test]
    fn slow_boid_is_raised_to_min_speed() {
        let mut b = boid(DVec3::new(0.0, 0.5, 0.0));
        b.enforce_speed_limits();
        assert!((b.speed() - 2.0).abs() < 1e-12);
        assert_eq!(b.heading, DVec3::Y);
    }

    #[test]
    fn stationary_boid_moves_along_heading() {
        let mut b = boid(DVec3::new(-3.0, 0.0, 0.0));
        b.velocity = DVec3::ZERO;
        b.enforce_speed_limits();
        assert!((b.velocity - DVec3::new(-2.0, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn entrance_reports_progress_until_done() {
        let mut entrance = Entrance::new(1.0);
        assert_eq!(entrance.advance(0.25), Some(0.25));
        assert_eq!(entrance.advance(0.75), Some(1.0));
        assert_eq!(entrance.advance(0.25), None);
        assert!(!entrance.is_active());
    }

    #[test]
    fn zero_length_entrance_is_already_complete() {
        let mut entrance = Entrance::new(0.0);
        assert_eq!(entrance.advance(0.1), None);
    }

    #[test]
    fn entrance_damping_holds_then_ramps() {
        assert_eq!(Entrance::damping(0.2, 2.0, 0.5), 2.0);
        assert!((Entrance::damping(0.75, 2.0, 0.5) - 1.25).abs() < 1e-12);
        assert!((Entrance::damping(1.0, 2.0, 0.5) - 0.5).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn speed_always_lands_within_limits(
            x in -50.0f64..50.0,
            y in -50.0f64..50.0,
            z in -50.0f64..50.0,
        ) {
            let mut b = boid(DVec3::Z);
            b.velocity = DVec3::new(x, y, z);
            b.enforce_speed_limits();
            prop_assert!(b.speed() >= 2.0 - 1e-9);
            prop_assert!(b.speed() <= 5.0 + 1e-9);
            prop_assert!((b.heading.length() - 1.0).abs() < 1e-9);
        }
    }
}
