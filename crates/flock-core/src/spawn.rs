//! Staggered entrance: boids are introduced one at a time from outside the arena.

use crate::arena::Arena;
use crate::boid::Boid;
use crate::config::{BoidParams, SimConfig};
use glam::DVec3;
use rand::Rng;
use std::f64::consts::TAU;

/// Time-accumulator state machine that releases one boid per interval.
///
/// The first boid is due immediately; boid `k` is due once `k * interval` seconds
/// have elapsed.
#[derive(Clone, Debug, PartialEq)]
pub struct EntranceSchedule {
    interval: f64,
    total: usize,
    spawned: usize,
    elapsed: f64,
}

impl EntranceSchedule {
    pub fn new(total: usize, interval: f64) -> Self {
        Self {
            interval,
            total,
            spawned: 0,
            elapsed: 0.0,
        }
    }

    pub fn spawned(&self) -> usize {
        self.spawned
    }

    pub fn is_finished(&self) -> bool {
        self.spawned >= self.total
    }

    /// Number of boids due at the current time, then advance the clock by `dt`.
    pub fn advance(&mut self, dt: f64) -> usize {
        if self.is_finished() {
            return 0;
        }
        let due_total = if self.interval <= 0.0 {
            self.total
        } else {
            ((self.elapsed / self.interval).floor() as usize)
                .saturating_add(1)
                .min(self.total)
        };
        let due = due_total.saturating_sub(self.spawned);
        self.spawned += due;
        self.elapsed += dt;
        due
    }
}

/// Place a new boid outside the arena, heading for the center, with individual
/// speed limits, perception and initial hunger.
pub fn spawn_boid<R: Rng + ?Sized>(
    id: u32,
    config: &SimConfig,
    arena: &Arena,
    rng: &mut R,
) -> Boid {
    let angle = rng.random::<f64>() * TAU;
    let (sin_a, cos_a) = angle.sin_cos();
    let direction = DVec3::new(cos_a, config.spawn_rise, sin_a).normalize();
    let position = arena.center + direction * arena.radius * config.spawn_distance_factor;

    let params = individualize(&config.boid, config, rng);
    let speed = rng.random_range(params.min_speed..=params.max_speed);
    let hunger = rng.random_range(0.0..=config.initial_hunger_max);

    let mut boid = Boid::new(id, position, -direction * speed, params)
        .with_hunger(hunger)
        .with_entrance(config.entrance_duration);
    boid.linear_damping = config.entrance_damping_start;
    boid
}

fn individualize<R: Rng + ?Sized>(
    base: &BoidParams,
    config: &SimConfig,
    rng: &mut R,
) -> BoidParams {
    let jitter = config.speed_jitter;
    let min_speed = (base.min_speed + rng.random_range(-jitter..=jitter)).max(0.0);
    let max_speed = (base.max_speed + rng.random_range(-jitter..=jitter))
        .max(min_speed)
        .max(f64::EPSILON);
    let perception = rng.random_range(config.perception_scale_min..=config.perception_scale_max);
    let food_perception =
        rng.random_range(config.food_perception_scale_min..=config.food_perception_scale_max);
    BoidParams {
        min_speed,
        max_speed,
        cohesion_radius: base.cohesion_radius * perception,
        separation_radius: base.separation_radius * perception,
        alignment_radius: base.alignment_radius * perception,
        food_perception_radius: base.food_perception_radius * food_perception,
        ..base.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    #[test]
    fn first_boid_is_due_immediately() {
        let mut schedule = EntranceSchedule::new(3, 0.3);
        assert_eq!(schedule.advance(0.1), 1);
        assert_eq!(schedule.advance(0.1), 0);
        assert_eq!(schedule.advance(0.1), 0);
    }

    #[test]
    fn releases_one_per_interval_until_total() {
        let mut schedule = EntranceSchedule::new(3, 1.0);
        let released: Vec<usize> = (0..6).map(|_| schedule.advance(0.5)).collect();
        assert_eq!(released, vec![1, 0, 1, 0, 1, 0]);
        assert!(schedule.is_finished());
        assert_eq!(schedule.spawned(), 3);
    }

    #[test]
    fn large_step_releases_several() {
        let mut schedule = EntranceSchedule::new(10, 0.3);
        assert_eq!(schedule.advance(1.0), 1);
        assert_eq!(schedule.advance(1.0), 3);
    }

    #[test]
    fn zero_interval_releases_everything_at_once() {
        let mut schedule = EntranceSchedule::new(5, 0.0);
        assert_eq!(schedule.advance(0.1), 5);
        assert_eq!(schedule.advance(0.1), 0);
    }

    #[test]
    fn spawned_boid_starts_outside_heading_inward() {
        let config = SimConfig::default();
        let arena = Arena::new(DVec3::new(0.0, 10.0, 0.0), 30.0);
        let mut rng = create_rng(9);
        let boid = spawn_boid(4, &config, &arena, &mut rng);
        assert_eq!(boid.id, 4);
        let distance = arena.distance_to_center(boid.position);
        assert!((distance - 45.0).abs() < 1e-9);
        let inward = arena.direction_to_center(boid.position);
        assert!(boid.velocity.normalize().dot(inward) > 0.999);
        assert!(boid.speed() >= boid.params.min_speed - 1e-12);
        assert!(boid.speed() <= boid.params.max_speed + 1e-12);
        assert!(boid.entrance.is_active());
        assert!(boid.hunger.value() <= config.initial_hunger_max);
    }

    #[test]
    fn individualized_params_stay_valid() {
        let config = SimConfig::default();
        let arena = Arena::new(DVec3::ZERO, 30.0);
        let mut rng = create_rng(10);
        for id in 0..200 {
            let boid = spawn_boid(id, &config, &arena, &mut rng);
            assert_eq!(boid.params.validate(), Ok(()));
            let scale = boid.params.cohesion_radius / config.boid.cohesion_radius;
            assert!((0.8..=1.2).contains(&scale));
        }
    }
}
