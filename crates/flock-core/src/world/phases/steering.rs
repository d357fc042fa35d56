use super::super::World;
use crate::behavior::{self, Executed};
use crate::boid::Entrance;
use crate::boundary;
use crate::decision::Behavior;
use crate::height;
use crate::steering;
use glam::DVec3;

impl World {
    /// Execute behaviors and integrate every boid in roster order.
    ///
    /// Food is consumed sequentially here, so the first boid in order to reach an item
    /// eats it and later boids see it gone. Boundary tiers act on every boid; entering
    /// boids only miss the decision tree (their choice is always flock) and the
    /// flight-control passes.
    pub(in crate::world) fn step_apply_phase(&mut self, dt: f64) {
        let config = &self.config;
        let flight = &config.flight;
        let arena = &self.arena;
        let positions = self.snapshot.positions();
        let flock_forces = &self.flock_buffer;
        let boundary_forces = &self.boundary_buffer;
        let avoidance_forces = &self.avoidance_buffer;
        let choices = &self.choice_buffer;
        let behaviors = &mut self.behavior_buffer;
        let food = &mut self.food;
        let rng = &mut self.rng;
        let integrator = &mut self.integrator;
        let counters = &mut self.counters;

        behaviors.clear();
        for (idx, boid) in self.boids.iter_mut().enumerate() {
            let position = positions[idx];
            if flight.height_keeping {
                height::clamp_vertical_speed(
                    &mut boid.velocity,
                    flight.max_climb_speed,
                    flight.max_descent_speed,
                );
            }

            let emergency =
                boundary::emergency_force(position, arena, boid.params.bounds_emergency_force);
            if emergency.is_some() {
                counters.emergency += 1;
                tracing::trace!(boid = boid.id, "emergency boundary pull");
            }

            let entering = match boid.entrance.advance(dt) {
                Some(progress) => {
                    boid.linear_damping = Entrance::damping(
                        progress,
                        config.entrance_damping_start,
                        config.entrance_damping_end,
                    );
                    true
                }
                None => false,
            };

            if let Some(factor) = boundary::brake_factor(position, arena) {
                boid.velocity *= factor;
            }

            let mut flight_force = DVec3::ZERO;
            if !entering {
                if let Some(&push) = avoidance_forces.get(idx) {
                    flight_force += push;
                }
                if flight.height_keeping {
                    let cap = flight.max_height_change_speed;
                    height::clamp_vertical_speed(&mut boid.velocity, cap, cap);
                    if height::floor_correction(boid, flight) {
                        tracing::trace!(boid = boid.id, "floor correction");
                    }
                    flight_force += height::height_force(boid, flight, dt);
                }
            }

            let executed = behavior::execute(boid, choices[idx], position, food);
            let behavior_force = match &executed {
                Executed::Flock => flock_forces[idx].weighted(&boid.params),
                Executed::Forage { force, meal } => {
                    if let Some(item) = meal {
                        counters.meals += 1;
                        tracing::debug!(
                            boid = boid.id,
                            food = item.id.0,
                            hunger = boid.hunger.value(),
                            "meal"
                        );
                    }
                    *force
                }
            };
            behaviors.push(executed.behavior());

            let steering =
                steering::compose(&boid.params, behavior_force, boundary_forces[idx], rng);
            if steering.independent {
                counters.independent += 1;
            }
            // The emergency pull wins over the composed steering; flight passes add on top.
            let acceleration = emergency.unwrap_or(steering.acceleration) + flight_force;
            integrator.integrate(boid, acceleration, dt);
            boid.enforce_speed_limits();
        }
    }
}
