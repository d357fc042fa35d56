use super::super::World;
use crate::spawn;

impl World {
    /// Release boids due from the entrance schedule and top up food.
    pub(in crate::world) fn step_spawn_phase(&mut self, dt: f64) {
        if let Some(schedule) = self.entrance_schedule.as_mut() {
            let due = schedule.advance(dt);
            for _ in 0..due {
                let id = self.next_boid_id;
                self.next_boid_id = self.next_boid_id.saturating_add(1);
                let boid = spawn::spawn_boid(id, &self.config, &self.arena, &mut self.spawn_rng);
                tracing::debug!(boid = id, position = ?boid.position, "boid spawned");
                self.boids.push(boid);
            }
        }

        if let Some(spawner) = self.food_spawner.as_mut() {
            let placed = spawner.advance(dt, &mut self.food, self.arena.center, &mut self.food_rng);
            if placed > 0 {
                tracing::debug!(placed, alive = self.food.len(), "food placed");
            }
        }
    }
}
