use super::super::World;

impl World {
    pub(in crate::world) fn step_hunger_phase(&mut self, dt: f64) {
        for boid in &mut self.boids {
            boid.hunger.advance(boid.params.hunger_rate, dt);
        }
    }
}
