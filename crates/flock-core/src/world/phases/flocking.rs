use super::super::World;
use crate::boundary;
use crate::flocking;

impl World {
    /// Freeze positions and velocities for this tick.
    pub(in crate::world) fn step_snapshot_phase(&mut self) {
        self.snapshot.capture(&self.boids);
    }

    /// Flocking vectors, soft containment force and (when enabled) close-range
    /// avoidance for every boid, from the snapshot.
    pub(in crate::world) fn step_forces_phase(&mut self) {
        flocking::aggregate(&self.snapshot, &mut self.flock_buffer);

        let flight = &self.config.flight;
        if flight.avoidance {
            flocking::aggregate_avoidance(
                &self.snapshot,
                flight.avoidance_radius,
                flight.avoidance_force,
                &mut self.avoidance_buffer,
            );
        } else {
            self.avoidance_buffer.clear();
        }

        let arena = &self.arena;
        let boundary_forces = &mut self.boundary_buffer;
        boundary_forces.clear();
        boundary_forces.extend(
            self.snapshot
                .positions()
                .iter()
                .zip(self.boids.iter())
                .map(|(&position, boid)| {
                    boundary::containment_force(position, arena, boid.params.bounds_weight)
                }),
        );
    }
}
