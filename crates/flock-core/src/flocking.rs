//! Brute-force neighbor aggregation for cohesion, separation and alignment.
//!
//! Every boid scans every other boid once per tick (O(n²)). All vectors are computed
//! from one [`Snapshot`] so that no boid sees another's post-tick state.

use crate::boid::Boid;
use crate::config::BoidParams;
use crate::constants::SEPARATION_EPSILON;
use glam::DVec3;

/// The neighbor radii and speed a boid perceives the flock with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Perception {
    pub cohesion_radius: f64,
    pub separation_radius: f64,
    pub alignment_radius: f64,
    pub max_speed: f64,
}

impl Perception {
    pub fn of(params: &BoidParams) -> Self {
        Self {
            cohesion_radius: params.cohesion_radius,
            separation_radius: params.separation_radius,
            alignment_radius: params.alignment_radius,
            max_speed: params.max_speed,
        }
    }
}

/// Frozen positions and velocities for one tick.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    positions: Vec<DVec3>,
    velocities: Vec<DVec3>,
    perception: Vec<Perception>,
}

impl Snapshot {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            velocities: Vec::with_capacity(capacity),
            perception: Vec::with_capacity(capacity),
        }
    }

    /// Overwrite the snapshot with the current state of `boids`, reusing storage.
    pub fn capture(&mut self, boids: &[Boid]) {
        self.clear();
        for boid in boids {
            self.push(boid.position, boid.velocity, Perception::of(&boid.params));
        }
    }

    pub fn push(&mut self, position: DVec3, velocity: DVec3, perception: Perception) {
        self.positions.push(position);
        self.velocities.push(velocity);
        self.perception.push(perception);
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.velocities.clear();
        self.perception.clear();
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[DVec3] {
        &self.velocities
    }
}

/// Unweighted flocking vectors for one boid.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlockForces {
    pub cohesion: DVec3,
    pub separation: DVec3,
    pub alignment: DVec3,
}

impl FlockForces {
    /// `cohesion * wc + separation * ws + alignment * wa`.
    pub fn weighted(&self, params: &BoidParams) -> DVec3 {
        self.cohesion * params.cohesion_weight
            + self.separation * params.separation_weight
            + self.alignment * params.alignment_weight
    }
}

/// Flocking vectors for boid `index` against every other boid in `snapshot`.
pub fn flock_forces(snapshot: &Snapshot, index: usize) -> FlockForces {
    let position = snapshot.positions[index];
    let velocity = snapshot.velocities[index];
    let perception = snapshot.perception[index];

    let mut position_sum = DVec3::ZERO;
    let mut separation_sum = DVec3::ZERO;
    let mut velocity_sum = DVec3::ZERO;
    let mut cohesion_count = 0usize;
    let mut separation_count = 0usize;
    let mut alignment_count = 0usize;

    for (other, (&other_position, &other_velocity)) in snapshot
        .positions
        .iter()
        .zip(snapshot.velocities.iter())
        .enumerate()
    {
        if other == index {
            continue;
        }
        let distance = position.distance(other_position);
        if distance < perception.cohesion_radius {
            position_sum += other_position;
            cohesion_count += 1;
        }
        if distance < perception.separation_radius {
            separation_sum += (position - other_position) / (distance + SEPARATION_EPSILON);
            separation_count += 1;
        }
        if distance < perception.alignment_radius {
            velocity_sum += other_velocity;
            alignment_count += 1;
        }
    }

    let cohesion = if cohesion_count > 0 {
        position_sum / cohesion_count as f64 - position
    } else {
        DVec3::ZERO
    };
    let separation = if separation_count > 0 {
        separation_sum / separation_count as f64
    } else {
        DVec3::ZERO
    };
    let alignment = if alignment_count > 0 {
        let mean_velocity = velocity_sum / alignment_count as f64;
        mean_velocity.normalize_or_zero() * perception.max_speed - velocity
    } else {
        DVec3::ZERO
    };

    FlockForces {
        cohesion,
        separation,
        alignment,
    }
}

/// Fill `out` with the flocking vectors of every boid in `snapshot`, reusing its storage.
pub fn aggregate(snapshot: &Snapshot, out: &mut Vec<FlockForces>) {
    out.clear();
    out.reserve(snapshot.len());
    for index in 0..snapshot.len() {
        out.push(flock_forces(snapshot, index));
    }
}

/// Close-range push away from every boid nearer than `radius`, growing as
/// `radius / distance`. Coincident boids contribute nothing.
pub fn avoidance_force(snapshot: &Snapshot, index: usize, radius: f64, strength: f64) -> DVec3 {
    let position = snapshot.positions[index];
    let mut force = DVec3::ZERO;
    for (other, &other_position) in snapshot.positions.iter().enumerate() {
        if other == index {
            continue;
        }
        let distance = position.distance(other_position);
        if distance > 0.0 && distance < radius {
            force += (position - other_position) / distance * (radius / distance * strength);
        }
    }
    force
}

/// Fill `out` with the avoidance push of every boid in `snapshot`.
pub fn aggregate_avoidance(
    snapshot: &Snapshot,
    radius: f64,
    strength: f64,
    out: &mut Vec<DVec3>,
) {
    out.clear();
    out.extend(
        (0..snapshot.len()).map(|index| avoidance_force(snapshot, index, radius, strength)),
    );
}
