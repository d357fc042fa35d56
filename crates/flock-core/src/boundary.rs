//! Three-tier arena containment: soft pull, hard brake, emergency pull.

use crate::arena::Arena;
use crate::constants::{
    BOUNDARY_BRAKE_FACTOR, BOUNDARY_BRAKE_FRACTION, BOUNDARY_EMERGENCY_FRACTION,
    BOUNDARY_EMERGENCY_GAIN, BOUNDARY_PULL_GAIN, BOUNDARY_SOFT_FRACTION,
};
use glam::DVec3;

/// Soft containment force. Zero inside `0.7 * radius`; beyond that it points at the
/// center with magnitude `bounds_weight * (1 + 3 * pull^2)`.
pub fn containment_force(position: DVec3, arena: &Arena, bounds_weight: f64) -> DVec3 {
    let distance = arena.distance_to_center(position);
    let soft_edge = arena.radius * BOUNDARY_SOFT_FRACTION;
    if distance <= soft_edge {
        return DVec3::ZERO;
    }
    let band = arena.radius * (1.0 - BOUNDARY_SOFT_FRACTION);
    let pull = ((distance - soft_edge) / band).powi(2);
    arena.direction_to_center(position) * (bounds_weight * (1.0 + BOUNDARY_PULL_GAIN * pull))
}

/// Velocity multiplier for the hard-brake tier, if it applies at `position`.
pub fn brake_factor(position: DVec3, arena: &Arena) -> Option<f64> {
    (arena.distance_to_center(position) > arena.radius * BOUNDARY_BRAKE_FRACTION)
        .then_some(BOUNDARY_BRAKE_FACTOR)
}

/// Unweighted emergency pull toward the center, if `position` is past `0.95 * radius`.
pub fn emergency_force(position: DVec3, arena: &Arena, emergency_strength: f64) -> Option<DVec3> {
    (arena.distance_to_center(position) > arena.radius * BOUNDARY_EMERGENCY_FRACTION).then(|| {
        arena.direction_to_center(position) * (emergency_strength * BOUNDARY_EMERGENCY_GAIN)
    })
}
