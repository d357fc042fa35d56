/// Fraction of the arena radius inside which no containment force acts.
pub const BOUNDARY_SOFT_FRACTION: f64 = 0.7;

/// Fraction of the arena radius beyond which velocity is braked every tick.
pub const BOUNDARY_BRAKE_FRACTION: f64 = 0.9;

/// Fraction of the arena radius beyond which the emergency pull takes over.
pub const BOUNDARY_EMERGENCY_FRACTION: f64 = 0.95;

/// Per-tick velocity multiplier applied past `BOUNDARY_BRAKE_FRACTION`.
pub const BOUNDARY_BRAKE_FACTOR: f64 = 0.95;

/// Extra gain applied to the squared pull factor of the soft containment force.
pub const BOUNDARY_PULL_GAIN: f64 = 3.0;

/// Emergency pull is this multiple of `bounds_emergency_force`.
pub const BOUNDARY_EMERGENCY_GAIN: f64 = 2.0;

/// Guards the separation term against coincident agents.
pub const SEPARATION_EPSILON: f64 = 1e-4;

/// Prime multiplier used to derive independent RNG streams from a base seed.
pub const RNG_DERIVATION_PRIME: u64 = 7919;

/// Hard height band sits this far above `min_height`.
pub const HEIGHT_HARD_MIN_MARGIN: f64 = 1.0;

/// Hard height band sits this far below `max_height`.
pub const HEIGHT_HARD_MAX_MARGIN: f64 = 2.0;

/// Multiple of `height_adjust_force` applied outside the hard band.
pub const HEIGHT_HARD_BAND_GAIN: f64 = 1.5;

/// Target height as a fraction of the way from `min_height` to `max_height`.
pub const HEIGHT_TARGET_FRACTION: f64 = 0.7;

/// Proportional gain on the height error.
pub const HEIGHT_PROPORTIONAL_GAIN: f64 = 0.3;

/// Band correction is clamped to this multiple of `height_adjust_force`.
pub const HEIGHT_ADJUST_CLAMP_GAIN: f64 = 2.0;

/// Lift from the damped follower is clamped to this multiple of `height_adjust_force`.
pub const HEIGHT_LIFT_CLAMP_GAIN: f64 = 0.3;

/// Gain of the mid-band lift curve.
pub const HEIGHT_CURVE_GAIN: f64 = 0.2;

/// Horizontal push given to boids above the hard band.
pub const HEIGHT_ESCAPE_FORCE: f64 = 2.0;
