//! Vertical flight control: speed caps, floor correction and height-band keeping.

use crate::boid::Boid;
use crate::config::FlightParams;
use crate::constants::{
    HEIGHT_ADJUST_CLAMP_GAIN, HEIGHT_CURVE_GAIN, HEIGHT_ESCAPE_FORCE, HEIGHT_HARD_BAND_GAIN,
    HEIGHT_HARD_MAX_MARGIN, HEIGHT_HARD_MIN_MARGIN, HEIGHT_LIFT_CLAMP_GAIN,
    HEIGHT_PROPORTIONAL_GAIN, HEIGHT_TARGET_FRACTION,
};
use glam::DVec3;

/// Clamp the vertical velocity component to `[-max_down, max_up]`.
pub fn clamp_vertical_speed(velocity: &mut DVec3, max_up: f64, max_down: f64) {
    velocity.y = velocity.y.clamp(-max_down, max_up);
}

/// Lift a boid that sank below `floor_height` back to `min_height` and zero its
/// vertical velocity. Returns whether the correction fired.
pub fn floor_correction(boid: &mut Boid, flight: &FlightParams) -> bool {
    if boid.position.y >= flight.floor_height {
        return false;
    }
    boid.position.y = flight.min_height;
    boid.velocity.y = 0.0;
    true
}

/// Critically damped follower from `current` toward `target`.
///
/// `velocity` carries the follower state between calls. The step never overshoots
/// `target` and moves at most `max_speed * smooth_time` per call.
pub fn smooth_damp(
    current: f64,
    target: f64,
    velocity: &mut f64,
    smooth_time: f64,
    max_speed: f64,
    dt: f64,
) -> f64 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let max_change = max_speed * smooth_time;
    let change = (current - target).clamp(-max_change, max_change);
    let shifted_target = current - change;

    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = shifted_target + (change + temp) * decay;

    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }
    output
}

/// Bump over the band: 0 at both edges, 1 in the middle, smooth in between.
pub fn band_curve(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let smoothstep = |s: f64| s * s * (3.0 - 2.0 * s);
    if t <= 0.5 {
        smoothstep(t * 2.0)
    } else {
        1.0 - smoothstep((t - 0.5) * 2.0)
    }
}

/// Acceleration that keeps `boid` inside the flight band.
///
/// Sums a clamped band correction (hard push outside the inner band plus a
/// proportional pull toward the target height), a horizontal escape push above the
/// band, a clamped lift from the damped follower, and the mid-band curve lift.
pub fn height_force(boid: &mut Boid, flight: &FlightParams, dt: f64) -> DVec3 {
    let height = boid.position.y;
    let strength = flight.height_adjust_force;

    let mut adjust = DVec3::ZERO;
    let mut escape = DVec3::ZERO;
    if height < flight.min_height + HEIGHT_HARD_MIN_MARGIN {
        adjust = DVec3::Y * (strength * HEIGHT_HARD_BAND_GAIN);
    } else if height > flight.max_height - HEIGHT_HARD_MAX_MARGIN {
        adjust = DVec3::NEG_Y * (strength * HEIGHT_HARD_BAND_GAIN);
        escape = DVec3::new(boid.velocity.x, 0.0, boid.velocity.z).normalize_or_zero()
            * HEIGHT_ESCAPE_FORCE;
    }

    let target =
        flight.min_height + (flight.max_height - flight.min_height) * HEIGHT_TARGET_FRACTION;
    adjust += DVec3::Y * ((target - height) * strength * HEIGHT_PROPORTIONAL_GAIN);
    let adjust = adjust.clamp_length_max(strength * HEIGHT_ADJUST_CLAMP_GAIN);

    let followed = smooth_damp(
        height,
        target,
        &mut boid.vertical_smoothing,
        flight.vertical_smooth_time,
        flight.max_vertical_speed,
        dt,
    );
    let lift = (DVec3::Y * ((followed - height) * strength))
        .clamp_length_max(strength * HEIGHT_LIFT_CLAMP_GAIN);

    let span = flight.max_height - flight.min_height;
    let normalized = if span > 0.0 {
        (height - flight.min_height) / span
    } else {
        0.0
    };
    let bump = DVec3::Y * (band_curve(normalized) * strength * HEIGHT_CURVE_GAIN);

    adjust + escape + lift + bump
}
