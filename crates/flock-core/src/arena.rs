use glam::DVec3;

/// Spherical soft-walled arena shared read-only by every boid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    pub center: DVec3,
    pub radius: f64,
}

impl Arena {
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn is_valid(&self) -> bool {
        self.center.is_finite() && self.radius.is_finite() && self.radius > 0.0
    }

    pub fn distance_to_center(&self, position: DVec3) -> f64 {
        position.distance(self.center)
    }

    /// Unit vector from `position` toward the center; zero at the center itself.
    pub fn direction_to_center(&self, position: DVec3) -> DVec3 {
        (self.center - position).normalize_or_zero()
    }
}
