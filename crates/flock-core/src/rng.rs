use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use std::f64::consts::TAU;

/// Stream index for steering draws (independence roll, random heading).
pub const STEERING_STREAM: u64 = 0;
/// Stream index for boid placement and per-boid jitter.
pub const SPAWN_STREAM: u64 = 1;
/// Stream index for food placement.
pub const FOOD_STREAM: u64 = 2;

/// Create a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> ChaCha12Rng {
    ChaCha12Rng::seed_from_u64(seed)
}

/// Derive a sub-RNG for one consumer of randomness, ensuring independent streams.
pub fn derive_stream_rng(base_seed: u64, stream: u64) -> ChaCha12Rng {
    ChaCha12Rng::seed_from_u64(
        base_seed.wrapping_add(stream.wrapping_mul(crate::constants::RNG_DERIVATION_PRIME)),
    )
}

/// Randomness consumed by the steering step.
///
/// Implemented for every [`rand::Rng`]; tests can supply scripted sources.
pub trait SteeringRng {
    /// Uniform sample in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Uniformly distributed direction on the unit sphere.
    fn random_unit_vector(&mut self) -> DVec3;
}

impl<R: Rng + ?Sized> SteeringRng for R {
    fn uniform(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn random_unit_vector(&mut self) -> DVec3 {
        // Archimedes: uniform z and azimuth give a uniform point on the sphere.
        let z = self.random_range(-1.0f64..=1.0);
        let theta = self.random::<f64>() * TAU;
        let r = (1.0 - z * z).max(0.0).sqrt();
        let (sin_t, cos_t) = theta.sin_cos();
        DVec3::new(r * cos_t, r * sin_t, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = derive_stream_rng(7, SPAWN_STREAM);
        let mut b = derive_stream_rng(7, SPAWN_STREAM);
        for _ in 0..16 {
            assert_eq!(a.uniform().to_bits(), b.uniform().to_bits());
        }
    }

    #[test]
    fn streams_diverge() {
        let mut a = derive_stream_rng(7, STEERING_STREAM);
        let mut b = derive_stream_rng(7, FOOD_STREAM);
        let xs: Vec<f64> = (0..8).map(|_| a.uniform()).collect();
        let ys: Vec<f64> = (0..8).map(|_| b.uniform()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn uniform_is_half_open_unit_interval() {
        let mut rng = create_rng(3);
        for _ in 0..1_000 {
            let u = rng.uniform();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn random_unit_vector_has_unit_length() {
        let mut rng = create_rng(11);
        for _ in 0..1_000 {
            let v = rng.random_unit_vector();
            assert!((v.length() - 1.0).abs() < 1e-9);
        }
    }
}
