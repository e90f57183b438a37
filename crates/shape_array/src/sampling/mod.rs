//! Sampling strategies for placing points inside scatter volumes.
//!
//! This module defines the [`VolumeSampling`] trait, the scatter bounds, and the
//! random helpers shared by the Poisson-disc and uniform strategies.
use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use rand::Rng as RngCore;

pub mod bound;
pub mod poisson_disk;
pub mod uniform_random;

pub use bound::{ScatterBound, ScatterSettings, DEFAULT_BATCH_SIZE};
pub use poisson_disk::{PoissonDiskSampling, PoissonScatter};
pub use uniform_random::UniformRandomSampling;

/// Trait for volume sampling strategies.
pub trait VolumeSampling {
    fn generate(&self, bound: &ScatterBound, rng: &mut dyn RngCore) -> Vec<mint::Vector3<f32>>;
}

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Random direction on the unit circle in the XZ plane.
pub(crate) fn random_unit_circle(rng: &mut dyn RngCore) -> Vec2 {
    let angle = rand01(rng) * 2.0 * PI;
    Vec2::new(angle.cos(), angle.sin())
}

/// Random direction on the unit sphere.
pub(crate) fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    let z = rand01(rng) * 2.0 - 1.0;
    let phi = rand01(rng) * 2.0 * PI;
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Random point inside the unit ball, uniform by volume.
pub(crate) fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    random_unit_vector(rng) * rand01(rng).cbrt()
}

/// Derives a per-element seed from a base seed, a randomization epoch and an index.
pub fn seed_for_element(base_seed: u64, epoch: u64, index: usize) -> u64 {
    let mixed = base_seed
        ^ epoch.wrapping_mul(0x9E3779B97F4A7C15)
        ^ (index as u64).wrapping_mul(0xBF58476D1CE4E5B9);
    mix_u64(mixed)
}

#[inline]
pub(crate) fn mix_u64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

#[cfg(test)]
pub(crate) mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    pub(crate) struct FixedRng {
        pub value: u32,
    }

    impl rand::TryRng for FixedRng {
        type Error = core::convert::Infallible;

        fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
            Ok(self.value)
        }

        fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
            Ok(self.value as u64)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Self::Error> {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 4];
            }
            Ok(())
        }
    }

    #[test]
    fn rand01_returns_zero_for_zero_input() {
        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand01(&mut rng), 0.0);
    }

    #[test]
    fn rand01_values_in_range() {
        for value in [0, 1, 100, u32::MAX / 2, u32::MAX - 1, u32::MAX] {
            let mut rng = FixedRng { value };
            let result = rand01(&mut rng);
            assert!(
                (0.0..=1.0).contains(&result),
                "rand01({value}) = {result} is out of range [0,1]"
            );
        }
    }

    #[test]
    fn unit_vectors_have_unit_length() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            assert!((random_unit_vector(&mut rng).length() - 1.0).abs() < 1e-4);
            assert!((random_unit_circle(&mut rng).length() - 1.0).abs() < 1e-4);
            assert!(random_in_unit_sphere(&mut rng).length() <= 1.0 + 1e-4);
        }
    }

    #[test]
    fn element_seeds_depend_on_every_input() {
        let base = seed_for_element(7, 0, 3);
        assert_eq!(base, seed_for_element(7, 0, 3));
        assert_ne!(base, seed_for_element(8, 0, 3));
        assert_ne!(base, seed_for_element(7, 1, 3));
        assert_ne!(base, seed_for_element(7, 0, 4));
    }
}
