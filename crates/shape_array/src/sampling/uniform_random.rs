//! Uniform random sampling inside a scatter bound.
use rand::Rng as RngCore;

use crate::sampling::{ScatterBound, VolumeSampling};

/// Uniform i.i.d. random sampling over a scatter bound.
#[derive(Debug, Clone)]
pub struct UniformRandomSampling {
    /// Number of points to generate.
    pub count: usize,
}

impl UniformRandomSampling {
    /// Create a new uniform random sampler that generates `count` points.
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

impl VolumeSampling for UniformRandomSampling {
    fn generate(&self, bound: &ScatterBound, rng: &mut dyn RngCore) -> Vec<mint::Vector3<f32>> {
        let bound = bound.clamped();
        (0..self.count)
            .map(|_| bound.uniform_point(rng).into())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn count_and_bounds_are_respected() {
        let bound = ScatterBound::Plane {
            size: Vec2::new(8.0, 6.0),
        };
        let mut rng = StdRng::seed_from_u64(42);
        let pts = UniformRandomSampling::new(100).generate(&bound, &mut rng);
        assert_eq!(pts.len(), 100);
        for p in pts {
            assert!(bound.contains(Vec3::from(p)));
        }
    }

    #[test]
    fn determinism_for_same_seed() {
        let bound = ScatterBound::Box {
            size: Vec3::splat(10.0),
        };
        let s = UniformRandomSampling::new(32);
        let pa = s.generate(&bound, &mut StdRng::seed_from_u64(123));
        let pb = s.generate(&bound, &mut StdRng::seed_from_u64(123));
        let pc = s.generate(&bound, &mut StdRng::seed_from_u64(456));
        assert_eq!(pa, pb);
        assert_ne!(pa, pc);
    }

    #[test]
    fn zero_count_is_empty() {
        let bound = ScatterBound::Box {
            size: Vec3::splat(1.0),
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert!(UniformRandomSampling::new(0)
            .generate(&bound, &mut rng)
            .is_empty());
    }
}
