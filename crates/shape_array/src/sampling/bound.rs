//! Scatter volumes and sampling settings.
use glam::{Vec2, Vec3};
use rand::Rng as RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sampling::{rand01, random_in_unit_sphere, random_unit_vector};

/// Default number of candidates tried around an active point before it is retired.
pub const DEFAULT_BATCH_SIZE: usize = 30;

/// Volume that scattered points must lie in, centered on the generator origin.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScatterBound {
    /// Axis-aligned box with full extents `size`.
    Box { size: Vec3 },
    /// Ball of `radius`, or only its surface when `surface` is set.
    Sphere { radius: f32, surface: bool },
    /// Rectangle in the XZ plane with full extents `size` (x, z).
    Plane { size: Vec2 },
}

impl ScatterBound {
    /// Whether candidate offsets are drawn in the XZ plane only.
    pub fn is_planar(&self) -> bool {
        matches!(self, ScatterBound::Plane { .. })
    }

    pub fn contains(&self, p: Vec3) -> bool {
        const EPS: f32 = 1e-4;
        match *self {
            ScatterBound::Box { size } => {
                let half = size * 0.5;
                p.x.abs() <= half.x && p.y.abs() <= half.y && p.z.abs() <= half.z
            }
            ScatterBound::Sphere {
                radius,
                surface: false,
            } => p.length_squared() <= radius * radius,
            ScatterBound::Sphere {
                radius,
                surface: true,
            } => (p.length() - radius).abs() <= EPS * radius.max(1.0),
            ScatterBound::Plane { size } => {
                let half = size * 0.5;
                p.y.abs() <= EPS && p.x.abs() <= half.x && p.z.abs() <= half.y
            }
        }
    }

    /// Moves a candidate onto the bound's support (the sphere surface or the plane).
    pub fn project(&self, p: Vec3) -> Vec3 {
        match *self {
            ScatterBound::Sphere {
                radius,
                surface: true,
            } => p.normalize_or_zero() * radius,
            ScatterBound::Plane { .. } => Vec3::new(p.x, 0.0, p.z),
            _ => p,
        }
    }

    /// Separation metric between two points: arc length on a sphere surface,
    /// Euclidean distance otherwise.
    pub fn distance(&self, a: Vec3, b: Vec3) -> f32 {
        match *self {
            ScatterBound::Sphere {
                radius,
                surface: true,
            } => {
                let na = a.normalize_or_zero();
                let nb = b.normalize_or_zero();
                let cos = na.dot(nb).clamp(-1.0, 1.0);
                cos.acos() * radius
            }
            _ => a.distance(b),
        }
    }

    /// Uniform random point inside the bound.
    pub fn uniform_point(&self, rng: &mut dyn RngCore) -> Vec3 {
        match *self {
            ScatterBound::Box { size } => Vec3::new(
                (rand01(rng) - 0.5) * size.x,
                (rand01(rng) - 0.5) * size.y,
                (rand01(rng) - 0.5) * size.z,
            ),
            ScatterBound::Sphere { radius, surface } => {
                if radius <= 0.0 {
                    return Vec3::ZERO;
                }
                if surface {
                    random_unit_vector(rng) * radius
                } else {
                    random_in_unit_sphere(rng) * radius
                }
            }
            ScatterBound::Plane { size } => Vec3::new(
                (rand01(rng) - 0.5) * size.x,
                0.0,
                (rand01(rng) - 0.5) * size.y,
            ),
        }
    }

    /// Returns a sanitized copy with non-negative, finite extents.
    pub fn clamped(self) -> Self {
        fn fix(v: f32) -> f32 {
            if v.is_finite() {
                v.max(0.0)
            } else {
                0.0
            }
        }
        match self {
            ScatterBound::Box { size } => ScatterBound::Box {
                size: Vec3::new(fix(size.x), fix(size.y), fix(size.z)),
            },
            ScatterBound::Sphere { radius, surface } => ScatterBound::Sphere {
                radius: fix(radius),
                surface,
            },
            ScatterBound::Plane { size } => ScatterBound::Plane {
                size: Vec2::new(fix(size.x), fix(size.y)),
            },
        }
    }
}

/// Settings shared by every scatter bound.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatterSettings {
    /// Minimum distance between two sampled points. `<= 0` disables the constraint.
    pub min_separation: f32,
    /// Candidates tried per active point.
    pub batch_size: usize,
    /// Seed for the scatter RNG. Changing it requests a full rescatter.
    pub seed: u64,
}

impl Default for ScatterSettings {
    fn default() -> Self {
        Self {
            min_separation: 1.0,
            batch_size: DEFAULT_BATCH_SIZE,
            seed: 0,
        }
    }
}

impl ScatterSettings {
    pub fn new(min_separation: f32) -> Self {
        Self {
            min_separation,
            ..Default::default()
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Whether the separation constraint is active.
    pub fn constrained(&self) -> bool {
        self.min_separation.is_finite() && self.min_separation > 0.0
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be > 0".into()));
        }
        if self.min_separation.is_nan() {
            return Err(Error::InvalidConfig("min_separation must be a number".into()));
        }
        Ok(())
    }

    /// Returns a copy that passes [`ScatterSettings::validate`].
    pub fn clamped(self) -> Self {
        Self {
            min_separation: if self.min_separation.is_nan() {
                0.0
            } else {
                self.min_separation
            },
            batch_size: self.batch_size.max(1),
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn uniform_points_stay_inside_every_bound() {
        let bounds = [
            ScatterBound::Box {
                size: Vec3::new(4.0, 2.0, 6.0),
            },
            ScatterBound::Sphere {
                radius: 3.0,
                surface: false,
            },
            ScatterBound::Sphere {
                radius: 3.0,
                surface: true,
            },
            ScatterBound::Plane {
                size: Vec2::new(5.0, 1.0),
            },
        ];
        let mut rng = StdRng::seed_from_u64(9);
        for bound in bounds {
            for _ in 0..200 {
                let p = bound.uniform_point(&mut rng);
                assert!(bound.contains(p), "{p:?} outside {bound:?}");
            }
        }
    }

    #[test]
    fn surface_distance_is_arc_length() {
        let bound = ScatterBound::Sphere {
            radius: 2.0,
            surface: true,
        };
        let d = bound.distance(Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0));
        assert!((d - std::f32::consts::PI).abs() < 1e-4);
    }

    #[test]
    fn zero_size_box_collapses_to_center() {
        let bound = ScatterBound::Box { size: Vec3::ZERO };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(bound.uniform_point(&mut rng), Vec3::ZERO);
    }

    #[test]
    fn settings_validation_rejects_zero_batch() {
        let s = ScatterSettings::new(1.0).with_batch_size(0);
        assert!(s.validate().is_err());
        assert!(s.clamped().validate().is_ok());
    }

    #[test]
    fn clamped_bound_drops_negative_extents() {
        let b = ScatterBound::Box {
            size: Vec3::new(-1.0, 2.0, f32::NAN),
        }
        .clamped();
        assert_eq!(
            b,
            ScatterBound::Box {
                size: Vec3::new(0.0, 2.0, 0.0)
            }
        );
    }
}
