//! Position jitter modifiers.
use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Adds a cached random offset from the `[min, max]` box to every element.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionNoise {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for PositionNoise {
    fn default() -> Self {
        Self {
            min: Vec3::splat(-0.5),
            max: Vec3::splat(0.5),
        }
    }
}

impl PositionNoise {
    pub(crate) fn displace(&self, base: Vec3, sample: Vec3) -> Vec3 {
        base + self.min + (self.max - self.min) * sample
    }
}

/// Moves each element along its direction from the shape center by a cached
/// amount in `[min, max]`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialNoise {
    pub min: f32,
    pub max: f32,
}

impl Default for RadialNoise {
    fn default() -> Self {
        Self {
            min: -0.5,
            max: 0.5,
        }
    }
}

impl RadialNoise {
    pub(crate) fn displace(&self, base: Vec3, center: Vec3, sample: f32) -> Vec3 {
        let dir = (base - center).normalize_or_zero();
        base + dir * (self.min + (self.max - self.min) * sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_noise_stays_in_box() {
        let m = PositionNoise::default();
        for s in [Vec3::ZERO, Vec3::splat(0.999), Vec3::new(0.2, 0.7, 0.5)] {
            let d = m.displace(Vec3::ZERO, s);
            assert!(d.cmpge(m.min).all() && d.cmple(m.max).all());
        }
    }

    #[test]
    fn radial_noise_changes_only_distance() {
        let m = RadialNoise { min: 1.0, max: 3.0 };
        let p = m.displace(Vec3::new(4.0, 0.0, 0.0), Vec3::ZERO, 0.5);
        assert!((p - Vec3::new(6.0, 0.0, 0.0)).length() < 1e-6);
        let at_center = m.displace(Vec3::ZERO, Vec3::ZERO, 0.5);
        assert_eq!(at_center, Vec3::ZERO);
    }
}
