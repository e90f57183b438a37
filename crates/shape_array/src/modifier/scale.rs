//! Scale modifiers. Scales multiply component-wise onto the upstream scale.
use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformScale {
    pub scale: Vec3,
}

impl Default for UniformScale {
    fn default() -> Self {
        Self { scale: Vec3::ONE }
    }
}

impl UniformScale {
    pub(crate) fn scale(&self, base: Vec3) -> Vec3 {
        base * self.scale
    }
}

/// Per-element scale drawn from `[min, max]` and cached.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomScale {
    pub min: Vec3,
    pub max: Vec3,
    /// Use one sample for all three axes.
    pub uniform: bool,
}

impl Default for RandomScale {
    fn default() -> Self {
        Self {
            min: Vec3::splat(0.5),
            max: Vec3::splat(1.5),
            uniform: true,
        }
    }
}

impl RandomScale {
    pub(crate) fn scale(&self, base: Vec3, sample: Vec3) -> Vec3 {
        let s = if self.uniform {
            Vec3::splat(sample.x)
        } else {
            sample
        };
        base * (self.min + (self.max - self.min) * s)
    }
}

/// Scale interpolated from the upstream scale on the first element to
/// `target` on the last.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IncrementalScale {
    pub target: Vec3,
}

impl Default for IncrementalScale {
    fn default() -> Self {
        Self {
            target: Vec3::splat(2.0),
        }
    }
}

impl IncrementalScale {
    pub(crate) fn scale(&self, base: Vec3, t: f32) -> Vec3 {
        base.lerp(self.target, t)
    }
}
