//! Rotation modifiers. Angles are Euler degrees, see [`crate::transform::euler_degrees`].
use glam::{Quat, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::transform::{euler_degrees, look_rotation};

/// Same extra rotation on every element.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct UniformRotation {
    pub angles: Vec3,
}

impl UniformRotation {
    pub(crate) fn rotate(&self, base: Quat) -> Quat {
        base * euler_degrees(self.angles)
    }
}

/// Per-element rotation drawn from `[min, max]` and cached.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomRotation {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for RandomRotation {
    fn default() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::new(0.0, 360.0, 0.0),
        }
    }
}

impl RandomRotation {
    pub(crate) fn rotate(&self, base: Quat, sample: Vec3) -> Quat {
        base * euler_degrees(self.min + (self.max - self.min) * sample)
    }
}

/// Rotation growing linearly from nothing on the first element to `target`
/// on the last.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IncrementalRotation {
    pub target: Vec3,
}

impl Default for IncrementalRotation {
    fn default() -> Self {
        Self {
            target: Vec3::new(0.0, 90.0, 0.0),
        }
    }
}

impl IncrementalRotation {
    pub(crate) fn rotate(&self, base: Quat, t: f32) -> Quat {
        base * euler_degrees(self.target * t)
    }
}

/// Faces each element along the shape's tangent (or outward normal on spheres).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FollowCurve {
    pub up: Vec3,
    /// Extra rotation applied after facing, in degrees.
    pub offset: Vec3,
}

impl Default for FollowCurve {
    fn default() -> Self {
        Self {
            up: Vec3::Y,
            offset: Vec3::ZERO,
        }
    }
}

impl FollowCurve {
    pub(crate) fn rotate(&self, base: Quat, facing: Option<Vec3>) -> Quat {
        match facing {
            Some(dir) if dir.length_squared() > 0.0 => {
                look_rotation(dir, self.up) * euler_degrees(self.offset)
            }
            _ => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_rotation_composes_onto_base() {
        let base = Quat::from_rotation_y(0.5);
        let m = UniformRotation {
            angles: Vec3::new(0.0, 90.0, 0.0),
        };
        let r = m.rotate(base);
        let expected = base * Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        assert!(r.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn incremental_rotation_spans_zero_to_target() {
        let m = IncrementalRotation::default();
        assert!(m.rotate(Quat::IDENTITY, 0.0).abs_diff_eq(Quat::IDENTITY, 1e-6));
        let end = m.rotate(Quat::IDENTITY, 1.0);
        assert!(end.abs_diff_eq(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2), 1e-5));
    }

    #[test]
    fn follow_curve_points_forward_along_tangent() {
        let m = FollowCurve::default();
        let r = m.rotate(Quat::IDENTITY, Some(Vec3::X));
        assert!((r * Vec3::Z).abs_diff_eq(Vec3::X, 1e-5));
        let kept = m.rotate(Quat::from_rotation_x(1.0), None);
        assert!(kept.abs_diff_eq(Quat::from_rotation_x(1.0), 1e-6));
    }
}
