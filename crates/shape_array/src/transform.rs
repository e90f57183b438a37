//! Element transforms passed through the modifier pipeline.
use glam::{EulerRot, Mat3, Quat, Vec3};

/// Final (or in-flight) transform of one element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformProxy {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl TransformProxy {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Default transform of an element sitting at `position`.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Converts into the `mint` triple handed to host scenes.
    pub fn to_mint(
        &self,
    ) -> (
        mint::Vector3<f32>,
        mint::Quaternion<f32>,
        mint::Vector3<f32>,
    ) {
        (
            self.position.into(),
            self.rotation.into(),
            self.scale.into(),
        )
    }
}

impl Default for TransformProxy {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rotation from Euler angles in degrees (yaw around Y, then pitch X, then roll Z).
pub fn euler_degrees(angles: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        angles.y.to_radians(),
        angles.x.to_radians(),
        angles.z.to_radians(),
    )
}

/// Rotation whose local +Z axis points along `forward`.
///
/// Falls back to another up axis when `forward` is parallel to `up`, and to the
/// identity when `forward` has no length.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let f = forward.normalize_or_zero();
    if f == Vec3::ZERO {
        return Quat::IDENTITY;
    }

    let mut right = up.cross(f);
    if right.length_squared() < 1e-10 {
        let alt = if f.y.abs() < 0.9 { Vec3::Y } else { Vec3::Z };
        right = alt.cross(f);
    }
    let right = right.normalize();
    let true_up = f.cross(right);

    Quat::from_mat3(&Mat3::from_cols(right, true_up, f)).normalize()
}
