//! Rings in the XZ plane: circle, arc and ellipse.
//!
//! All three share a [`RadialBlock`] and the same point function; they only
//! differ in their radii and the angular sweep.
use std::f32::consts::TAU;

use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::shape::AnalyticShape;

/// Largest arc fill fraction; a full turn is a circle.
pub const MAX_ARC_FILL: f32 = 0.9999;

/// Center and radius shared by every radial shape.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialBlock {
    pub center: Vec3,
    pub radius: f32,
}

impl Default for RadialBlock {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 5.0,
        }
    }
}

impl RadialBlock {
    pub fn clamped(&self) -> Self {
        Self {
            center: self.center,
            radius: sanitize_radius(self.radius),
        }
    }
}

pub(crate) fn sanitize_radius(r: f32) -> f32 {
    if r.is_finite() {
        r.max(0.0)
    } else {
        0.0
    }
}

#[inline]
fn ring_point(center: Vec3, rx: f32, rz: f32, angle: f32) -> Vec3 {
    center + Vec3::new(angle.cos() * rx, 0.0, angle.sin() * rz)
}

#[inline]
fn ring_tangent(rx: f32, rz: f32, angle: f32) -> Vec3 {
    Vec3::new(-angle.sin() * rx, 0.0, angle.cos() * rz).normalize_or_zero()
}

/// Angle of element `index` on a closed loop of `count` elements.
#[inline]
fn closed_angle(index: usize, count: usize) -> f32 {
    index as f32 * TAU / count.max(1) as f32
}

/// Full circle; consecutive elements are `2π / count` apart.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CircleShape {
    pub radial: RadialBlock,
}

impl CircleShape {
    pub fn clamped(&self) -> Self {
        Self {
            radial: self.radial.clamped(),
        }
    }

    pub fn tangent(&self, index: usize, count: usize) -> Vec3 {
        let r = self.radial.radius;
        ring_tangent(r, r, closed_angle(index, count))
    }
}

impl AnalyticShape for CircleShape {
    fn point(&self, index: usize, count: usize) -> Vec3 {
        let r = self.radial.radius;
        ring_point(self.radial.center, r, r, closed_angle(index, count))
    }
}

/// Partial circle sweeping `2π · fill`, with elements on both ends.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcShape {
    pub radial: RadialBlock,
    /// Fraction of a full turn in `[0, MAX_ARC_FILL]`.
    pub fill: f32,
}

impl Default for ArcShape {
    fn default() -> Self {
        Self {
            radial: RadialBlock::default(),
            fill: 0.5,
        }
    }
}

impl ArcShape {
    pub fn clamped(&self) -> Self {
        let fill = if self.fill.is_finite() {
            self.fill.clamp(0.0, MAX_ARC_FILL)
        } else {
            0.0
        };
        Self {
            radial: self.radial.clamped(),
            fill,
        }
    }

    fn angle(&self, index: usize, count: usize) -> f32 {
        let sweep = TAU * self.fill;
        let step = sweep / count.saturating_sub(1).max(1) as f32;
        index as f32 * step
    }

    pub fn tangent(&self, index: usize, count: usize) -> Vec3 {
        let r = self.radial.radius;
        ring_tangent(r, r, self.angle(index, count))
    }
}

impl AnalyticShape for ArcShape {
    fn point(&self, index: usize, count: usize) -> Vec3 {
        let r = self.radial.radius;
        ring_point(self.radial.center, r, r, self.angle(index, count))
    }
}

/// Closed ellipse; `radial.radius` is the X radius.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EllipseShape {
    pub radial: RadialBlock,
    pub radius_z: f32,
}

impl Default for EllipseShape {
    fn default() -> Self {
        Self {
            radial: RadialBlock {
                center: Vec3::ZERO,
                radius: 6.0,
            },
            radius_z: 3.0,
        }
    }
}

impl EllipseShape {
    pub fn clamped(&self) -> Self {
        Self {
            radial: self.radial.clamped(),
            radius_z: sanitize_radius(self.radius_z),
        }
    }

    pub fn tangent(&self, index: usize, count: usize) -> Vec3 {
        ring_tangent(
            self.radial.radius,
            self.radius_z,
            closed_angle(index, count),
        )
    }
}

impl AnalyticShape for EllipseShape {
    fn point(&self, index: usize, count: usize) -> Vec3 {
        ring_point(
            self.radial.center,
            self.radial.radius,
            self.radius_z,
            closed_angle(index, count),
        )
    }
}
