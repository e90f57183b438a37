//! Centered 1-3 axis grids.
use glam::{UVec3, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::shape::{uvec3_product, AnalyticShape};

/// Axes a grid spreads along.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum GridPlane {
    XY,
    #[default]
    XZ,
    YZ,
    XYZ,
}

impl GridPlane {
    /// Active axis indices, fastest-varying first.
    pub fn axes(self) -> &'static [usize] {
        match self {
            GridPlane::XY => &[0, 1],
            GridPlane::XZ => &[0, 2],
            GridPlane::YZ => &[1, 2],
            GridPlane::XYZ => &[0, 1, 2],
        }
    }
}

/// Grid with independent per-axis counts and spacing, centered on the origin.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridShape {
    pub plane: GridPlane,
    /// Elements per axis; inactive axes are ignored.
    pub counts: UVec3,
    /// Spacing per axis.
    pub offset: Vec3,
}

impl Default for GridShape {
    fn default() -> Self {
        Self {
            plane: GridPlane::XZ,
            counts: UVec3::new(4, 1, 4),
            offset: Vec3::ONE,
        }
    }
}

impl GridShape {
    /// Counts with inactive axes forced to 1.
    pub fn active_counts(&self) -> UVec3 {
        let mut out = UVec3::ONE;
        for &axis in self.plane.axes() {
            out[axis] = self.counts[axis].max(1);
        }
        out
    }

    pub fn element_count(&self) -> usize {
        uvec3_product(self.active_counts())
    }

    /// Ensures at least two elements by widening the first active axis.
    pub fn clamped(&self) -> Self {
        let mut out = *self;
        out.counts = out.counts.max(UVec3::ONE);
        if out.element_count() < 2 {
            let first = out.plane.axes()[0];
            out.counts[first] = 2;
        }
        out
    }
}

impl AnalyticShape for GridShape {
    fn point(&self, index: usize, _count: usize) -> Vec3 {
        let counts = self.active_counts();
        let mut rest = index;
        let mut out = Vec3::ZERO;
        for &axis in self.plane.axes() {
            let n = counts[axis] as usize;
            let cell = rest % n;
            rest /= n;
            let half_extent = (n as f32 - 1.0) * self.offset[axis] / 2.0;
            out[axis] = cell as f32 * self.offset[axis] - half_extent;
        }
        out
    }
}
