//! UV-sphere tessellation: two poles plus `stacks - 1` rings of `sectors` elements.
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::shape::radial::RadialBlock;
use crate::shape::AnalyticShape;

pub const MIN_SECTORS: u32 = 3;
pub const MIN_STACKS: u32 = 2;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereShape {
    pub radial: RadialBlock,
    /// Longitude divisions.
    pub sectors: u32,
    /// Latitude divisions.
    pub stacks: u32,
}

impl Default for SphereShape {
    fn default() -> Self {
        Self {
            radial: RadialBlock::default(),
            sectors: 8,
            stacks: 6,
        }
    }
}

impl SphereShape {
    /// `stacks * sectors - sectors + 2`.
    pub fn element_count(&self) -> usize {
        let sectors = self.sectors.max(MIN_SECTORS) as usize;
        let stacks = self.stacks.max(MIN_STACKS) as usize;
        stacks * sectors - sectors + 2
    }

    pub fn clamped(&self) -> Self {
        Self {
            radial: self.radial.clamped(),
            sectors: self.sectors.max(MIN_SECTORS),
            stacks: self.stacks.max(MIN_STACKS),
        }
    }

    /// Unit direction from the center to element `index`.
    fn direction(&self, index: usize) -> Vec3 {
        let sectors = self.sectors.max(MIN_SECTORS) as usize;
        let stacks = self.stacks.max(MIN_STACKS) as usize;
        let last = self.element_count() - 1;

        let (stack_angle, sector_angle) = if index == 0 {
            (FRAC_PI_2, 0.0)
        } else if index >= last {
            (-FRAC_PI_2, 0.0)
        } else {
            let body = index - 1;
            let ring = body / sectors + 1;
            let sector = body % sectors;
            (
                FRAC_PI_2 - ring as f32 * (PI / stacks as f32),
                sector as f32 * (TAU / sectors as f32),
            )
        };

        let xy = stack_angle.cos();
        Vec3::new(
            xy * sector_angle.cos(),
            xy * sector_angle.sin(),
            stack_angle.sin(),
        )
    }

    /// Outward normal of element `index`.
    pub fn normal(&self, index: usize) -> Vec3 {
        self.direction(index)
    }
}

impl AnalyticShape for SphereShape {
    fn point(&self, index: usize, _count: usize) -> Vec3 {
        self.radial.center + self.direction(index) * self.radial.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere(sectors: u32, stacks: u32, radius: f32) -> SphereShape {
        SphereShape {
            radial: RadialBlock {
                center: Vec3::ZERO,
                radius,
            },
            sectors,
            stacks,
        }
    }

    #[test]
    fn element_count_matches_tessellation() {
        assert_eq!(sphere(16, 8, 1.0).element_count(), 130);
        assert_eq!(sphere(3, 2, 1.0).element_count(), 5);
    }

    #[test]
    fn poles_are_first_and_last() {
        let s = sphere(16, 8, 4.0);
        let n = s.element_count();
        let pts = s.points(n);
        assert!((pts[0] - Vec3::new(0.0, 0.0, 4.0)).length() < 1e-5);
        assert!((pts[n - 1] - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-5);
        for p in &pts {
            assert!((p.length() - 4.0).abs() < 1e-4);
        }
    }

    #[test]
    fn first_ring_follows_stack_angle() {
        let s = sphere(4, 4, 1.0);
        let stack_angle = FRAC_PI_2 - PI / 4.0;
        let p = s.point(1, s.element_count());
        assert!((p.z - stack_angle.sin()).abs() < 1e-5);
        assert!((p.x - stack_angle.cos()).abs() < 1e-5);
        assert!(p.y.abs() < 1e-5);
    }

    #[test]
    fn clamped_enforces_minimum_divisions() {
        let s = sphere(1, 0, -2.0).clamped();
        assert_eq!(s.sectors, MIN_SECTORS);
        assert_eq!(s.stacks, MIN_STACKS);
        assert_eq!(s.radial.radius, 0.0);
    }
}
