//! Straight line of evenly spaced elements.
use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::shape::AnalyticShape;

/// `start + offset * i`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineShape {
    /// Position of the first element.
    pub start: Vec3,
    /// Step between consecutive elements.
    pub offset: Vec3,
}

impl Default for LineShape {
    fn default() -> Self {
        Self {
            start: Vec3::ZERO,
            offset: Vec3::X,
        }
    }
}

impl AnalyticShape for LineShape {
    #[inline]
    fn point(&self, index: usize, _count: usize) -> Vec3 {
        self.start + self.offset * index as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_positions_are_evenly_spaced() {
        let line = LineShape {
            start: Vec3::ZERO,
            offset: Vec3::new(2.0, 0.0, 0.0),
        };
        assert_eq!(
            line.points(5),
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(4.0, 0.0, 0.0),
                Vec3::new(6.0, 0.0, 0.0),
                Vec3::new(8.0, 0.0, 0.0),
            ]
        );
    }

    #[test]
    fn line_start_offsets_every_point() {
        let line = LineShape {
            start: Vec3::new(1.0, 2.0, 3.0),
            offset: Vec3::Y,
        };
        assert_eq!(line.point(3, 10), Vec3::new(1.0, 5.0, 3.0));
    }
}
