//! Multi-segment cubic Bézier paths.
//!
//! Control points are laid out knot, handle, handle, knot, handle, handle, knot...
//! so `N` segments use `3N + 1` points and consecutive segments share a knot.
use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::shape::AnalyticShape;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct BezierPath {
    points: Vec<Vec3>,
}

impl Default for BezierPath {
    fn default() -> Self {
        Self {
            points: vec![
                Vec3::ZERO,
                Vec3::new(2.0, 0.0, 4.0),
                Vec3::new(6.0, 0.0, -4.0),
                Vec3::new(8.0, 0.0, 0.0),
            ],
        }
    }
}

impl BezierPath {
    /// Builds a path from `3N + 1` control points, `N >= 1`.
    pub fn new(points: Vec<Vec3>) -> Result<Self> {
        if points.len() < 4 || (points.len() - 1) % 3 != 0 {
            return Err(Error::InvalidConfig(format!(
                "bezier path needs 3N+1 control points (N >= 1), got {}",
                points.len()
            )));
        }
        Ok(Self { points })
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1) / 3
    }

    /// Appends a segment ending at `knot`, reusing the last knot as its start.
    pub fn push_segment(&mut self, handle_a: Vec3, handle_b: Vec3, knot: Vec3) {
        self.points.extend([handle_a, handle_b, knot]);
    }

    /// Trims or pads the control points to the nearest valid layout.
    pub fn clamped(&self) -> Self {
        let mut points = self.points.clone();
        if points.len() < 4 {
            let last = points.last().copied().unwrap_or(Vec3::ZERO);
            points.resize(4, last);
        }
        let valid = (points.len() - 1) / 3 * 3 + 1;
        points.truncate(valid);
        Self { points }
    }

    /// Segment index and local parameter for a global `t` in `[0, 1]`.
    fn locate(&self, t: f32) -> (usize, f32) {
        let segments = self.segment_count().max(1);
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let scaled = t * segments as f32;
        let segment = (scaled.floor() as usize).min(segments - 1);
        (segment, scaled - segment as f32)
    }

    fn segment(&self, index: usize) -> [Vec3; 4] {
        let base = index * 3;
        [
            self.points[base],
            self.points[base + 1],
            self.points[base + 2],
            self.points[base + 3],
        ]
    }

    /// Point on the path at global parameter `t`.
    pub fn point_at(&self, t: f32) -> Vec3 {
        if self.segment_count() == 0 {
            return self.points.first().copied().unwrap_or(Vec3::ZERO);
        }
        let (seg, u) = self.locate(t);
        let [p0, p1, p2, p3] = self.segment(seg);
        let v = 1.0 - u;
        p0 * (v * v * v) + p1 * (3.0 * u * v * v) + p2 * (3.0 * u * u * v) + p3 * (u * u * u)
    }

    /// First derivative at global parameter `t` (not normalized).
    pub fn tangent_at(&self, t: f32) -> Vec3 {
        if self.segment_count() == 0 {
            return Vec3::ZERO;
        }
        let (seg, u) = self.locate(t);
        let [p0, p1, p2, p3] = self.segment(seg);
        let v = 1.0 - u;
        (p1 - p0) * (3.0 * v * v) + (p2 - p1) * (6.0 * v * u) + (p3 - p2) * (3.0 * u * u)
    }

    /// Parameter of element `index` when `count` elements span the path.
    pub fn sample_t(&self, index: usize, count: usize) -> f32 {
        if count < 2 {
            0.0
        } else {
            index as f32 / (count - 1) as f32
        }
    }
}

impl AnalyticShape for BezierPath {
    fn point(&self, index: usize, count: usize) -> Vec3 {
        self.point_at(self.sample_t(index, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single() -> BezierPath {
        BezierPath::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(3.0, 2.0, 0.0),
            Vec3::new(4.0, 0.0, 1.0),
        ])
        .expect("valid path")
    }

    #[test]
    fn endpoints_are_first_and_last_knots() {
        let path = single();
        assert_eq!(path.point_at(0.0), path.control_points()[0]);
        assert!((path.point_at(1.0) - path.control_points()[3]).length() < 1e-6);
    }

    #[test]
    fn tangent_at_start_is_parallel_to_first_handle() {
        let path = single();
        let t = path.tangent_at(0.0).normalize();
        let h = (path.control_points()[1] - path.control_points()[0]).normalize();
        assert!(t.cross(h).length() < 1e-5);
        assert!(t.dot(h) > 0.0);
    }

    #[test]
    fn multi_segment_passes_through_shared_knot() {
        let mut path = single();
        path.push_segment(
            Vec3::new(5.0, -2.0, 1.0),
            Vec3::new(7.0, -2.0, 1.0),
            Vec3::new(8.0, 0.0, 1.0),
        );
        assert_eq!(path.segment_count(), 2);
        assert!((path.point_at(0.5) - Vec3::new(4.0, 0.0, 1.0)).length() < 1e-5);
        assert!((path.point_at(1.0) - Vec3::new(8.0, 0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn malformed_control_points_are_rejected() {
        assert!(BezierPath::new(vec![Vec3::ZERO; 3]).is_err());
        assert!(BezierPath::new(vec![Vec3::ZERO; 5]).is_err());
        assert!(BezierPath::new(vec![Vec3::ZERO; 7]).is_ok());
    }

    #[test]
    fn clamped_repairs_layout() {
        let path = BezierPath {
            points: vec![Vec3::ZERO; 6],
        }
        .clamped();
        assert_eq!(path.control_points().len(), 4);
        let short = BezierPath {
            points: vec![Vec3::X],
        }
        .clamped();
        assert_eq!(short.control_points().len(), 4);
    }

    #[test]
    fn elements_span_the_full_path() {
        let path = single();
        let pts = AnalyticShape::points(&path, 3);
        assert_eq!(pts[0], path.control_points()[0]);
        assert!((pts[2] - path.control_points()[3]).length() < 1e-6);
    }
}
