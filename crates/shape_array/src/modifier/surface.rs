//! Drop-to-surface modifier and the ray query it needs from the host.
use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::element::ElementHandle;

/// One hit of a downward ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    pub point: mint::Vector3<f32>,
    pub distance: f32,
    /// Element whose collider was hit, if the collider belongs to one.
    pub owner: Option<ElementHandle>,
}

/// Host-side ray queries.
pub trait SurfaceQuery {
    /// Hits of a ray cast straight down (-Y) from `origin`, nearest first.
    fn raycast_down(
        &self,
        origin: mint::Vector3<f32>,
        max_distance: f32,
        layer_mask: u32,
    ) -> Vec<SurfaceHit>;

    /// Distance from an element's pivot to the bottom of its collider.
    fn collider_offset(&self, _handle: ElementHandle) -> Option<f32> {
        None
    }
}

/// How far above the hit point an element is placed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurfaceOffset {
    Fixed(f32),
    /// Per-element offset read from the host collider; `0` when unknown.
    Collider,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropToSurface {
    pub max_distance: f32,
    pub layer_mask: u32,
    pub offset: SurfaceOffset,
}

impl Default for DropToSurface {
    fn default() -> Self {
        Self {
            max_distance: 100.0,
            layer_mask: u32::MAX,
            offset: SurfaceOffset::Fixed(0.0),
        }
    }
}

impl DropToSurface {
    /// Snaps `base` onto the first hit not owned by `element`; returns `base`
    /// unchanged when nothing is in range.
    pub(crate) fn drop(
        &self,
        query: &dyn SurfaceQuery,
        base: Vec3,
        element: Option<ElementHandle>,
    ) -> Vec3 {
        let max_distance = if self.max_distance.is_finite() {
            self.max_distance.max(0.0)
        } else {
            0.0
        };
        let hit = query
            .raycast_down(base.into(), max_distance, self.layer_mask)
            .into_iter()
            .find(|h| h.owner.is_none() || h.owner != element);

        let Some(hit) = hit else {
            return base;
        };
        let lift = match self.offset {
            SurfaceOffset::Fixed(v) => v,
            SurfaceOffset::Collider => element
                .and_then(|e| query.collider_offset(e))
                .unwrap_or(0.0),
        };
        Vec3::from(hit.point) + Vec3::Y * lift
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Floor {
        height: f32,
        self_hit: Option<ElementHandle>,
    }

    impl SurfaceQuery for Floor {
        fn raycast_down(
            &self,
            origin: mint::Vector3<f32>,
            max_distance: f32,
            _layer_mask: u32,
        ) -> Vec<SurfaceHit> {
            let mut hits = Vec::new();
            if let Some(owner) = self.self_hit {
                hits.push(SurfaceHit {
                    point: origin,
                    distance: 0.0,
                    owner: Some(owner),
                });
            }
            let distance = origin.y - self.height;
            if (0.0..=max_distance).contains(&distance) {
                hits.push(SurfaceHit {
                    point: mint::Vector3 {
                        x: origin.x,
                        y: self.height,
                        z: origin.z,
                    },
                    distance,
                    owner: None,
                });
            }
            hits
        }

        fn collider_offset(&self, _handle: ElementHandle) -> Option<f32> {
            Some(0.25)
        }
    }

    #[test]
    fn drops_onto_floor_with_fixed_offset() {
        let floor = Floor {
            height: -2.0,
            self_hit: None,
        };
        let m = DropToSurface {
            offset: SurfaceOffset::Fixed(0.5),
            ..Default::default()
        };
        let p = m.drop(&floor, Vec3::new(1.0, 3.0, 2.0), None);
        assert_eq!(p, Vec3::new(1.0, -1.5, 2.0));
    }

    #[test]
    fn skips_own_collider_and_uses_collider_offset() {
        let me = ElementHandle(7);
        let floor = Floor {
            height: 0.0,
            self_hit: Some(me),
        };
        let m = DropToSurface {
            offset: SurfaceOffset::Collider,
            ..Default::default()
        };
        let p = m.drop(&floor, Vec3::new(0.0, 5.0, 0.0), Some(me));
        assert_eq!(p, Vec3::new(0.0, 0.25, 0.0));
    }

    #[test]
    fn out_of_range_keeps_position() {
        let floor = Floor {
            height: -50.0,
            self_hit: None,
        };
        let m = DropToSurface {
            max_distance: 10.0,
            ..Default::default()
        };
        let base = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(m.drop(&floor, base, None), base);
    }
}
