//! Poisson-disc scatter inside box, sphere and plane bounds.
//!
//! Bounded-attempt dart throwing in the style of Bridson: an accepted point stays
//! "active" until a whole batch of candidates around it fails. When the active
//! list runs dry before the target is reached, the remainder is filled with
//! uniform random points that ignore the separation constraint.
use glam::Vec3;
use rand::Rng as RngCore;
use tracing::debug;

use crate::sampling::{
    rand01, random_unit_circle, random_unit_vector, ScatterBound, ScatterSettings, VolumeSampling,
};

/// Poisson-disc sampling strategy producing up to `count` points.
#[derive(Debug, Clone)]
pub struct PoissonDiskSampling {
    /// Number of points to produce.
    pub count: usize,
    /// Separation and batch settings.
    pub settings: ScatterSettings,
}

impl PoissonDiskSampling {
    pub fn new(count: usize, min_separation: f32) -> Self {
        Self {
            count,
            settings: ScatterSettings::new(min_separation),
        }
    }
}

impl VolumeSampling for PoissonDiskSampling {
    fn generate(&self, bound: &ScatterBound, rng: &mut dyn RngCore) -> Vec<mint::Vector3<f32>> {
        let mut scatter = PoissonScatter::new(*bound, self.settings);
        scatter.generate(self.count, rng);
        scatter.points().iter().copied().map(Into::into).collect()
    }
}

/// Incremental Poisson-disc state: accepted points plus the active list.
///
/// Points cut off by [`PoissonScatter::truncate`] are kept in a reserve and
/// come back, in order, before any new point is sampled.
#[derive(Debug, Clone)]
pub struct PoissonScatter {
    bound: ScatterBound,
    settings: ScatterSettings,
    points: Vec<Vec3>,
    fallback: Vec<bool>,
    active: Vec<usize>,
    /// Truncated tail in reverse order; `pop` yields the next point to restore.
    reserve: Vec<(Vec3, bool)>,
}

impl PoissonScatter {
    pub fn new(bound: ScatterBound, settings: ScatterSettings) -> Self {
        Self {
            bound: bound.clamped(),
            settings: settings.clamped(),
            points: Vec::new(),
            fallback: Vec::new(),
            active: Vec::new(),
            reserve: Vec::new(),
        }
    }

    /// Rebuilds the state from previously accepted points and their fallback
    /// flags. Missing flags count as sampled points; every sampled point is
    /// active again.
    pub fn from_points(
        bound: ScatterBound,
        settings: ScatterSettings,
        points: Vec<Vec3>,
        mut fallback: Vec<bool>,
    ) -> Self {
        let mut scatter = Self::new(bound, settings);
        fallback.resize(points.len(), false);
        scatter.active = (0..points.len()).filter(|&i| !fallback[i]).collect();
        scatter.fallback = fallback;
        scatter.points = points;
        scatter
    }

    pub fn bound(&self) -> &ScatterBound {
        &self.bound
    }

    pub fn settings(&self) -> &ScatterSettings {
        &self.settings
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the point at `index` came from the uniform fallback.
    pub fn is_fallback(&self, index: usize) -> bool {
        self.fallback.get(index).copied().unwrap_or(false)
    }

    pub fn fallback_count(&self) -> usize {
        self.fallback.iter().filter(|f| **f).count()
    }

    /// Fallback flag of every point, in point order.
    pub fn fallback_flags(&self) -> &[bool] {
        &self.fallback
    }

    /// Points held back by earlier truncation.
    pub fn reserve_len(&self) -> usize {
        self.reserve.len()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Discards all points and scatters `target` new ones.
    pub fn generate(&mut self, target: usize, rng: &mut dyn RngCore) -> &[Vec3] {
        self.points.clear();
        self.fallback.clear();
        self.active.clear();
        self.reserve.clear();

        if target == 0 {
            return &self.points;
        }

        if !self.settings.constrained() {
            while self.points.len() < target {
                let p = self.bound.uniform_point(rng);
                self.push(p, false);
            }
            return &self.points;
        }

        let initial = self.bound.uniform_point(rng);
        self.push(initial, false);

        while !self.active.is_empty() && self.points.len() < target {
            self.step(rng);
        }

        let sampled = self.points.len();
        self.top_up(target, rng);
        if sampled < target {
            debug!(
                sampled,
                target, "poisson scatter exhausted; filled remainder uniformly"
            );
        }

        &self.points
    }

    /// Adds one point next to the existing set without rebuilding it.
    ///
    /// A previously truncated point is restored before anything is sampled,
    /// so shrinking and growing back yields the same set.
    pub fn find_one_more_point(&mut self, rng: &mut dyn RngCore) -> Vec3 {
        if let Some((p, fallback)) = self.reserve.pop() {
            self.push(p, fallback);
            return p;
        }

        if !self.settings.constrained() {
            let p = self.bound.uniform_point(rng);
            self.push(p, false);
            return p;
        }

        if self.points.is_empty() {
            let p = self.bound.uniform_point(rng);
            self.push(p, false);
            return p;
        }

        let before = self.points.len();
        while !self.active.is_empty() {
            self.step(rng);
            if self.points.len() > before {
                return self.points[before];
            }
        }

        let p = self.bound.uniform_point(rng);
        self.push(p, true);
        p
    }

    /// Keeps the first `len` points and reactivates every sampled survivor.
    /// The cut tail moves to the reserve.
    pub fn truncate(&mut self, len: usize) {
        if len < self.points.len() {
            let tail: Vec<(Vec3, bool)> = self
                .points
                .drain(len..)
                .zip(self.fallback.drain(len..))
                .collect();
            self.reserve.extend(tail.into_iter().rev());
        }
        self.active = (0..self.points.len())
            .filter(|&i| !self.fallback[i])
            .collect();
    }

    fn push(&mut self, p: Vec3, fallback: bool) {
        let idx = self.points.len();
        self.points.push(p);
        self.fallback.push(fallback);
        if !fallback {
            self.active.push(idx);
        }
    }

    fn top_up(&mut self, target: usize, rng: &mut dyn RngCore) {
        while self.points.len() < target {
            let p = self.bound.uniform_point(rng);
            self.push(p, true);
        }
    }

    /// One sampling step: tries a batch around a random active point, retiring
    /// the point when nothing in the batch is valid.
    fn step(&mut self, rng: &mut dyn RngCore) {
        let slot = ((rand01(rng) * self.active.len() as f32) as usize).min(self.active.len() - 1);
        let base = self.points[self.active[slot]];
        let d = self.settings.min_separation;

        for _ in 0..self.settings.batch_size {
            let magnitude = d + rand01(rng) * d;
            let direction = if self.bound.is_planar() {
                let c = random_unit_circle(rng);
                Vec3::new(c.x, 0.0, c.y)
            } else {
                random_unit_vector(rng)
            };
            let candidate = self.bound.project(base + direction * magnitude);
            if self.is_valid(candidate) {
                self.push(candidate, false);
                return;
            }
        }

        self.active.swap_remove(slot);
    }

    fn is_valid(&self, candidate: Vec3) -> bool {
        if !self.bound.contains(candidate) {
            return false;
        }
        let d = self.settings.min_separation;
        self.points
            .iter()
            .all(|&q| self.bound.distance(candidate, q) >= d)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn assert_separated(scatter: &PoissonScatter) {
        let pts = scatter.points();
        let d = scatter.settings().min_separation;
        for i in 0..pts.len() {
            if scatter.is_fallback(i) {
                continue;
            }
            for j in (i + 1)..pts.len() {
                if scatter.is_fallback(j) {
                    continue;
                }
                let dist = scatter.bound().distance(pts[i], pts[j]);
                assert!(dist >= d - 1e-4, "points {i} and {j} are {dist} apart");
            }
        }
    }

    #[test]
    fn box_scatter_respects_separation_and_bound() {
        let bound = ScatterBound::Box {
            size: Vec3::new(10.0, 4.0, 10.0),
        };
        let mut scatter = PoissonScatter::new(bound, ScatterSettings::new(1.5));
        let mut rng = StdRng::seed_from_u64(123);
        scatter.generate(40, &mut rng);

        assert_eq!(scatter.len(), 40);
        assert!(scatter.points().iter().all(|p| bound.contains(*p)));
        assert_separated(&scatter);
    }

    #[test]
    fn plane_scatter_stays_flat() {
        let bound = ScatterBound::Plane {
            size: Vec2::new(8.0, 8.0),
        };
        let mut scatter = PoissonScatter::new(bound, ScatterSettings::new(1.0));
        let mut rng = StdRng::seed_from_u64(7);
        scatter.generate(25, &mut rng);

        assert_eq!(scatter.len(), 25);
        assert!(scatter.points().iter().all(|p| p.y == 0.0));
        assert_separated(&scatter);
    }

    #[test]
    fn sphere_surface_uses_arc_separation() {
        let bound = ScatterBound::Sphere {
            radius: 5.0,
            surface: true,
        };
        let mut scatter = PoissonScatter::new(bound, ScatterSettings::new(2.0));
        let mut rng = StdRng::seed_from_u64(11);
        scatter.generate(30, &mut rng);

        assert_eq!(scatter.len(), 30);
        assert!(scatter.points().iter().all(|p| bound.contains(*p)));
        assert_separated(&scatter);
    }

    #[test]
    fn dense_request_falls_back_to_uniform_fill() {
        let bound = ScatterBound::Box {
            size: Vec3::splat(2.0),
        };
        let mut scatter = PoissonScatter::new(bound, ScatterSettings::new(1.5));
        let mut rng = StdRng::seed_from_u64(3);
        scatter.generate(50, &mut rng);

        assert_eq!(scatter.len(), 50);
        assert!(scatter.fallback_count() > 0);
        assert!(scatter.points().iter().all(|p| bound.contains(*p)));
        assert_separated(&scatter);
    }

    #[test]
    fn non_positive_separation_is_uniform_fill() {
        let bound = ScatterBound::Box {
            size: Vec3::splat(1.0),
        };
        let mut scatter = PoissonScatter::new(bound, ScatterSettings::new(0.0));
        let mut rng = StdRng::seed_from_u64(1);
        scatter.generate(100, &mut rng);
        assert_eq!(scatter.len(), 100);
        assert_eq!(scatter.fallback_count(), 0);
    }

    #[test]
    fn zero_size_bound_collapses_to_center() {
        let bound = ScatterBound::Box { size: Vec3::ZERO };
        let mut scatter = PoissonScatter::new(bound, ScatterSettings::new(1.0));
        let mut rng = StdRng::seed_from_u64(1);
        scatter.generate(4, &mut rng);
        assert_eq!(scatter.len(), 4);
        assert!(scatter.points().iter().all(|p| *p == Vec3::ZERO));
    }

    #[test]
    fn find_one_more_point_extends_without_moving_existing() {
        let bound = ScatterBound::Box {
            size: Vec3::splat(20.0),
        };
        let mut scatter = PoissonScatter::new(bound, ScatterSettings::new(2.0));
        let mut rng = StdRng::seed_from_u64(99);
        scatter.generate(10, &mut rng);
        let before = scatter.points().to_vec();

        let added = scatter.find_one_more_point(&mut rng);
        assert_eq!(scatter.len(), 11);
        assert_eq!(&scatter.points()[..10], before.as_slice());
        assert_eq!(scatter.points()[10], added);
        assert_separated(&scatter);
    }

    #[test]
    fn truncate_reactivates_survivors() {
        let bound = ScatterBound::Box {
            size: Vec3::splat(20.0),
        };
        let mut scatter = PoissonScatter::new(bound, ScatterSettings::new(2.0));
        let mut rng = StdRng::seed_from_u64(5);
        scatter.generate(12, &mut rng);
        scatter.truncate(4);
        assert_eq!(scatter.len(), 4);
        assert_eq!(scatter.active_len(), 4);
        assert_eq!(scatter.reserve_len(), 8);
    }

    #[test]
    fn regrowth_restores_truncated_points_first() {
        let bound = ScatterBound::Plane {
            size: Vec2::splat(40.0),
        };
        let mut scatter = PoissonScatter::new(bound, ScatterSettings::new(2.0));
        let mut rng = StdRng::seed_from_u64(3);
        scatter.generate(10, &mut rng);
        for _ in 0..15 {
            scatter.find_one_more_point(&mut rng);
        }
        let full = scatter.points().to_vec();

        scatter.truncate(12);
        scatter.truncate(4);
        assert_eq!(scatter.reserve_len(), 21);

        // A different stream must not matter while the reserve lasts.
        let mut other = StdRng::seed_from_u64(1000);
        while scatter.len() < 25 {
            scatter.find_one_more_point(&mut other);
        }
        assert_eq!(scatter.points(), full.as_slice());
        assert_eq!(scatter.reserve_len(), 0);

        scatter.find_one_more_point(&mut other);
        assert_eq!(scatter.len(), 26);
        assert_separated(&scatter);
    }

    #[test]
    fn regrowth_keeps_fallback_flags() {
        let bound = ScatterBound::Box {
            size: Vec3::splat(2.0),
        };
        let mut scatter = PoissonScatter::new(bound, ScatterSettings::new(1.5));
        let mut rng = StdRng::seed_from_u64(3);
        scatter.generate(30, &mut rng);
        let flags = scatter.fallback_flags().to_vec();

        scatter.truncate(2);
        while scatter.len() < 30 {
            scatter.find_one_more_point(&mut rng);
        }
        assert_eq!(scatter.fallback_flags(), flags.as_slice());
    }

    #[test]
    fn from_points_keeps_fallback_points_inactive() {
        let bound = ScatterBound::Box {
            size: Vec3::splat(10.0),
        };
        let points = vec![Vec3::ZERO, Vec3::X * 3.0, Vec3::Z * 3.0];
        let scatter = PoissonScatter::from_points(
            bound,
            ScatterSettings::new(1.0),
            points,
            vec![false, true],
        );
        assert_eq!(scatter.fallback_count(), 1);
        assert_eq!(scatter.fallback_flags(), &[false, true, false]);
        assert_eq!(scatter.active_len(), 2);
    }

    #[test]
    fn same_seed_same_points() {
        let bound = ScatterBound::Sphere {
            radius: 4.0,
            surface: false,
        };
        let sampling = PoissonDiskSampling::new(20, 1.0);
        let a = sampling.generate(&bound, &mut StdRng::seed_from_u64(42));
        let b = sampling.generate(&bound, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
    }
}
