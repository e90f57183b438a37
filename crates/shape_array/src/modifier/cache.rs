//! Per-element random samples kept across cycles.
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sampling::{rand01, seed_for_element};

/// Unit samples in `[0, 1)^3`, one per element.
///
/// A sample depends only on `(seed, epoch, index)`, so growing the cache rolls
/// fresh values for the new indices while keeping the old ones, and a reroll
/// is nothing more than a new epoch.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct RandomCache {
    seed: u64,
    epoch: u64,
    #[cfg_attr(feature = "serde", serde(skip))]
    samples: Vec<Vec3>,
}

impl RandomCache {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            epoch: 0,
            samples: Vec::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn samples(&self) -> &[Vec3] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Keeps existing samples by index and rolls the missing ones.
    pub fn resize(&mut self, len: usize) {
        if len <= self.samples.len() {
            self.samples.truncate(len);
            return;
        }
        let start = self.samples.len();
        self.samples
            .extend((start..len).map(|i| sample(self.seed, self.epoch, i)));
    }

    /// Copy with a new epoch and every sample rolled again.
    pub fn rerolled(&self) -> Self {
        let epoch = self.epoch.wrapping_add(1);
        Self {
            seed: self.seed,
            epoch,
            samples: (0..self.samples.len())
                .map(|i| sample(self.seed, epoch, i))
                .collect(),
        }
    }

    /// Same seed and epoch with no samples rolled yet.
    pub fn without_samples(&self) -> Self {
        Self::new(self.seed).with_epoch(self.epoch)
    }

    fn with_epoch(mut self, epoch: u64) -> Self {
        self.epoch = epoch;
        self
    }

    #[inline]
    pub fn get(&self, index: usize) -> Vec3 {
        self.samples.get(index).copied().unwrap_or(Vec3::splat(0.5))
    }
}

fn sample(seed: u64, epoch: u64, index: usize) -> Vec3 {
    let mut rng = StdRng::seed_from_u64(seed_for_element(seed, epoch, index));
    Vec3::new(rand01(&mut rng), rand01(&mut rng), rand01(&mut rng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growing_keeps_existing_samples() {
        let mut cache = RandomCache::new(9);
        cache.resize(4);
        let before = cache.samples().to_vec();
        cache.resize(10);
        assert_eq!(&cache.samples()[..4], before.as_slice());
        assert_eq!(cache.len(), 10);
    }

    #[test]
    fn shrinking_then_growing_is_deterministic() {
        let mut a = RandomCache::new(3);
        a.resize(8);
        let mut b = a.clone();
        b.resize(2);
        b.resize(8);
        assert_eq!(a, b);
    }

    #[test]
    fn reroll_changes_samples_and_epoch() {
        let mut cache = RandomCache::new(1);
        cache.resize(6);
        let rolled = cache.rerolled();
        assert_eq!(rolled.epoch(), 1);
        assert_eq!(rolled.len(), 6);
        assert_ne!(rolled.samples(), cache.samples());
        for s in rolled.samples() {
            assert!(s.min_element() >= 0.0 && s.max_element() < 1.0);
        }
    }
}
