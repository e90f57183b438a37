//! Persisted form of a generator.
use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::modifier::{ModifierParams, RandomCache};
use crate::shape::{ShapeKind, ShapeParams};

/// One modifier of a saved stack.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ModifierRecord {
    pub params: ModifierParams,
    /// Seed and epoch of the random values; the values are rolled again on load.
    pub cache: RandomCache,
}

/// Everything needed to resume editing a generator.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorState {
    pub shape: ShapeParams,
    pub target_count: usize,
    /// Modifiers in run order.
    pub modifiers: Vec<ModifierRecord>,
    /// Base positions of the last cycle. Scatter shapes resume from these
    /// instead of sampling again.
    pub base_positions: Vec<Vec3>,
    /// Fallback flag per scatter point; empty for analytic shapes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub scatter_fallback: Vec<bool>,
}

impl GeneratorState {
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }
}
