//! Name-keyed table of modifier factories.
//!
//! The table is an ordinary value built once by the host and passed by
//! reference wherever modifiers are created from a name.
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::modifier::{
    DropToSurface, FollowCurve, IncrementalRotation, IncrementalScale, ModifierParams,
    PositionNoise, RadialNoise, RandomRotation, RandomScale, UniformRotation, UniformScale,
};
use crate::shape::ShapeParams;

/// Builds default parameters for one modifier kind.
pub type ModifierFactory = fn() -> ModifierParams;

#[derive(Clone, Debug, Default)]
pub struct ModifierRegistry {
    factories: BTreeMap<String, ModifierFactory>,
}

impl ModifierRegistry {
    /// Creates a new, empty [`ModifierRegistry`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in modifier under its canonical name.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        let builtins: [ModifierFactory; 10] = [
            || ModifierParams::UniformRotation(UniformRotation::default()),
            || ModifierParams::RandomRotation(RandomRotation::default()),
            || ModifierParams::IncrementalRotation(IncrementalRotation::default()),
            || ModifierParams::FollowCurve(FollowCurve::default()),
            || ModifierParams::UniformScale(UniformScale::default()),
            || ModifierParams::RandomScale(RandomScale::default()),
            || ModifierParams::IncrementalScale(IncrementalScale::default()),
            || ModifierParams::PositionNoise(PositionNoise::default()),
            || ModifierParams::RadialNoise(RadialNoise::default()),
            || ModifierParams::DropToSurface(DropToSurface::default()),
        ];
        for factory in builtins {
            registry.register(factory().name(), factory);
        }
        registry
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registers a factory, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, factory: ModifierFactory) {
        self.factories.insert(name.into(), factory);
    }

    /// Returns `true` if the factory was found and removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.factories.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.factories.keys().map(String::as_str)
    }

    /// Names of the modifiers that can attach to `shape`.
    pub fn names_for(&self, shape: &ShapeParams) -> Vec<&str> {
        self.factories
            .iter()
            .filter(|(_, f)| f().supported_by(shape))
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// Default parameters for `name`.
    pub fn create(&self, name: &str) -> Result<ModifierParams> {
        self.factories
            .get(name)
            .map(|f| f())
            .ok_or_else(|| Error::UnknownModifier {
                name: name.to_owned(),
            })
    }
}
