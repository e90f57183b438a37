//! Composable post-processing of element transforms.
//!
//! A [`Modifier`] owns one [`ModifierParams`] cell and, for the randomized
//! kinds, a [`RandomCache`]. Modifiers are kept in a per-generator
//! [`ModifierStack`] and run in stack order every cycle. Each modifier writes a
//! single [`Channel`] and composes onto the output of the nearest upstream
//! modifier writing that channel, or onto the generator defaults.
use std::cell::Cell;
use std::rc::Rc;

use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::element::ElementHandle;
use crate::error::{Error, Result};
use crate::generator::GeneratorId;
use crate::shape::{Capability, ShapeParams};
use crate::shared::{ListenerId, Shared};
use crate::transform::TransformProxy;

pub mod cache;
pub mod position;
pub mod registry;
pub mod rotation;
pub mod scale;
pub mod stack;
pub mod surface;

pub use cache::RandomCache;
pub use position::{PositionNoise, RadialNoise};
pub use registry::{ModifierFactory, ModifierRegistry};
pub use rotation::{FollowCurve, IncrementalRotation, RandomRotation, UniformRotation};
pub use scale::{IncrementalScale, RandomScale, UniformScale};
pub use stack::ModifierStack;
pub use surface::{DropToSurface, SurfaceHit, SurfaceOffset, SurfaceQuery};

/// Stable handle of a modifier inside its generator's stack.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModifierId(pub u32);

/// Transform component a modifier writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Position,
    Rotation,
    Scale,
}

impl Channel {
    /// Copies this channel from `src` into `dst`.
    #[inline]
    pub fn copy(self, src: &TransformProxy, dst: &mut TransformProxy) {
        match self {
            Channel::Position => dst.position = src.position,
            Channel::Rotation => dst.rotation = src.rotation,
            Channel::Scale => dst.scale = src.scale,
        }
    }
}

/// Parameters of one built-in modifier.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum ModifierParams {
    UniformRotation(UniformRotation),
    RandomRotation(RandomRotation),
    IncrementalRotation(IncrementalRotation),
    FollowCurve(FollowCurve),
    UniformScale(UniformScale),
    RandomScale(RandomScale),
    IncrementalScale(IncrementalScale),
    PositionNoise(PositionNoise),
    RadialNoise(RadialNoise),
    DropToSurface(DropToSurface),
}

impl ModifierParams {
    pub fn name(&self) -> &'static str {
        match self {
            ModifierParams::UniformRotation(_) => "uniform_rotation",
            ModifierParams::RandomRotation(_) => "random_rotation",
            ModifierParams::IncrementalRotation(_) => "incremental_rotation",
            ModifierParams::FollowCurve(_) => "follow_curve",
            ModifierParams::UniformScale(_) => "uniform_scale",
            ModifierParams::RandomScale(_) => "random_scale",
            ModifierParams::IncrementalScale(_) => "incremental_scale",
            ModifierParams::PositionNoise(_) => "position_noise",
            ModifierParams::RadialNoise(_) => "radial_noise",
            ModifierParams::DropToSurface(_) => "drop_to_surface",
        }
    }

    pub fn channel(&self) -> Channel {
        match self {
            ModifierParams::UniformRotation(_)
            | ModifierParams::RandomRotation(_)
            | ModifierParams::IncrementalRotation(_)
            | ModifierParams::FollowCurve(_) => Channel::Rotation,
            ModifierParams::UniformScale(_)
            | ModifierParams::RandomScale(_)
            | ModifierParams::IncrementalScale(_) => Channel::Scale,
            ModifierParams::PositionNoise(_)
            | ModifierParams::RadialNoise(_)
            | ModifierParams::DropToSurface(_) => Channel::Position,
        }
    }

    /// Shape capability the modifier cannot work without.
    pub fn requires(&self) -> Option<Capability> {
        match self {
            ModifierParams::RadialNoise(_) => Some(Capability::Radial),
            ModifierParams::FollowCurve(_) => Some(Capability::Tangent),
            _ => None,
        }
    }

    /// Whether the modifier reads per-element random samples.
    pub fn is_random(&self) -> bool {
        matches!(
            self,
            ModifierParams::RandomRotation(_)
                | ModifierParams::RandomScale(_)
                | ModifierParams::PositionNoise(_)
                | ModifierParams::RadialNoise(_)
        )
    }

    pub fn supported_by(&self, shape: &ShapeParams) -> bool {
        self.requires().is_none_or(|c| shape.supports(c))
    }
}

/// Read-only inputs of one stack run.
#[derive(Clone, Copy)]
pub struct ModifierContext<'a> {
    pub shape: &'a ShapeParams,
    /// Pre-modifier transform of every element.
    pub defaults: &'a [TransformProxy],
    /// Host handles, index-aligned with `defaults` when available.
    pub elements: &'a [ElementHandle],
    pub surface: Option<&'a dyn SurfaceQuery>,
}

impl<'a> ModifierContext<'a> {
    pub fn new(shape: &'a ShapeParams, defaults: &'a [TransformProxy]) -> Self {
        Self {
            shape,
            defaults,
            elements: &[],
            surface: None,
        }
    }

    pub fn with_elements(mut self, elements: &'a [ElementHandle]) -> Self {
        self.elements = elements;
        self
    }

    pub fn with_surface(mut self, surface: Option<&'a dyn SurfaceQuery>) -> Self {
        self.surface = surface;
        self
    }
}

/// Lifecycle of a modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModifierState {
    /// Built but not in a stack.
    Inactive,
    /// In a stack and listening to its parameters.
    Active,
    /// Torn down and detached.
    Removed,
}

/// One entry of a modifier stack.
pub struct Modifier {
    id: ModifierId,
    owner: GeneratorId,
    params: Shared<ModifierParams>,
    cache: RandomCache,
    state: ModifierState,
    listener: Option<ListenerId>,
}

impl Modifier {
    /// Builds a modifier for a generator currently showing `shape`.
    ///
    /// Fails with [`Error::MissingCapability`] when the shape lacks what the
    /// modifier needs.
    pub fn new(
        id: ModifierId,
        owner: GeneratorId,
        params: ModifierParams,
        shape: &ShapeParams,
        seed: u64,
    ) -> Result<Self> {
        if let Some(capability) = params.requires() {
            if !shape.supports(capability) {
                return Err(Error::MissingCapability {
                    modifier: params.name().to_owned(),
                    capability,
                });
            }
        }
        Ok(Self {
            id,
            owner,
            params: Shared::new(params),
            cache: RandomCache::new(seed),
            state: ModifierState::Inactive,
            listener: None,
        })
    }

    pub fn id(&self) -> ModifierId {
        self.id
    }

    pub fn owner(&self) -> GeneratorId {
        self.owner
    }

    pub fn name(&self) -> &'static str {
        self.params.get().name()
    }

    pub fn channel(&self) -> Channel {
        self.params.get().channel()
    }

    pub fn params(&self) -> &ModifierParams {
        self.params.get()
    }

    pub fn state(&self) -> ModifierState {
        self.state
    }

    pub fn cache(&self) -> &RandomCache {
        &self.cache
    }

    pub(crate) fn params_cell(&mut self) -> &mut Shared<ModifierParams> {
        &mut self.params
    }

    pub(crate) fn replace_cache(&mut self, cache: RandomCache) -> RandomCache {
        std::mem::replace(&mut self.cache, cache)
    }

    /// Starts listening to parameter edits; `dirty` is raised on every change.
    pub(crate) fn activate(&mut self, dirty: Rc<Cell<bool>>) {
        if let Some(id) = self.listener.take() {
            self.params.unsubscribe(id);
        }
        self.listener = Some(self.params.subscribe(move |_| dirty.set(true)));
        self.state = ModifierState::Active;
    }

    /// Restores this modifier's channel to the defaults and stops listening.
    pub(crate) fn teardown(&mut self, defaults: &[TransformProxy], proxies: &mut [TransformProxy]) {
        let channel = self.channel();
        for (dst, src) in proxies.iter_mut().zip(defaults) {
            channel.copy(src, dst);
        }
        if let Some(id) = self.listener.take() {
            self.params.unsubscribe(id);
        }
        self.state = ModifierState::Removed;
        debug!(modifier = self.name(), id = self.id.0, "modifier torn down");
    }

    /// Writes this modifier's channel into `out`, composing onto `base`.
    pub(crate) fn process(
        &mut self,
        ctx: &ModifierContext<'_>,
        base: &[TransformProxy],
        out: &mut [TransformProxy],
    ) {
        let count = out.len();
        if self.params.get().is_random() {
            self.cache.resize(count);
        }
        let span = count.saturating_sub(1).max(1) as f32;

        for (i, (dst, src)) in out.iter_mut().zip(base).enumerate() {
            let t = i as f32 / span;
            match self.params.get() {
                ModifierParams::UniformRotation(m) => dst.rotation = m.rotate(src.rotation),
                ModifierParams::RandomRotation(m) => {
                    dst.rotation = m.rotate(src.rotation, self.cache.get(i))
                }
                ModifierParams::IncrementalRotation(m) => dst.rotation = m.rotate(src.rotation, t),
                ModifierParams::FollowCurve(m) => {
                    dst.rotation = m.rotate(src.rotation, ctx.shape.facing(i, count))
                }
                ModifierParams::UniformScale(m) => dst.scale = m.scale(src.scale),
                ModifierParams::RandomScale(m) => dst.scale = m.scale(src.scale, self.cache.get(i)),
                ModifierParams::IncrementalScale(m) => dst.scale = m.scale(src.scale, t),
                ModifierParams::PositionNoise(m) => {
                    dst.position = m.displace(src.position, self.cache.get(i))
                }
                ModifierParams::RadialNoise(m) => {
                    let center = ctx.shape.radial().map(|r| r.center).unwrap_or(Vec3::ZERO);
                    dst.position = m.displace(src.position, center, self.cache.get(i).x)
                }
                ModifierParams::DropToSurface(m) => {
                    dst.position = match ctx.surface {
                        Some(query) => m.drop(query, src.position, ctx.elements.get(i).copied()),
                        None => src.position,
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Modifier")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("params", self.params.get())
            .field("state", &self.state)
            .finish()
    }
}
