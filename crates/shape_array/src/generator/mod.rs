//! Generator façade: one shape, its element set and its modifier stack.
//!
//! A [`Generator`] never mutates in response to an edit call. Edits become
//! commands in its queue, and [`Generator::refresh`] runs one cycle:
//!
//! 1. drain the queue, recording each command in the history
//! 2. settle the element count (derived or clamped)
//! 3. reconcile the host elements against that count
//! 4. regenerate base positions (analytic or Poisson scatter)
//! 5. run the modifier stack
//! 6. write every transform to the host
use std::cell::Cell;
use std::rc::Rc;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::command::{
    AddModifier, Command, CommandQueue, History, MoveModifier, RemoveModifier, SetCount,
    SetModifierParams, SetValue, ValueArrayChanged,
};
use crate::element::{ElementHandle, ElementSet, HostScene};
use crate::error::{Error, Result};
use crate::events::{ArrayEvent, EventSink};
use crate::modifier::{
    Modifier, ModifierContext, ModifierId, ModifierParams, ModifierRegistry, ModifierStack,
};
use crate::sampling::{seed_for_element, PoissonScatter, DEFAULT_BATCH_SIZE};
use crate::shape::{ScatterShape, ShapeKind, ShapeParams};
use crate::shared::Shared;
use crate::transform::TransformProxy;

mod config;
pub mod session;
mod state;

pub use config::GeneratorConfig;
pub use session::Session;
pub use state::{GeneratorState, ModifierRecord};

/// Handle of a generator inside a [`Session`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneratorId(pub u32);

/// Change flags raised by value-cell listeners.
#[derive(Clone, Debug)]
struct DirtyFlags {
    shape: Rc<Cell<bool>>,
    count: Rc<Cell<bool>>,
    modifiers: Rc<Cell<bool>>,
}

impl DirtyFlags {
    fn raised() -> Self {
        Self {
            shape: Rc::new(Cell::new(true)),
            count: Rc::new(Cell::new(true)),
            modifiers: Rc::new(Cell::new(true)),
        }
    }

    fn any(&self) -> bool {
        self.shape.get() || self.count.get() || self.modifiers.get()
    }

    fn clear(&self) {
        self.shape.set(false);
        self.count.set(false);
        self.modifiers.set(false);
    }
}

/// Summary of one [`Generator::refresh`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Commands executed from the queue.
    pub commands: usize,
    pub created: usize,
    pub destroyed: usize,
    /// Live elements after the cycle.
    pub elements: usize,
    /// Scatter points that ignore the separation constraint.
    pub fallback: usize,
}

pub struct Generator {
    id: GeneratorId,
    config: GeneratorConfig,
    shape: Shared<ShapeParams>,
    count: Shared<usize>,
    modifiers: ModifierStack,
    queue: CommandQueue,
    history: History<Box<dyn Command>>,
    elements: ElementSet,
    scatter: Option<PoissonScatter>,
    /// Point sets of earlier scatter settings, newest last, so reverting a
    /// scatter edit brings back the exact points.
    scatter_cache: Vec<PoissonScatter>,
    base: Vec<Vec3>,
    defaults: Vec<TransformProxy>,
    proxies: Vec<TransformProxy>,
    flags: DirtyFlags,
    events: Vec<ArrayEvent>,
}

impl Generator {
    /// Creates a generator laying out `shape` under `container`.
    pub fn new(
        id: GeneratorId,
        container: ElementHandle,
        shape: ShapeParams,
        config: GeneratorConfig,
    ) -> Result<Self> {
        config.validate()?;
        let shape = Self::seeded(shape.clamped(), &config);
        let count = shape.clamp_count(config.initial_count);
        Ok(Self::assemble(
            id,
            config,
            shape,
            count,
            ElementSet::new(container),
        ))
    }

    fn assemble(
        id: GeneratorId,
        config: GeneratorConfig,
        shape: ShapeParams,
        count: usize,
        elements: ElementSet,
    ) -> Self {
        let flags = DirtyFlags::raised();
        let mut shape = Shared::new(shape);
        let mut count = Shared::new(count);
        let shape_flag = Rc::clone(&flags.shape);
        shape.subscribe(move |_| shape_flag.set(true));
        let count_flag = Rc::clone(&flags.count);
        count.subscribe(move |_| count_flag.set(true));

        Self {
            id,
            config,
            shape,
            count,
            modifiers: ModifierStack::new(),
            queue: CommandQueue::new(),
            history: History::new(config.history),
            elements,
            scatter: None,
            scatter_cache: Vec::new(),
            base: Vec::new(),
            defaults: Vec::new(),
            proxies: Vec::new(),
            flags,
            events: Vec::new(),
        }
    }

    /// Applies the configured seed and batch size to scatter settings that
    /// still hold the defaults (seed 0, [`DEFAULT_BATCH_SIZE`]).
    fn seeded(shape: ShapeParams, config: &GeneratorConfig) -> ShapeParams {
        match shape {
            ShapeParams::Scatter(mut s) => {
                if s.settings.seed == 0 {
                    s.settings.seed = config.seed;
                }
                if s.settings.batch_size == DEFAULT_BATCH_SIZE {
                    s.settings.batch_size = config.batch_size;
                }
                ShapeParams::Scatter(s)
            }
            other => other,
        }
    }

    /// Rebuilds a generator from saved state, adopting the elements the host
    /// still has under `container`.
    pub fn from_state(
        id: GeneratorId,
        container: ElementHandle,
        state: GeneratorState,
        config: GeneratorConfig,
        host: &dyn HostScene,
    ) -> Result<Self> {
        config.validate()?;
        let shape = state.shape.clamped();
        let count = shape.clamp_count(state.target_count);
        let elements = ElementSet::rehydrate(container, host);
        let mut generator = Self::assemble(id, config, shape, count, elements);
        generator.base = state.base_positions;

        if let ShapeParams::Scatter(s) = generator.shape.get() {
            if !generator.base.is_empty() {
                generator.scatter = Some(PoissonScatter::from_points(
                    s.bound,
                    s.settings,
                    generator.base.clone(),
                    state.scatter_fallback,
                ));
            }
        }

        for record in state.modifiers {
            let mid = generator.modifiers.allocate_id();
            let mut modifier = Modifier::new(
                mid,
                id,
                record.params,
                generator.shape.get(),
                record.cache.seed(),
            )?;
            modifier.replace_cache(record.cache.without_samples());
            generator.attach_modifier(usize::MAX, modifier);
        }
        generator.events.clear();

        info!(
            generator = id.0,
            kind = generator.kind().name(),
            count,
            adopted = generator.elements.len(),
            "generator resumed"
        );
        Ok(generator)
    }

    /// Snapshot of the committed state; queued commands are not included.
    pub fn state(&self) -> GeneratorState {
        GeneratorState {
            shape: self.shape.cloned(),
            target_count: *self.count.get(),
            modifiers: self
                .modifiers
                .iter()
                .map(|m| ModifierRecord {
                    params: m.params().clone(),
                    cache: m.cache().without_samples(),
                })
                .collect(),
            base_positions: self.base.clone(),
            scatter_fallback: self
                .scatter
                .as_ref()
                .map(|s| s.fallback_flags().to_vec())
                .unwrap_or_default(),
        }
    }

    pub fn id(&self) -> GeneratorId {
        self.id
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn container(&self) -> ElementHandle {
        self.elements.container()
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.get().kind()
    }

    pub fn shape(&self) -> &ShapeParams {
        self.shape.get()
    }

    /// Requested element count after the last settled edit.
    pub fn count(&self) -> usize {
        *self.count.get()
    }

    pub fn elements(&self) -> &ElementSet {
        &self.elements
    }

    pub fn modifiers(&self) -> &ModifierStack {
        &self.modifiers
    }

    pub fn history(&self) -> &History<Box<dyn Command>> {
        &self.history
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Positions produced by the shape before any modifier ran.
    pub fn base_positions(&self) -> &[Vec3] {
        &self.base
    }

    /// Pre-modifier transform of every element.
    pub fn defaults(&self) -> &[TransformProxy] {
        &self.defaults
    }

    /// Final transforms of the last cycle.
    pub fn proxies(&self) -> &[TransformProxy] {
        &self.proxies
    }

    /// Default transform of element `index` as of the last cycle.
    pub fn default_transform(&self, index: usize) -> Option<TransformProxy> {
        self.defaults.get(index).copied()
    }

    /// Scatter state, for scatter shapes that ran at least one cycle.
    pub fn scatter(&self) -> Option<&PoissonScatter> {
        self.scatter.as_ref()
    }

    /// Whether anything changed since the last cycle.
    pub fn is_dirty(&self) -> bool {
        !self.queue.is_empty() || self.flags.any()
    }

    pub(crate) fn shape_cell(&mut self) -> &mut Shared<ShapeParams> {
        &mut self.shape
    }

    pub(crate) fn count_cell(&mut self) -> &mut Shared<usize> {
        &mut self.count
    }

    pub(crate) fn modifiers_mut(&mut self) -> &mut ModifierStack {
        &mut self.modifiers
    }

    pub(crate) fn mark_modifiers_dirty(&self) {
        self.flags.modifiers.set(true);
    }

    pub(crate) fn attach_modifier(&mut self, position: usize, mut modifier: Modifier) {
        modifier.activate(Rc::clone(&self.flags.modifiers));
        debug!(generator = self.id.0, modifier = modifier.name(), "modifier attached");
        self.events.push(ArrayEvent::ModifierAttached {
            generator: self.id,
            modifier: modifier.id(),
            name: modifier.name(),
        });
        self.modifiers.insert(position, modifier);
        self.mark_modifiers_dirty();
    }

    pub(crate) fn detach_modifier(&mut self, id: ModifierId) -> Option<(usize, Modifier)> {
        let (position, mut modifier) = self.modifiers.remove(id)?;
        modifier.teardown(&self.defaults, &mut self.proxies);
        self.mark_modifiers_dirty();
        self.events.push(ArrayEvent::ModifierRemoved {
            generator: self.id,
            modifier: id,
            name: modifier.name(),
        });
        Some((position, modifier))
    }

    pub(crate) fn reorder_modifier(&mut self, id: ModifierId, position: usize) -> Option<usize> {
        let from = self.modifiers.move_to(id, position);
        if from.is_some() {
            self.mark_modifiers_dirty();
        }
        from
    }

    /// Queues a command for the next cycle.
    pub fn enqueue(&mut self, command: impl Command + 'static) {
        self.queue.push(Box::new(command));
    }

    pub fn enqueue_boxed(&mut self, command: Box<dyn Command>) {
        self.queue.push(command);
    }

    /// Queues an element count change, clamped to the shape minimum.
    ///
    /// Returns the clamped count. Grid and sphere derive their count from
    /// their parameters and reject this with [`Error::DerivedCount`].
    pub fn set_count(&mut self, count: usize) -> Result<usize> {
        let shape = self.shape.get();
        if shape.derived_count().is_some() {
            return Err(Error::DerivedCount { kind: shape.kind() });
        }
        let count = shape.clamp_count(count);
        self.enqueue(SetCount::new(count));
        Ok(count)
    }

    /// Queues new parameters for the current shape kind, clamped into range.
    pub fn edit_shape(&mut self, params: ShapeParams) -> Result<()> {
        let expected = self.kind();
        if params.kind() != expected {
            return Err(Error::KindMismatch {
                expected,
                got: params.kind(),
            });
        }
        self.enqueue(SetValue::new(
            "edit shape",
            Generator::shape_cell,
            params.clamped(),
        ));
        Ok(())
    }

    /// Queues an edit built from a copy of the current parameters.
    pub fn edit_shape_with(&mut self, edit: impl FnOnce(&mut ShapeParams)) -> Result<()> {
        let mut params = self.shape.cloned();
        edit(&mut params);
        self.edit_shape(params)
    }

    /// Queues a new scatter seed, which resamples every point.
    pub fn rescatter(&mut self) -> Result<()> {
        let ShapeParams::Scatter(mut s) = self.shape.cloned() else {
            return Err(Error::InvalidConfig(format!(
                "{} is not a scatter shape",
                self.kind().name()
            )));
        };
        s.settings.seed = seed_for_element(s.settings.seed, 1, 0);
        self.edit_shape(ShapeParams::Scatter(s))
    }

    /// Builds a modifier and queues its insertion at `position` (end when `None`).
    ///
    /// Fails immediately when the current shape lacks a capability the
    /// modifier needs.
    pub fn add_modifier(
        &mut self,
        params: ModifierParams,
        position: Option<usize>,
    ) -> Result<ModifierId> {
        if let Some(capability) = params.requires() {
            if !self.shape.get().supports(capability) {
                return Err(Error::MissingCapability {
                    modifier: params.name().to_owned(),
                    capability,
                });
            }
        }
        let id = self.modifiers.allocate_id();
        let seed = seed_for_element(self.config.seed, 0, id.0 as usize);
        let modifier = Modifier::new(id, self.id, params, self.shape.get(), seed)?;
        self.enqueue(AddModifier::new(position.unwrap_or(usize::MAX), modifier));
        Ok(id)
    }

    /// Looks `name` up in `registry` and adds it with default parameters.
    pub fn add_modifier_named(
        &mut self,
        registry: &ModifierRegistry,
        name: &str,
    ) -> Result<ModifierId> {
        let params = registry.create(name)?;
        self.add_modifier(params, None)
    }

    fn ensure_known(&self, id: ModifierId) -> Result<()> {
        if self.modifiers.is_known(id) {
            Ok(())
        } else {
            Err(Error::ModifierNotFound(id))
        }
    }

    pub fn remove_modifier(&mut self, id: ModifierId) -> Result<()> {
        self.ensure_known(id)?;
        self.enqueue(RemoveModifier::new(id));
        Ok(())
    }

    pub fn move_modifier(&mut self, id: ModifierId, position: usize) -> Result<()> {
        self.ensure_known(id)?;
        self.enqueue(MoveModifier::new(id, position));
        Ok(())
    }

    pub fn set_modifier_params(&mut self, id: ModifierId, params: ModifierParams) -> Result<()> {
        self.ensure_known(id)?;
        if let Some(capability) = params.requires() {
            if !self.shape.get().supports(capability) {
                return Err(Error::MissingCapability {
                    modifier: params.name().to_owned(),
                    capability,
                });
            }
        }
        self.enqueue(SetModifierParams::new(id, params));
        Ok(())
    }

    /// Queues a reroll of every random value of modifier `id`.
    pub fn randomize_modifier(&mut self, id: ModifierId) -> Result<()> {
        self.ensure_known(id)?;
        self.enqueue(ValueArrayChanged::reroll(id));
        Ok(())
    }

    /// Switches to another shape kind immediately.
    ///
    /// Pending commands and both history stacks are discarded, the new kind
    /// starts from its default parameters, and modifiers the new shape cannot
    /// support are torn down. Returns the ids of the removed modifiers.
    pub fn set_kind(&mut self, kind: ShapeKind) -> Vec<ModifierId> {
        self.set_kind_with_events(kind, &mut ())
    }

    pub fn set_kind_with_events(
        &mut self,
        kind: ShapeKind,
        sink: &mut dyn EventSink,
    ) -> Vec<ModifierId> {
        self.queue.clear();
        self.history.clear();
        self.scatter = None;
        self.scatter_cache.clear();

        let shape = Self::seeded(kind.default_params(), &self.config);
        let count = shape.clamp_count(*self.count.get());
        self.shape.set(shape);
        self.count.set(count);

        let doomed: Vec<ModifierId> = self
            .modifiers
            .iter()
            .filter(|m| !m.params().supported_by(self.shape.get()))
            .map(Modifier::id)
            .collect();
        for id in &doomed {
            self.detach_modifier(*id);
        }
        self.flush(sink);

        info!(
            generator = self.id.0,
            kind = kind.name(),
            count,
            removed = doomed.len(),
            "shape kind switched"
        );
        doomed
    }

    /// Reverts the most recent command. Pending commands are executed first.
    ///
    /// Returns the label of the reverted command.
    pub fn undo(&mut self) -> Option<String> {
        self.undo_with_events(&mut ())
    }

    pub fn undo_with_events(&mut self, sink: &mut dyn EventSink) -> Option<String> {
        self.drain(sink);
        let mut command = self.history.take_undo()?;
        command.revert(self);
        self.flush(sink);
        let label = command.label().to_owned();
        self.history.finish_undo(command);
        debug!(generator = self.id.0, label = %label, "undo");
        sink.send(ArrayEvent::Undone {
            generator: self.id,
            label: label.clone(),
        });
        Some(label)
    }

    /// Executes the most recently reverted command again.
    pub fn redo(&mut self) -> Option<String> {
        self.redo_with_events(&mut ())
    }

    pub fn redo_with_events(&mut self, sink: &mut dyn EventSink) -> Option<String> {
        self.drain(sink);
        let mut command = self.history.take_redo()?;
        command.execute(self);
        self.flush(sink);
        let label = command.label().to_owned();
        self.history.finish_redo(command);
        debug!(generator = self.id.0, label = %label, "redo");
        sink.send(ArrayEvent::Redone {
            generator: self.id,
            label: label.clone(),
        });
        Some(label)
    }

    /// Executes and records every queued command, oldest first.
    fn drain(&mut self, sink: &mut dyn EventSink) -> usize {
        if self.queue.is_empty() {
            return 0;
        }
        let mut labels = Vec::with_capacity(self.queue.len());
        while let Some(mut command) = self.queue.pop() {
            command.execute(self);
            self.flush(sink);
            labels.push(command.label().to_owned());
            self.history.record(command);
        }
        let n = labels.len();
        sink.send(ArrayEvent::CommandsDrained {
            generator: self.id,
            labels,
        });
        n
    }

    fn flush(&mut self, sink: &mut dyn EventSink) {
        for event in self.events.drain(..) {
            sink.send(event);
        }
    }

    /// Runs one cycle against `host`.
    pub fn refresh(&mut self, host: &mut dyn HostScene) -> CycleReport {
        self.refresh_with_events(host, &mut ())
    }

    /// Runs one cycle, streaming progress to `sink`.
    pub fn refresh_with_events(
        &mut self,
        host: &mut dyn HostScene,
        sink: &mut dyn EventSink,
    ) -> CycleReport {
        sink.send(ArrayEvent::CycleStarted {
            generator: self.id,
            kind: self.kind(),
        });

        let mut report = CycleReport {
            commands: self.drain(sink),
            ..Default::default()
        };

        let target = self.settle_count();

        let interim = TransformProxy::from_position(self.shape.get().anchor());
        let reconciled = self.elements.reconcile(target, host, &interim);
        report.created = reconciled.created;
        report.destroyed = reconciled.destroyed;
        if !reconciled.is_noop() {
            sink.send(ArrayEvent::ElementsReconciled {
                generator: self.id,
                created: reconciled.created,
                destroyed: reconciled.destroyed,
            });
        }

        report.fallback = self.regenerate(target, sink);
        self.defaults = self
            .base
            .iter()
            .copied()
            .map(TransformProxy::from_position)
            .collect();

        let proxies = {
            let ctx = ModifierContext::new(self.shape.get(), &self.defaults)
                .with_elements(self.elements.handles())
                .with_surface(host.surface());
            self.modifiers.apply(&ctx)
        };
        self.elements.apply(host, &proxies);
        self.proxies = proxies;
        self.flags.clear();

        report.elements = self.elements.len();
        sink.send(ArrayEvent::CycleFinished {
            generator: self.id,
            elements: report.elements,
        });
        report
    }

    /// Clamps or derives the count from the current shape.
    fn settle_count(&mut self) -> usize {
        let requested = *self.count.get();
        let target = self.shape.get().clamp_count(requested);
        if target != requested {
            self.count.replace_silent(target);
            self.flags.count.set(true);
        }
        target
    }

    /// Recomputes base positions for `target` elements. Returns the number of
    /// fallback scatter points.
    fn regenerate(&mut self, target: usize, sink: &mut dyn EventSink) -> usize {
        match self.shape.get() {
            ShapeParams::Scatter(s) => {
                let s = *s;
                self.regenerate_scatter(s, target, sink)
            }
            params => {
                self.scatter = None;
                self.base = params
                    .as_analytic()
                    .map(|a| a.points(target))
                    .unwrap_or_default();
                0
            }
        }
    }

    fn regenerate_scatter(
        &mut self,
        shape: ScatterShape,
        target: usize,
        sink: &mut dyn EventSink,
    ) -> usize {
        let bound = shape.bound.clamped();
        let settings = shape.settings.clamped();
        let matches = |s: &PoissonScatter| *s.bound() == bound && *s.settings() == settings;

        let reusable = match self.scatter.take() {
            Some(current) if matches(&current) => Some(current),
            previous => {
                if let Some(previous) = previous {
                    self.stash_scatter(previous);
                }
                self.scatter_cache
                    .iter()
                    .rposition(matches)
                    .map(|i| self.scatter_cache.remove(i))
            }
        };

        let (mut scatter, mut sampled_now) = match reusable {
            Some(s) => (s, false),
            None => {
                let mut s = PoissonScatter::new(shape.bound, shape.settings);
                let mut rng = StdRng::seed_from_u64(shape.settings.seed);
                s.generate(target, &mut rng);
                (s, true)
            }
        };

        if scatter.len() < target {
            let mut rng =
                StdRng::seed_from_u64(seed_for_element(shape.settings.seed, 1, scatter.len()));
            while scatter.len() < target {
                scatter.find_one_more_point(&mut rng);
            }
            sampled_now = true;
        } else if scatter.len() > target {
            scatter.truncate(target);
        }

        let fallback = scatter.fallback_count();
        if sampled_now && fallback > 0 {
            warn!(
                generator = self.id.0,
                sampled = target - fallback,
                target,
                "scatter could not keep the minimum separation for every point"
            );
            sink.send(ArrayEvent::ScatterFallback {
                generator: self.id,
                sampled: target - fallback,
                target,
            });
        }

        self.base = scatter.points().to_vec();
        self.scatter = Some(scatter);
        fallback
    }

    /// Keeps a replaced point set for as many settings as the history can
    /// revert to.
    fn stash_scatter(&mut self, scatter: PoissonScatter) {
        self.scatter_cache.push(scatter);
        let limit = self.history.capacity() + 1;
        if self.scatter_cache.len() > limit {
            let excess = self.scatter_cache.len() - limit;
            self.scatter_cache.drain(..excess);
        }
    }

    /// Drops pending and recorded commands and tears down every modifier,
    /// leaving the elements at their default transforms.
    pub fn teardown(&mut self, host: &mut dyn HostScene) {
        self.queue.clear();
        self.history.clear();
        self.scatter_cache.clear();
        for mut modifier in self.modifiers.drain() {
            modifier.teardown(&self.defaults, &mut self.proxies);
        }
        if self.proxies.len() == self.elements.len() {
            self.elements.apply(host, &self.proxies);
        }
        debug!(generator = self.id.0, "generator torn down");
    }

    /// Tears down and destroys every element.
    pub fn destroy(mut self, host: &mut dyn HostScene) {
        self.teardown(host);
        self.elements.clear(host);
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("id", &self.id)
            .field("shape", self.shape.get())
            .field("count", self.count.get())
            .field("modifiers", &self.modifiers.len())
            .field("pending", &self.queue.len())
            .field("elements", &self.elements.len())
            .finish()
    }
}
