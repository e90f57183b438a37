//! Arena of generators with one active editing target.
use tracing::info;

use crate::element::{ElementHandle, HostScene};
use crate::error::{Error, Result};
use crate::events::EventSink;
use crate::generator::{CycleReport, Generator, GeneratorConfig, GeneratorId, GeneratorState};
use crate::modifier::{ModifierId, ModifierRegistry};
use crate::shape::ShapeParams;

/// Owns every open generator and the modifier registry.
///
/// Generators are addressed by [`GeneratorId`]; ids of closed generators are
/// never reused. Undo and redo go to the active generator.
#[derive(Debug)]
pub struct Session {
    generators: Vec<Option<Generator>>,
    active: Option<GeneratorId>,
    registry: ModifierRegistry,
    config: GeneratorConfig,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ModifierRegistry::with_builtins(), GeneratorConfig::default())
    }
}

impl Session {
    pub fn new(registry: ModifierRegistry, config: GeneratorConfig) -> Self {
        Self {
            generators: Vec::new(),
            active: None,
            registry,
            config,
        }
    }

    pub fn registry(&self) -> &ModifierRegistry {
        &self.registry
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn next_id(&self) -> GeneratorId {
        GeneratorId(self.generators.len() as u32)
    }

    /// Opens a generator for `shape` under `container` and makes it active.
    pub fn create(&mut self, container: ElementHandle, shape: ShapeParams) -> Result<GeneratorId> {
        let id = self.next_id();
        let generator = Generator::new(id, container, shape, self.config)?;
        info!(generator = id.0, kind = generator.kind().name(), "generator created");
        self.generators.push(Some(generator));
        self.active = Some(id);
        Ok(id)
    }

    /// Opens a generator from saved state and makes it active.
    pub fn open(
        &mut self,
        container: ElementHandle,
        state: GeneratorState,
        host: &dyn HostScene,
    ) -> Result<GeneratorId> {
        let id = self.next_id();
        let generator = Generator::from_state(id, container, state, self.config, host)?;
        self.generators.push(Some(generator));
        self.active = Some(id);
        Ok(id)
    }

    pub fn get(&self, id: GeneratorId) -> Result<&Generator> {
        self.generators
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .ok_or(Error::UnknownGenerator)
    }

    pub fn get_mut(&mut self, id: GeneratorId) -> Result<&mut Generator> {
        self.generators
            .get_mut(id.0 as usize)
            .and_then(Option::as_mut)
            .ok_or(Error::UnknownGenerator)
    }

    /// Open generator ids in creation order.
    pub fn ids(&self) -> Vec<GeneratorId> {
        self.generators
            .iter()
            .flatten()
            .map(Generator::id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.generators.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn active(&self) -> Option<GeneratorId> {
        self.active
    }

    pub fn set_active(&mut self, id: GeneratorId) -> Result<()> {
        self.get(id)?;
        self.active = Some(id);
        Ok(())
    }

    pub fn active_mut(&mut self) -> Result<&mut Generator> {
        let id = self.active.ok_or(Error::UnknownGenerator)?;
        self.get_mut(id)
    }

    /// Removes a generator from the session, handing it back to the caller.
    pub fn close(&mut self, id: GeneratorId) -> Result<Generator> {
        let generator = self
            .generators
            .get_mut(id.0 as usize)
            .and_then(Option::take)
            .ok_or(Error::UnknownGenerator)?;
        if self.active == Some(id) {
            self.active = None;
        }
        Ok(generator)
    }

    /// Adds a registered modifier by name to the active generator.
    pub fn add_modifier(&mut self, name: &str) -> Result<ModifierId> {
        let id = self.active.ok_or(Error::UnknownGenerator)?;
        let generator = self
            .generators
            .get_mut(id.0 as usize)
            .and_then(Option::as_mut)
            .ok_or(Error::UnknownGenerator)?;
        generator.add_modifier_named(&self.registry, name)
    }

    /// Undoes the last command of the active generator.
    pub fn undo(&mut self) -> Result<Option<String>> {
        Ok(self.active_mut()?.undo())
    }

    pub fn redo(&mut self) -> Result<Option<String>> {
        Ok(self.active_mut()?.redo())
    }

    /// Runs one cycle of every open generator, in creation order.
    pub fn refresh_all(
        &mut self,
        host: &mut dyn HostScene,
        sink: &mut dyn EventSink,
    ) -> Vec<(GeneratorId, CycleReport)> {
        self.generators
            .iter_mut()
            .flatten()
            .map(|g| (g.id(), g.refresh_with_events(host, sink)))
            .collect()
    }
}
