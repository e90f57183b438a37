//! Reversible edits of a generator.
//!
//! Every edit is a [`Command`]. Commands are queued with
//! [`crate::generator::Generator::enqueue`], executed when the generator drains
//! its [`CommandQueue`] at the start of a cycle, and then recorded in its
//! [`History`] for undo and redo.
//!
//! A command captures the value it replaces the first time it executes, so a
//! batch of queued edits to the same cell reverts step by step.
use std::fmt;

use tracing::warn;

use crate::generator::Generator;
use crate::modifier::{Modifier, ModifierId, ModifierParams, RandomCache};
use crate::shared::Shared;

pub mod history;
pub mod queue;

pub use history::{History, HistoryConfig, DEFAULT_HISTORY_CAPACITY};
pub use queue::CommandQueue;

/// A reversible unit of mutation.
///
/// `execute`, `revert`, `execute` again is a legal sequence (redo after undo).
pub trait Command: fmt::Debug {
    fn execute(&mut self, generator: &mut Generator);

    fn revert(&mut self, generator: &mut Generator);

    fn label(&self) -> &str;
}

/// Locates a value cell inside a generator.
pub type Binding<T> = fn(&mut Generator) -> &mut Shared<T>;

/// Sets a bound cell to a new value.
pub struct SetValue<T> {
    label: &'static str,
    binding: Binding<T>,
    before: Option<T>,
    after: T,
}

impl<T> SetValue<T> {
    pub fn new(label: &'static str, binding: Binding<T>, value: T) -> Self {
        Self {
            label,
            binding,
            before: None,
            after: value,
        }
    }

    pub fn value(&self) -> &T {
        &self.after
    }
}

impl<T: fmt::Debug> fmt::Debug for SetValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetValue")
            .field("label", &self.label)
            .field("before", &self.before)
            .field("after", &self.after)
            .finish()
    }
}

impl<T: Clone + fmt::Debug> Command for SetValue<T> {
    fn execute(&mut self, generator: &mut Generator) {
        let cell = (self.binding)(generator);
        if self.before.is_none() {
            self.before = Some(cell.cloned());
        }
        cell.set(self.after.clone());
    }

    fn revert(&mut self, generator: &mut Generator) {
        if let Some(before) = &self.before {
            (self.binding)(generator).set(before.clone());
        }
    }

    fn label(&self) -> &str {
        self.label
    }
}

/// Changes the requested element count.
#[derive(Debug)]
pub struct SetCount(SetValue<usize>);

impl SetCount {
    /// `count` must already be clamped to the shape's minimum.
    pub fn new(count: usize) -> Self {
        Self(SetValue::new("set count", Generator::count_cell, count))
    }

    pub fn count(&self) -> usize {
        *self.0.value()
    }
}

impl Command for SetCount {
    fn execute(&mut self, generator: &mut Generator) {
        self.0.execute(generator);
    }

    fn revert(&mut self, generator: &mut Generator) {
        self.0.revert(generator);
    }

    fn label(&self) -> &str {
        self.0.label()
    }
}

/// Replaces the parameters of an attached modifier.
#[derive(Debug)]
pub struct SetModifierParams {
    id: ModifierId,
    before: Option<ModifierParams>,
    after: ModifierParams,
}

impl SetModifierParams {
    pub fn new(id: ModifierId, params: ModifierParams) -> Self {
        Self {
            id,
            before: None,
            after: params,
        }
    }

    fn write(generator: &mut Generator, id: ModifierId, params: ModifierParams) -> Option<ModifierParams> {
        match generator.modifiers_mut().get_mut(id) {
            Some(m) => {
                let previous = m.params().clone();
                m.params_cell().set(params);
                Some(previous)
            }
            None => {
                warn!(modifier = id.0, "parameter edit for a detached modifier ignored");
                None
            }
        }
    }
}

impl Command for SetModifierParams {
    fn execute(&mut self, generator: &mut Generator) {
        let previous = Self::write(generator, self.id, self.after.clone());
        if self.before.is_none() {
            self.before = previous;
        }
    }

    fn revert(&mut self, generator: &mut Generator) {
        if let Some(before) = self.before.clone() {
            Self::write(generator, self.id, before);
        }
    }

    fn label(&self) -> &str {
        "edit modifier"
    }
}

/// Inserts a modifier into the stack.
#[derive(Debug)]
pub struct AddModifier {
    id: ModifierId,
    position: usize,
    payload: Option<Modifier>,
}

impl AddModifier {
    pub fn new(position: usize, modifier: Modifier) -> Self {
        Self {
            id: modifier.id(),
            position,
            payload: Some(modifier),
        }
    }

    pub fn id(&self) -> ModifierId {
        self.id
    }
}

impl Command for AddModifier {
    fn execute(&mut self, generator: &mut Generator) {
        if let Some(modifier) = self.payload.take() {
            generator.attach_modifier(self.position, modifier);
        }
    }

    fn revert(&mut self, generator: &mut Generator) {
        if let Some((position, modifier)) = generator.detach_modifier(self.id) {
            self.position = position;
            self.payload = Some(modifier);
        }
    }

    fn label(&self) -> &str {
        "add modifier"
    }
}

/// Tears down and detaches a modifier; revert puts it back where it was.
#[derive(Debug)]
pub struct RemoveModifier {
    id: ModifierId,
    position: usize,
    payload: Option<Modifier>,
}

impl RemoveModifier {
    pub fn new(id: ModifierId) -> Self {
        Self {
            id,
            position: 0,
            payload: None,
        }
    }
}

impl Command for RemoveModifier {
    fn execute(&mut self, generator: &mut Generator) {
        match generator.detach_modifier(self.id) {
            Some((position, modifier)) => {
                self.position = position;
                self.payload = Some(modifier);
            }
            None => warn!(modifier = self.id.0, "remove of a detached modifier ignored"),
        }
    }

    fn revert(&mut self, generator: &mut Generator) {
        if let Some(modifier) = self.payload.take() {
            generator.attach_modifier(self.position, modifier);
        }
    }

    fn label(&self) -> &str {
        "remove modifier"
    }
}

/// Moves a modifier to another stack position.
#[derive(Debug)]
pub struct MoveModifier {
    id: ModifierId,
    to: usize,
    from: Option<usize>,
}

impl MoveModifier {
    pub fn new(id: ModifierId, to: usize) -> Self {
        Self { id, to, from: None }
    }
}

impl Command for MoveModifier {
    fn execute(&mut self, generator: &mut Generator) {
        let from = generator.reorder_modifier(self.id, self.to);
        if self.from.is_none() {
            self.from = from;
        }
    }

    fn revert(&mut self, generator: &mut Generator) {
        if let Some(from) = self.from {
            generator.reorder_modifier(self.id, from);
        }
    }

    fn label(&self) -> &str {
        "move modifier"
    }
}

/// Swaps a modifier's per-element random values for a freshly rolled batch.
#[derive(Debug)]
pub struct ValueArrayChanged {
    id: ModifierId,
    before: Option<RandomCache>,
    after: Option<RandomCache>,
}

impl ValueArrayChanged {
    /// Rerolls the values of `id` when executed.
    pub fn reroll(id: ModifierId) -> Self {
        Self {
            id,
            before: None,
            after: None,
        }
    }
}

impl Command for ValueArrayChanged {
    fn execute(&mut self, generator: &mut Generator) {
        let Some(m) = generator.modifiers_mut().get_mut(self.id) else {
            warn!(modifier = self.id.0, "randomize of a detached modifier ignored");
            return;
        };
        let after = self
            .after
            .get_or_insert_with(|| m.cache().rerolled())
            .clone();
        let previous = m.replace_cache(after);
        if self.before.is_none() {
            self.before = Some(previous);
        }
        generator.mark_modifiers_dirty();
    }

    fn revert(&mut self, generator: &mut Generator) {
        let Some(before) = self.before.clone() else {
            return;
        };
        if let Some(m) = generator.modifiers_mut().get_mut(self.id) {
            m.replace_cache(before);
            generator.mark_modifiers_dirty();
        }
    }

    fn label(&self) -> &str {
        "randomize"
    }
}

/// Several commands applied as one; reverted in reverse order.
#[derive(Debug)]
pub struct Composite {
    label: String,
    commands: Vec<Box<dyn Command>>,
}

impl Composite {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            commands: Vec::new(),
        }
    }

    pub fn with(mut self, command: impl Command + 'static) -> Self {
        self.commands.push(Box::new(command));
        self
    }

    pub fn push(&mut self, command: Box<dyn Command>) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Command for Composite {
    fn execute(&mut self, generator: &mut Generator) {
        for c in self.commands.iter_mut() {
            c.execute(generator);
        }
    }

    fn revert(&mut self, generator: &mut Generator) {
        for c in self.commands.iter_mut().rev() {
            c.revert(generator);
        }
    }

    fn label(&self) -> &str {
        &self.label
    }
}
