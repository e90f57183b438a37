//! Bounded undo and redo stacks.
use std::collections::VecDeque;

use crate::error::{Error, Result};

pub const DEFAULT_HISTORY_CAPACITY: usize = 25;

/// Configuration for [`History`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Most entries kept on the undo stack; the oldest is dropped first.
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl HistoryConfig {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::InvalidConfig(
                "history capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Undo and redo stacks over executed entries.
///
/// The stacks are exclusive: recording a new entry clears the redo stack.
/// Entries move between the stacks through `take_*` and `finish_*` so the
/// caller can run the entry against state that owns this history.
#[derive(Debug)]
pub struct History<C> {
    undo: VecDeque<C>,
    redo: Vec<C>,
    capacity: usize,
}

impl<C> Default for History<C> {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl<C> History<C> {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            capacity: config.capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records an executed entry and forgets everything that could be redone.
    pub fn record(&mut self, entry: C) {
        self.redo.clear();
        self.undo.push_back(entry);
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
    }

    pub fn take_undo(&mut self) -> Option<C> {
        self.undo.pop_back()
    }

    /// Files an entry that was just reverted.
    pub fn finish_undo(&mut self, entry: C) {
        self.redo.push(entry);
    }

    pub fn take_redo(&mut self) -> Option<C> {
        self.redo.pop()
    }

    /// Files an entry that was just executed again, keeping the redo stack.
    pub fn finish_redo(&mut self, entry: C) {
        self.undo.push_back(entry);
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Most recent undoable entry.
    pub fn peek_undo(&self) -> Option<&C> {
        self.undo.back()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
