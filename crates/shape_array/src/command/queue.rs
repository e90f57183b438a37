//! FIFO of commands waiting for the next cycle.
use std::collections::VecDeque;

use crate::command::Command;

/// Pending commands of one generator. Enqueuing never executes anything.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<Box<dyn Command>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Box<dyn Command>) {
        self.pending.push_back(command);
    }

    pub fn pop(&mut self) -> Option<Box<dyn Command>> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Labels of the pending commands, oldest first.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.pending.iter().map(|c| c.label())
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
