use crate::command::HistoryConfig;
use crate::error::{Error, Result};
use crate::sampling::DEFAULT_BATCH_SIZE;

/// Configuration for a [`crate::generator::Generator`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeneratorConfig {
    pub history: HistoryConfig,
    /// Element count requested for shapes without a derived count.
    pub initial_count: usize,
    /// Candidates per active point for scatter shapes created by the generator.
    pub batch_size: usize,
    /// Base seed for scatter shapes and modifier random values.
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            initial_count: 10,
            batch_size: DEFAULT_BATCH_SIZE,
            seed: 0,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = HistoryConfig::new(capacity);
        self
    }

    pub fn with_initial_count(mut self, count: usize) -> Self {
        self.initial_count = count;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.history.validate()?;
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be > 0".into()));
        }
        Ok(())
    }
}
