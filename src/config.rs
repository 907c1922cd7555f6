//! Run configuration
//!
//! [`PipelineConfig`] groups the knobs of a single pipeline run. Validation
//! happens up front, before any I/O is issued.

use crate::error::{Error, Result};
use crate::types::MalformedPolicy;

/// Default number of heights per dashboard request
pub const DEFAULT_CHUNK_SIZE: usize = 10;

/// Default number of records per store flush (one day of blocks)
pub const DEFAULT_FLUSH_THRESHOLD: usize = 1440;

/// Configuration for a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Number of heights per upstream request
    pub chunk_size: usize,
    /// Number of normalized records per store flush
    pub flush_threshold: usize,
    /// Optional ceiling on cumulative reported request cost
    pub cost_ceiling: Option<f64>,
    /// What to do with records that fail normalization
    pub on_malformed: MalformedPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
            cost_ceiling: None,
            on_malformed: MalformedPolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chunk size
    #[must_use]
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Set the flush threshold
    #[must_use]
    pub fn with_flush_threshold(mut self, threshold: usize) -> Self {
        self.flush_threshold = threshold;
        self
    }

    /// Set the cost ceiling
    #[must_use]
    pub fn with_cost_ceiling(mut self, ceiling: f64) -> Self {
        self.cost_ceiling = Some(ceiling);
        self
    }

    /// Set the malformed-record policy
    #[must_use]
    pub fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    /// Validate the configuration, failing before any I/O happens
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::config("chunk_size must be positive"));
        }
        if self.flush_threshold == 0 {
            return Err(Error::config("flush_threshold must be positive"));
        }
        if let Some(ceiling) = self.cost_ceiling {
            if !ceiling.is_finite() || ceiling <= 0.0 {
                return Err(Error::config("cost_ceiling must be a positive number"));
            }
        }
        Ok(())
    }
}
