//! Store collaborators
//!
//! # Overview
//!
//! The pipeline core depends only on the [`BlockStore`] contract: one
//! ordered bulk insert per batch. Backends: [`DuckDbStore`] (analytical
//! database file), [`ParquetStore`] (one part file per flush) and
//! [`MemoryStore`] (tests and dry runs). There is no cross-batch
//! transaction; batches persisted before a failure stay persisted.

mod duckdb;
mod parquet;

pub use self::duckdb::DuckDbStore;
pub use self::parquet::{blocks_to_batch, ParquetStore};

use crate::error::Result;
use crate::transform::NormalizedBlock;
use async_trait::async_trait;
use std::sync::Mutex;

/// A destination for normalized block records
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Persist one ordered batch of records.
    ///
    /// All-or-nothing per batch; an error is terminal for the run.
    async fn bulk_insert(&self, blocks: &[NormalizedBlock]) -> Result<()>;
}

#[async_trait]
impl<T: BlockStore + ?Sized> BlockStore for &T {
    async fn bulk_insert(&self, blocks: &[NormalizedBlock]) -> Result<()> {
        (**self).bulk_insert(blocks).await
    }
}

/// In-memory store, for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    batches: Mutex<Vec<Vec<NormalizedBlock>>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes of the batches received so far, in insertion order
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches
            .lock()
            .expect("memory store lock poisoned")
            .iter()
            .map(Vec::len)
            .collect()
    }

    /// All records received so far, flattened in insertion order
    pub fn records(&self) -> Vec<NormalizedBlock> {
        self.batches
            .lock()
            .expect("memory store lock poisoned")
            .iter()
            .flatten()
            .cloned()
            .collect()
    }

    /// Total number of records received
    pub fn record_count(&self) -> usize {
        self.batch_sizes().iter().sum()
    }
}

#[async_trait]
impl BlockStore for MemoryStore {
    async fn bulk_insert(&self, blocks: &[NormalizedBlock]) -> Result<()> {
        self.batches
            .lock()
            .expect("memory store lock poisoned")
            .push(blocks.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests;
