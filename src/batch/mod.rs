//! Batch accumulation
//!
//! # Overview
//!
//! [`BatchAccumulator`] collects normalized records and hands them to the
//! store in bounded batches. The flush is always an explicit call driven
//! by the orchestrator ([`add`](BatchAccumulator::add) never flushes on
//! its own), so store calls can be asserted independently of record
//! counts. After a flush the batch is replaced with a fresh vector, never
//! mutated in place. Failed flushes are not retried; the error surfaces
//! to the orchestrator, which treats it as terminal for the run.

use crate::error::{Error, Result};
use crate::store::BlockStore;
use crate::transform::NormalizedBlock;

/// Accumulates normalized records and flushes them in bounded batches
#[derive(Debug)]
pub struct BatchAccumulator {
    batch: Vec<NormalizedBlock>,
    threshold: usize,
}

impl BatchAccumulator {
    /// Create an accumulator that flushes at `threshold` records.
    ///
    /// Fails with a configuration error when `threshold` is zero.
    pub fn new(threshold: usize) -> Result<Self> {
        if threshold == 0 {
            return Err(Error::config("flush_threshold must be positive"));
        }
        Ok(Self {
            batch: Vec::with_capacity(threshold),
            threshold,
        })
    }

    /// Append a record to the current batch
    pub fn add(&mut self, block: NormalizedBlock) {
        self.batch.push(block);
    }

    /// Number of records currently buffered
    pub fn len(&self) -> usize {
        self.batch.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    /// Check if the buffer has reached the flush threshold
    pub fn should_flush(&self) -> bool {
        self.batch.len() >= self.threshold
    }

    /// Hand the current batch to the store and start a fresh one.
    ///
    /// Returns the number of records flushed. The batch is replaced even
    /// when the store rejects it; the caller treats that error as
    /// terminal, so the records are not re-queued.
    pub async fn flush<S: BlockStore + ?Sized>(&mut self, store: &S) -> Result<usize> {
        let batch = std::mem::replace(&mut self.batch, Vec::with_capacity(self.threshold));
        let count = batch.len();
        store.bulk_insert(&batch).await?;
        Ok(count)
    }

    /// Flush the remainder if any records are buffered.
    ///
    /// Called once at run end; an empty buffer results in zero store
    /// calls.
    pub async fn flush_if_nonempty<S: BlockStore + ?Sized>(&mut self, store: &S) -> Result<usize> {
        if self.batch.is_empty() {
            return Ok(0);
        }
        self.flush(store).await
    }
}
