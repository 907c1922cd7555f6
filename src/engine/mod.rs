//! Execution engine
//!
//! Main run loop and orchestration.
//!
//! # Overview
//!
//! [`Pipeline`] wires the extraction, transformation and accumulation
//! stages into one sequential run: plan chunks, fetch each chunk, yield
//! its payloads in key order, normalize each payload, accumulate, flush
//! at the threshold and once more for the remainder. Chunk-level faults
//! are isolated (logged, counted, loop continues); configuration errors,
//! store write failures, budget exhaustion and (under the `Fail` policy)
//! malformed records terminate the run. The terminal [`RunResult`]
//! always carries whatever the ledger accumulated.

mod types;

pub use types::{RunResult, RunState, RunStats, RunStatus};

use crate::batch::BatchAccumulator;
use crate::chunk::KeyChunker;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::extract::Extractor;
use crate::source::BlockSource;
use crate::store::BlockStore;
use crate::transform::normalize;
use crate::types::{BlockHeight, MalformedPolicy};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Orchestrates one extract-transform-load run
pub struct Pipeline<S: BlockSource, T: BlockStore> {
    source: S,
    store: T,
    config: PipelineConfig,
    state: RunState,
}

impl<S: BlockSource, T: BlockStore> Pipeline<S, T> {
    /// Create an idle pipeline
    pub fn new(source: S, store: T, config: PipelineConfig) -> Self {
        Self {
            source,
            store,
            config,
            state: RunState::Idle,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run the pipeline over the given heights.
    ///
    /// A pipeline runs once; calling `run` again after a terminal state
    /// fails without issuing any I/O. The returned result carries the
    /// ledger accumulated up to the point the run ended, success or not.
    pub async fn run(&mut self, heights: &[BlockHeight]) -> RunResult {
        let start = Instant::now();
        let mut stats = RunStats::new();

        if self.state != RunState::Idle {
            return RunResult::failed(stats, "pipeline has already run");
        }
        self.state = RunState::Running;

        let outcome = self.execute(heights, &mut stats).await;
        stats.set_duration(start.elapsed().as_millis() as u64);

        match outcome {
            Ok(()) => {
                self.state = RunState::Completed;
                info!(
                    "Run completed: {} records in {} chunks, cost {:.2}",
                    stats.records_processed, stats.chunks_processed, stats.total_cost
                );
                RunResult::completed(stats)
            }
            Err(e) => {
                self.state = RunState::Failed;
                warn!("Run failed: {e}");
                RunResult::failed(stats, e.to_string())
            }
        }
    }

    /// The run body; any returned error is terminal for the run
    async fn execute(&self, heights: &[BlockHeight], stats: &mut RunStats) -> Result<()> {
        // Fail fast on bad configuration, before any I/O
        self.config.validate()?;
        let chunker = KeyChunker::new(heights.to_vec(), self.config.chunk_size)?;
        let mut accumulator = BatchAccumulator::new(self.config.flush_threshold)?;

        info!(
            "Starting run: {} heights in {} chunks",
            chunker.len(),
            chunker.chunk_count()
        );

        let extractor = Extractor::new(&self.source);

        for chunk in chunker.chunks() {
            // Budget gate: stop fetching once the running cost exceeds
            // the ceiling.
            if let Some(ceiling) = self.config.cost_ceiling {
                if stats.total_cost > ceiling {
                    return Err(Error::CostCeilingExceeded {
                        spent: stats.total_cost,
                        ceiling,
                    });
                }
            }

            let raws = match extractor.fetch_chunk(chunk, stats).await {
                Ok(raws) => raws,
                Err(e) => {
                    // One bad chunk never aborts the run
                    warn!("Chunk starting at {:?} failed: {e}", chunk.first());
                    stats.add_failed_chunk();
                    continue;
                }
            };

            for (height, raw) in raws {
                let block = match normalize(&raw) {
                    Ok(block) => block,
                    Err(e) => match self.config.on_malformed {
                        MalformedPolicy::Skip => {
                            warn!("Dropping block {height}: {e}");
                            stats.add_malformed();
                            continue;
                        }
                        MalformedPolicy::Fail => return Err(e),
                    },
                };

                accumulator.add(block);
                if accumulator.should_flush() {
                    let count = accumulator.flush(&self.store).await?;
                    stats.add_flush();
                    debug!("Flushed {count} blocks");
                }
            }
        }

        // Drain the remainder below the threshold
        let remainder = accumulator.flush_if_nonempty(&self.store).await?;
        if remainder > 0 {
            stats.add_flush();
            debug!("Flushed final {remainder} blocks");
        }

        Ok(())
    }
}
