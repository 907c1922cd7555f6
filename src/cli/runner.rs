//! CLI command execution
//!
//! Wires the source, store and pipeline together from parsed arguments
//! and reports the terminal result.

use super::commands::{Cli, Commands, StoreKind, API_KEY_ENV};
use crate::config::PipelineConfig;
use crate::engine::{Pipeline, RunResult};
use crate::error::{Error, Result};
use crate::source::{BlockSource, DashboardSource};
use crate::store::{BlockStore, DuckDbStore, ParquetStore};
use crate::types::BlockHeight;
use std::path::Path;
use tracing::info;

/// Executes a parsed CLI invocation
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner for the parsed arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Execute the selected command
    pub async fn run(self) -> Result<()> {
        let source = build_source(&self.cli.api_url)?;

        match self.cli.command {
            Commands::Run {
                start,
                end,
                heights,
                chunk_size,
                flush_threshold,
                cost_ceiling,
                on_malformed,
                store,
                output,
            } => {
                let heights = resolve_heights(start, end, heights)?;
                let mut config = PipelineConfig::new()
                    .with_chunk_size(chunk_size)
                    .with_flush_threshold(flush_threshold)
                    .with_malformed_policy(on_malformed);
                if let Some(ceiling) = cost_ceiling {
                    config = config.with_cost_ceiling(ceiling);
                }

                let result = match store {
                    StoreKind::Duckdb => {
                        let store = DuckDbStore::open(&output)?;
                        run_pipeline(source, store, config, &heights).await
                    }
                    StoreKind::Parquet => {
                        let store = ParquetStore::new(output)?;
                        run_pipeline(source, store, config, &heights).await
                    }
                };

                report(&result);
                if result.is_success() {
                    Ok(())
                } else {
                    Err(Error::Other(
                        result
                            .error
                            .unwrap_or_else(|| "run failed".to_string()),
                    ))
                }
            }
            Commands::Check { output } => check(&source, &output).await,
        }
    }
}

/// Build the dashboard source, picking up the API key from the environment
fn build_source(api_url: &str) -> Result<DashboardSource> {
    let mut source = DashboardSource::new(api_url)?;
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        source = source.with_api_key(key);
    }
    Ok(source)
}

/// Materialize the height sequence from range bounds or an explicit list
fn resolve_heights(
    start: Option<BlockHeight>,
    end: Option<BlockHeight>,
    heights: Option<Vec<BlockHeight>>,
) -> Result<Vec<BlockHeight>> {
    if let Some(heights) = heights {
        if heights.is_empty() {
            return Err(Error::config("height list is empty"));
        }
        return Ok(heights);
    }
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok((start..end).collect()),
        (Some(start), Some(end)) => Err(Error::config(format!(
            "empty range: start {start} is not below end {end}"
        ))),
        _ => Err(Error::config(
            "either --heights or both --start and --end are required",
        )),
    }
}

/// Drive one pipeline run
async fn run_pipeline<S: BlockSource, T: BlockStore>(
    source: S,
    store: T,
    config: PipelineConfig,
    heights: &[BlockHeight],
) -> RunResult {
    Pipeline::new(source, store, config).run(heights).await
}

/// Print the terminal ledger
fn report(result: &RunResult) {
    let stats = &result.stats;
    info!(
        "Status {}: {} records ({} missing, {} malformed) across {} chunks ({} failed), \
         {} batches, cost {:.2}, {} ms",
        result.status.code(),
        stats.records_processed,
        stats.records_missing,
        stats.records_malformed,
        stats.chunks_processed,
        stats.chunks_failed,
        stats.batches_flushed,
        stats.total_cost,
        stats.duration_ms,
    );
}

/// Probe upstream and store connectivity
async fn check(source: &DashboardSource, output: &Path) -> Result<()> {
    let envelope = source.fetch(&[0]).await?;
    info!(
        "Upstream reachable: {} entries, cost {:.2}",
        envelope.entries.len(),
        envelope.cost
    );

    let store = DuckDbStore::open(output)?;
    store.check()?;
    info!("Store writable: {}", output.display());

    Ok(())
}
