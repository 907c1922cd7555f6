//! Chunked extraction
//!
//! # Overview
//!
//! The extractor turns one chunk of heights into ordered raw payloads via
//! a single source fetch, updating the run ledger as it goes. Transport
//! and envelope-decode failures are returned before any counter is
//! touched, so the orchestrator can isolate a bad chunk and move on.
//! Payloads are materialized one chunk at a time; memory stays bounded by
//! the chunk size regardless of how large the key range is.

use crate::engine::RunStats;
use crate::error::Result;
use crate::source::{BlockSource, RawBlock};
use crate::types::BlockHeight;
use tracing::debug;

/// Drives per-chunk fetches against a [`BlockSource`]
#[derive(Debug)]
pub struct Extractor<'a, S: BlockSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: BlockSource + ?Sized> Extractor<'a, S> {
    /// Create an extractor over the given source
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Fetch one chunk and decompose it into ordered raw payloads.
    ///
    /// On success the ledger is updated: the envelope's reported cost is
    /// added, each yielded payload counts as a processed record, each
    /// height without a payload counts as missing, and the chunk counts
    /// as processed exactly once. On failure the ledger is untouched and
    /// the error is returned for the caller to isolate.
    pub async fn fetch_chunk(
        &self,
        chunk: &[BlockHeight],
        stats: &mut RunStats,
    ) -> Result<Vec<(BlockHeight, RawBlock)>> {
        let mut envelope = self.source.fetch(chunk).await?;

        stats.add_cost(envelope.cost);

        let mut raws = Vec::with_capacity(chunk.len());
        for &height in chunk {
            match envelope.entries.remove(&height).flatten() {
                Some(raw) => {
                    raws.push((height, raw));
                    stats.add_record();
                }
                None => {
                    debug!("No payload for block {height}, skipping");
                    stats.add_missing();
                }
            }
        }

        stats.add_chunk();
        Ok(raws)
    }
}

#[cfg(test)]
mod tests;
