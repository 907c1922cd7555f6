//! Data source collaborators
//!
//! # Overview
//!
//! The pipeline core depends only on the [`BlockSource`] contract: one
//! fetch per chunk of heights, returning a cost-annotated envelope with
//! one entry per key that the upstream knows about. The HTTP transport,
//! the wire format and the API key handling live behind the trait in
//! [`DashboardSource`].

mod dashboard;
mod types;

pub use dashboard::DashboardSource;
pub use types::{FetchEnvelope, RawBlock};

use crate::error::Result;
use crate::types::BlockHeight;
use async_trait::async_trait;

/// A remote source of block data, fetched one chunk of heights at a time
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// Fetch the dashboard entries for a chunk of heights.
    ///
    /// One upstream request per call. Errors are chunk-scoped: the caller
    /// is expected to isolate them and continue with the next chunk.
    async fn fetch(&self, heights: &[BlockHeight]) -> Result<FetchEnvelope>;
}

#[async_trait]
impl<S: BlockSource + ?Sized> BlockSource for &S {
    async fn fetch(&self, heights: &[BlockHeight]) -> Result<FetchEnvelope> {
        (**self).fetch(heights).await
    }
}
