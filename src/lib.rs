//! # blockpipe
//!
//! A chunked ETL pipeline for blockchain block dashboards: extract block
//! data for a height range from a Blockchair-style API, normalize each
//! payload into a typed record, and load the records into an analytical
//! store in bounded batches, while keeping a per-run ledger of request
//! cost and record counts under an optional budget ceiling.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use blockpipe::{DashboardSource, DuckDbStore, Pipeline, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let source = DashboardSource::new("https://api.blockchair.com/bitcoin").unwrap();
//!     let store = DuckDbStore::open("blocks.duckdb").unwrap();
//!     let config = PipelineConfig::new().with_chunk_size(10);
//!
//!     let heights: Vec<u64> = (100_000..100_010).collect();
//!     let result = Pipeline::new(source, store, config).run(&heights).await;
//!     println!("status {}", result.status.code());
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Pipeline (engine)                       │
//! │  Idle → Running → {Completed, Failed}     RunStats ledger    │
//! └──────────────────────────────────────────────────────────────┘
//!              │
//! ┌─────────┬──┴──────┬───────────┬────────────┬────────────────┐
//! │  Chunk  │ Extract │ Transform │   Batch    │     Store      │
//! ├─────────┼─────────┼───────────┼────────────┼────────────────┤
//! │ Fixed   │ Fetch   │ Strict    │ Threshold  │ DuckDB         │
//! │ windows │ Envelope│ coercion  │ flush      │ Parquet        │
//! │         │ Isolate │ Skip/Fail │ Remainder  │ Memory         │
//! └─────────┴─────────┴───────────┴────────────┴────────────────┘
//! ```

#![warn(clippy::all)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the pipeline
pub mod error;

/// Common types and type aliases
pub mod types;

/// Run configuration
pub mod config;

/// HTTP client with retry and rate limiting
pub mod http;

/// Key chunking
pub mod chunk;

/// Data source collaborators
pub mod source;

/// Record normalization
pub mod transform;

/// Batch accumulation
pub mod batch;

/// Store collaborators
pub mod store;

/// Chunked extraction
pub mod extract;

/// Main execution engine
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use batch::BatchAccumulator;
pub use chunk::KeyChunker;
pub use config::PipelineConfig;
pub use engine::{Pipeline, RunResult, RunStats, RunStatus};
pub use source::{BlockSource, DashboardSource, FetchEnvelope};
pub use store::{BlockStore, DuckDbStore, MemoryStore, ParquetStore};
pub use transform::{normalize, NormalizedBlock};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
