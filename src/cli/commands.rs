//! CLI argument definitions

use crate::config::{DEFAULT_CHUNK_SIZE, DEFAULT_FLUSH_THRESHOLD};
use crate::types::{BlockHeight, MalformedPolicy};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Default upstream API base URL
pub const DEFAULT_API_URL: &str = "https://api.blockchair.com/bitcoin";

/// Environment variable holding the upstream API key
pub const API_KEY_ENV: &str = "BLOCKPIPE_API_KEY";

/// Which store backend to write to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StoreKind {
    /// DuckDB database file
    #[default]
    Duckdb,
    /// Directory of Parquet part files
    Parquet,
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duckdb => write!(f, "duckdb"),
            Self::Parquet => write!(f, "parquet"),
        }
    }
}

/// blockpipe - chunked ETL for blockchain block dashboards
#[derive(Debug, Parser)]
#[command(name = "blockpipe", version, about)]
pub struct Cli {
    /// Upstream API base URL
    #[arg(long, global = true, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract a block height range into the store
    Run {
        /// First height of the range (inclusive)
        #[arg(long, conflicts_with = "heights", requires = "end")]
        start: Option<BlockHeight>,

        /// End of the range (exclusive)
        #[arg(long, requires = "start")]
        end: Option<BlockHeight>,

        /// Explicit comma-separated heights instead of a range
        #[arg(long, value_delimiter = ',')]
        heights: Option<Vec<BlockHeight>>,

        /// Heights per upstream request
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,

        /// Records per store flush
        #[arg(long, default_value_t = DEFAULT_FLUSH_THRESHOLD)]
        flush_threshold: usize,

        /// Abort once cumulative request cost exceeds this ceiling
        #[arg(long)]
        cost_ceiling: Option<f64>,

        /// What to do with records that fail normalization
        #[arg(long, value_enum, default_value_t = MalformedPolicy::Skip)]
        on_malformed: MalformedPolicy,

        /// Store backend
        #[arg(long, value_enum, default_value_t = StoreKind::Duckdb)]
        store: StoreKind,

        /// Output path: database file for duckdb, directory for parquet
        #[arg(long, default_value = "blocks.duckdb")]
        output: PathBuf,
    },

    /// Verify upstream and store connectivity
    Check {
        /// Output path to probe for writability
        #[arg(long, default_value = "blocks.duckdb")]
        output: PathBuf,
    },
}
