//! Engine types
//!
//! Run state machine, ledger counters and the terminal run result.

use serde::Serialize;

// ============================================================================
// Run State
// ============================================================================

/// Lifecycle of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Created, not yet started
    Idle,
    /// Run loop in progress
    Running,
    /// Terminal: run finished cleanly
    Completed,
    /// Terminal: run hit an unrecoverable error
    Failed,
}

// ============================================================================
// Run Status
// ============================================================================

/// Terminal status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The run drained the whole key range and flushed the remainder
    Completed,
    /// The run terminated on an unrecoverable error
    Failed,
}

impl RunStatus {
    /// HTTP-style status code equivalent (200 success, 500 failure)
    pub fn code(&self) -> u16 {
        match self {
            Self::Completed => 200,
            Self::Failed => 500,
        }
    }

    /// Check if the run completed
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

// ============================================================================
// Run Statistics
// ============================================================================

/// Per-run ledger of cost and record counters.
///
/// One instance per run, mutated while the run progresses and read-only
/// once the run returns. Never shared across runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    /// Cumulative request cost reported by the upstream
    pub total_cost: f64,
    /// Chunks fetched and decomposed successfully
    pub chunks_processed: usize,
    /// Chunks dropped on transport or decode failure
    pub chunks_failed: usize,
    /// Raw payloads yielded to the transformer
    pub records_processed: usize,
    /// Requested heights the upstream had no payload for
    pub records_missing: usize,
    /// Records dropped by the skip policy after failing normalization
    pub records_malformed: usize,
    /// Batches handed to the store
    pub batches_flushed: usize,
    /// Wall-clock duration of the run in milliseconds
    pub duration_ms: u64,
}

impl RunStats {
    /// Create a zeroed ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Add reported request cost
    pub fn add_cost(&mut self, cost: f64) {
        self.total_cost += cost;
    }

    /// Count a successfully processed chunk
    pub fn add_chunk(&mut self) {
        self.chunks_processed += 1;
    }

    /// Count a dropped chunk
    pub fn add_failed_chunk(&mut self) {
        self.chunks_failed += 1;
    }

    /// Count a yielded raw payload
    pub fn add_record(&mut self) {
        self.records_processed += 1;
    }

    /// Count a height without payload
    pub fn add_missing(&mut self) {
        self.records_missing += 1;
    }

    /// Count a record dropped as malformed
    pub fn add_malformed(&mut self) {
        self.records_malformed += 1;
    }

    /// Count a flushed batch
    pub fn add_flush(&mut self) {
        self.batches_flushed += 1;
    }

    /// Set the run duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

// ============================================================================
// Run Result
// ============================================================================

/// Terminal status plus the final ledger snapshot.
///
/// On failure the ledger still reflects everything that happened before
/// the failure point, so partial progress stays observable.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Terminal status
    pub status: RunStatus,
    /// Final ledger snapshot
    pub stats: RunStats,
    /// Terminal error message when failed
    pub error: Option<String>,
}

impl RunResult {
    /// Build a completed result
    pub fn completed(stats: RunStats) -> Self {
        Self {
            status: RunStatus::Completed,
            stats,
            error: None,
        }
    }

    /// Build a failed result carrying the accumulated ledger
    pub fn failed(stats: RunStats, error: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Failed,
            stats,
            error: Some(error.into()),
        }
    }

    /// Check if the run completed
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
