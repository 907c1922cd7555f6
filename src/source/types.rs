//! Source envelope types

use crate::types::BlockHeight;
use std::collections::HashMap;

/// The raw, source-shaped payload for a single block
pub type RawBlock = serde_json::Value;

/// One decoded upstream response for a chunk of heights.
///
/// `entries` maps each height the upstream answered for to its payload;
/// `None` means the upstream listed the height but had no block data for
/// it. Heights missing from the map entirely are treated the same way by
/// the extractor.
#[derive(Debug, Clone, Default)]
pub struct FetchEnvelope {
    /// Request cost reported by the upstream for this fetch
    pub cost: f64,
    /// Per-height payloads, keyed by height
    pub entries: HashMap<BlockHeight, Option<RawBlock>>,
}

impl FetchEnvelope {
    /// Create an envelope with the given cost and no entries
    pub fn with_cost(cost: f64) -> Self {
        Self {
            cost,
            entries: HashMap::new(),
        }
    }

    /// Number of heights with an actual payload
    pub fn present_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_some()).count()
    }
}
