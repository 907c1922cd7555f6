//! Tests for chunked extraction

use super::*;
use crate::error::Error;
use crate::source::FetchEnvelope;
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashSet;

/// Scripted source: fails for chunks containing a poisoned height,
/// omits payloads for configured heights.
struct StubSource {
    cost_per_chunk: f64,
    fail_heights: HashSet<u64>,
    empty_entries: HashSet<u64>,
    absent_heights: HashSet<u64>,
}

impl StubSource {
    fn new(cost_per_chunk: f64) -> Self {
        Self {
            cost_per_chunk,
            fail_heights: HashSet::new(),
            empty_entries: HashSet::new(),
            absent_heights: HashSet::new(),
        }
    }
}

#[async_trait]
impl BlockSource for StubSource {
    async fn fetch(&self, heights: &[u64]) -> crate::error::Result<FetchEnvelope> {
        if heights.iter().any(|h| self.fail_heights.contains(h)) {
            return Err(Error::http_status(500, "boom"));
        }

        let mut envelope = FetchEnvelope::with_cost(self.cost_per_chunk);
        for &height in heights {
            if self.absent_heights.contains(&height) {
                continue;
            }
            let payload = if self.empty_entries.contains(&height) {
                None
            } else {
                Some(json!({ "id": height }))
            };
            envelope.entries.insert(height, payload);
        }
        Ok(envelope)
    }
}

#[tokio::test]
async fn test_successful_chunk_updates_ledger() {
    let source = StubSource::new(2.0);
    let extractor = Extractor::new(&source);
    let mut stats = RunStats::default();

    let raws = extractor.fetch_chunk(&[1, 2, 3], &mut stats).await.unwrap();

    assert_eq!(raws.len(), 3);
    assert_eq!(stats.total_cost, 2.0);
    assert_eq!(stats.records_processed, 3);
    assert_eq!(stats.chunks_processed, 1);
    assert_eq!(stats.records_missing, 0);
}

#[tokio::test]
async fn test_payloads_preserve_chunk_key_order() {
    let source = StubSource::new(1.0);
    let extractor = Extractor::new(&source);
    let mut stats = RunStats::default();

    let raws = extractor
        .fetch_chunk(&[9, 3, 7], &mut stats)
        .await
        .unwrap();

    let heights: Vec<u64> = raws.iter().map(|(h, _)| *h).collect();
    assert_eq!(heights, vec![9, 3, 7]);
}

#[tokio::test]
async fn test_missing_payload_is_skipped_and_counted() {
    let mut source = StubSource::new(1.0);
    source.empty_entries.insert(2);
    let extractor = Extractor::new(&source);
    let mut stats = RunStats::default();

    let raws = extractor.fetch_chunk(&[1, 2, 3], &mut stats).await.unwrap();

    let heights: Vec<u64> = raws.iter().map(|(h, _)| *h).collect();
    assert_eq!(heights, vec![1, 3]);
    assert_eq!(stats.records_processed, 2);
    assert_eq!(stats.records_missing, 1);
    // Chunk still counts exactly once
    assert_eq!(stats.chunks_processed, 1);
}

#[tokio::test]
async fn test_absent_entry_treated_as_missing() {
    let mut source = StubSource::new(1.0);
    source.absent_heights.insert(3);
    let extractor = Extractor::new(&source);
    let mut stats = RunStats::default();

    let raws = extractor.fetch_chunk(&[1, 3], &mut stats).await.unwrap();

    assert_eq!(raws.len(), 1);
    assert_eq!(stats.records_missing, 1);
}

#[tokio::test]
async fn test_failed_fetch_leaves_ledger_untouched() {
    let mut source = StubSource::new(7.0);
    source.fail_heights.insert(2);
    let extractor = Extractor::new(&source);
    let mut stats = RunStats::default();

    let err = extractor.fetch_chunk(&[1, 2], &mut stats).await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
    assert_eq!(stats.total_cost, 0.0);
    assert_eq!(stats.chunks_processed, 0);
    assert_eq!(stats.records_processed, 0);
    assert_eq!(stats.records_missing, 0);
}

#[tokio::test]
async fn test_cost_accumulates_across_chunks() {
    let source = StubSource::new(1.5);
    let extractor = Extractor::new(&source);
    let mut stats = RunStats::default();

    extractor.fetch_chunk(&[1, 2], &mut stats).await.unwrap();
    extractor.fetch_chunk(&[3, 4], &mut stats).await.unwrap();

    assert_eq!(stats.total_cost, 3.0);
    assert_eq!(stats.chunks_processed, 2);
}
