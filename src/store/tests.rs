//! Tests for the store module

use super::*;
use crate::transform::normalize;
use serde_json::json;

fn sample_blocks(n: usize) -> Vec<NormalizedBlock> {
    (0..n)
        .map(|i| {
            normalize(&json!({
                "id": 100_000 + i,
                "time": "2010-12-29 11:57:43",
                "size": 957 + i,
                "difficulty": 14484,
                "bits": 453_281_356,
                "transaction_count": 4,
                "input_total_usd": 171.28,
                "output_total_usd": 171.28,
                "fee_total_usd": 0.0,
                "fee_per_kb_usd": 0.0,
                "reward_usd": 13.1
            }))
            .unwrap()
        })
        .collect()
}

// ============================================================================
// MemoryStore Tests
// ============================================================================

#[tokio::test]
async fn test_memory_store_records_batches() {
    let store = MemoryStore::new();
    store.bulk_insert(&sample_blocks(3)).await.unwrap();
    store.bulk_insert(&sample_blocks(2)).await.unwrap();

    assert_eq!(store.batch_sizes(), vec![3, 2]);
    assert_eq!(store.record_count(), 5);
    assert_eq!(store.records().len(), 5);
}

// ============================================================================
// DuckDbStore Tests
// ============================================================================

#[tokio::test]
async fn test_duckdb_store_roundtrip() {
    let store = DuckDbStore::open_in_memory().unwrap();
    assert_eq!(store.count().unwrap(), 0);

    store.bulk_insert(&sample_blocks(4)).await.unwrap();
    assert_eq!(store.count().unwrap(), 4);

    store.bulk_insert(&sample_blocks(2)).await.unwrap();
    assert_eq!(store.count().unwrap(), 6);
}

#[tokio::test]
async fn test_duckdb_store_empty_insert_is_noop() {
    let store = DuckDbStore::open_in_memory().unwrap();
    store.bulk_insert(&[]).await.unwrap();
    assert_eq!(store.count().unwrap(), 0);
}

#[tokio::test]
async fn test_duckdb_store_file_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blocks.duckdb");

    {
        let store = DuckDbStore::open(&path).unwrap();
        store.bulk_insert(&sample_blocks(3)).await.unwrap();
    }

    let reopened = DuckDbStore::open(&path).unwrap();
    assert_eq!(reopened.count().unwrap(), 3);
}

#[test]
fn test_duckdb_store_check() {
    let store = DuckDbStore::open_in_memory().unwrap();
    assert!(store.check().is_ok());
}

// ============================================================================
// ParquetStore Tests
// ============================================================================

#[test]
fn test_blocks_to_batch_shape() {
    let batch = blocks_to_batch(&sample_blocks(5)).unwrap();
    assert_eq!(batch.num_rows(), 5);
    assert_eq!(batch.num_columns(), 12);
    assert_eq!(batch.schema().field(0).name(), "id");
    assert_eq!(batch.schema().field(2).name(), "height");
}

#[tokio::test]
async fn test_parquet_store_writes_one_part_per_batch() {
    let dir = tempfile::tempdir().unwrap();
    let store = ParquetStore::new(dir.path()).unwrap();

    store.bulk_insert(&sample_blocks(4)).await.unwrap();
    store.bulk_insert(&sample_blocks(2)).await.unwrap();

    let mut parts: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    parts.sort();

    assert_eq!(parts, vec!["part-00000.parquet", "part-00001.parquet"]);
}

#[tokio::test]
async fn test_parquet_store_empty_insert_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = ParquetStore::new(dir.path()).unwrap();

    store.bulk_insert(&[]).await.unwrap();
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
