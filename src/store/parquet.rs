//! Parquet-backed block store
//!
//! Writes each flushed batch as one `part-NNNNN.parquet` file in the
//! output directory, using a fixed Arrow schema derived from the
//! normalized record type.

use super::BlockStore;
use crate::error::{Error, Result};
use crate::transform::NormalizedBlock;
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Arrow schema of the `blocks` output
static BLOCK_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new(
            "timestamp",
            DataType::Timestamp(TimeUnit::Microsecond, None),
            false,
        ),
        Field::new("height", DataType::Int64, false),
        Field::new("size", DataType::Int64, false),
        Field::new("difficulty", DataType::Int64, false),
        Field::new("bits", DataType::Int64, false),
        Field::new("transaction_count", DataType::Int64, false),
        Field::new("input_usd", DataType::Float64, false),
        Field::new("output_usd", DataType::Float64, false),
        Field::new("fee_usd", DataType::Float64, false),
        Field::new("fee_per_kb_usd", DataType::Float64, false),
        Field::new("reward_usd", DataType::Float64, false),
    ]))
});

/// Convert a slice of normalized records into one Arrow `RecordBatch`
pub fn blocks_to_batch(blocks: &[NormalizedBlock]) -> Result<RecordBatch> {
    let ids = StringArray::from_iter_values(blocks.iter().map(|b| b.id.as_str()));
    let timestamps = TimestampMicrosecondArray::from_iter_values(
        blocks.iter().map(|b| b.timestamp.and_utc().timestamp_micros()),
    );
    let heights = Int64Array::from_iter_values(blocks.iter().map(|b| b.height));
    let sizes = Int64Array::from_iter_values(blocks.iter().map(|b| b.size));
    let difficulties = Int64Array::from_iter_values(blocks.iter().map(|b| b.difficulty));
    let bits = Int64Array::from_iter_values(blocks.iter().map(|b| b.bits));
    let tx_counts = Int64Array::from_iter_values(blocks.iter().map(|b| b.transaction_count));
    let input_usd = Float64Array::from_iter_values(blocks.iter().map(|b| b.input_usd));
    let output_usd = Float64Array::from_iter_values(blocks.iter().map(|b| b.output_usd));
    let fee_usd = Float64Array::from_iter_values(blocks.iter().map(|b| b.fee_usd));
    let fee_per_kb_usd = Float64Array::from_iter_values(blocks.iter().map(|b| b.fee_per_kb_usd));
    let reward_usd = Float64Array::from_iter_values(blocks.iter().map(|b| b.reward_usd));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(ids),
        Arc::new(timestamps),
        Arc::new(heights),
        Arc::new(sizes),
        Arc::new(difficulties),
        Arc::new(bits),
        Arc::new(tx_counts),
        Arc::new(input_usd),
        Arc::new(output_usd),
        Arc::new(fee_usd),
        Arc::new(fee_per_kb_usd),
        Arc::new(reward_usd),
    ];

    RecordBatch::try_new(BLOCK_SCHEMA.clone(), columns).map_err(Error::Arrow)
}

/// Block store writing one Parquet part file per batch
#[derive(Debug)]
pub struct ParquetStore {
    dir: PathBuf,
    next_part: AtomicUsize,
}

impl ParquetStore {
    /// Create a store writing into `dir`, creating it if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::store(format!("cannot create output dir: {e}")))?;
        Ok(Self {
            dir,
            next_part: AtomicUsize::new(0),
        })
    }

    /// Output directory
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn next_path(&self) -> PathBuf {
        let part = self.next_part.fetch_add(1, Ordering::SeqCst);
        self.dir.join(format!("part-{part:05}.parquet"))
    }
}

#[async_trait]
impl BlockStore for ParquetStore {
    async fn bulk_insert(&self, blocks: &[NormalizedBlock]) -> Result<()> {
        if blocks.is_empty() {
            return Ok(());
        }

        let batch = blocks_to_batch(blocks)?;
        let path = self.next_path();
        let file = File::create(&path)
            .map_err(|e| Error::store_write(format!("cannot create {}: {e}", path.display())))?;

        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
            .map_err(|e| Error::store_write(format!("cannot create writer: {e}")))?;
        writer
            .write(&batch)
            .map_err(|e| Error::store_write(format!("cannot write batch: {e}")))?;
        writer
            .close()
            .map_err(|e| Error::store_write(format!("cannot finalize {}: {e}", path.display())))?;

        debug!("Wrote {} blocks to {}", blocks.len(), path.display());
        Ok(())
    }
}
