//! Key chunking
//!
//! Partitions the ordered height sequence of a run into request-sized
//! chunks. Chunking is pure: no I/O, no counters.

use crate::error::{Error, Result};
use crate::types::BlockHeight;

/// Partitions an ordered sequence of block heights into fixed-size chunks.
///
/// Every chunk has exactly `chunk_size` heights except possibly the last;
/// concatenating all chunks in order reproduces the input sequence. The
/// iterator returned by [`chunks`](Self::chunks) is lazy and can be
/// restarted by calling it again.
#[derive(Debug, Clone)]
pub struct KeyChunker {
    keys: Vec<BlockHeight>,
    chunk_size: usize,
}

impl KeyChunker {
    /// Create a chunker over `keys` with the given chunk size.
    ///
    /// Fails with a configuration error when `chunk_size` is zero.
    pub fn new(keys: Vec<BlockHeight>, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::config("chunk_size must be positive"));
        }
        Ok(Self { keys, chunk_size })
    }

    /// Iterate over the chunks in input order
    pub fn chunks(&self) -> impl Iterator<Item = &[BlockHeight]> {
        self.keys.chunks(self.chunk_size)
    }

    /// Number of chunks the input partitions into
    pub fn chunk_count(&self) -> usize {
        self.keys.len().div_ceil(self.chunk_size)
    }

    /// Total number of keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if there are no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(10, 4, 3; "partial last chunk")]
    #[test_case(10, 5, 2; "exact division")]
    #[test_case(10, 1, 10; "unit chunks")]
    #[test_case(3, 10, 1; "single short chunk")]
    #[test_case(0, 4, 0; "empty input")]
    fn test_chunk_count(n: usize, k: usize, expected: usize) {
        let keys: Vec<BlockHeight> = (0..n as u64).collect();
        let chunker = KeyChunker::new(keys, k).unwrap();
        assert_eq!(chunker.chunk_count(), expected);
        assert_eq!(chunker.chunks().count(), expected);
    }

    #[test]
    fn test_concatenation_reproduces_input() {
        let keys: Vec<BlockHeight> = (100_000..100_010).collect();
        let chunker = KeyChunker::new(keys.clone(), 4).unwrap();

        let rejoined: Vec<BlockHeight> = chunker.chunks().flatten().copied().collect();
        assert_eq!(rejoined, keys);
    }

    #[test]
    fn test_all_but_last_are_full() {
        let keys: Vec<BlockHeight> = (0..10).collect();
        let chunker = KeyChunker::new(keys, 4).unwrap();

        let sizes: Vec<usize> = chunker.chunks().map(|chunk| chunk.len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        for size in &sizes[..sizes.len() - 1] {
            assert_eq!(*size, 4);
        }
        assert!(*sizes.last().unwrap() >= 1);
    }

    #[test]
    fn test_iterator_is_restartable() {
        let keys: Vec<BlockHeight> = (0..7).collect();
        let chunker = KeyChunker::new(keys, 3).unwrap();

        let first: Vec<Vec<BlockHeight>> = chunker.chunks().map(|chunk| chunk.to_vec()).collect();
        let second: Vec<Vec<BlockHeight>> = chunker.chunks().map(|chunk| chunk.to_vec()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let err = KeyChunker::new(vec![1, 2, 3], 0).unwrap_err();
        assert!(err.to_string().contains("chunk_size"));
    }

    #[test]
    fn test_preserves_arbitrary_order() {
        let keys: Vec<BlockHeight> = vec![9, 3, 7, 1];
        let chunker = KeyChunker::new(keys.clone(), 3).unwrap();
        let rejoined: Vec<BlockHeight> = chunker.chunks().flatten().copied().collect();
        assert_eq!(rejoined, keys);
    }
}
