//! Random-access sources of training examples

use crate::batch::{Batch, BatchItem};
use crate::error::Result;

/// A source of examples addressed by index
///
/// Implementations must return the same item for the same index for as long
/// as the source lives. Any shuffling a source advertises is its own
/// responsibility; a trainer may shuffle indices on top of it.
pub trait BatchDataSource: Send + Sync {
    /// Field names every item carries
    fn keys(&self) -> &[String];

    /// Total number of items
    fn size(&self) -> usize;

    /// Item at a logical index, `0 <= index < size()`
    fn get(&self, index: usize) -> Result<BatchItem>;

    /// Whether the source has no items
    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

/// A data source backed by a single in-memory batch
#[derive(Debug, Clone)]
pub struct InMemoryDataSource {
    batch: Batch,
}

impl InMemoryDataSource {
    /// Wrap a batch
    pub fn new(batch: Batch) -> Self {
        Self { batch }
    }

    /// Get the wrapped batch
    pub fn batch(&self) -> &Batch {
        &self.batch
    }
}

impl From<Batch> for InMemoryDataSource {
    fn from(batch: Batch) -> Self {
        Self::new(batch)
    }
}

impl BatchDataSource for InMemoryDataSource {
    fn keys(&self) -> &[String] {
        self.batch.keys()
    }

    fn size(&self) -> usize {
        self.batch.len()
    }

    fn get(&self, index: usize) -> Result<BatchItem> {
        self.batch.get(index)
    }
}
