use async_trait::async_trait;
use newsrag_core::error::Result;
use newsrag_core::models::{IndexRecord, PendingRecord, RecordId, SimilarityResult};

/// Port for the searchable record index
///
/// The index is append-only: there is no update or delete path. One writer
/// appends during indexing phases; any number of readers may query.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Append a batch of records, assigning each the next monotonically
    /// increasing id
    ///
    /// Records are stored in exactly the given order, and the whole batch
    /// becomes visible to readers atomically.
    async fn append_batch(&self, records: Vec<PendingRecord>) -> Result<Vec<RecordId>>;

    /// Rank every record against the query embedding and return the top `k`
    ///
    /// Full linear scan over the index; the sort is stable, so equal scores
    /// keep insertion order.
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<SimilarityResult>>;

    /// Get a record by id
    async fn get(&self, id: RecordId) -> Result<Option<IndexRecord>>;

    /// Copy of all records in insertion order
    async fn snapshot(&self) -> Result<Vec<IndexRecord>>;

    /// Number of records in the index
    async fn len(&self) -> Result<usize>;

    /// Whether the index holds no records
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}
