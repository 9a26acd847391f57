//! In-memory index storage.
//!
//! This implementation uses `RwLock::unwrap()` intentionally. Lock poisoning
//! only occurs when another thread panicked while holding the lock, which is
//! an unrecoverable state. The index lives for the duration of the process
//! and is never persisted to durable storage.

use async_trait::async_trait;
use newsrag_core::error::{NewsragError, Result};
use newsrag_core::models::{IndexRecord, PendingRecord, RecordId, SimilarityResult};
use newsrag_core::processing::cosine_similarity;
use std::sync::{Arc, RwLock};

use crate::ports::IndexStore;

/// Append-only in-memory implementation of [`IndexStore`]
///
/// Each append takes the write lock once for the whole batch, so a concurrent
/// reader never observes a partially appended batch. Ids are assigned from
/// the record count under that same lock, which makes them monotonic, unique,
/// and equal to insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndexStore {
    records: Arc<RwLock<Vec<IndexRecord>>>,
}

impl MemoryIndexStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IndexStore for MemoryIndexStore {
    async fn append_batch(&self, records: Vec<PendingRecord>) -> Result<Vec<RecordId>> {
        let mut store = self.records.write().unwrap();

        // All records of one index generation share one dimensionality.
        let expected_dim = store
            .first()
            .map(|r| r.embedding.len())
            .or_else(|| records.first().map(|r| r.embedding.len()));

        if let Some(expected) = expected_dim {
            if let Some(record) = records.iter().find(|r| r.embedding.len() != expected) {
                return Err(NewsragError::DimensionMismatch {
                    record: record.embedding.len(),
                    index: expected,
                });
            }
        }

        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            let id = RecordId(store.len() as u64);
            ids.push(id);
            store.push(IndexRecord {
                id,
                text: record.text,
                source: record.source,
                embedding: record.embedding,
            });
        }

        Ok(ids)
    }

    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<SimilarityResult>> {
        let store = self.records.read().unwrap();

        let mut results: Vec<SimilarityResult> = store
            .iter()
            .map(|record| SimilarityResult {
                id: record.id,
                score: cosine_similarity(query, &record.embedding),
                text: record.text.clone(),
                source: record.source.clone(),
            })
            .collect();

        // Stable sort: equal scores keep insertion order.
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);

        Ok(results)
    }

    async fn get(&self, id: RecordId) -> Result<Option<IndexRecord>> {
        let store = self.records.read().unwrap();
        Ok(store.iter().find(|r| r.id == id).cloned())
    }

    async fn snapshot(&self) -> Result<Vec<IndexRecord>> {
        let store = self.records.read().unwrap();
        Ok(store.clone())
    }

    async fn len(&self) -> Result<usize> {
        let store = self.records.read().unwrap();
        Ok(store.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsrag_core::models::ChunkSource;

    fn pending(text: &str, embedding: Vec<f32>) -> PendingRecord {
        PendingRecord {
            text: text.to_string(),
            source: ChunkSource { url: "https://example.com/a".to_string(), offset: 0 },
            embedding,
        }
    }

    #[tokio::test]
    async fn test_append_assigns_increasing_unique_ids() {
        let store = MemoryIndexStore::new();

        let batch = vec![
            pending("first", vec![1.0, 0.0]),
            pending("second", vec![0.0, 1.0]),
            pending("third", vec![1.0, 1.0]),
        ];
        let ids = store.append_batch(batch).await.unwrap();

        assert_eq!(ids, vec![RecordId(0), RecordId(1), RecordId(2)]);
        assert_eq!(store.len().await.unwrap(), 3);

        let records = store.snapshot().await.unwrap();
        assert_eq!(records[0].text, "first");
        assert_eq!(records[1].text, "second");
        assert_eq!(records[2].text, "third");
    }

    #[tokio::test]
    async fn test_ids_continue_across_batches() {
        let store = MemoryIndexStore::new();

        store.append_batch(vec![pending("a", vec![1.0])]).await.unwrap();
        let ids = store.append_batch(vec![pending("b", vec![2.0])]).await.unwrap();

        assert_eq!(ids, vec![RecordId(1)]);
    }

    #[tokio::test]
    async fn test_append_rejects_dimension_mismatch() {
        let store = MemoryIndexStore::new();
        store.append_batch(vec![pending("a", vec![1.0, 0.0])]).await.unwrap();

        let result = store.append_batch(vec![pending("b", vec![1.0, 0.0, 0.0])]).await;
        assert!(matches!(result, Err(NewsragError::DimensionMismatch { record: 3, index: 2 })));
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let store = MemoryIndexStore::new();
        store
            .append_batch(vec![
                pending("orthogonal", vec![0.0, 1.0]),
                pending("aligned", vec![2.0, 0.0]),
                pending("opposite", vec![-1.0, 0.0]),
            ])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 3).await.unwrap();

        assert_eq!(results[0].text, "aligned");
        assert!((results[0].score - 1.0).abs() < 1e-6);
        assert_eq!(results[1].text, "orthogonal");
        assert_eq!(results[2].text, "opposite");
    }

    #[tokio::test]
    async fn test_search_breaks_ties_by_insertion_order() {
        let store = MemoryIndexStore::new();
        store
            .append_batch(vec![
                pending("first", vec![1.0, 0.0]),
                pending("second", vec![3.0, 0.0]),
                pending("third", vec![0.5, 0.0]),
            ])
            .await
            .unwrap();

        // All three records point in the same direction, so they all score 1.0.
        let results = store.search(&[1.0, 0.0], 3).await.unwrap();

        assert_eq!(results[0].id, RecordId(0));
        assert_eq!(results[1].id, RecordId(1));
        assert_eq!(results[2].id, RecordId(2));
    }

    #[tokio::test]
    async fn test_search_truncates_to_k() {
        let store = MemoryIndexStore::new();
        let batch = (0..10).map(|i| pending(&format!("r{}", i), vec![i as f32, 1.0])).collect();
        store.append_batch(batch).await.unwrap();

        let results = store.search(&[1.0, 0.0], 4).await.unwrap();
        assert_eq!(results.len(), 4);
    }

    #[tokio::test]
    async fn test_search_empty_index_returns_nothing() {
        let store = MemoryIndexStore::new();
        assert!(store.search(&[1.0, 0.0], 4).await.unwrap().is_empty());
        assert!(store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let store = MemoryIndexStore::new();
        let ids = store.append_batch(vec![pending("only", vec![1.0])]).await.unwrap();

        let record = store.get(ids[0]).await.unwrap().unwrap();
        assert_eq!(record.text, "only");
        assert!(store.get(RecordId(99)).await.unwrap().is_none());
    }
}
