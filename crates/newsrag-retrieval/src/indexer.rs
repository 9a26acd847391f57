use newsrag_core::error::{NewsragError, Result};
use newsrag_core::models::{Document, PendingRecord, TextChunk};
use newsrag_core::processing::ChunkSplitter;
use newsrag_llm::ports::Embedder;
use newsrag_store::ports::IndexStore;
use std::sync::Arc;
use tracing::info;

/// Progress information for index building
#[derive(Debug, Clone)]
pub struct IndexProgress {
    pub phase: IndexPhase,
    pub current: usize,
    pub total: usize,
    pub message: String,
}

/// Current phase of index building
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexPhase {
    SplittingDocuments,
    GeneratingEmbeddings,
    StoringRecords,
}

/// Index builder: documents → chunks → embeddings → records
///
/// Chunks are embedded in batches and appended to the store in exactly the
/// input chunk order. An embedding failure aborts the remaining chunks and
/// propagates; nothing is silently skipped.
pub struct IndexBuilder<E>
where
    E: Embedder,
{
    store: Arc<dyn IndexStore>,
    embedder: E,
    splitter: ChunkSplitter,
    batch_size: usize,
}

impl<E> IndexBuilder<E>
where
    E: Embedder,
{
    /// Create a new index builder
    pub fn new(store: Arc<dyn IndexStore>, embedder: E, splitter: ChunkSplitter) -> Self {
        Self { store, embedder, splitter, batch_size: 32 }
    }

    /// Set the batch size for embedding calls
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Build the index from loaded documents
    pub async fn build(&self, documents: &[Document]) -> Result<IndexBuildResult> {
        self.build_with_progress(documents, |_| {}).await
    }

    /// Build the index with progress reporting
    pub async fn build_with_progress<F>(
        &self,
        documents: &[Document],
        mut progress: F,
    ) -> Result<IndexBuildResult>
    where
        F: FnMut(IndexProgress),
    {
        // Phase 1: split documents into chunks
        let mut chunks: Vec<TextChunk> = Vec::new();
        for (idx, document) in documents.iter().enumerate() {
            chunks.extend(self.splitter.split(document));

            progress(IndexProgress {
                phase: IndexPhase::SplittingDocuments,
                current: idx + 1,
                total: documents.len(),
                message: format!("Split '{}'", document.source.url),
            });
        }

        let total = chunks.len();
        let mut appended = 0;

        // Phases 2 and 3 alternate per batch: embed, then append in chunk
        // order before the next batch starts.
        for batch in chunks.chunks(self.batch_size) {
            let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();

            // Fail-fast: an embedding error aborts the remaining chunks.
            let vectors = self.embedder.embed_batch(&texts).await?;

            if vectors.len() != batch.len() {
                return Err(NewsragError::EmbeddingService {
                    reason: format!(
                        "expected {} vectors, service returned {}",
                        batch.len(),
                        vectors.len()
                    ),
                    remediation: "Check the embedding service response format".to_string(),
                });
            }

            progress(IndexProgress {
                phase: IndexPhase::GeneratingEmbeddings,
                current: (appended + batch.len()).min(total),
                total,
                message: format!("Embedded {}/{} chunks", appended + batch.len(), total),
            });

            let records: Vec<PendingRecord> = batch
                .iter()
                .cloned()
                .zip(vectors)
                .map(|(chunk, embedding)| PendingRecord::new(chunk, embedding))
                .collect();

            self.store.append_batch(records).await?;
            appended += batch.len();

            progress(IndexProgress {
                phase: IndexPhase::StoringRecords,
                current: appended,
                total,
                message: format!("Stored {}/{} records", appended, total),
            });
        }

        info!(documents = documents.len(), chunks = total, "index build complete");

        Ok(IndexBuildResult {
            document_count: documents.len(),
            chunk_count: total,
            record_count: appended,
            embedding_dim: self.embedder.dimensions(),
        })
    }
}

/// Result of an index build operation
#[derive(Debug, Clone, Default)]
pub struct IndexBuildResult {
    /// Number of documents consumed
    pub document_count: usize,

    /// Number of chunks produced by the splitter
    pub chunk_count: usize,

    /// Number of records appended to the store
    pub record_count: usize,

    /// Embedding dimension
    pub embedding_dim: usize,
}
