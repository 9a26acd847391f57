//! LLM port definitions

use async_trait::async_trait;
use newsrag_core::error::{NewsragError, Result};

/// Port for embedding text into vector representations
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embeddings for a batch of texts
    ///
    /// Returns one vector per input text, in input order. All vectors have
    /// [`dimensions`](Embedder::dimensions) elements.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text]).await?;
        if vectors.is_empty() {
            return Err(NewsragError::EmbeddingService {
                reason: "service returned no vectors".to_string(),
                remediation: "Check the embedding service response format".to_string(),
            });
        }
        Ok(vectors.swap_remove(0))
    }

    /// Get the dimensionality of embeddings produced by this embedder
    fn dimensions(&self) -> usize;

    /// Get the name/identifier of the embedding model
    fn model_name(&self) -> &str;
}

/// Port for answer generation
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate an answer for the given prompt
    ///
    /// The prompt carries all context; implementations add nothing to it.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Get the name/identifier of the completion model
    fn model_name(&self) -> &str;
}
