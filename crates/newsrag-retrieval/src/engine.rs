use newsrag_core::error::Result;
use newsrag_core::models::{AnswerKind, QueryResponse};
use newsrag_llm::ports::{Embedder, Generator};
use newsrag_store::ports::IndexStore;
use std::sync::Arc;
use tracing::debug;

use crate::models::QueryOptions;
use crate::prompt;

/// Query engine: embed the question, rank the index, answer grounded or from
/// general knowledge
///
/// The grounded/general decision is a single comparison of the top-ranked
/// score against the relevance threshold (strict `>=` keeps grounded). An
/// empty index always answers from general knowledge, and the general branch
/// sends the model no retrieved text at all.
pub struct QueryEngine<E, G>
where
    E: Embedder,
    G: Generator,
{
    store: Arc<dyn IndexStore>,
    embedder: E,
    generator: G,
    options: QueryOptions,
}

impl<E, G> QueryEngine<E, G>
where
    E: Embedder,
    G: Generator,
{
    /// Create a new query engine
    pub fn new(store: Arc<dyn IndexStore>, embedder: E, generator: G, options: QueryOptions) -> Self {
        Self { store, embedder, generator, options }
    }

    /// Answer a natural-language question
    ///
    /// Embedding or completion errors propagate to the caller; there is no
    /// partial answer.
    pub async fn answer(&self, question: &str) -> Result<QueryResponse> {
        let query_embedding = self.embedder.embed(question).await?;

        // Full linear scan over the index; the store's sort is stable, so
        // ties keep insertion order.
        let supporting =
            self.store.search(&query_embedding, self.options.top_k).await?;

        let grounded = supporting
            .first()
            .map(|top| top.score >= self.options.relevance_threshold)
            .unwrap_or(false);

        debug!(
            grounded,
            top_score = supporting.first().map(|top| top.score),
            candidates = supporting.len(),
            "routing query"
        );

        let (kind, prompt) = if grounded {
            (
                AnswerKind::Grounded,
                prompt::grounded(question, &supporting, self.options.snippet_limit),
            )
        } else {
            (AnswerKind::General, prompt::general(question))
        };

        let answer = self.generator.complete(&prompt).await?;

        Ok(QueryResponse { kind, answer, supporting })
    }

    /// The options this engine was built with
    pub fn options(&self) -> &QueryOptions {
        &self.options
    }
}
