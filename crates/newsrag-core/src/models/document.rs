use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unit of fetched raw content
///
/// Documents are transient: the splitter consumes them and they are discarded
/// afterwards. Only the derived index records survive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Extracted text content
    pub content: String,

    /// Origin information
    pub source: DocumentSource,
}

impl Document {
    /// Create a new document
    pub fn new(content: impl Into<String>, source: DocumentSource) -> Self {
        Self { content: content.into(), source }
    }
}

/// Origin of a fetched document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSource {
    /// URL the content was fetched from
    pub url: String,

    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,

    /// Link-following depth at which the page was found (0 = seed page)
    pub depth: usize,
}

impl DocumentSource {
    /// Source for a seed page fetched right now
    pub fn seed(url: impl Into<String>) -> Self {
        Self { url: url.into(), fetched_at: Utc::now(), depth: 0 }
    }

    /// Source for a page discovered by following links
    pub fn crawled(url: impl Into<String>, depth: usize) -> Self {
        Self { url: url.into(), fetched_at: Utc::now(), depth }
    }
}

/// A fixed-size slice of a document's content
///
/// Chunks have no identity of their own; the indexer turns each one into an
/// [`IndexRecord`](super::IndexRecord) immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    /// Text content
    pub text: String,

    /// Source information inherited from the parent document
    pub source: ChunkSource,
}

/// Source of a text chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSource {
    /// URL of the parent document
    pub url: String,

    /// Character offset of the chunk within the parent document
    pub offset: usize,
}
