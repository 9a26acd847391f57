use serde::{Deserialize, Serialize};

use super::{ChunkSource, TextChunk};

/// Unique identifier for an index record
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RecordId(pub u64);

/// The atomic unit of the searchable store
///
/// Records are append-only: once inserted they are never updated or removed.
/// The index is held entirely in memory and dies with the process.
/// Invariant: embedding dimensionality is constant across all records of one
/// index generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Unique identifier, assigned at insertion in strictly increasing order
    pub id: RecordId,

    /// Chunk text
    pub text: String,

    /// Source information
    pub source: ChunkSource,

    /// Embedding vector
    pub embedding: Vec<f32>,
}

/// A record awaiting insertion; the store assigns its id
#[derive(Debug, Clone)]
pub struct PendingRecord {
    pub text: String,
    pub source: ChunkSource,
    pub embedding: Vec<f32>,
}

impl PendingRecord {
    /// Pair a chunk with its embedding
    pub fn new(chunk: TextChunk, embedding: Vec<f32>) -> Self {
        Self { text: chunk.text, source: chunk.source, embedding }
    }
}

/// A scored match for a single query
///
/// Produced per query and discarded after the response is built; never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// Matched record id
    pub id: RecordId,

    /// Cosine similarity in [-1, 1]
    pub score: f32,

    /// Matched record text
    pub text: String,

    /// Source of the matched record
    pub source: ChunkSource,
}
