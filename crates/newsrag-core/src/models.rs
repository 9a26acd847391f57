pub mod answer;
pub mod document;
pub mod record;

pub use answer::{AnswerKind, QueryResponse};
pub use document::{ChunkSource, Document, DocumentSource, TextChunk};
pub use record::{IndexRecord, PendingRecord, RecordId, SimilarityResult};
