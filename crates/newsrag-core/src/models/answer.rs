use serde::{Deserialize, Serialize};

use super::SimilarityResult;

/// How a query was answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerKind {
    /// Answered strictly from retrieved context
    Grounded,

    /// Answered from the model's general knowledge; no retrieved context was
    /// included in the prompt
    General,
}

/// Tagged result of a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Which branch produced the answer
    pub kind: AnswerKind,

    /// The generated answer text
    pub answer: String,

    /// Top-ranked matches considered for grounding, best first
    pub supporting: Vec<SimilarityResult>,
}
