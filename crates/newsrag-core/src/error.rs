//! Error types for newsrag

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NewsragError {
    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Loader errors
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    // Embedding service errors
    #[error("Embedding service unavailable: {reason}. Try: {remediation}")]
    EmbeddingService {
        reason: String,
        remediation: String,
    },

    // Completion service errors
    #[error("Completion service unavailable: {reason}. Try: {remediation}")]
    CompletionService {
        reason: String,
        remediation: String,
    },

    // Index errors
    #[error("Embedding dimension mismatch: record has {record}, index expects {index}")]
    DimensionMismatch { record: usize, index: usize },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, NewsragError>;
