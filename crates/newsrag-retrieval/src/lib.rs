//! NewsRAG Retrieval - Index building and query answering
//!
//! This crate orchestrates the two halves of the pipeline: the index builder
//! (documents → chunks → embeddings → records) and the query engine with its
//! grounded/general decision.

pub mod engine;
pub mod indexer;
pub mod models;
pub mod prompt;

pub use engine::QueryEngine;
pub use indexer::{IndexBuildResult, IndexBuilder, IndexPhase, IndexProgress};
pub use models::QueryOptions;
