//! NewsRAG LLM - Embedding and generation ports
//!
//! This crate defines the ports for embedding and answer generation, along
//! with the OpenAI adapter implementations.

pub mod openai;
pub mod ports;

// Re-export main types
pub use openai::{OpenAiEmbedder, OpenAiGenerator};
pub use ports::{Embedder, Generator};
