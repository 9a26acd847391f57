//! NewsRAG Loader - Fetching and text extraction for seed sources
//!
//! This crate turns seed URLs into [`Document`](newsrag_core::models::Document)s.
//! The primary mode follows links within an allow-list of domains up to a
//! configured depth; the degraded mode fetches only the seed pages.

pub mod extract;
pub mod fetcher;
pub mod loader;

pub use fetcher::PageFetcher;
pub use loader::{select_loader, DocumentLoader, RecursiveCrawler, SeedOnlyFetcher};
