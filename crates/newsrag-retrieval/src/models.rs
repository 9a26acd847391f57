use newsrag_core::config::RagConfig;
use serde::{Deserialize, Serialize};

/// Tuning knobs for the query engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Number of top-ranked records considered for grounding
    pub top_k: usize,

    /// Minimum top score required to answer from retrieved context
    pub relevance_threshold: f32,

    /// Maximum characters of each snippet included in a grounded prompt
    pub snippet_limit: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self { top_k: 4, relevance_threshold: 0.70, snippet_limit: 2000 }
    }
}

impl QueryOptions {
    /// Build options from the layered configuration
    pub fn from_config(config: &RagConfig) -> Self {
        Self {
            top_k: config.top_k.value,
            relevance_threshold: config.relevance_threshold.value,
            snippet_limit: config.snippet_limit.value,
        }
    }

    /// Set the number of top results
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    /// Set the relevance threshold
    pub fn with_relevance_threshold(mut self, threshold: f32) -> Self {
        self.relevance_threshold = threshold;
        self
    }

    /// Set the per-snippet character limit
    pub fn with_snippet_limit(mut self, limit: usize) -> Self {
        self.snippet_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = QueryOptions::default();
        assert_eq!(options.top_k, 4);
        assert_eq!(options.relevance_threshold, 0.70);
        assert_eq!(options.snippet_limit, 2000);
    }

    #[test]
    fn test_from_config() {
        let mut config = RagConfig::with_defaults();
        config.top_k.update(7, newsrag_core::config::ConfigSource::Cli);

        let options = QueryOptions::from_config(&config);
        assert_eq!(options.top_k, 7);
        assert_eq!(options.relevance_threshold, 0.70);
    }

    #[test]
    fn test_builders() {
        let options = QueryOptions::default().with_top_k(2).with_relevance_threshold(0.5);
        assert_eq!(options.top_k, 2);
        assert_eq!(options.relevance_threshold, 0.5);
    }
}
