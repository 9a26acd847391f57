use crate::error::{NewsragError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the newsrag pipeline
///
/// Precedence: defaults < config file < environment < CLI. The seed list,
/// crawl bounds, chunking parameters, and the retrieval knobs (top-k,
/// relevance threshold, snippet limit) are all configuration rather than
/// hardcoded behavior.
#[derive(Debug, Clone)]
pub struct RagConfig {
    /// Seed page URLs loaded at startup
    pub seed_urls: ConfigValue<Vec<String>>,

    /// Domains the crawler is allowed to follow links into
    pub allowed_domains: ConfigValue<Vec<String>>,

    /// Whether link-following crawling is available; when false the loader
    /// degrades to fetching the seed pages only
    pub follow_links: ConfigValue<bool>,

    /// Maximum link-following depth (0 = seed pages only)
    pub max_depth: ConfigValue<usize>,

    /// Target chunk size in characters
    pub chunk_size: ConfigValue<usize>,

    /// Character overlap between consecutive chunks
    pub chunk_overlap: ConfigValue<usize>,

    /// Number of top-ranked records considered for grounding
    pub top_k: ConfigValue<usize>,

    /// Minimum top score required to answer from retrieved context
    pub relevance_threshold: ConfigValue<f32>,

    /// Maximum characters of each snippet included in a grounded prompt
    pub snippet_limit: ConfigValue<usize>,

    /// Embedding model identifier
    pub embedding_model: ConfigValue<String>,

    /// Completion model identifier
    pub completion_model: ConfigValue<String>,
}

impl RagConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            seed_urls: ConfigValue::new(
                vec![
                    "https://cnnespanol.cnn.com/lite/".to_string(),
                    "https://www.cbc.ca/lite/news?sort=latest".to_string(),
                ],
                ConfigSource::Default,
            ),
            allowed_domains: ConfigValue::new(
                vec!["cnnespanol.cnn.com".to_string(), "www.cbc.ca".to_string()],
                ConfigSource::Default,
            ),
            follow_links: ConfigValue::new(true, ConfigSource::Default),
            max_depth: ConfigValue::new(1, ConfigSource::Default),
            chunk_size: ConfigValue::new(1000, ConfigSource::Default),
            chunk_overlap: ConfigValue::new(200, ConfigSource::Default),
            top_k: ConfigValue::new(4, ConfigSource::Default),
            relevance_threshold: ConfigValue::new(0.70, ConfigSource::Default),
            snippet_limit: ConfigValue::new(2000, ConfigSource::Default),
            embedding_model: ConfigValue::new(
                "text-embedding-3-small".to_string(),
                ConfigSource::Default,
            ),
            completion_model: ConfigValue::new("gpt-4o-mini".to_string(), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| NewsragError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| NewsragError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(seed_urls) = file_config.seed_urls {
            self.seed_urls.update(seed_urls, ConfigSource::File);
        }

        if let Some(allowed_domains) = file_config.allowed_domains {
            self.allowed_domains.update(allowed_domains, ConfigSource::File);
        }

        if let Some(follow_links) = file_config.follow_links {
            self.follow_links.update(follow_links, ConfigSource::File);
        }

        if let Some(max_depth) = file_config.max_depth {
            self.max_depth.update(max_depth, ConfigSource::File);
        }

        if let Some(chunk_size) = file_config.chunk_size {
            self.chunk_size.update(chunk_size, ConfigSource::File);
        }

        if let Some(chunk_overlap) = file_config.chunk_overlap {
            self.chunk_overlap.update(chunk_overlap, ConfigSource::File);
        }

        if let Some(top_k) = file_config.top_k {
            self.top_k.update(top_k, ConfigSource::File);
        }

        if let Some(threshold) = file_config.relevance_threshold {
            self.relevance_threshold.update(threshold, ConfigSource::File);
        }

        if let Some(snippet_limit) = file_config.snippet_limit {
            self.snippet_limit.update(snippet_limit, ConfigSource::File);
        }

        if let Some(embedding_model) = file_config.embedding_model {
            self.embedding_model.update(embedding_model, ConfigSource::File);
        }

        if let Some(completion_model) = file_config.completion_model {
            self.completion_model.update(completion_model, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from `NEWSRAG_*` environment variables
    pub fn load_from_env(mut self) -> Self {
        if let Ok(urls) = env::var("NEWSRAG_SEED_URLS") {
            self.seed_urls.update(parse_list(&urls), ConfigSource::Environment);
        }

        if let Ok(domains) = env::var("NEWSRAG_ALLOWED_DOMAINS") {
            self.allowed_domains.update(parse_list(&domains), ConfigSource::Environment);
        }

        if let Ok(follow) = env::var("NEWSRAG_FOLLOW_LINKS") {
            match parse_bool(&follow) {
                Ok(value) => self.follow_links.update(value, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid NEWSRAG_FOLLOW_LINKS value '{}': expected true or false",
                    follow
                ),
            }
        }

        if let Ok(depth) = env::var("NEWSRAG_MAX_DEPTH") {
            match depth.parse::<usize>() {
                Ok(value) => self.max_depth.update(value, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid NEWSRAG_MAX_DEPTH value '{}': expected non-negative integer",
                    depth
                ),
            }
        }

        if let Ok(size) = env::var("NEWSRAG_CHUNK_SIZE") {
            match size.parse::<usize>() {
                Ok(value) => self.chunk_size.update(value, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid NEWSRAG_CHUNK_SIZE value '{}': expected positive integer",
                    size
                ),
            }
        }

        if let Ok(overlap) = env::var("NEWSRAG_CHUNK_OVERLAP") {
            match overlap.parse::<usize>() {
                Ok(value) => self.chunk_overlap.update(value, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid NEWSRAG_CHUNK_OVERLAP value '{}': expected non-negative integer",
                    overlap
                ),
            }
        }

        if let Ok(k) = env::var("NEWSRAG_TOP_K") {
            match k.parse::<usize>() {
                Ok(value) => self.top_k.update(value, ConfigSource::Environment),
                Err(_) => {
                    tracing::warn!("Invalid NEWSRAG_TOP_K value '{}': expected positive integer", k)
                }
            }
        }

        if let Ok(threshold) = env::var("NEWSRAG_RELEVANCE_THRESHOLD") {
            match threshold.parse::<f32>() {
                Ok(value) => self.relevance_threshold.update(value, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid NEWSRAG_RELEVANCE_THRESHOLD value '{}': expected number in [-1, 1]",
                    threshold
                ),
            }
        }

        if let Ok(limit) = env::var("NEWSRAG_SNIPPET_LIMIT") {
            match limit.parse::<usize>() {
                Ok(value) => self.snippet_limit.update(value, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid NEWSRAG_SNIPPET_LIMIT value '{}': expected positive integer",
                    limit
                ),
            }
        }

        if let Ok(model) = env::var("NEWSRAG_EMBEDDING_MODEL") {
            self.embedding_model.update(model, ConfigSource::Environment);
        }

        if let Ok(model) = env::var("NEWSRAG_COMPLETION_MODEL") {
            self.completion_model.update(model, ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(seed_urls) = overrides.seed_urls {
            self.seed_urls.update(seed_urls, ConfigSource::Cli);
        }

        if let Some(follow_links) = overrides.follow_links {
            self.follow_links.update(follow_links, ConfigSource::Cli);
        }

        if let Some(max_depth) = overrides.max_depth {
            self.max_depth.update(max_depth, ConfigSource::Cli);
        }

        if let Some(top_k) = overrides.top_k {
            self.top_k.update(top_k, ConfigSource::Cli);
        }

        if let Some(threshold) = overrides.relevance_threshold {
            self.relevance_threshold.update(threshold, ConfigSource::Cli);
        }
    }

    /// Check cross-field invariants after all layers are applied
    pub fn validate(&self) -> Result<()> {
        if self.seed_urls.value.is_empty() {
            return Err(NewsragError::ConfigInvalid {
                key: "seed_urls".to_string(),
                reason: "at least one seed URL is required".to_string(),
            });
        }

        if self.chunk_size.value == 0 {
            return Err(NewsragError::ConfigInvalid {
                key: "chunk_size".to_string(),
                reason: "chunk_size must be greater than zero".to_string(),
            });
        }

        if self.chunk_overlap.value >= self.chunk_size.value {
            return Err(NewsragError::ConfigInvalid {
                key: "chunk_overlap".to_string(),
                reason: format!(
                    "overlap ({}) must be less than chunk_size ({})",
                    self.chunk_overlap.value, self.chunk_size.value
                ),
            });
        }

        if self.top_k.value == 0 {
            return Err(NewsragError::ConfigInvalid {
                key: "top_k".to_string(),
                reason: "top_k must be at least 1".to_string(),
            });
        }

        if !(-1.0..=1.0).contains(&self.relevance_threshold.value) {
            return Err(NewsragError::ConfigInvalid {
                key: "relevance_threshold".to_string(),
                reason: format!(
                    "threshold ({}) must be within [-1, 1]",
                    self.relevance_threshold.value
                ),
            });
        }

        Ok(())
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    seed_urls: Option<Vec<String>>,
    allowed_domains: Option<Vec<String>>,
    follow_links: Option<bool>,
    max_depth: Option<usize>,
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
    top_k: Option<usize>,
    relevance_threshold: Option<f32>,
    snippet_limit: Option<usize>,
    embedding_model: Option<String>,
    completion_model: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub seed_urls: Option<Vec<String>>,
    pub follow_links: Option<bool>,
    pub max_depth: Option<usize>,
    pub top_k: Option<usize>,
    pub relevance_threshold: Option<f32>,
}

/// Parse a comma-separated list, dropping empty items
fn parse_list(s: &str) -> Vec<String> {
    s.split(',').map(str::trim).filter(|item| !item.is_empty()).map(String::from).collect()
}

/// Parse a boolean from common spellings
pub fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(NewsragError::ConfigInvalid {
            key: "follow_links".to_string(),
            reason: format!("Invalid boolean: {}. Use true or false", s),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = RagConfig::with_defaults();
        assert_eq!(config.seed_urls.value.len(), 2);
        assert_eq!(config.seed_urls.source, ConfigSource::Default);
        assert_eq!(config.max_depth.value, 1);
        assert_eq!(config.chunk_size.value, 1000);
        assert_eq!(config.chunk_overlap.value, 200);
        assert_eq!(config.top_k.value, 4);
        assert_eq!(config.relevance_threshold.value, 0.70);
        assert_eq!(config.embedding_model.value, "text-embedding-3-small");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
seed_urls = ["https://news.example.org/latest"]
allowed_domains = ["news.example.org"]
max_depth = 2
chunk_size = 500
chunk_overlap = 100
top_k = 8
relevance_threshold = 0.5
completion_model = "gpt-4o"
"#
        )
        .unwrap();

        let config = RagConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.seed_urls.value, vec!["https://news.example.org/latest".to_string()]);
        assert_eq!(config.seed_urls.source, ConfigSource::File);
        assert_eq!(config.max_depth.value, 2);
        assert_eq!(config.chunk_size.value, 500);
        assert_eq!(config.top_k.value, 8);
        assert_eq!(config.relevance_threshold.value, 0.5);
        assert_eq!(config.completion_model.value, "gpt-4o");
        // Untouched keys keep their defaults
        assert_eq!(config.snippet_limit.value, 2000);
        assert_eq!(config.snippet_limit.source, ConfigSource::Default);
    }

    #[test]
    #[serial]
    fn test_load_from_env() {
        std::env::set_var("NEWSRAG_TOP_K", "6");
        std::env::set_var("NEWSRAG_FOLLOW_LINKS", "false");
        std::env::set_var("NEWSRAG_SEED_URLS", "https://a.example.com, https://b.example.com");

        let config = RagConfig::with_defaults().load_from_env();

        std::env::remove_var("NEWSRAG_TOP_K");
        std::env::remove_var("NEWSRAG_FOLLOW_LINKS");
        std::env::remove_var("NEWSRAG_SEED_URLS");

        assert_eq!(config.top_k.value, 6);
        assert_eq!(config.top_k.source, ConfigSource::Environment);
        assert!(!config.follow_links.value);
        assert_eq!(
            config.seed_urls.value,
            vec!["https://a.example.com".to_string(), "https://b.example.com".to_string()]
        );
    }

    #[test]
    #[serial]
    fn test_invalid_env_value_keeps_previous_layer() {
        std::env::set_var("NEWSRAG_MAX_DEPTH", "not-a-number");

        let config = RagConfig::with_defaults().load_from_env();

        std::env::remove_var("NEWSRAG_MAX_DEPTH");

        assert_eq!(config.max_depth.value, 1);
        assert_eq!(config.max_depth.source, ConfigSource::Default);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = RagConfig::with_defaults();

        let overrides = CliConfigOverrides {
            seed_urls: None,
            follow_links: Some(false),
            max_depth: Some(0),
            top_k: Some(2),
            relevance_threshold: None,
        };

        config.update_from_cli(overrides);

        assert!(!config.follow_links.value);
        assert_eq!(config.follow_links.source, ConfigSource::Cli);
        assert_eq!(config.max_depth.value, 0);
        assert_eq!(config.top_k.value, 2);
        // These should still be defaults
        assert_eq!(config.relevance_threshold.source, ConfigSource::Default);
        assert_eq!(config.seed_urls.source, ConfigSource::Default);
    }

    #[test]
    fn test_validate_rejects_overlap_ge_chunk_size() {
        let mut config = RagConfig::with_defaults();
        config.chunk_overlap.update(1000, ConfigSource::Cli);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let mut config = RagConfig::with_defaults();
        config.top_k.update(0, ConfigSource::Cli);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_threshold() {
        let mut config = RagConfig::with_defaults();
        config.relevance_threshold.update(1.5, ConfigSource::Cli);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_seed_list() {
        let mut config = RagConfig::with_defaults();
        config.seed_urls.update(Vec::new(), ConfigSource::Cli);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool("YES").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
    }
}
