use clap::Parser;
use newsrag_core::config::CliConfigOverrides;
use std::path::PathBuf;

/// newsrag - retrieval-augmented news answering
#[derive(Parser, Debug)]
#[command(name = "newsrag")]
#[command(about = "Retrieval-augmented news answering", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Questions to answer (defaults to the built-in example questions)
    pub questions: Vec<String>,

    /// Path to a TOML config file (defaults to ./newsrag.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed URL to load (repeatable; replaces the configured seeds)
    #[arg(long = "seed", value_name = "URL")]
    pub seeds: Vec<String>,

    /// Disable link following and fetch only the seed pages
    #[arg(long)]
    pub no_follow_links: bool,

    /// Maximum link-following depth (0 = seed pages only)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Number of top-ranked chunks considered for grounding
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Minimum top similarity required to answer from retrieved context
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Collect the CLI layer of the configuration
    pub fn config_overrides(&self) -> CliConfigOverrides {
        CliConfigOverrides {
            seed_urls: (!self.seeds.is_empty()).then(|| self.seeds.clone()),
            follow_links: self.no_follow_links.then_some(false),
            max_depth: self.max_depth,
            top_k: self.top_k,
            relevance_threshold: self.threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_is_the_demo_invocation() {
        let cli = Cli::try_parse_from(["newsrag"]).unwrap();
        assert!(cli.questions.is_empty());
        assert!(cli.config.is_none());
        assert!(!cli.json);

        let overrides = cli.config_overrides();
        assert!(overrides.seed_urls.is_none());
        assert!(overrides.follow_links.is_none());
        assert!(overrides.max_depth.is_none());
    }

    #[test]
    fn test_positional_questions() {
        let cli = Cli::try_parse_from(["newsrag", "What happened today?"]).unwrap();
        assert_eq!(cli.questions, vec!["What happened today?".to_string()]);
    }

    #[test]
    fn test_overrides_map_to_config_layer() {
        let cli = Cli::try_parse_from([
            "newsrag",
            "--seed",
            "https://a.example.com",
            "--seed",
            "https://b.example.com",
            "--no-follow-links",
            "--max-depth",
            "0",
            "--top-k",
            "2",
            "--threshold",
            "0.5",
        ])
        .unwrap();

        let overrides = cli.config_overrides();
        assert_eq!(
            overrides.seed_urls,
            Some(vec!["https://a.example.com".to_string(), "https://b.example.com".to_string()])
        );
        assert_eq!(overrides.follow_links, Some(false));
        assert_eq!(overrides.max_depth, Some(0));
        assert_eq!(overrides.top_k, Some(2));
        assert_eq!(overrides.relevance_threshold, Some(0.5));
    }
}
