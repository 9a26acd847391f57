use crate::cli::Cli;
use crate::errors;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use newsrag_core::config::RagConfig;
use newsrag_core::models::AnswerKind;
use newsrag_core::processing::ChunkSplitter;
use newsrag_llm::{OpenAiEmbedder, OpenAiGenerator};
use newsrag_loader::{select_loader, PageFetcher};
use newsrag_retrieval::{IndexBuilder, QueryEngine, QueryOptions};
use newsrag_store::MemoryIndexStore;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tabled::Tabled;

/// Example questions answered when none are given on the command line
const DEMO_QUESTIONS: [&str; 2] = [
    "What is the most recent economy news from the indexed sources?",
    "Explain what inflation is and how it affects consumers.",
];

/// Config file picked up from the working directory when no --config is given
const DEFAULT_CONFIG_FILE: &str = "newsrag.toml";

#[derive(Tabled)]
struct SupportRow {
    #[tabled(rename = "Id")]
    id: u64,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Source")]
    source: String,
}

#[derive(Serialize)]
struct QuestionOutput {
    question: String,
    kind: AnswerKind,
    answer: String,
    supporting: Vec<SupportingOutput>,
}

#[derive(Serialize)]
struct SupportingOutput {
    id: u64,
    score: f32,
    source: String,
}

pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    // A missing credential is fatal before any work starts.
    let api_key = match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => {
            errors::missing_api_key().display();
            std::process::exit(1);
        }
    };

    let config = load_config(&cli)?;

    let embedder =
        OpenAiEmbedder::new(api_key.clone())?.with_model(config.embedding_model.value.clone());
    let generator =
        OpenAiGenerator::new(api_key)?.with_model(config.completion_model.value.clone());

    // The loader variant is fixed here, once, for the whole run.
    let fetcher = PageFetcher::new()?;
    let loader = select_loader(&config, fetcher);

    output.section("Loading sources");
    for seed in &config.seed_urls.value {
        output.kv("Seed", seed);
    }

    let documents = loader.load().await?;
    if documents.is_empty() {
        output.warning("No documents loaded; answers will fall back to general knowledge");
    } else {
        output.info(format!("Loaded {} documents", documents.len()));
    }

    output.section("Building index");
    let store = Arc::new(MemoryIndexStore::new());
    let splitter = ChunkSplitter::new(config.chunk_size.value, config.chunk_overlap.value)?;
    let builder = IndexBuilder::new(store.clone(), embedder.clone(), splitter);

    let spinner = (!output.is_json()).then(indexing_spinner);
    let built = builder
        .build_with_progress(&documents, |progress| {
            if let Some(bar) = &spinner {
                bar.set_message(progress.message.clone());
            }
        })
        .await?;
    if let Some(bar) = &spinner {
        bar.finish_and_clear();
    }

    output.success(format!(
        "Indexed {} chunks from {} documents ({} dimensions)",
        built.record_count, built.document_count, built.embedding_dim
    ));

    let engine =
        QueryEngine::new(store, embedder, generator, QueryOptions::from_config(&config));

    let questions: Vec<String> = if cli.questions.is_empty() {
        DEMO_QUESTIONS.iter().map(|q| q.to_string()).collect()
    } else {
        cli.questions.clone()
    };

    let mut results = Vec::new();
    for question in &questions {
        let response = engine
            .answer(question)
            .await
            .with_context(|| format!("Failed to answer '{}'", question))?;

        if output.is_json() {
            results.push(QuestionOutput {
                question: question.clone(),
                kind: response.kind,
                answer: response.answer,
                supporting: response
                    .supporting
                    .iter()
                    .map(|s| SupportingOutput {
                        id: s.id.0,
                        score: s.score,
                        source: s.source.url.clone(),
                    })
                    .collect(),
            });
        } else {
            output.section(format!("Question: {}", question));
            output.kv(
                "Answered",
                match response.kind {
                    AnswerKind::Grounded => "from retrieved news context",
                    AnswerKind::General => "from general knowledge",
                },
            );
            output.info(&response.answer);

            if !response.supporting.is_empty() {
                let rows: Vec<SupportRow> = response
                    .supporting
                    .iter()
                    .map(|s| SupportRow {
                        id: s.id.0,
                        score: format!("{:.3}", s.score),
                        source: s.source.url.clone(),
                    })
                    .collect();
                output.table(rows);
            }
        }
    }

    if output.is_json() {
        output.result(results)?;
    }

    Ok(())
}

/// Apply the configuration layers: defaults, file, environment, CLI
fn load_config(cli: &Cli) -> Result<RagConfig> {
    let mut config = RagConfig::with_defaults();

    if let Some(path) = &cli.config {
        config = config.load_from_file(path)?;
    } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
        config = config.load_from_file(DEFAULT_CONFIG_FILE)?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(cli.config_overrides());
    config.validate()?;

    Ok(config)
}

fn indexing_spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner().template("{spinner:.blue} {msg}").unwrap());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
