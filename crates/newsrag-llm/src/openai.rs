//! OpenAI adapters for the embedding and generation ports
//!
//! Both clients talk to the OpenAI HTTP API through `reqwest`, with a request
//! timeout and a bounded retry on transport errors, 429s, and 5xx responses.
//! Once retries are exhausted the error propagates to the caller; there are
//! no partial answers.

use async_trait::async_trait;
use newsrag_core::error::{NewsragError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::ports::{Embedder, Generator};

/// Default base URL for the OpenAI API
const OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Default model for embeddings
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Default dimensionality of `text-embedding-3-small`
const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1536;

/// Default model for completions
const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Retries after the initial attempt
const MAX_RETRIES: u32 = 2;

/// Base delay for exponential backoff between retries
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

fn build_client(service: &'static str) -> Result<reqwest::Client> {
    reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build().map_err(|e| {
        NewsragError::ConfigInvalid {
            key: service.to_string(),
            reason: format!("Failed to build HTTP client: {}", e),
        }
    })
}

/// Whether a response status is worth retrying
fn is_retriable(status: reqwest::StatusCode) -> bool {
    status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS
}

fn backoff_delay(attempt: u32) -> Duration {
    RETRY_BASE_DELAY * 2u32.saturating_pow(attempt.saturating_sub(1))
}

/// Extract the API error message from a response body, falling back to the
/// raw body when it is not the documented error envelope
fn error_detail(body: String) -> String {
    serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body)
}

/// An [`Embedder`] backed by the OpenAI embeddings API
#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl OpenAiEmbedder {
    /// Create a new embedder with the given API key
    ///
    /// Uses the default model (`text-embedding-3-small`, 1536 dimensions).
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(NewsragError::ConfigMissing { key: "OPENAI_API_KEY".to_string() });
        }

        Ok(Self {
            client: build_client("embedder")?,
            api_key,
            base_url: OPENAI_BASE_URL.to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
        })
    }

    /// Create a new embedder from the `OPENAI_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| NewsragError::ConfigMissing { key: "OPENAI_API_KEY".to_string() })?;
        Self::new(api_key)
    }

    /// Set the model name (e.g. `text-embedding-3-large`)
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the expected embedding dimensionality
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn request_embeddings(&self, request: &EmbeddingRequest<'_>) -> Result<EmbeddingResponse> {
        let url = format!("{}/v1/embeddings", self.base_url);
        let mut attempt = 0;

        loop {
            let result = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(request)
                .send()
                .await;

            let retriable = match &result {
                Ok(response) => is_retriable(response.status()),
                Err(_) => true,
            };

            if retriable && attempt < MAX_RETRIES {
                attempt += 1;
                warn!(attempt, model = %self.model, "embedding request failed, retrying");
                tokio::time::sleep(backoff_delay(attempt)).await;
                continue;
            }

            let response = result.map_err(|e| NewsragError::EmbeddingService {
                reason: format!("request failed: {}", e),
                remediation: "Check network connectivity and the OpenAI service status"
                    .to_string(),
            })?;

            if !response.status().is_success() {
                let status = response.status();
                let detail = error_detail(response.text().await.unwrap_or_default());
                return Err(NewsragError::EmbeddingService {
                    reason: format!("API returned {}: {}", status, detail),
                    remediation: format!(
                        "Verify the API key and that model '{}' is available",
                        self.model
                    ),
                });
            }

            return response.json().await.map_err(|e| NewsragError::EmbeddingService {
                reason: format!("failed to parse response: {}", e),
                remediation: "Check OpenAI API compatibility".to_string(),
            });
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(batch_size = texts.len(), model = %self.model, "embedding batch");

        let request = EmbeddingRequest { model: &self.model, input: texts.to_vec() };
        let response = self.request_embeddings(&request).await?;

        if response.data.len() != texts.len() {
            return Err(NewsragError::EmbeddingService {
                reason: format!(
                    "expected {} vectors, service returned {}",
                    texts.len(),
                    response.data.len()
                ),
                remediation: "Check the embedding service response format".to_string(),
            });
        }

        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// A [`Generator`] backed by the OpenAI chat completions API
///
/// Temperature is fixed at 0.0 so identical prompts produce reproducible
/// answers.
#[derive(Clone)]
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OpenAiGenerator {
    /// Create a new generator with the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(NewsragError::ConfigMissing { key: "OPENAI_API_KEY".to_string() });
        }

        Ok(Self {
            client: build_client("generator")?,
            api_key,
            base_url: OPENAI_BASE_URL.to_string(),
            model: DEFAULT_COMPLETION_MODEL.to_string(),
            temperature: 0.0,
        })
    }

    /// Create a new generator from the `OPENAI_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| NewsragError::ConfigMissing { key: "OPENAI_API_KEY".to_string() })?;
        Self::new(api_key)
    }

    /// Set the model name (e.g. `gpt-4o`)
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn request_completion(&self, request: &ChatRequest<'_>) -> Result<ChatResponse> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let mut attempt = 0;

        loop {
            let result = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(request)
                .send()
                .await;

            let retriable = match &result {
                Ok(response) => is_retriable(response.status()),
                Err(_) => true,
            };

            if retriable && attempt < MAX_RETRIES {
                attempt += 1;
                warn!(attempt, model = %self.model, "completion request failed, retrying");
                tokio::time::sleep(backoff_delay(attempt)).await;
                continue;
            }

            let response = result.map_err(|e| NewsragError::CompletionService {
                reason: format!("request failed: {}", e),
                remediation: "Check network connectivity and the OpenAI service status"
                    .to_string(),
            })?;

            if !response.status().is_success() {
                let status = response.status();
                let detail = error_detail(response.text().await.unwrap_or_default());
                return Err(NewsragError::CompletionService {
                    reason: format!("API returned {}: {}", status, detail),
                    remediation: format!(
                        "Verify the API key and that model '{}' is available",
                        self.model
                    ),
                });
            }

            return response.json().await.map_err(|e| NewsragError::CompletionService {
                reason: format!("failed to parse response: {}", e),
                remediation: "Check OpenAI API compatibility".to_string(),
            });
        }
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(prompt_len = prompt.len(), model = %self.model, "requesting completion");

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            temperature: self.temperature,
        };

        let response = self.request_completion(&request).await?;

        response.choices.into_iter().next().map(|c| c.message.content).ok_or_else(|| {
            NewsragError::CompletionService {
                reason: "service returned no choices".to_string(),
                remediation: "Check the completion service response format".to_string(),
            }
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}
