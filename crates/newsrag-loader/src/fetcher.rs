use newsrag_core::error::{NewsragError, Result};
use std::time::Duration;

/// User-Agent header sent with every page fetch
const USER_AGENT: &str = concat!("newsrag/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout for page fetches
const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// HTTP page fetcher with an identifying User-Agent and a request timeout
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    /// Create a new fetcher
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| NewsragError::ConfigInvalid {
                key: "fetcher".to_string(),
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    /// Fetch a URL and return the raw response body
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await.map_err(|e| NewsragError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(NewsragError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP status {}", response.status()),
            });
        }

        response.text().await.map_err(|e| NewsragError::Fetch {
            url: url.to_string(),
            reason: format!("failed to read body: {}", e),
        })
    }
}
