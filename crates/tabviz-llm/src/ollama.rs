//! Ollama Integration
//!
//! Completion and embedding over a local Ollama instance.
//!
//! Both clients are async at heart. The collaborator traits are
//! synchronous, so the trait impls drive the request on a private
//! current-thread runtime. Call them from a blocking context (the
//! classifier uses `spawn_blocking`), never from inside an async task.
//!
//! # Examples
//!
//! ```no_run
//! use tabviz_llm::{OllamaAdvisor, OllamaEmbedder};
//!
//! let advisor = OllamaAdvisor::new("http://localhost:11434", "llama3.1");
//! let embedder = OllamaEmbedder::new("http://localhost:11434", "nomic-embed-text", 768);
//! ```

use crate::LlmError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tabviz_domain::traits::{EmbeddingModel, GenerativeAdvisor};
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for a single HTTP request (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts per request. Retrying is opt-in.
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Ollama completion client
pub struct OllamaAdvisor {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!("Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        })
}

/// Run a request to completion on a fresh current-thread runtime
fn block_on<F, T>(future: F) -> Result<T, LlmError>
where
    F: Future<Output = Result<T, LlmError>>,
{
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?
        .block_on(future)
}

/// POST a JSON body with retry and exponential backoff
async fn post_json<B, R>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
    model: &str,
    max_retries: u32,
) -> Result<R, LlmError>
where
    B: Serialize + ?Sized,
    R: for<'de> Deserialize<'de>,
{
    let mut attempts = 0;
    let mut last_error = None;

    while attempts < max_retries.max(1) {
        match client.post(url).json(body).send().await {
            Ok(response) => {
                if response.status().is_success() {
                    return response.json::<R>().await.map_err(|e| {
                        LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                    });
                } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                    return Err(LlmError::ModelNotAvailable(model.to_string()));
                } else {
                    let status = response.status();
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    last_error = Some(LlmError::Communication(format!(
                        "HTTP {}: {}",
                        status, error_text
                    )));
                }
            }
            Err(e) => {
                last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
            }
        }

        attempts += 1;
        if attempts < max_retries {
            let delay = Duration::from_secs(2u64.pow(attempts - 1));
            debug!("Retrying {} in {:?}", url, delay);
            tokio::time::sleep(delay).await;
        }
    }

    Err(last_error.unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
}

impl OllamaAdvisor {
    /// Create a new advisor for `model` served at `endpoint`
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Create an advisor against [`DEFAULT_ENDPOINT`]
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of attempts per request
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the per-request HTTP timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    /// Complete a prompt through `/api/generate`
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response: GenerateResponse =
            post_json(&self.client, &url, &body, &self.model, self.max_retries).await?;
        Ok(response.response)
    }
}

impl GenerativeAdvisor for OllamaAdvisor {
    type Error = LlmError;

    fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        block_on(self.generate(prompt))
    }
}

/// Ollama embedding client
pub struct OllamaEmbedder {
    endpoint: String,
    model: String,
    dimension: usize,
    client: reqwest::Client,
    max_retries: u32,
}

impl OllamaEmbedder {
    /// Create a new embedder producing `dimension`-sized vectors
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            dimension,
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Set the maximum number of attempts per request
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Embed text through `/api/embed`
    pub async fn embed_text(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let url = format!("{}/api/embed", self.endpoint);
        let body = EmbedRequest {
            model: &self.model,
            input: text,
        };

        let response: EmbedResponse =
            post_json(&self.client, &url, &body, &self.model, self.max_retries).await?;
        let vector = response
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("No embedding returned".to_string()))?;

        if vector.len() != self.dimension {
            return Err(LlmError::InvalidResponse(format!(
                "Expected {}-dimensional embedding, got {}",
                self.dimension,
                vector.len()
            )));
        }
        Ok(vector)
    }
}

impl EmbeddingModel for OllamaEmbedder {
    type Error = LlmError;

    fn embed(&self, text: &str) -> Result<Vec<f32>, Self::Error> {
        block_on(self.embed_text(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisor_creation() {
        let advisor = OllamaAdvisor::new("http://localhost:11434", "llama3.1");
        assert_eq!(advisor.endpoint, "http://localhost:11434");
        assert_eq!(advisor.model, "llama3.1");
        assert_eq!(advisor.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_advisor_default_endpoint() {
        let advisor = OllamaAdvisor::default_endpoint("mistral").with_max_retries(3);
        assert_eq!(advisor.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(advisor.max_retries, 3);
    }

    #[test]
    fn test_embedder_dimension() {
        let embedder = OllamaEmbedder::new(DEFAULT_ENDPOINT, "nomic-embed-text", 768);
        assert_eq!(embedder.dimension(), 768);
    }

    #[tokio::test]
    async fn test_advisor_unreachable_endpoint() {
        let advisor = OllamaAdvisor::new("http://127.0.0.1:1", "llama3.1");

        let result = advisor.generate("test").await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }

    #[test]
    fn test_sync_complete_unreachable_endpoint() {
        let advisor = OllamaAdvisor::new("http://127.0.0.1:1", "llama3.1");
        assert!(advisor.complete("test").is_err());
    }

    #[test]
    fn test_sync_embed_unreachable_endpoint() {
        let embedder = OllamaEmbedder::new("http://127.0.0.1:1", "nomic-embed-text", 768);
        assert!(matches!(embedder.embed("test"), Err(LlmError::Communication(_))));
    }

    #[tokio::test]
    #[ignore] // Only run when Ollama is available
    async fn test_generate_integration() {
        let advisor = OllamaAdvisor::default_endpoint("llama3.1");
        if let Ok(reply) = advisor.generate("Say 'hello' and nothing else").await {
            assert!(!reply.is_empty());
        }
    }
}
