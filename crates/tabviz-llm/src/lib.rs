//! Tabviz LLM Layer
//!
//! Generative advisor and remote embedding implementations for the
//! collaborator traits in `tabviz-domain`.
//!
//! # Providers
//!
//! - `MockAdvisor`: Deterministic advisor for testing
//! - `OllamaAdvisor`: Completion through a local Ollama instance
//! - `OllamaEmbedder`: Embeddings through a local Ollama instance
//!
//! # Examples
//!
//! ```
//! use tabviz_llm::MockAdvisor;
//! use tabviz_domain::traits::GenerativeAdvisor;
//!
//! let advisor = MockAdvisor::new(r#"{"chartType": "pie"}"#);
//! let reply = advisor.complete("which chart?").unwrap();
//! assert_eq!(reply, r#"{"chartType": "pie"}"#);
//! ```

#![warn(missing_docs)]

pub mod ollama;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tabviz_domain::traits::GenerativeAdvisor;
use thiserror::Error;

pub use ollama::{OllamaAdvisor, OllamaEmbedder};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the model server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum Scripted {
    Reply(String),
    Fail,
}

/// Mock advisor for deterministic testing
///
/// Returns pre-configured replies without making any network calls.
///
/// # Examples
///
/// ```
/// use tabviz_llm::MockAdvisor;
/// use tabviz_domain::traits::GenerativeAdvisor;
///
/// let mut advisor = MockAdvisor::default();
/// advisor.add_response("prompt1", "reply1");
/// advisor.add_error("prompt2");
///
/// assert_eq!(advisor.complete("prompt1").unwrap(), "reply1");
/// assert!(advisor.complete("prompt2").is_err());
/// assert_eq!(advisor.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockAdvisor {
    default_response: Option<String>,
    responses: Arc<Mutex<HashMap<String, Scripted>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockAdvisor {
    /// Create a mock that returns the same reply for every prompt
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: Some(response.into()),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Create a mock that fails every prompt without a scripted reply
    pub fn failing() -> Self {
        Self {
            default_response: None,
            ..Self::new("")
        }
    }

    /// Add a specific reply for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(prompt.into(), Scripted::Reply(response.into()));
        }
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(prompt.into(), Scripted::Fail);
        }
    }

    /// Number of times `complete` was called
    pub fn call_count(&self) -> usize {
        self.call_count.lock().map(|count| *count).unwrap_or(0)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        if let Ok(mut count) = self.call_count.lock() {
            *count = 0;
        }
    }
}

impl Default for MockAdvisor {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl GenerativeAdvisor for MockAdvisor {
    type Error = LlmError;

    fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        if let Ok(mut count) = self.call_count.lock() {
            *count += 1;
        }

        let responses = self
            .responses
            .lock()
            .map_err(|_| LlmError::Other("mock state poisoned".to_string()))?;

        match responses.get(prompt) {
            Some(Scripted::Reply(reply)) => Ok(reply.clone()),
            Some(Scripted::Fail) => Err(LlmError::Other("Mock error".to_string())),
            None => self
                .default_response
                .clone()
                .ok_or_else(|| LlmError::Communication("mock advisor offline".to_string())),
        }
    }
}
