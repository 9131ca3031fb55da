//! Trait definitions for external collaborators
//!
//! The classifier only ever talks to these traits. Implementations live in
//! `tabviz-store` (exemplar lookup, embeddings) and `tabviz-llm`
//! (generative advisor, remote embeddings).

use crate::exemplar::Neighbor;

/// Embedding-indexed collection of labeled exemplars
///
/// Implemented by the infrastructure layer (tabviz-store)
pub trait ExampleStore {
    /// Error type for store operations
    type Error;

    /// Embed text into the store's vector space
    fn embed(&self, text: &str) -> Result<Vec<f32>, Self::Error>;

    /// Up to `k` nearest exemplars, most similar first
    fn nearest_neighbors(&self, vector: &[f32], k: usize) -> Result<Vec<Neighbor>, Self::Error>;

    /// Text of the nearest stored guideline, if the store holds any
    fn nearest_guideline(&self, _vector: &[f32]) -> Result<Option<String>, Self::Error> {
        Ok(None)
    }

    /// Whether a backend is configured at all
    fn is_available(&self) -> bool {
        true
    }
}

/// Opaque text-completion capability
///
/// Implemented by the infrastructure layer (tabviz-llm)
pub trait GenerativeAdvisor {
    /// Error type for completion calls
    type Error;

    /// Complete a prompt
    fn complete(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Whether a backend is configured at all
    fn is_available(&self) -> bool {
        true
    }
}

/// Text-to-vector model
pub trait EmbeddingModel {
    /// Error type for embedding calls
    type Error;

    /// Generate an embedding vector for the given text
    fn embed(&self, text: &str) -> Result<Vec<f32>, Self::Error>;

    /// Dimension of the produced vectors
    fn dimension(&self) -> usize;
}

/// Placeholder collaborator for a classifier built without a store or advisor
///
/// Reports itself unavailable, so the cascade skips the stage quietly.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disconnected;

impl ExampleStore for Disconnected {
    type Error = &'static str;

    fn embed(&self, _text: &str) -> Result<Vec<f32>, Self::Error> {
        Err("no example store configured")
    }

    fn nearest_neighbors(&self, _vector: &[f32], _k: usize) -> Result<Vec<Neighbor>, Self::Error> {
        Err("no example store configured")
    }

    fn is_available(&self) -> bool {
        false
    }
}

impl GenerativeAdvisor for Disconnected {
    type Error = &'static str;

    fn complete(&self, _prompt: &str) -> Result<String, Self::Error> {
        Err("no generative advisor configured")
    }

    fn is_available(&self) -> bool {
        false
    }
}
