//! Process-wide collaborators built from [`AppConfig`].
//!
//! The store and the advisor are constructed once at startup and handed to
//! the pipeline by `Arc`; nothing here is global.

use crate::config::{AppConfig, EmbedderKind};
use crate::error::Result;
use std::sync::Arc;
use tabviz_classifier::{Pipeline, VisualizationClassifier};
use tabviz_domain::traits::{EmbeddingModel, GenerativeAdvisor};
use tabviz_extractor::TextExtractor;
use tabviz_llm::{LlmError, OllamaAdvisor, OllamaEmbedder};
use tabviz_store::{EmbeddingError, ExemplarStore, MockEmbeddingModel};
use thiserror::Error;
use tracing::{info, warn};

/// Store type used by the binary
pub type AppStore = ExemplarStore<Embedder>;

/// Pipeline type used by the binary
pub type AppPipeline = Pipeline<AppStore, Advisor>;

/// Failure from a configured backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// Local embedding model failure
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    /// Ollama request failure
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// No generative backend configured
    #[error("generative advisor disabled")]
    Disabled,
}

/// Embedding backend selected by `store.embedder`
pub enum Embedder {
    /// Hash embeddings
    Mock(MockEmbeddingModel),
    /// Ollama embeddings
    Ollama(OllamaEmbedder),
}

impl Embedder {
    /// Build the configured embedder
    pub fn from_config(config: &AppConfig) -> Self {
        let dimension = config.store.dimension;
        match config.store.embedder {
            EmbedderKind::Mock => Embedder::Mock(MockEmbeddingModel::new(dimension)),
            EmbedderKind::Ollama => Embedder::Ollama(
                OllamaEmbedder::new(
                    config.ollama.endpoint.clone(),
                    config.ollama.embed_model.clone(),
                    dimension,
                )
                .with_max_retries(config.ollama.max_retries),
            ),
        }
    }
}

impl EmbeddingModel for Embedder {
    type Error = BackendError;

    fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, Self::Error> {
        match self {
            Embedder::Mock(model) => Ok(model.embed(text)?),
            Embedder::Ollama(model) => Ok(model.embed(text)?),
        }
    }

    fn dimension(&self) -> usize {
        match self {
            Embedder::Mock(model) => model.dimension(),
            Embedder::Ollama(model) => model.dimension(),
        }
    }
}

/// Generative backend, or none
pub enum Advisor {
    /// Completion through Ollama
    Ollama(OllamaAdvisor),
    /// Generative stage skipped
    Disabled,
}

impl Advisor {
    /// Build the configured advisor
    pub fn from_config(config: &AppConfig) -> Self {
        if !config.ollama.advisor_enabled {
            return Advisor::Disabled;
        }
        Advisor::Ollama(
            OllamaAdvisor::new(config.ollama.endpoint.clone(), config.ollama.chat_model.clone())
                .with_timeout(config.classifier.advisor_timeout())
                .with_max_retries(config.ollama.max_retries),
        )
    }
}

impl GenerativeAdvisor for Advisor {
    type Error = BackendError;

    fn complete(&self, prompt: &str) -> std::result::Result<String, Self::Error> {
        match self {
            Advisor::Ollama(advisor) => Ok(advisor.complete(prompt)?),
            Advisor::Disabled => Err(BackendError::Disabled),
        }
    }

    fn is_available(&self) -> bool {
        matches!(self, Advisor::Ollama(_))
    }
}

/// Open the configured exemplar store
pub fn build_store(config: &AppConfig) -> Result<AppStore> {
    let embedder = Embedder::from_config(config);
    if config.store.is_in_memory() {
        return Ok(ExemplarStore::in_memory(embedder)?);
    }

    let path = std::path::Path::new(&config.store.database_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let store = ExemplarStore::open(path, embedder)?;
    info!(
        "Opened exemplar store at {} ({} exemplars)",
        config.store.database_path,
        store.len()
    );
    Ok(store)
}

/// Assemble the extractor and the classifier around a shared store
pub fn build_pipeline(config: &AppConfig, store: Arc<AppStore>) -> AppPipeline {
    let advisor = Advisor::from_config(config);
    if !advisor.is_available() {
        warn!("Generative advisor disabled; set ollama.advisor_enabled to consult a model");
    }

    let classifier = VisualizationClassifier::new(config.classifier.clone())
        .with_store(store)
        .with_advisor(Arc::new(advisor));
    Pipeline::new(TextExtractor::new(config.extractor.clone()), classifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabviz_domain::traits::ExampleStore;
    use tabviz_domain::{ChartType, Method};

    #[test]
    fn test_default_backends_are_offline() {
        let config = AppConfig::default();
        assert!(matches!(Embedder::from_config(&config), Embedder::Mock(_)));
        assert!(!Advisor::from_config(&config).is_available());
        assert!(matches!(
            Advisor::Disabled.complete("prompt"),
            Err(BackendError::Disabled)
        ));
    }

    #[test]
    fn test_ollama_backends_selected() {
        let mut config = AppConfig::default();
        config.store.embedder = EmbedderKind::Ollama;
        config.ollama.advisor_enabled = true;

        let embedder = Embedder::from_config(&config);
        assert!(matches!(embedder, Embedder::Ollama(_)));
        assert_eq!(embedder.dimension(), 768);
        assert!(Advisor::from_config(&config).is_available());
    }

    #[test]
    fn test_file_store_created() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.store.dimension = 32;
        config.store.database_path = dir
            .path()
            .join("data")
            .join("exemplars.db")
            .to_string_lossy()
            .into_owned();

        let store = build_store(&config).unwrap();
        assert!(store.is_empty());
        assert!(store.is_available());
        assert!(dir.path().join("data").join("exemplars.db").exists());
    }

    #[tokio::test]
    async fn test_default_pipeline_processes_text() {
        let mut config = AppConfig::default();
        config.store.dimension = 32;
        let store = Arc::new(build_store(&config).unwrap());
        let pipeline = build_pipeline(&config, store);

        let output = pipeline.process("Q1: $10,000\nQ2: $12,500").await;
        assert_eq!(output.chart_type, ChartType::Line);
        assert_eq!(output.method, Method::Heuristic);
        assert_eq!(output.records.len(), 2);
    }
}
