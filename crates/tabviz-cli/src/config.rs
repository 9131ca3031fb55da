//! Configuration management for the CLI.
//!
//! One TOML file holds every section. Each section has defaults, so a
//! missing file or a partial one still yields a working offline setup:
//! mock embedder, in-memory store, no generative advisor.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tabviz_classifier::ClassifierConfig;
use tabviz_extractor::ExtractorConfig;

/// Database path that selects an in-memory store
pub const IN_MEMORY: &str = ":memory:";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Text extraction limits
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Cascade timeouts and escalation
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Exemplar store backend
    #[serde(default)]
    pub store: StoreSettings,

    /// Ollama endpoint and models
    #[serde(default)]
    pub ollama: OllamaSettings,

    /// HTTP surface
    #[serde(default)]
    pub server: ServerSettings,

    /// Terminal output
    #[serde(default)]
    pub output: OutputSettings,
}

/// Exemplar store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// SQLite file, or `:memory:`
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Embedding dimension
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Embedding backend
    #[serde(default)]
    pub embedder: EmbedderKind,
}

/// Embedding backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// Deterministic hash embeddings, no network
    #[default]
    Mock,
    /// Embeddings from the Ollama `embed_model`
    Ollama,
}

/// Ollama settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OllamaSettings {
    /// Base URL of the Ollama server
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model answering the generative stage
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Model producing embeddings when `store.embedder = "ollama"`
    #[serde(default = "default_embed_model")]
    pub embed_model: String,

    /// Consult `chat_model` when retrieval finds nothing
    #[serde(default)]
    pub advisor_enabled: bool,

    /// Attempts per HTTP request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Address to bind
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port to bind
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,
}

/// Terminal output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (chart type only)
    Quiet,
}

impl AppConfig {
    /// Resolve the configuration file path.
    ///
    /// An explicit path wins; otherwise `~/.tabviz/config.toml`.
    pub fn path(explicit: Option<&str>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".tabviz").join("config.toml"))
    }

    /// Load configuration from `path`, or defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: AppConfig = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate().map_err(CliError::Config)?;
        self.classifier.validate().map_err(CliError::Config)?;
        if self.store.dimension == 0 {
            return Err(CliError::Config("store.dimension must be greater than 0".into()));
        }
        if self.store.database_path.trim().is_empty() {
            return Err(CliError::Config("store.database_path must not be empty".into()));
        }
        Ok(())
    }

    /// Address for the HTTP server.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.bind_port)
    }
}

impl StoreSettings {
    /// Whether the store lives only for this process
    pub fn is_in_memory(&self) -> bool {
        self.database_path == IN_MEMORY
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            dimension: default_dimension(),
            embedder: EmbedderKind::default(),
        }
    }
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            chat_model: default_chat_model(),
            embed_model: default_embed_model(),
            advisor_enabled: false,
            max_retries: default_max_retries(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_database_path() -> String {
    IN_MEMORY.to_string()
}

fn default_dimension() -> usize {
    768
}

fn default_endpoint() -> String {
    tabviz_llm::ollama::DEFAULT_ENDPOINT.to_string()
}

fn default_chat_model() -> String {
    "llama3.1".to_string()
}

fn default_embed_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_max_retries() -> u32 {
    tabviz_llm::ollama::DEFAULT_MAX_RETRIES
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
