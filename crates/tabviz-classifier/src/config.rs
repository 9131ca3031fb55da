//! Configuration for the VisualizationClassifier

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the classification cascade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Maximum time for one example store call (seconds)
    pub store_timeout_secs: u64,

    /// Maximum time for one generative advisor call (seconds)
    pub advisor_timeout_secs: u64,

    /// Allow one extra attempt per external call
    pub retry_external_calls: bool,

    /// Nearest exemplars below this similarity count as not found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_similarity: Option<f32>,

    /// Consult the store and the advisor when the heuristic match is weak
    pub escalate_weak: bool,
}

impl ClassifierConfig {
    /// Store call timeout as a Duration
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    /// Advisor call timeout as a Duration
    pub fn advisor_timeout(&self) -> Duration {
        Duration::from_secs(self.advisor_timeout_secs)
    }

    /// Attempts per external call
    pub fn attempts(&self) -> usize {
        if self.retry_external_calls {
            2
        } else {
            1
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.store_timeout_secs == 0 {
            return Err("store_timeout_secs must be greater than 0".to_string());
        }
        if self.advisor_timeout_secs == 0 {
            return Err("advisor_timeout_secs must be greater than 0".to_string());
        }
        if let Some(min) = self.min_similarity {
            if !(-1.0..=1.0).contains(&min) {
                return Err("min_similarity must be between -1.0 and 1.0".to_string());
            }
        }
        Ok(())
    }

    /// Aggressive preset: short timeouts, only close exemplars are trusted
    pub fn aggressive() -> Self {
        Self {
            store_timeout_secs: 2,
            advisor_timeout_secs: 10,
            retry_external_calls: false,
            min_similarity: Some(0.8),
            escalate_weak: true,
        }
    }

    /// Lenient preset: long timeouts with one retry per external call
    pub fn lenient() -> Self {
        Self {
            store_timeout_secs: 15,
            advisor_timeout_secs: 120,
            retry_external_calls: true,
            min_similarity: None,
            escalate_weak: true,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            store_timeout_secs: 5,
            advisor_timeout_secs: 30,
            retry_external_calls: false,
            min_similarity: None,
            escalate_weak: true,
        }
    }
}
