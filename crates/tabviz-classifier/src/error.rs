//! Stage failures of the classification cascade
//!
//! None of these reach the caller of the classifier: each one makes the
//! cascade fall through to the next stage.

use thiserror::Error;

/// Why a cascade stage did not produce a confident result
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StageError {
    /// Nothing to classify
    #[error("Record set is empty")]
    EmptyRecordSet,

    /// The heuristic match is too weak to stop the cascade
    #[error("Heuristic match is weak")]
    WeakHeuristic,

    /// Store not configured, unreachable, timed out, or no neighbour found
    #[error("Retrieval unavailable: {0}")]
    RetrievalUnavailable(String),

    /// Advisor not configured, unreachable or timed out
    #[error("Generative advisor unavailable: {0}")]
    AdvisorUnavailable(String),

    /// Advisor reply was not JSON or missed required fields
    #[error("Malformed generative response: {0}")]
    GenerativeMalformedResponse(String),
}
