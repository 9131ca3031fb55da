//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractorError {
    /// A numeric candidate could not be parsed; callers skip the candidate
    #[error("Unparsable number: '{0}'")]
    UnparsableNumber(String),

    /// No strategy produced a single record
    #[error("No structured data could be extracted")]
    ExtractionFailed,

    /// Text exceeds maximum length
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
