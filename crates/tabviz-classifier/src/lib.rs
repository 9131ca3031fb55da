//! Tabviz Classifier
//!
//! Decides which chart type best presents an extracted record set.
//!
//! # Overview
//!
//! The classifier is a fixed cascade of named stages. Each stage returns a
//! tagged [`StageOutcome`]: a confident result stops the cascade, a
//! fall-through passes control to the next stage.
//!
//! ```text
//! heuristic   shape rules (time tokens, row count, dimensions)
//!     │ weak match
//! retrieval   nearest stored exemplar via ExampleStore
//!     │ unavailable / not found
//! generative  GenerativeAdvisor reply {chartType, xColumn, yColumn}
//!     │ unavailable / malformed
//! default     bar
//! ```
//!
//! Store and advisor calls are blocking; each runs on the blocking pool
//! under a timeout. Failures are logged and never reach the caller.
//!
//! [`Pipeline`] puts the text extractor in front of the classifier and
//! produces the renderer-facing `VisualizationOutput`.

#![warn(missing_docs)]

mod config;
mod error;
mod stage;
pub mod heuristic;
mod prompt;
mod reply;
mod classifier;
mod pipeline;


pub use config::ClassifierConfig;
pub use error::StageError;
pub use stage::{Stage, StageOutcome};
pub use heuristic::{Confidence, HeuristicDecision};
pub use prompt::PromptBuilder;
pub use reply::parse_reply;
pub use classifier::VisualizationClassifier;
pub use pipeline::{text_too_long_message, Pipeline, NO_DATA_MESSAGE};
