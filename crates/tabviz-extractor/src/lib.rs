//! Tabviz Extractor
//!
//! Turns free-form text describing numeric facts into a [`RecordSet`].
//!
//! # Overview
//!
//! Extraction runs an ordered list of strategies and stops at the first one
//! that yields at least one record:
//!
//! ```text
//! text → tabular (CSV / TSV / JSON table)
//!      → key-value lines ("Q1: $10,000", "Cost - 12")
//!      → windowed numbers ("sold 100 units")
//!      → ExtractionFailed
//! ```
//!
//! Every candidate goes through the number normalizer and the record set
//! builder, so the result always has distinct labels in first-seen order.
//!
//! # Example Usage
//!
//! ```
//! use tabviz_extractor::{TextExtractor, ExtractorConfig};
//!
//! let extractor = TextExtractor::new(ExtractorConfig::default());
//! let extraction = extractor.extract("Q1: $10,000\nQ2: $12,500").unwrap();
//!
//! let labels: Vec<_> = extraction.records.labels().collect();
//! assert_eq!(labels, vec!["Q1", "Q2"]);
//! ```
//!
//! [`RecordSet`]: tabviz_domain::RecordSet

#![warn(missing_docs)]

mod error;
mod config;
mod number;
mod table;
mod patterns;
mod builder;
mod extractor;

#[cfg(test)]
mod tests;

pub use error::ExtractorError;
pub use config::ExtractorConfig;
pub use number::normalize_number;
pub use builder::RecordSetBuilder;
pub use extractor::{Extraction, Strategy, TextExtractor};
