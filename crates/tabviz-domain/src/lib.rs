//! Tabviz Domain Layer
//!
//! Core data model and collaborator interfaces for turning free-form numeric
//! text into chart-ready records. Every other crate in the workspace depends
//! on this one; it depends on nothing but `serde`.
//!
//! ## Key Concepts
//!
//! - **Record**: one `(label, value)` pair pulled out of the input text
//! - **RecordSet**: ordered, label-unique sequence of records for one input
//! - **ChartType / Method**: the classifier's answer and which stage produced it
//! - **Exemplar**: a stored, labeled example table used for retrieval
//! - **Collaborators**: `ExampleStore`, `GenerativeAdvisor` and
//!   `EmbeddingModel` traits implemented by the infrastructure crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chart;
pub mod classification;
pub mod exemplar;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use chart::{ChartType, Method};
pub use classification::{ClassificationResult, ExtractionFormat, VisualizationOutput};
pub use exemplar::{Exemplar, ExemplarMetadata, Neighbor};
pub use record::{Record, RecordSet};
pub use traits::Disconnected;
