//! Stored exemplars used for retrieval-based classification

use crate::chart::ChartType;
use serde::{Deserialize, Serialize};

/// Chart decision attached to a stored exemplar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExemplarMetadata {
    /// Chart type (`bar` or `line`)
    pub chart_type: ChartType,
    /// Column used for the x axis
    pub x_column: String,
    /// Column used for the y axis
    pub y_column: String,
}

/// A labeled example table, immutable once ingested
#[derive(Debug, Clone, PartialEq)]
pub struct Exemplar {
    /// Stable identifier (e.g. `ex_12`)
    pub id: String,
    /// JSON-serialized table
    pub document: String,
    /// Chart decision for this table
    pub metadata: ExemplarMetadata,
    /// Embedding of `document`
    pub embedding: Vec<f32>,
}

/// Nearest exemplar returned by a store lookup
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    /// Exemplar identifier
    pub exemplar_id: String,
    /// The exemplar's chart decision
    pub metadata: ExemplarMetadata,
    /// Cosine similarity to the query, in `[-1, 1]`
    pub similarity: f32,
}
