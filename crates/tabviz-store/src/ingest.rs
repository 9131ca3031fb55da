//! Exemplar ingestion and exchange
//!
//! - [`ingest_csv`]: one exemplar per row of a labeled dataset
//! - [`export_jsonl`] / [`import_jsonl`]: the persisted exemplar schema,
//!   one JSON object per line

use crate::{ExemplarStore, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt::Display;
use std::io::{BufRead, Read, Write};
use tabviz_domain::traits::EmbeddingModel;
use tabviz_domain::{ChartType, Exemplar, ExemplarMetadata};
use tracing::{info, warn};

/// Column holding the chart decision in an exemplar dataset
pub const CHART_TYPE_COLUMN: &str = "chart_type";

/// Counts from an ingestion or import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Entries stored
    pub ingested: usize,
    /// Entries skipped with a warning
    pub rejected: usize,
}

/// One line of the JSON-lines exchange format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedExemplar {
    /// Exemplar id
    pub id: String,
    /// JSON-serialized table
    pub document: String,
    /// Embedding of `document`
    pub embedding: Vec<f32>,
    /// Chart decision
    pub metadata: ExemplarMetadata,
}

impl From<Exemplar> for PersistedExemplar {
    fn from(exemplar: Exemplar) -> Self {
        Self {
            id: exemplar.id,
            document: exemplar.document,
            embedding: exemplar.embedding,
            metadata: exemplar.metadata,
        }
    }
}

impl From<PersistedExemplar> for Exemplar {
    fn from(persisted: PersistedExemplar) -> Self {
        Self {
            id: persisted.id,
            document: persisted.document,
            metadata: persisted.metadata,
            embedding: persisted.embedding,
        }
    }
}

/// Pick axis columns for a one-row table: the first non-numeric column as
/// x, the first numeric column as y.
///
/// On tables with several numeric columns the y choice is arbitrary; it is
/// kept because stored exemplars were labeled this way. Returns `None` when
/// either kind of column is missing.
pub fn infer_axes(row: &Map<String, Value>) -> Option<(String, String)> {
    let x = row.iter().find(|(_, v)| v.is_string()).map(|(k, _)| k.clone())?;
    let y = row.iter().find(|(_, v)| v.is_number()).map(|(k, _)| k.clone())?;
    Some((x, y))
}

/// Type a CSV cell: integers and finite floats become numbers, blanks null
fn cell_value(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Number(n.into());
    }
    match raw.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => Value::Number(n),
        None => Value::String(raw.to_string()),
    }
}

/// Ingest a labeled dataset
///
/// The CSV must have a `chart_type` column (`bar` or `line`). Every other
/// column of a row forms a one-row table `[{...}]`, stored as exemplar
/// `ex_{row_index}`. Rows with an invalid chart type or without both a
/// text and a numeric column are skipped with a warning.
pub fn ingest_csv<E, R>(store: &ExemplarStore<E>, reader: R) -> Result<IngestReport, StoreError>
where
    E: EmbeddingModel,
    E::Error: Display,
    R: Read,
{
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv.headers()?.clone();
    let chart_column = headers
        .iter()
        .position(|h| h == CHART_TYPE_COLUMN)
        .ok_or_else(|| {
            StoreError::InvalidData(format!("dataset has no '{}' column", CHART_TYPE_COLUMN))
        })?;

    let mut report = IngestReport::default();
    for (i, row) in csv.records().enumerate() {
        let row = row?;
        let id = format!("ex_{}", i);

        let raw_type = row.get(chart_column).unwrap_or_default();
        let Some(chart_type) = ChartType::parse(raw_type).filter(ChartType::is_exemplar_type) else {
            warn!("Skipping row {}: chart type '{}' is not bar or line", i, raw_type);
            report.rejected += 1;
            continue;
        };

        let table: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .enumerate()
            .filter(|(column, _)| *column != chart_column)
            .map(|(_, (header, cell))| (header.to_string(), cell_value(cell)))
            .collect();

        let Some((x_column, y_column)) = infer_axes(&table) else {
            warn!("Skipping row {}: needs both a text and a numeric column", i);
            report.rejected += 1;
            continue;
        };

        let document = serde_json::to_string(&[&table])?;
        let metadata = ExemplarMetadata {
            chart_type,
            x_column,
            y_column,
        };
        store.add_document(id, document, metadata)?;
        report.ingested += 1;
    }

    info!(
        "Ingested {} exemplars ({} rows rejected)",
        report.ingested, report.rejected
    );
    Ok(report)
}

/// Write every exemplar as one JSON line. Returns the number written.
pub fn export_jsonl<E, W>(store: &ExemplarStore<E>, mut writer: W) -> Result<usize, StoreError>
where
    E: EmbeddingModel,
    E::Error: Display,
    W: Write,
{
    let exemplars = store.exemplars()?;
    let count = exemplars.len();

    for exemplar in exemplars {
        serde_json::to_writer(&mut writer, &PersistedExemplar::from(exemplar))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    info!("Exported {} exemplars", count);
    Ok(count)
}

/// Load exemplars from JSON lines
///
/// Blank lines are ignored. A line that is not valid JSON aborts the
/// import; entries the store refuses (duplicate id, wrong dimension,
/// unsupported chart type) are skipped with a warning.
pub fn import_jsonl<E, R>(store: &ExemplarStore<E>, reader: R) -> Result<IngestReport, StoreError>
where
    E: EmbeddingModel,
    E::Error: Display,
    R: BufRead,
{
    let mut report = IngestReport::default();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let persisted: PersistedExemplar = serde_json::from_str(&line).map_err(|e| {
            StoreError::InvalidData(format!("line {}: {}", number + 1, e))
        })?;

        match store.add_exemplar(&persisted.into()) {
            Ok(()) => report.ingested += 1,
            Err(e @ (StoreError::Duplicate(_) | StoreError::Index(_) | StoreError::InvalidData(_))) => {
                warn!("Skipping line {}: {}", number + 1, e);
                report.rejected += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "Imported {} exemplars ({} skipped)",
        report.ingested, report.rejected
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_infer_axes() {
        let row = as_map(json!({"product": "A", "month": "Jan", "units": 10, "price": 2.5}));
        assert_eq!(infer_axes(&row), Some(("product".to_string(), "units".to_string())));
    }

    #[test]
    fn test_infer_axes_needs_both_kinds() {
        assert_eq!(infer_axes(&as_map(json!({"a": 1, "b": 2}))), None);
        assert_eq!(infer_axes(&as_map(json!({"a": "x", "b": null}))), None);
    }

    #[test]
    fn test_cell_value() {
        assert_eq!(cell_value("42"), json!(42));
        assert_eq!(cell_value(" 2.5 "), json!(2.5));
        assert_eq!(cell_value("Jan"), json!("Jan"));
        assert_eq!(cell_value(""), Value::Null);
        assert_eq!(cell_value("NaN"), json!("NaN"));
    }
}
