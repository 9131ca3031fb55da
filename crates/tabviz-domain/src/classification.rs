//! Classification results and the renderer-facing output contract

use crate::chart::{ChartType, Method};
use crate::record::{Record, RecordSet};
use serde::{Deserialize, Serialize};

/// Outcome of the visualization cascade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    /// Chosen chart type
    pub chart_type: ChartType,
    /// Suggested x-axis column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_column: Option<String>,
    /// Suggested y-axis column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_column: Option<String>,
    /// Stage that produced this result
    pub method: Method,
}

impl ClassificationResult {
    /// Result without axis suggestions
    pub fn new(chart_type: ChartType, method: Method) -> Self {
        Self {
            chart_type,
            x_column: None,
            y_column: None,
            method,
        }
    }

    /// Attach axis suggestions
    pub fn with_axes(mut self, x_column: Option<String>, y_column: Option<String>) -> Self {
        self.x_column = x_column;
        self.y_column = y_column;
        self
    }

    /// Terminal fallback: `bar` via `default`
    pub fn fallback() -> Self {
        Self::new(ChartType::Bar, Method::Default)
    }

    /// Result for an empty record set: `unknown` via `default`
    pub fn unknown() -> Self {
        Self::new(ChartType::Unknown, Method::Default)
    }
}

/// Extraction strategy that produced the records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionFormat {
    /// CSV/TSV or JSON table
    Tabular,
    /// `label: value` lines
    KeyValue,
    /// Numbers with surrounding context words
    NumericalExtraction,
    /// Nothing extracted
    None,
}

/// Everything handed to a renderer for one input text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationOutput {
    /// Extracted records in first-seen order
    pub records: Vec<Record>,
    /// Chosen chart type
    pub chart_type: ChartType,
    /// Suggested x-axis column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_column: Option<String>,
    /// Suggested y-axis column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_column: Option<String>,
    /// Stage that produced the chart type
    pub method: Method,
    /// Extraction strategy that produced the records
    pub format: ExtractionFormat,
    /// Human-readable note when no structured data was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl VisualizationOutput {
    /// Combine extracted records with their classification
    pub fn new(records: RecordSet, format: ExtractionFormat, result: ClassificationResult) -> Self {
        Self {
            records: records.into_records(),
            chart_type: result.chart_type,
            x_column: result.x_column,
            y_column: result.y_column,
            method: result.method,
            format,
            message: None,
        }
    }

    /// Best-effort placeholder for input with no structured data
    pub fn no_structured_data(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new(RecordSet::new(), ExtractionFormat::None, ClassificationResult::unknown())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_json_shape() {
        let records = RecordSet::from(vec![Record::new("Jan", 100.0).unwrap()]);
        let result = ClassificationResult::new(ChartType::Line, Method::Heuristic)
            .with_axes(Some("month".into()), Some("sales".into()));
        let output = VisualizationOutput::new(records, ExtractionFormat::Tabular, result);

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["chartType"], "line");
        assert_eq!(json["method"], "heuristic");
        assert_eq!(json["xColumn"], "month");
        assert_eq!(json["format"], "tabular");
        assert_eq!(json["records"][0]["label"], "Jan");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_placeholder_output() {
        let output = VisualizationOutput::no_structured_data("nothing here");
        assert!(output.records.is_empty());
        assert_eq!(output.chart_type, ChartType::Unknown);
        assert_eq!(output.method, Method::Default);
        assert_eq!(output.format, ExtractionFormat::None);
        assert_eq!(output.message.as_deref(), Some("nothing here"));
    }
}
