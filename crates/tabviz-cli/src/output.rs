//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Columns, object::Rows, Alignment, Modify, Style},
};
use tabviz_domain::{ExtractionFormat, VisualizationOutput};
use tabviz_store::IngestReport;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the result of one analysis.
    pub fn format_output(&self, output: &VisualizationOutput) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(output)?),
            OutputFormat::Table => Ok(self.format_output_table(output)),
            OutputFormat::Quiet => Ok(output.chart_type.to_string()),
        }
    }

    fn format_output_table(&self, output: &VisualizationOutput) -> String {
        if let Some(message) = &output.message {
            return self.warning(message);
        }

        let mut lines = vec![format!(
            "{} {} (via {}, {} extraction)",
            self.colorize("Chart:", "cyan"),
            output.chart_type,
            output.method,
            format_name(output.format)
        )];
        if output.x_column.is_some() || output.y_column.is_some() {
            lines.push(format!(
                "{} x = {}, y = {}",
                self.colorize("Axes:", "cyan"),
                output.x_column.as_deref().unwrap_or("-"),
                output.y_column.as_deref().unwrap_or("-")
            ));
        }

        let mut builder = Builder::default();
        builder.push_record(["Label", "Value"]);
        for record in &output.records {
            builder.push_record([record.label.clone(), record.value.to_string()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .with(Modify::new(Columns::last()).with(Alignment::right()));
        lines.push(table.to_string());

        lines.join("\n")
    }

    /// Format an ingestion or import summary.
    pub fn format_report(&self, operation: &str, report: &IngestReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "ingested": report.ingested,
                "rejected": report.rejected,
            }))?),
            OutputFormat::Quiet => Ok(report.ingested.to_string()),
            OutputFormat::Table => {
                let mut message = self.success(&format!("{} {} exemplar(s)", operation, report.ingested));
                if report.rejected > 0 {
                    message.push('\n');
                    message.push_str(&self.warning(&format!("Skipped {} entries", report.rejected)));
                }
                Ok(message)
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn format_name(format: ExtractionFormat) -> &'static str {
    match format {
        ExtractionFormat::Tabular => "tabular",
        ExtractionFormat::KeyValue => "key-value",
        ExtractionFormat::NumericalExtraction => "numerical",
        ExtractionFormat::None => "no",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabviz_domain::{ChartType, ClassificationResult, Method, Record, RecordSet};

    fn sample_output() -> VisualizationOutput {
        let records = RecordSet::from(vec![
            Record::new("Q1", 10_000.0).unwrap(),
            Record::new("Q2", 12_500.0).unwrap(),
        ]);
        let result = ClassificationResult::new(ChartType::Line, Method::Heuristic);
        VisualizationOutput::new(records, ExtractionFormat::KeyValue, result)
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_output(&sample_output()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["chartType"], "line");
        assert_eq!(value["records"][1]["label"], "Q2");
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(formatter.format_output(&sample_output()).unwrap(), "line");
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_output(&sample_output()).unwrap();
        assert!(output.contains("Chart: line (via heuristic, key-value extraction)"));
        assert!(output.contains("Label"));
        assert!(output.contains("12500"));
        assert!(!output.contains("Axes:"));
    }

    #[test]
    fn test_placeholder_shows_message() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_output(&VisualizationOutput::no_structured_data("nothing found"))
            .unwrap();
        assert_eq!(output, "⚠ nothing found");
    }

    #[test]
    fn test_report_format() {
        let report = IngestReport {
            ingested: 3,
            rejected: 1,
        };
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_report("Ingested", &report).unwrap();
        assert!(output.contains("✓ Ingested 3 exemplar(s)"));
        assert!(output.contains("Skipped 1"));

        let quiet = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(quiet.format_report("Ingested", &report).unwrap(), "3");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.error("test"), "✗ test");
    }
}
