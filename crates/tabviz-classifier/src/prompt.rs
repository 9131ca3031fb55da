//! Prompt construction for the generative stage

use tabviz_domain::{ChartType, RecordSet};

/// Builds the chart-choice prompt for the generative advisor
pub struct PromptBuilder {
    records_json: String,
    columns: Vec<String>,
    guideline: Option<String>,
}

impl PromptBuilder {
    /// Create a prompt builder for a record set
    pub fn new(records: &RecordSet) -> Self {
        Self {
            records_json: serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string()),
            columns: records.columns().to_vec(),
            guideline: None,
        }
    }

    /// Include retrieved guideline text
    pub fn with_guideline(mut self, guideline: Option<String>) -> Self {
        self.guideline = guideline;
        self
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(CLASSIFICATION_INSTRUCTIONS);
        prompt.push_str("\n\nAllowed chart types: ");
        let allowed: Vec<&str> = ChartType::ALL
            .iter()
            .filter(|t| **t != ChartType::Unknown)
            .map(ChartType::as_str)
            .collect();
        prompt.push_str(&allowed.join(", "));
        prompt.push_str("\n\n");

        if let Some(guideline) = &self.guideline {
            prompt.push_str("Guideline:\n");
            prompt.push_str(guideline.trim());
            prompt.push_str("\n\n");
        }

        if !self.columns.is_empty() {
            prompt.push_str(&format!("Source columns: {}\n\n", self.columns.join(", ")));
        }

        prompt.push_str("Records:\n");
        prompt.push_str(&self.records_json);
        prompt.push_str("\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);
        prompt
    }
}

const CLASSIFICATION_INSTRUCTIONS: &str = "You choose the chart type that best presents a set of labeled numeric records.
Pick exactly one chart type. Name the column (or the word 'label' / 'value') to use for each axis.";

const OUTPUT_FORMAT_REMINDER: &str = r#"Respond with ONLY a JSON object of this shape, no commentary:
{"chartType": "<chart type>", "xColumn": "<column>", "yColumn": "<column>"}"#;
