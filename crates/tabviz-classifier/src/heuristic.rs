//! Shape rules over a record set
//!
//! Rules are tried in priority order; the first match decides. Counts are
//! source rows: a table row with several numeric columns is one row.
//!
//! | Rule | Condition | Chart | Confidence |
//! |---|---|---|---|
//! | a | a label or column name is a time token | `line` | strong |
//! | b | one numeric dimension, 2 to 10 rows | `bar` | strong |
//! | c | several numeric dimensions, at most 5 rows | `radar` | moderate |
//! | d | 11 to 20 rows | `pie` | moderate |
//! | e | more than 20 rows / more than 3 dimensions | `3d_bar` / `3d_scatter` | moderate |
//! | f | anything else, including a single record | `bar` | weak |

use std::collections::HashSet;
use std::sync::LazyLock;
use tabviz_domain::{ChartType, ClassificationResult, Method, RecordSet};

/// How much a heuristic decision can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Confidence {
    /// Fallback rule; later stages may do better
    Weak,
    /// Shape-based guess
    Moderate,
    /// Time series or a small single-series table
    Strong,
}

/// Heuristic result with its confidence
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicDecision {
    /// Chart decision, always tagged `heuristic`
    pub result: ClassificationResult,
    /// Strength of the matching rule
    pub confidence: Confidence,
}

static TIME_TOKENS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "q1", "q2", "q3", "q4",
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
        "january", "february", "march", "april", "june", "july", "august", "september",
        "october", "november", "december",
        "year", "years", "month", "months", "quarter", "quarters",
        "day", "days", "week", "weeks", "hour", "hours",
    ]
    .into_iter()
    .collect()
});

/// Whether any label or column name contains a whole-word time token
pub fn has_time_indicator(records: &RecordSet) -> bool {
    records
        .labels()
        .chain(records.columns().iter().map(String::as_str))
        .flat_map(|text| text.split(|c: char| !c.is_alphanumeric()))
        .any(|word| !word.is_empty() && TIME_TOKENS.contains(word.to_lowercase().as_str()))
}

/// Axis suggestion for tabular input with a label column and one value column
fn axes(records: &RecordSet) -> (Option<String>, Option<String>) {
    match (records.label_column(), records.value_columns()) {
        (Some(label), [value]) => (Some(label.to_string()), Some(value.clone())),
        _ => (None, None),
    }
}

/// Apply the shape rules
pub fn classify(records: &RecordSet) -> HeuristicDecision {
    let rows = records.rows();
    let dimensions = records.dimensions();

    let (chart_type, confidence) = if has_time_indicator(records) {
        (ChartType::Line, Confidence::Strong)
    } else if dimensions == 1 && (2..=10).contains(&rows) {
        (ChartType::Bar, Confidence::Strong)
    } else if dimensions > 1 && rows <= 5 {
        (ChartType::Radar, Confidence::Moderate)
    } else if (11..=20).contains(&rows) {
        (ChartType::Pie, Confidence::Moderate)
    } else if rows > 20 {
        (ChartType::Bar3d, Confidence::Moderate)
    } else if dimensions > 3 {
        (ChartType::Scatter3d, Confidence::Moderate)
    } else {
        (ChartType::Bar, Confidence::Weak)
    };

    let (x_column, y_column) = axes(records);
    HeuristicDecision {
        result: ClassificationResult::new(chart_type, Method::Heuristic).with_axes(x_column, y_column),
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabviz_domain::Record;

    fn set(labels: &[&str]) -> RecordSet {
        labels
            .iter()
            .enumerate()
            .filter_map(|(i, label)| Record::new(label, i as f64))
            .collect::<Vec<_>>()
            .into()
    }

    fn numbered(n: usize) -> RecordSet {
        let labels: Vec<String> = (0..n).map(|i| format!("item{}", i)).collect();
        let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        set(&refs)
    }

    #[test]
    fn test_quarters_are_time_series() {
        let decision = classify(&set(&["Q1", "Q2"]));
        assert_eq!(decision.result.chart_type, ChartType::Line);
        assert_eq!(decision.result.method, Method::Heuristic);
        assert_eq!(decision.confidence, Confidence::Strong);
    }

    #[test]
    fn test_time_column_name() {
        let records = set(&["Jan", "Feb"])
            .with_columns(vec!["Month".to_string(), "Sales".to_string()])
            .with_axis_columns(Some("Month".to_string()), vec!["Sales".to_string()]);
        let decision = classify(&records);

        assert_eq!(decision.result.chart_type, ChartType::Line);
        assert_eq!(decision.result.x_column.as_deref(), Some("Month"));
        assert_eq!(decision.result.y_column.as_deref(), Some("Sales"));
    }

    #[test]
    fn test_time_tokens_match_whole_words_only() {
        assert!(has_time_indicator(&set(&["sales per day"])));
        assert!(has_time_indicator(&set(&["2023-year"])));
        assert!(has_time_indicator(&set(&["September"])));
        assert!(!has_time_indicator(&set(&["Sq1ft"])));
        assert!(!has_time_indicator(&set(&["daylight"])));
    }

    #[test]
    fn test_small_series_is_strong_bar() {
        let decision = classify(&set(&["apples", "pears", "plums"]));
        assert_eq!(decision.result.chart_type, ChartType::Bar);
        assert_eq!(decision.confidence, Confidence::Strong);
        assert_eq!(decision.result.x_column, None);
    }

    #[test]
    fn test_single_record_is_weak() {
        let decision = classify(&set(&["widgets"]));
        assert_eq!(decision.result.chart_type, ChartType::Bar);
        assert_eq!(decision.confidence, Confidence::Weak);
    }

    #[test]
    fn test_multi_dimensional_small_set_is_radar() {
        let records = set(&["A/x", "A/y", "B/x", "B/y"]).with_dimensions(2);
        let decision = classify(&records);
        assert_eq!(decision.result.chart_type, ChartType::Radar);
        assert_eq!(decision.confidence, Confidence::Moderate);
    }

    #[test]
    fn test_composed_labels_count_source_rows() {
        // 2 rows x 3 scores
        let records = set(&[
            "Alice/math", "Alice/science", "Alice/art",
            "Bob/math", "Bob/science", "Bob/art",
        ])
        .with_dimensions(3)
        .with_rows(2);
        let decision = classify(&records);
        assert_eq!(decision.result.chart_type, ChartType::Radar);
        assert_eq!(decision.confidence, Confidence::Moderate);
    }

    #[test]
    fn test_wide_table_is_3d_scatter() {
        // 8 rows x 4 columns
        let records = numbered(32).with_dimensions(4).with_rows(8);
        assert_eq!(classify(&records).result.chart_type, ChartType::Scatter3d);
    }

    #[test]
    fn test_label_count_rules() {
        assert_eq!(classify(&numbered(15)).result.chart_type, ChartType::Pie);
        assert_eq!(classify(&numbered(21)).result.chart_type, ChartType::Bar3d);
    }

    #[test]
    fn test_many_dimensions_is_3d_scatter() {
        let records = numbered(8).with_dimensions(4);
        let decision = classify(&records);
        assert_eq!(decision.result.chart_type, ChartType::Scatter3d);
    }

    #[test]
    fn test_fallback_rule() {
        // Two dimensions, 6 to 10 rows: no shape rule matches
        let records = numbered(8).with_dimensions(2);
        let decision = classify(&records);
        assert_eq!(decision.result.chart_type, ChartType::Bar);
        assert_eq!(decision.confidence, Confidence::Weak);
    }
}
