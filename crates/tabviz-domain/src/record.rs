//! Records and record sets
//!
//! A `RecordSet` is the ordered, label-unique result of extracting numeric
//! facts from one input text. Insertion order is first-seen order; a label
//! that is already present is rejected rather than overwritten.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One `(label, value)` pair extracted from text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Trimmed, non-empty label
    pub label: String,
    /// Finite numeric value
    pub value: f64,
}

impl Record {
    /// Create a record, trimming the label.
    ///
    /// Returns `None` when the trimmed label is empty or the value is not
    /// finite.
    pub fn new(label: impl AsRef<str>, value: f64) -> Option<Self> {
        let label = label.as_ref().trim();
        if label.is_empty() || !value.is_finite() {
            return None;
        }
        Some(Self {
            label: label.to_string(),
            value,
        })
    }
}

/// Ordered, label-unique sequence of records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Record>", into = "Vec<Record>")]
pub struct RecordSet {
    records: Vec<Record>,
    labels: HashSet<String>,
    /// Source column names when the records came from a table
    columns: Vec<String>,
    /// Column the labels were read from
    label_column: Option<String>,
    /// Numeric columns the values were read from
    value_columns: Vec<String>,
    /// Number of numeric columns the records were drawn from
    dimensions: usize,
    /// Distinct source rows, when several records share one row
    rows: Option<usize>,
}

impl RecordSet {
    /// Create an empty record set with one numeric dimension
    pub fn new() -> Self {
        Self {
            dimensions: 1,
            ..Self::default()
        }
    }

    /// Attach the source table's column names
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    /// Record which source columns hold the labels and the values
    pub fn with_axis_columns(
        mut self,
        label_column: Option<String>,
        value_columns: Vec<String>,
    ) -> Self {
        self.label_column = label_column;
        self.value_columns = value_columns;
        self
    }

    /// Set the number of numeric dimensions
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Set the number of distinct source rows
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Append a record unless its label is already present.
    ///
    /// Returns `true` if the record was inserted.
    pub fn push(&mut self, record: Record) -> bool {
        if self.labels.contains(&record.label) {
            return false;
        }
        self.labels.insert(record.label.clone());
        self.records.push(record);
        true
    }

    /// Whether a label is already present
    pub fn contains_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// Records in first-seen order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterate over labels in order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.label.as_str())
    }

    /// Source column names (empty unless tabular)
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Source column holding the labels, if any
    pub fn label_column(&self) -> Option<&str> {
        self.label_column.as_deref()
    }

    /// Source columns holding the values (empty unless tabular)
    pub fn value_columns(&self) -> &[String] {
        &self.value_columns
    }

    /// Number of numeric dimensions
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of distinct source rows.
    ///
    /// Equals [`len`](Self::len) unless the records were drawn from a table
    /// with several numeric columns, where each row yields one record per
    /// column. Never exceeds `len`.
    pub fn rows(&self) -> usize {
        self.rows.map_or(self.records.len(), |rows| rows.min(self.records.len()))
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the set, returning its records
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl From<Vec<Record>> for RecordSet {
    fn from(records: Vec<Record>) -> Self {
        let mut set = RecordSet::new();
        for record in records {
            set.push(record);
        }
        set
    }
}

impl From<RecordSet> for Vec<Record> {
    fn from(set: RecordSet) -> Self {
        set.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(label: &str, value: f64) -> Record {
        Record::new(label, value).unwrap()
    }

    #[test]
    fn test_record_trims_label() {
        let r = record("  Q1 ", 10.0);
        assert_eq!(r.label, "Q1");
    }

    #[test]
    fn test_record_rejects_blank_label_and_non_finite_value() {
        assert!(Record::new("   ", 1.0).is_none());
        assert!(Record::new("x", f64::NAN).is_none());
        assert!(Record::new("x", f64::INFINITY).is_none());
    }

    #[test]
    fn test_first_occurrence_wins() {
        let mut set = RecordSet::new();
        assert!(set.push(record("a", 1.0)));
        assert!(set.push(record("b", 2.0)));
        assert!(!set.push(record("a", 3.0)));

        assert_eq!(set.len(), 2);
        assert_eq!(set.records()[0], record("a", 1.0));
        assert_eq!(set.labels().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let set = RecordSet::from(vec![record("Q1", 10000.0), record("Q2", 12500.0)]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(
            json,
            r#"[{"label":"Q1","value":10000.0},{"label":"Q2","value":12500.0}]"#
        );

        let back: RecordSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 2);
        assert!(back.contains_label("Q2"));
    }

    #[test]
    fn test_axis_columns() {
        let set = RecordSet::new()
            .with_axis_columns(Some("month".to_string()), vec!["sales".to_string()]);
        assert_eq!(set.label_column(), Some("month"));
        assert_eq!(set.value_columns(), ["sales".to_string()]);
        assert_eq!(RecordSet::new().label_column(), None);
    }

    #[test]
    fn test_new_set_has_one_dimension() {
        assert_eq!(RecordSet::new().dimensions(), 1);
        assert_eq!(RecordSet::new().with_dimensions(3).dimensions(), 3);
    }

    #[test]
    fn test_rows_default_to_record_count() {
        let set = RecordSet::from(vec![record("a", 1.0), record("b", 2.0)]);
        assert_eq!(set.rows(), 2);

        let set = RecordSet::from(vec![
            record("Alice/math", 90.0),
            record("Alice/art", 70.0),
            record("Bob/math", 85.0),
            record("Bob/art", 65.0),
        ])
        .with_rows(2);
        assert_eq!(set.rows(), 2);
        assert_eq!(set.len(), 4);

        assert_eq!(RecordSet::new().with_rows(3).rows(), 0);
    }

    proptest! {
        #[test]
        fn prop_labels_stay_distinct_and_ordered(labels in proptest::collection::vec("[a-c]{1,2}", 0..40)) {
            let mut set = RecordSet::new();
            let mut expected: Vec<String> = Vec::new();
            for (i, label) in labels.iter().enumerate() {
                set.push(record(label, i as f64));
                if !expected.contains(label) {
                    expected.push(label.clone());
                }
            }
            let got: Vec<String> = set.labels().map(str::to_string).collect();
            prop_assert_eq!(got, expected);
        }
    }
}
