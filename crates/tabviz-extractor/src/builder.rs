//! Record set construction

use tabviz_domain::{Record, RecordSet};
use tracing::{debug, warn};

/// Accumulates `(label, value)` candidates into a [`RecordSet`].
///
/// Labels are trimmed; blank labels and non-finite values are rejected;
/// a label seen before is dropped silently (first occurrence wins).
#[derive(Debug)]
pub struct RecordSetBuilder {
    set: RecordSet,
    max_records: usize,
    duplicates: usize,
    rejected: usize,
    over_limit: usize,
}

impl RecordSetBuilder {
    /// Create a builder that keeps at most `max_records` records
    pub fn new(max_records: usize) -> Self {
        Self {
            set: RecordSet::new(),
            max_records,
            duplicates: 0,
            rejected: 0,
            over_limit: 0,
        }
    }

    /// Record the source table's column names
    pub fn columns(mut self, columns: Vec<String>) -> Self {
        self.set = self.set.with_columns(columns);
        self
    }

    /// Record the label and value columns
    pub fn axis_columns(mut self, label_column: Option<String>, value_columns: Vec<String>) -> Self {
        self.set = self.set.with_axis_columns(label_column, value_columns);
        self
    }

    /// Record the number of numeric dimensions
    pub fn dimensions(mut self, dimensions: usize) -> Self {
        self.set = self.set.with_dimensions(dimensions);
        self
    }

    /// Record the number of source rows behind the candidates
    pub fn rows(mut self, rows: usize) -> Self {
        self.set = self.set.with_rows(rows);
        self
    }

    /// Offer a candidate. Returns `true` if it became a record.
    pub fn add(&mut self, label: &str, value: f64) -> bool {
        let Some(record) = Record::new(label, value) else {
            self.rejected += 1;
            return false;
        };

        if self.set.contains_label(&record.label) {
            self.duplicates += 1;
            return false;
        }

        if self.set.len() >= self.max_records {
            self.over_limit += 1;
            return false;
        }

        self.set.push(record)
    }

    /// Offer every candidate in order
    pub fn extend<I>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        for (label, value) in candidates {
            self.add(&label, value);
        }
    }

    /// Number of records accepted so far
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Whether no record has been accepted
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Finish and return the record set
    pub fn build(self) -> RecordSet {
        if self.over_limit > 0 {
            warn!(
                "Record limit {} reached, dropped {} further records",
                self.max_records, self.over_limit
            );
        }
        debug!(
            "Built record set: {} records, {} duplicates dropped, {} rejected",
            self.set.len(),
            self.duplicates,
            self.rejected
        );
        self.set
    }
}
