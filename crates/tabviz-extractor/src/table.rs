//! Tabular input: delimited text (CSV / TSV) and JSON tables

use crate::number::normalize_number;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

/// Cell contents that mean "no value" rather than text
const MISSING_MARKERS: [&str; 8] = ["n/a", "na", "nan", "-", "--", "null", "none", "?"];

/// One parsed table cell
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || is_missing_marker(trimmed) {
            return Cell::Empty;
        }
        match normalize_number(trimmed) {
            Ok(value) => Cell::Number(value),
            Err(_) => Cell::Text(trimmed.to_string()),
        }
    }

    fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Empty,
            Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
            Value::String(s) => Cell::from_text(s),
            other => Cell::Text(other.to_string()),
        }
    }
}

/// A header row plus data rows of equal width
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// A `(label, value)` candidate produced from a table, with the table shape
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TableCandidates {
    pub candidates: Vec<(String, f64)>,
    pub dimensions: usize,
    pub rows: usize,
    pub label_column: Option<String>,
    pub value_columns: Vec<String>,
}

impl Table {
    /// Parse text as a JSON table or a delimited table with a header row
    pub fn parse(text: &str) -> Option<Table> {
        let trimmed = text.trim();
        if trimmed.starts_with('[') {
            return Self::parse_json(trimmed);
        }
        Self::parse_delimited(trimmed)
    }

    /// Parse CSV or TSV text. The delimiter must appear on at least two
    /// lines; tabs win over commas when both qualify.
    pub fn parse_delimited(text: &str) -> Option<Table> {
        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        let delimiter = sniff_delimiter(&lines)?;

        let joined = lines.join("\n");
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(joined.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .ok()?
            .iter()
            .map(|h| h.to_string())
            .collect();

        if !valid_headers(&headers) {
            debug!("Rejecting delimited table: header row {:?} is not a header", headers);
            return None;
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            // Ragged rows mean this was prose with commas, not a table
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    debug!("Rejecting delimited table: {}", e);
                    return None;
                }
            };
            rows.push(record.iter().map(Cell::from_text).collect());
        }

        if rows.is_empty() {
            return None;
        }

        Some(Table { headers, rows })
    }

    /// Parse a JSON array of flat objects. Rows holding a nested list of
    /// objects are expanded into one row per nested object.
    pub fn parse_json(text: &str) -> Option<Table> {
        let values: Vec<Value> = serde_json::from_str(text).ok()?;

        let mut objects = Vec::new();
        for value in values {
            match value {
                Value::Object(map) => objects.extend(flatten_row(map)),
                _ => return None,
            }
        }

        let mut headers: Vec<String> = Vec::new();
        for object in &objects {
            for key in object.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }

        if headers.is_empty() {
            return None;
        }

        let rows = objects
            .iter()
            .map(|object| {
                headers
                    .iter()
                    .map(|h| object.get(h).map(Cell::from_json).unwrap_or(Cell::Empty))
                    .collect()
            })
            .collect();

        Some(Table { headers, rows })
    }

    /// Columns whose non-empty cells are all numbers (and at least one is)
    pub fn numeric_columns(&self) -> Vec<usize> {
        (0..self.headers.len())
            .filter(|&col| {
                let mut saw_number = false;
                for row in &self.rows {
                    match row.get(col) {
                        Some(Cell::Number(_)) => saw_number = true,
                        Some(Cell::Text(_)) => return false,
                        _ => {}
                    }
                }
                saw_number
            })
            .collect()
    }

    /// First column that is not numeric
    pub fn label_column(&self) -> Option<usize> {
        let numeric = self.numeric_columns();
        (0..self.headers.len()).find(|col| !numeric.contains(col))
    }

    /// Turn each `(row, numeric column)` pair into a labeled candidate.
    ///
    /// With one numeric column the row label is used as-is; with several,
    /// labels are composed as `"{row_label}/{column}"`. The row label is the
    /// row's cell in the label column, or `Row{index}` when that is missing.
    pub fn candidates(&self) -> TableCandidates {
        let numeric = self.numeric_columns();
        let label_col = self.label_column();
        let mut candidates = Vec::new();
        let mut rows_used = HashSet::new();

        for (index, row) in self.rows.iter().enumerate() {
            let row_label = label_col
                .and_then(|col| row.get(col))
                .and_then(|cell| match cell {
                    Cell::Text(s) => Some(s.clone()),
                    Cell::Number(n) => Some(n.to_string()),
                    Cell::Empty => None,
                })
                .unwrap_or_else(|| format!("Row{}", index));

            for &col in &numeric {
                let Some(Cell::Number(value)) = row.get(col) else {
                    continue;
                };
                let label = if numeric.len() == 1 {
                    row_label.clone()
                } else {
                    format!("{}/{}", row_label, self.headers[col])
                };
                candidates.push((label, *value));
                rows_used.insert(row_label.clone());
            }
        }

        TableCandidates {
            candidates,
            dimensions: numeric.len(),
            rows: rows_used.len(),
            label_column: label_col.map(|col| self.headers[col].clone()),
            value_columns: numeric.iter().map(|&col| self.headers[col].clone()).collect(),
        }
    }
}

fn is_missing_marker(cell: &str) -> bool {
    MISSING_MARKERS
        .iter()
        .any(|marker| cell.eq_ignore_ascii_case(marker))
}

fn sniff_delimiter(lines: &[&str]) -> Option<u8> {
    [b'\t', b','].into_iter().find(|&delimiter| {
        lines
            .iter()
            .filter(|line| line.contains(delimiter as char))
            .count()
            >= 2
    })
}

/// A header row has two or more non-empty cells, none of them numeric
fn valid_headers(headers: &[String]) -> bool {
    headers.len() >= 2
        && headers
            .iter()
            .all(|h| !h.is_empty() && normalize_number(h).is_err())
}

fn flatten_row(map: Map<String, Value>) -> Vec<Map<String, Value>> {
    let nested_key = map.iter().find_map(|(key, value)| match value {
        Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
            Some(key.clone())
        }
        _ => None,
    });

    let Some(nested_key) = nested_key else {
        return vec![map];
    };

    let mut base = map;
    let nested = match base.remove(&nested_key) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };

    nested
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(sub) => {
                let mut row = base.clone();
                row.extend(sub);
                Some(row)
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_with_header() {
        let table = Table::parse("month,sales\nJan,100\nFeb,120").unwrap();
        assert_eq!(table.headers, vec!["month", "sales"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.numeric_columns(), vec![1]);
        assert_eq!(table.label_column(), Some(0));
    }

    #[test]
    fn test_parse_tsv() {
        let table = Table::parse("city\tpopulation\nOslo\t700000\nBergen\t285000").unwrap();
        assert_eq!(table.headers, vec!["city", "population"]);
        assert_eq!(table.rows[1][1], Cell::Number(285_000.0));
    }

    #[test]
    fn test_thousands_separators_are_not_a_table() {
        assert!(Table::parse("Q1: $10,000\nQ2: $12,500").is_none());
    }

    #[test]
    fn test_single_line_is_not_a_table() {
        assert!(Table::parse("apples,pears").is_none());
    }

    #[test]
    fn test_ragged_rows_are_not_a_table() {
        assert!(Table::parse("We sold apples, pears\nand plums, figs, dates").is_none());
    }

    #[test]
    fn test_quoted_numbers_with_commas() {
        let table = Table::parse("product,revenue\nA,\"1,200\"\nB,\"3,400.50\"").unwrap();
        let c = table.candidates();
        assert_eq!(c.candidates, vec![("A".to_string(), 1200.0), ("B".to_string(), 3400.5)]);
    }

    #[test]
    fn test_multi_numeric_columns_compose_labels() {
        let table = Table::parse("product,jan,feb\nA,100,120\nB,80,95").unwrap();
        let c = table.candidates();
        assert_eq!(c.dimensions, 2);
        let labels: Vec<_> = c.candidates.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["A/jan", "A/feb", "B/jan", "B/feb"]);
        assert_eq!(c.label_column.as_deref(), Some("product"));
        assert_eq!(c.value_columns, vec!["jan".to_string(), "feb".to_string()]);
    }

    #[test]
    fn test_row_count_counts_source_rows() {
        let table = Table::parse("name,math,science,art\nAlice,90,80,70\nBob,85,75,65").unwrap();
        let c = table.candidates();
        assert_eq!(c.candidates.len(), 6);
        assert_eq!(c.dimensions, 3);
        assert_eq!(c.rows, 2);
    }

    #[test]
    fn test_missing_markers_do_not_disqualify_column() {
        let table = Table::parse("product,sales\nA,100\nB,N/A\nC,300").unwrap();
        assert_eq!(table.rows[1][1], Cell::Empty);
        assert_eq!(table.numeric_columns(), vec![1]);

        let c = table.candidates();
        assert_eq!(c.candidates, vec![("A".to_string(), 100.0), ("C".to_string(), 300.0)]);
        assert_eq!(c.rows, 2);
    }

    #[test]
    fn test_missing_markers_are_case_insensitive() {
        for marker in ["-", "null", "NULL", "None", "na", "NaN", "?"] {
            assert_eq!(Cell::from_text(marker), Cell::Empty, "{}", marker);
        }
        assert_eq!(Cell::from_text("Nancy"), Cell::Text("Nancy".to_string()));
    }

    #[test]
    fn test_rows_without_label_column() {
        let table = Table::parse("x,y\n1,2\n3,4").unwrap();
        let c = table.candidates();
        let labels: Vec<_> = c.candidates.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Row0/x", "Row0/y", "Row1/x", "Row1/y"]);
        assert_eq!(c.label_column, None);
    }

    #[test]
    fn test_json_table() {
        let table = Table::parse(r#"[{"month": "Jan", "units": 100}, {"month": "Feb", "units": 120}]"#)
            .unwrap();
        assert_eq!(table.headers, vec!["month", "units"]);
        assert_eq!(table.numeric_columns(), vec![1]);
    }

    #[test]
    fn test_json_table_flattens_nested_rows() {
        let text = r#"[
            {"product": "A", "sales": [{"month": "Jan", "units": 100}, {"month": "Feb", "units": 120}]},
            {"product": "B", "sales": [{"month": "Jan", "units": 80}]}
        ]"#;
        let table = Table::parse(text).unwrap();
        assert_eq!(table.headers, vec!["product", "month", "units"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[2][0], Cell::Text("B".to_string()));
        assert_eq!(table.rows[2][2], Cell::Number(80.0));
    }

    #[test]
    fn test_json_scalar_array_is_not_a_table() {
        assert!(Table::parse("[1, 2, 3]").is_none());
    }
}
