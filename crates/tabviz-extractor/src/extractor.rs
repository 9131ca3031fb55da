//! Strategy runner: first strategy with at least one record wins

use crate::builder::RecordSetBuilder;
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::patterns;
use crate::table::Table;
use tabviz_domain::{ExtractionFormat, RecordSet};
use tracing::{debug, info};

/// Extraction strategies, in the order they are attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// CSV / TSV with a header row, or a JSON table
    Tabular,
    /// `label: value` / `label - value` lines
    KeyValue,
    /// Numbers with surrounding context words
    Windowed,
}

impl Strategy {
    /// Attempt order
    pub const ORDER: [Strategy; 3] = [Strategy::Tabular, Strategy::KeyValue, Strategy::Windowed];

    /// Format tag reported for records produced by this strategy
    pub fn format(&self) -> ExtractionFormat {
        match self {
            Strategy::Tabular => ExtractionFormat::Tabular,
            Strategy::KeyValue => ExtractionFormat::KeyValue,
            Strategy::Windowed => ExtractionFormat::NumericalExtraction,
        }
    }
}

/// Records extracted from one input, with the strategy that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Distinct-label records in first-seen order
    pub records: RecordSet,
    /// Winning strategy's format tag
    pub format: ExtractionFormat,
}

/// Multi-strategy text extractor
#[derive(Debug, Clone, Default)]
pub struct TextExtractor {
    config: ExtractorConfig,
}

impl TextExtractor {
    /// Create a new extractor
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Extractor configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract records from text.
    ///
    /// Fails with [`ExtractorError::ExtractionFailed`] when no strategy yields
    /// a record; nothing is fabricated in that case.
    pub fn extract(&self, text: &str) -> Result<Extraction, ExtractorError> {
        let length = text.chars().count();
        if length > self.config.max_text_length {
            return Err(ExtractorError::TextTooLong(length, self.config.max_text_length));
        }

        for strategy in Strategy::ORDER {
            let records = self.apply(strategy, text);
            if !records.is_empty() {
                info!("{:?} strategy extracted {} records", strategy, records.len());
                return Ok(Extraction {
                    records,
                    format: strategy.format(),
                });
            }
            debug!("{:?} strategy produced no records", strategy);
        }

        Err(ExtractorError::ExtractionFailed)
    }

    /// Run a single strategy over the text
    pub fn apply(&self, strategy: Strategy, text: &str) -> RecordSet {
        match strategy {
            Strategy::Tabular => self.tabular(text),
            Strategy::KeyValue => self.key_value(text),
            Strategy::Windowed => self.windowed(text),
        }
    }

    fn tabular(&self, text: &str) -> RecordSet {
        let Some(table) = Table::parse(text) else {
            return RecordSet::new();
        };

        let candidates = table.candidates();
        let mut builder = RecordSetBuilder::new(self.config.max_records)
            .columns(table.headers.clone())
            .dimensions(candidates.dimensions.max(1))
            .rows(candidates.rows)
            .axis_columns(candidates.label_column, candidates.value_columns);
        builder.extend(candidates.candidates);
        builder.build()
    }

    fn key_value(&self, text: &str) -> RecordSet {
        let mut builder = RecordSetBuilder::new(self.config.max_records);
        builder.extend(text.lines().filter_map(patterns::key_value));
        builder.build()
    }

    fn windowed(&self, text: &str) -> RecordSet {
        // Lines that already hold a key-value record are not re-read
        let lines = text
            .lines()
            .filter(|line| patterns::key_value(line).is_none());

        let mut builder = RecordSetBuilder::new(self.config.max_records);
        builder.extend(patterns::windowed(lines));
        builder.build()
    }
}
