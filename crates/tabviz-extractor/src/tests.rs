//! End-to-end tests for the Extractor

#[cfg(test)]
mod tests {
    use crate::{ExtractorConfig, ExtractorError, Strategy, TextExtractor};
    use proptest::prelude::*;
    use tabviz_domain::{ExtractionFormat, Record};

    fn extractor() -> TextExtractor {
        TextExtractor::new(ExtractorConfig::default())
    }

    #[test]
    fn test_quarterly_key_values() {
        let extraction = extractor().extract("Q1: $10,000\nQ2: $12,500").unwrap();

        assert_eq!(extraction.format, ExtractionFormat::KeyValue);
        assert_eq!(
            extraction.records.records(),
            [
                Record::new("Q1", 10_000.0).unwrap(),
                Record::new("Q2", 12_500.0).unwrap(),
            ]
        );
    }

    #[test]
    fn test_csv_input_uses_tabular_strategy() {
        let extraction = extractor().extract("month,sales\nJan,100\nFeb,120").unwrap();

        assert_eq!(extraction.format, ExtractionFormat::Tabular);
        assert_eq!(extraction.records.labels().collect::<Vec<_>>(), vec!["Jan", "Feb"]);
        assert_eq!(extraction.records.columns(), ["month".to_string(), "sales".to_string()]);
        assert_eq!(extraction.records.dimensions(), 1);
        assert_eq!(extraction.records.label_column(), Some("month"));
        assert_eq!(extraction.records.value_columns(), ["sales".to_string()]);
    }

    #[test]
    fn test_multi_column_table_keeps_row_count() {
        let text = "name,math,science,art\nAlice,90,80,70\nBob,85,75,65";
        let extraction = extractor().extract(text).unwrap();

        assert_eq!(extraction.format, ExtractionFormat::Tabular);
        assert_eq!(extraction.records.len(), 6);
        assert_eq!(extraction.records.rows(), 2);
        assert_eq!(extraction.records.dimensions(), 3);
    }

    #[test]
    fn test_table_with_missing_value_stays_tabular() {
        let extraction = extractor().extract("product,sales\nA,100\nB,N/A\nC,300").unwrap();

        assert_eq!(extraction.format, ExtractionFormat::Tabular);
        assert_eq!(extraction.records.labels().collect::<Vec<_>>(), vec!["A", "C"]);
        assert_eq!(extraction.records.value_columns(), ["sales".to_string()]);
    }

    #[test]
    fn test_single_ambiguous_number() {
        let extraction = extractor().extract("widgets 42").unwrap();

        assert_eq!(extraction.format, ExtractionFormat::NumericalExtraction);
        assert_eq!(extraction.records.records(), [Record::new("widgets", 42.0).unwrap()]);
    }

    #[test]
    fn test_no_numbers_fails() {
        let result = extractor().extract("hello world");
        assert_eq!(result, Err(ExtractorError::ExtractionFailed));
    }

    #[test]
    fn test_empty_input_fails() {
        assert_eq!(extractor().extract(""), Err(ExtractorError::ExtractionFailed));
    }

    #[test]
    fn test_text_too_long() {
        let mut config = ExtractorConfig::default();
        config.max_text_length = 10;
        let result = TextExtractor::new(config).extract("Q1: 100\nQ2: 200");
        assert!(matches!(result, Err(ExtractorError::TextTooLong(15, 10))));
    }

    #[test]
    fn test_key_value_wins_over_windowed() {
        let text = "Revenue: 500\nsold 20 units yesterday";
        let extraction = extractor().extract(text).unwrap();

        assert_eq!(extraction.format, ExtractionFormat::KeyValue);
        assert_eq!(extraction.records.len(), 1);
    }

    #[test]
    fn test_duplicate_labels_keep_first() {
        let extraction = extractor().extract("A: 1\nB: 2\nA: 3").unwrap();
        let values: Vec<f64> = extraction.records.records().iter().map(|r| r.value).collect();
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_prose_with_commas_falls_through_table() {
        let text = "In spring, we sold 100 apples\nIn summer, we sold 250 apples";
        let extraction = extractor().extract(text).unwrap();
        assert_eq!(extraction.format, ExtractionFormat::NumericalExtraction);
        assert_eq!(
            extraction.records.labels().collect::<Vec<_>>(),
            vec!["we sold apples"]
        );
    }

    #[test]
    fn test_json_table_input() {
        let text = r#"[{"product": "A", "units": 10}, {"product": "B", "units": 12}]"#;
        let extraction = extractor().extract(text).unwrap();
        assert_eq!(extraction.format, ExtractionFormat::Tabular);
        assert_eq!(extraction.records.labels().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_apply_single_strategy() {
        let records = extractor().apply(Strategy::Tabular, "Q1: 5\nQ2: 6");
        assert!(records.is_empty());
        let records = extractor().apply(Strategy::KeyValue, "Q1: 5\nQ2: 6");
        assert_eq!(records.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_labels_are_distinct(text in "[A-Za-z0-9:,$ \n]{0,200}") {
            if let Ok(extraction) = extractor().extract(&text) {
                let labels: Vec<&str> = extraction.records.labels().collect();
                let mut unique = labels.clone();
                unique.sort_unstable();
                unique.dedup();
                prop_assert_eq!(unique.len(), labels.len());
            }
        }

        #[test]
        fn prop_extraction_is_idempotent(text in "[A-Za-z0-9:,\\-$% \n\t]{0,200}") {
            let first = extractor().extract(&text);
            let second = extractor().extract(&text);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_key_value_order_follows_text(values in proptest::collection::vec(0u32..10_000, 1..20)) {
            let text: String = values
                .iter()
                .enumerate()
                .map(|(i, v)| format!("item{}: {}\n", i, v))
                .collect();
            let extraction = extractor().extract(&text).unwrap();
            let labels: Vec<String> = extraction.records.labels().map(str::to_string).collect();
            let expected: Vec<String> = (0..values.len()).map(|i| format!("item{}", i)).collect();
            prop_assert_eq!(labels, expected);
        }
    }
}
