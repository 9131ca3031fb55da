//! End-to-end processing: text in, renderer output out

use crate::classifier::VisualizationClassifier;
use std::fmt::Display;
use tabviz_domain::traits::{ExampleStore, GenerativeAdvisor};
use tabviz_domain::{Disconnected, VisualizationOutput};
use tabviz_extractor::{ExtractorError, TextExtractor};
use tracing::{info, warn};

/// Message attached to the placeholder output when nothing was extracted
pub const NO_DATA_MESSAGE: &str =
    "Unable to extract structured data. Please try reformatting your input.";

/// Message for input over the configured length limit
pub fn text_too_long_message(length: usize, max: usize) -> String {
    format!(
        "Input is too long: {} characters (limit {}). Please shorten it and try again.",
        length, max
    )
}

/// Extractor plus classifier
pub struct Pipeline<S = Disconnected, A = Disconnected> {
    extractor: TextExtractor,
    classifier: VisualizationClassifier<S, A>,
}

impl<S, A> Pipeline<S, A> {
    /// Create a pipeline
    pub fn new(extractor: TextExtractor, classifier: VisualizationClassifier<S, A>) -> Self {
        Self {
            extractor,
            classifier,
        }
    }

    /// The text extractor
    pub fn extractor(&self) -> &TextExtractor {
        &self.extractor
    }

    /// The classifier
    pub fn classifier(&self) -> &VisualizationClassifier<S, A> {
        &self.classifier
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(TextExtractor::default(), VisualizationClassifier::default())
    }
}

impl<S, A> Pipeline<S, A>
where
    S: ExampleStore + Send + Sync + 'static,
    S::Error: Display,
    A: GenerativeAdvisor + Send + Sync + 'static,
    A::Error: Display,
{
    /// Extract and classify. Never fails.
    ///
    /// Text with no numeric content yields an empty placeholder output
    /// carrying [`NO_DATA_MESSAGE`] instead of an error. Text over the length
    /// limit gets the same placeholder with [`text_too_long_message`].
    pub async fn process(&self, text: &str) -> VisualizationOutput {
        let extraction = match self.extractor.extract(text) {
            Ok(extraction) => extraction,
            Err(ExtractorError::TextTooLong(length, max)) => {
                warn!("Input rejected: {} chars exceeds max_text_length {}", length, max);
                return VisualizationOutput::no_structured_data(text_too_long_message(length, max));
            }
            Err(e) => {
                warn!("No structured data: {}", e);
                return VisualizationOutput::no_structured_data(NO_DATA_MESSAGE);
            }
        };

        let result = self.classifier.classify(&extraction.records).await;
        info!(
            "Processed input: {} records, {} chart",
            extraction.records.len(),
            result.chart_type
        );
        VisualizationOutput::new(extraction.records, extraction.format, result)
    }
}
