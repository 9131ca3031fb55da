//! The classification cascade

use crate::config::ClassifierConfig;
use crate::error::StageError;
use crate::heuristic::{self, Confidence};
use crate::prompt::PromptBuilder;
use crate::reply::parse_reply;
use crate::stage::{Stage, StageOutcome};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tabviz_domain::traits::{ExampleStore, GenerativeAdvisor};
use tabviz_domain::{ClassificationResult, Disconnected, Neighbor, RecordSet};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// State carried from one stage to the next within a single classification
#[derive(Debug, Default)]
struct CascadeContext {
    /// Nearest guideline text, fetched during retrieval
    guideline: Option<String>,
}

/// Assigns a chart type to a record set
///
/// Runs heuristic → retrieval → generative → default and returns the first
/// confident result. External collaborators are injected at construction;
/// a classifier without them simply skips those stages.
///
/// # Examples
///
/// ```
/// use tabviz_classifier::VisualizationClassifier;
/// use tabviz_domain::{ChartType, Method, Record, RecordSet};
///
/// # let runtime = tokio::runtime::Runtime::new().unwrap();
/// let classifier = VisualizationClassifier::default();
///
/// let records = RecordSet::from(vec![
///     Record::new("Q1", 10_000.0).unwrap(),
///     Record::new("Q2", 12_500.0).unwrap(),
/// ]);
/// let result = runtime.block_on(classifier.classify(&records));
///
/// assert_eq!(result.chart_type, ChartType::Line);
/// assert_eq!(result.method, Method::Heuristic);
/// ```
pub struct VisualizationClassifier<S = Disconnected, A = Disconnected> {
    store: Arc<S>,
    advisor: Arc<A>,
    config: ClassifierConfig,
}

impl VisualizationClassifier {
    /// Create a classifier with no store and no advisor
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            store: Arc::new(Disconnected),
            advisor: Arc::new(Disconnected),
            config,
        }
    }
}

impl Default for VisualizationClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl<S, A> VisualizationClassifier<S, A> {
    /// Attach an example store
    pub fn with_store<S2>(self, store: Arc<S2>) -> VisualizationClassifier<S2, A> {
        VisualizationClassifier {
            store,
            advisor: self.advisor,
            config: self.config,
        }
    }

    /// Attach a generative advisor
    pub fn with_advisor<A2>(self, advisor: Arc<A2>) -> VisualizationClassifier<S, A2> {
        VisualizationClassifier {
            store: self.store,
            advisor,
            config: self.config,
        }
    }

    /// Classifier configuration
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}

impl<S, A> VisualizationClassifier<S, A>
where
    S: ExampleStore + Send + Sync + 'static,
    S::Error: Display,
    A: GenerativeAdvisor + Send + Sync + 'static,
    A::Error: Display,
{
    /// Classify a record set. Never fails.
    ///
    /// An empty record set yields `unknown` via `default` without running
    /// any stage.
    pub async fn classify(&self, records: &RecordSet) -> ClassificationResult {
        if records.is_empty() {
            debug!("{}", StageError::EmptyRecordSet);
            return ClassificationResult::unknown();
        }

        let mut context = CascadeContext::default();
        for stage in Stage::CASCADE {
            match self.run_stage(stage, records, &mut context).await {
                StageOutcome::Confident(result) => {
                    info!(
                        "Classified {} records as {} via {}",
                        records.len(),
                        result.chart_type,
                        result.method
                    );
                    return result;
                }
                StageOutcome::FallThrough(StageError::WeakHeuristic) => {
                    debug!("{:?} stage fell through: weak heuristic match", stage);
                }
                StageOutcome::FallThrough(reason) => {
                    warn!("{:?} stage fell through: {}", stage, reason);
                }
            }
        }

        ClassificationResult::fallback()
    }

    async fn run_stage(
        &self,
        stage: Stage,
        records: &RecordSet,
        context: &mut CascadeContext,
    ) -> StageOutcome {
        match stage {
            Stage::Heuristic => self.heuristic(records),
            Stage::Retrieval => self.retrieval(records, context).await,
            Stage::Generative => self.generative(records, context).await,
            Stage::Default => StageOutcome::Confident(ClassificationResult::fallback()),
        }
    }

    /// Shape rules; a weak match falls through when escalation is enabled
    pub fn heuristic(&self, records: &RecordSet) -> StageOutcome {
        let decision = heuristic::classify(records);
        debug!(
            "Heuristic picked {} ({:?})",
            decision.result.chart_type, decision.confidence
        );

        if decision.confidence == Confidence::Weak && self.config.escalate_weak {
            return StageOutcome::FallThrough(StageError::WeakHeuristic);
        }
        StageOutcome::Confident(decision.result)
    }

    async fn retrieval(&self, records: &RecordSet, context: &mut CascadeContext) -> StageOutcome {
        if !self.store.is_available() {
            return StageOutcome::FallThrough(StageError::RetrievalUnavailable(
                "no example store configured".to_string(),
            ));
        }

        let document = match serde_json::to_string(records) {
            Ok(document) => document,
            Err(e) => return StageOutcome::FallThrough(StageError::RetrievalUnavailable(e.to_string())),
        };

        let store = Arc::clone(&self.store);
        let lookup = self
            .call_external("example store", self.config.store_timeout(), move || {
                lookup_nearest(store.as_ref(), &document)
            })
            .await;

        let (neighbor, guideline) = match lookup {
            Ok(found) => found,
            Err(e) => return StageOutcome::FallThrough(StageError::RetrievalUnavailable(e)),
        };
        context.guideline = guideline;

        let Some(neighbor) = neighbor else {
            return StageOutcome::FallThrough(StageError::RetrievalUnavailable(
                "no exemplar found".to_string(),
            ));
        };

        if let Some(min) = self.config.min_similarity {
            if neighbor.similarity < min {
                return StageOutcome::FallThrough(StageError::RetrievalUnavailable(format!(
                    "nearest exemplar {} has similarity {:.3}, below {:.3}",
                    neighbor.exemplar_id, neighbor.similarity, min
                )));
            }
        }

        debug!(
            "Adopting exemplar {} (similarity {:.3})",
            neighbor.exemplar_id, neighbor.similarity
        );
        let metadata = neighbor.metadata;
        StageOutcome::Confident(
            ClassificationResult::new(metadata.chart_type, Stage::Retrieval.method())
                .with_axes(non_empty(metadata.x_column), non_empty(metadata.y_column)),
        )
    }

    async fn generative(&self, records: &RecordSet, context: &mut CascadeContext) -> StageOutcome {
        if !self.advisor.is_available() {
            return StageOutcome::FallThrough(StageError::AdvisorUnavailable(
                "no generative advisor configured".to_string(),
            ));
        }

        let prompt = PromptBuilder::new(records)
            .with_guideline(context.guideline.take())
            .build();
        debug!("Prompt length: {} chars", prompt.len());

        let advisor = Arc::clone(&self.advisor);
        let reply = self
            .call_external("generative advisor", self.config.advisor_timeout(), move || {
                advisor.complete(&prompt).map_err(|e| e.to_string())
            })
            .await;

        let reply = match reply {
            Ok(reply) => reply,
            Err(e) => return StageOutcome::FallThrough(StageError::AdvisorUnavailable(e)),
        };

        match parse_reply(&reply) {
            Ok(result) => StageOutcome::Confident(result),
            Err(e) => StageOutcome::FallThrough(e),
        }
    }

    /// Run a blocking collaborator call off the async runtime, bounded by
    /// `limit`. Makes one attempt, or two when retries are enabled.
    ///
    /// When the surrounding future is dropped the call is abandoned; its
    /// blocking thread finishes on its own and the result is discarded.
    async fn call_external<T, F>(&self, what: &str, limit: Duration, call: F) -> Result<T, String>
    where
        T: Send + 'static,
        F: Fn() -> Result<T, String> + Send + Sync + 'static,
    {
        let call = Arc::new(call);
        let attempts = self.config.attempts();
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            let call = Arc::clone(&call);
            last_error = match timeout(limit, tokio::task::spawn_blocking(move || (*call)())).await {
                Ok(Ok(Ok(value))) => return Ok(value),
                Ok(Ok(Err(e))) => e,
                Ok(Err(e)) => format!("task join error: {}", e),
                Err(_) => format!("timed out after {:?}", limit),
            };

            if attempt < attempts {
                debug!("Retrying {} after: {}", what, last_error);
            }
        }

        Err(format!("{}: {}", what, last_error))
    }
}

/// Embed the document, then fetch the nearest exemplar and guideline.
///
/// A failing guideline lookup is not fatal; retrieval proceeds without it.
fn lookup_nearest<S>(store: &S, document: &str) -> Result<(Option<Neighbor>, Option<String>), String>
where
    S: ExampleStore,
    S::Error: Display,
{
    let vector = store.embed(document).map_err(|e| e.to_string())?;
    let neighbor = store
        .nearest_neighbors(&vector, 1)
        .map_err(|e| e.to_string())?
        .into_iter()
        .next();

    let guideline = store.nearest_guideline(&vector).unwrap_or_else(|e| {
        debug!("Guideline lookup failed: {}", e);
        None
    });

    Ok((neighbor, guideline))
}

fn non_empty(column: String) -> Option<String> {
    if column.trim().is_empty() {
        None
    } else {
        Some(column)
    }
}
