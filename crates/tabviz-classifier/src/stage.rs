//! Cascade stages and their tagged outcomes

use crate::error::StageError;
use tabviz_domain::{ClassificationResult, Method};

/// One stage of the classification cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Record-set shape rules
    Heuristic,
    /// Nearest stored exemplar
    Retrieval,
    /// Generative advisor
    Generative,
    /// Terminal `bar`
    Default,
}

impl Stage {
    /// Stage order. Every stage after the first runs only if the previous
    /// one fell through.
    pub const CASCADE: [Stage; 4] = [
        Stage::Heuristic,
        Stage::Retrieval,
        Stage::Generative,
        Stage::Default,
    ];

    /// Method tag for results produced by this stage
    pub fn method(&self) -> Method {
        match self {
            Stage::Heuristic => Method::Heuristic,
            Stage::Retrieval => Method::Retrieval,
            Stage::Generative => Method::Generative,
            Stage::Default => Method::Default,
        }
    }
}

/// Tagged result of running one stage
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    /// The stage decided; the cascade stops here
    Confident(ClassificationResult),
    /// The stage could not decide; try the next one
    FallThrough(StageError),
}

impl StageOutcome {
    /// The result, if the stage decided
    pub fn into_result(self) -> Option<ClassificationResult> {
        match self {
            StageOutcome::Confident(result) => Some(result),
            StageOutcome::FallThrough(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cascade_order() {
        let methods: Vec<Method> = Stage::CASCADE.iter().map(Stage::method).collect();
        assert_eq!(
            methods,
            vec![Method::Heuristic, Method::Retrieval, Method::Generative, Method::Default]
        );
    }

    #[test]
    fn test_into_result() {
        let result = ClassificationResult::fallback();
        assert_eq!(
            StageOutcome::Confident(result.clone()).into_result(),
            Some(result)
        );
        assert_eq!(
            StageOutcome::FallThrough(StageError::WeakHeuristic).into_result(),
            None
        );
    }
}
