//! Query intent classification.
//!
//! A lightweight LLM call decides whether the user wants a whole-video
//! summary or has a specific question. Any failure degrades to the specific
//! query path, never to the expensive hierarchical summary.

use crate::config::Prompts;
use crate::llm::TextGenerator;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Classification of user query intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryIntent {
    /// User wants a summary of the entire video.
    FullVideoSummary,
    /// User has a specific question or topic.
    SpecificQuery,
}

/// LLM-backed intent classifier.
pub struct IntentClassifier {
    generator: Arc<dyn TextGenerator>,
    prompts: Prompts,
}

impl IntentClassifier {
    pub fn new(generator: Arc<dyn TextGenerator>, prompts: Prompts) -> Self {
        Self { generator, prompts }
    }

    /// Classify a query. Infallible by design: empty queries, generation
    /// failures, and unrecognized outputs all map to `SpecificQuery`.
    #[instrument(skip(self))]
    pub async fn classify(&self, query: &str) -> QueryIntent {
        if query.trim().is_empty() {
            warn!("Empty query, defaulting to SpecificQuery");
            return QueryIntent::SpecificQuery;
        }

        let mut vars = HashMap::new();
        vars.insert("query".to_string(), query.to_string());
        let prompt = self
            .prompts
            .render_with_custom(&self.prompts.intent.classify, &vars);

        match self.generator.generate(&prompt).await {
            Ok(response) => {
                let normalized = response.trim().to_uppercase();
                debug!("Intent classification response: {}", normalized);
                if normalized.contains("FULL_VIDEO_SUMMARY") {
                    QueryIntent::FullVideoSummary
                } else {
                    QueryIntent::SpecificQuery
                }
            }
            Err(e) => {
                warn!("Intent classification failed, defaulting to SpecificQuery: {}", e);
                QueryIntent::SpecificQuery
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AskTubeError, Result};
    use async_trait::async_trait;

    struct CannedGenerator(Result<String>);

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            match &self.0 {
                Ok(s) => Ok(s.clone()),
                Err(_) => Err(AskTubeError::Llm("down".to_string())),
            }
        }
    }

    fn classifier(response: Result<String>) -> IntentClassifier {
        IntentClassifier::new(Arc::new(CannedGenerator(response)), Prompts::default())
    }

    #[tokio::test]
    async fn test_full_summary_intent() {
        let c = classifier(Ok("FULL_VIDEO_SUMMARY".to_string()));
        assert_eq!(c.classify("summarize the video").await, QueryIntent::FullVideoSummary);
    }

    #[tokio::test]
    async fn test_specific_query_intent() {
        let c = classifier(Ok("SPECIFIC_QUERY".to_string()));
        assert_eq!(c.classify("what about rust?").await, QueryIntent::SpecificQuery);
    }

    #[tokio::test]
    async fn test_noisy_response_still_matches() {
        let c = classifier(Ok("The answer is: full_video_summary.".to_string()));
        assert_eq!(c.classify("overview please").await, QueryIntent::FullVideoSummary);
    }

    #[tokio::test]
    async fn test_unrecognized_defaults_to_specific() {
        let c = classifier(Ok("UNKNOWN_LABEL".to_string()));
        assert_eq!(c.classify("anything").await, QueryIntent::SpecificQuery);
    }

    #[tokio::test]
    async fn test_classifier_failure_defaults_to_specific() {
        let c = classifier(Err(AskTubeError::Llm("down".to_string())));
        assert_eq!(c.classify("summarize everything").await, QueryIntent::SpecificQuery);
    }

    #[tokio::test]
    async fn test_empty_query_defaults_to_specific() {
        let c = classifier(Ok("FULL_VIDEO_SUMMARY".to_string()));
        assert_eq!(c.classify("   ").await, QueryIntent::SpecificQuery);
    }
}
