//! Intent-routed query dispatch.
//!
//! Classifies a question and dispatches to the summary engine or the
//! retrieval + answer pipeline.

use crate::answer::{AnswerEngine, ChatTurn};
use crate::error::Result;
use crate::intent::{IntentClassifier, QueryIntent};
use crate::retrieval::{RetrievalEngine, RetrievedSource};
use crate::summary::SummaryEngine;
use tracing::{info, instrument};

/// Response when retrieval finds no relevant chunks.
const NO_CONTEXT_MESSAGE: &str =
    "I couldn't find any relevant information in this video's transcript to answer your question.";

/// Response when a summary is requested for an unprocessed video.
const NO_CHUNKS_MESSAGE: &str =
    "This video doesn't have any indexed transcript yet. Process it first, then ask again.";

/// Routes questions to the right engine based on classified intent.
pub struct QueryRouter {
    classifier: IntentClassifier,
    retrieval: RetrievalEngine,
    summary: SummaryEngine,
    answer: AnswerEngine,
}

impl QueryRouter {
    pub fn new(
        classifier: IntentClassifier,
        retrieval: RetrievalEngine,
        summary: SummaryEngine,
        answer: AnswerEngine,
    ) -> Self {
        Self {
            classifier,
            retrieval,
            summary,
            answer,
        }
    }

    /// Answer a question about one video.
    ///
    /// Summary intent ignores history; specific questions retrieve context
    /// and generate an answer with history woven in. "Nothing found" cases
    /// return explanatory messages with empty sources, never errors.
    #[instrument(skip(self, history), fields(turns = history.len()))]
    pub async fn handle(
        &self,
        query: &str,
        video_id: &str,
        history: &[ChatTurn],
    ) -> Result<(String, Vec<RetrievedSource>)> {
        // Each engine call is boxed into a concrete `Send` future. The opaque
        // futures returned by these nested `async fn`s otherwise defeat the
        // compiler's auto-`Send` check when `handle` is awaited from the axum
        // handler, surfacing as "Send is not general enough". Boxing erases
        // them to a concrete type and preserves behavior exactly.
        let intent = Box::pin(self.classifier.classify(query))
            as std::pin::Pin<Box<dyn std::future::Future<Output = QueryIntent> + Send + '_>>;
        match intent.await {
            QueryIntent::FullVideoSummary => {
                info!("Routing to full video summary for {}", video_id);
                let summarize = Box::pin(self.summary.summarize_video(video_id))
                    as std::pin::Pin<
                        Box<
                            dyn std::future::Future<
                                    Output = Result<(String, Vec<RetrievedSource>)>,
                                > + Send
                                + '_,
                        >,
                    >;
                let (summary, sources) = summarize.await?;
                if summary.is_empty() {
                    return Ok((NO_CHUNKS_MESSAGE.to_string(), Vec::new()));
                }
                Ok((summary, sources))
            }
            QueryIntent::SpecificQuery => {
                info!("Routing to retrieval for {}", video_id);
                let retrieve = Box::pin(self.retrieval.get_context(query, video_id))
                    as std::pin::Pin<
                        Box<
                            dyn std::future::Future<
                                    Output = Result<(String, Vec<RetrievedSource>)>,
                                > + Send
                                + '_,
                        >,
                    >;
                let (context, sources) = retrieve.await?;
                if context.is_empty() {
                    return Ok((NO_CONTEXT_MESSAGE.to_string(), Vec::new()));
                }
                let generate = Box::pin(self.answer.generate_answer(query, &context, history))
                    as std::pin::Pin<Box<dyn std::future::Future<Output = String> + Send + '_>>;
                let response = generate.await;
                Ok((response, sources))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Prompts, SummarySettings};
    use crate::embedding::{Embedder, EmbeddingMode};
    use crate::error::AskTubeError;
    use crate::llm::TextGenerator;
    use crate::vector_store::{IndexedChunk, MemoryVectorStore, VectorStore};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Arc;

    struct FixedEmbedder;

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(
            &self,
            texts: &[String],
            _mode: EmbeddingMode,
        ) -> crate::error::Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    /// Generator that answers differently per prompt kind.
    struct ScriptedGenerator {
        classify_result: crate::error::Result<String>,
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> crate::error::Result<String> {
            if prompt.contains("intent classifier") {
                match &self.classify_result {
                    Ok(s) => Ok(s.clone()),
                    Err(_) => Err(AskTubeError::Llm("classifier down".to_string())),
                }
            } else if prompt.contains("VIDEO TRANSCRIPT") {
                Ok("summary output".to_string())
            } else {
                Ok("answer output".to_string())
            }
        }
    }

    fn chunk(index: usize) -> IndexedChunk {
        IndexedChunk {
            id: format!("vid_{}_xxxxxxxx", index),
            video_id: "vid".to_string(),
            text: format!("chunk text {}", index),
            start_time: index as f64 * 10.0,
            chunk_index: index,
            source_url: String::new(),
            embedding: vec![1.0, 0.0],
            indexed_at: Utc::now(),
        }
    }

    async fn router_with(
        classify_result: crate::error::Result<String>,
        indexed: bool,
    ) -> QueryRouter {
        let store = Arc::new(MemoryVectorStore::new());
        if indexed {
            store
                .upsert_batch(&[chunk(0), chunk(1), chunk(2)])
                .await
                .unwrap();
        }
        let generator: Arc<dyn TextGenerator> = Arc::new(ScriptedGenerator { classify_result });
        let embedder: Arc<dyn Embedder> = Arc::new(FixedEmbedder);
        let prompts = Prompts::default();

        QueryRouter::new(
            IntentClassifier::new(generator.clone(), prompts.clone()),
            RetrievalEngine::new(embedder, store.clone()),
            SummaryEngine::new(
                generator.clone(),
                store,
                prompts.clone(),
                &SummarySettings::default(),
            ),
            AnswerEngine::new(generator, prompts),
        )
    }

    #[tokio::test]
    async fn test_summary_intent_routes_to_summary() {
        let router = router_with(Ok("FULL_VIDEO_SUMMARY".to_string()), true).await;
        let (response, sources) = router.handle("summarize", "vid", &[]).await.unwrap();
        assert_eq!(response, "summary output");
        assert!(sources.iter().all(|s| s.score == 1.0));
    }

    #[tokio::test]
    async fn test_specific_intent_routes_to_retrieval() {
        let router = router_with(Ok("SPECIFIC_QUERY".to_string()), true).await;
        let (response, sources) = router.handle("what is rust?", "vid", &[]).await.unwrap();
        assert_eq!(response, "answer output");
        assert_eq!(sources.len(), 3);
    }

    #[tokio::test]
    async fn test_classifier_failure_takes_retrieval_path() {
        let router = router_with(Err(AskTubeError::Llm("down".to_string())), true).await;
        let (response, _) = router.handle("summarize everything", "vid", &[]).await.unwrap();
        // Falls to the cheap path, never the hierarchical summary.
        assert_eq!(response, "answer output");
    }

    #[tokio::test]
    async fn test_no_context_returns_message() {
        let router = router_with(Ok("SPECIFIC_QUERY".to_string()), false).await;
        let (response, sources) = router.handle("question", "vid", &[]).await.unwrap();
        assert_eq!(response, NO_CONTEXT_MESSAGE);
        assert!(sources.is_empty());
    }

    #[tokio::test]
    async fn test_summary_of_unprocessed_video_returns_message() {
        let router = router_with(Ok("FULL_VIDEO_SUMMARY".to_string()), false).await;
        let (response, sources) = router.handle("summarize", "vid", &[]).await.unwrap();
        assert_eq!(response, NO_CHUNKS_MESSAGE);
        assert!(sources.is_empty());
    }
}
