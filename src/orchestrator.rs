//! Pipeline orchestrator for asktube.
//!
//! Wires the services together once at startup (dependency injection, no
//! process-wide singletons) and exposes the two top-level flows: processing
//! a video into the index and answering questions about it.

use crate::answer::{AnswerEngine, ChatTurn};
use crate::chunking::TranscriptChunker;
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{AskTubeError, Result};
use crate::ingest::IngestPipeline;
use crate::intent::IntentClassifier;
use crate::llm::{OpenAIGenerator, TextGenerator};
use crate::retrieval::{RetrievalEngine, RetrievedSource};
use crate::router::QueryRouter;
use crate::summary::SummaryEngine;
use crate::transcript::{extract_video_id, RapidApiTranscriptSource, TranscriptSource};
use crate::vector_store::{SqliteVectorStore, VectorStore};
use std::sync::Arc;
use tracing::{info, instrument};

/// The main orchestrator for the asktube pipeline.
pub struct Orchestrator {
    source: Arc<dyn TranscriptSource>,
    chunker: TranscriptChunker,
    ingest: IngestPipeline,
    router: QueryRouter,
    summary: SummaryEngine,
    store: Arc<dyn VectorStore>,
}

impl Orchestrator {
    /// Create an orchestrator with the default (OpenAI + SQLite) services.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let source: Arc<dyn TranscriptSource> =
            Arc::new(RapidApiTranscriptSource::new(&settings.transcript)?);
        let embedder: Arc<dyn Embedder> = Arc::new(OpenAIEmbedder::new(&settings.embedding));
        let store: Arc<dyn VectorStore> = Arc::new(SqliteVectorStore::new(&settings.sqlite_path())?);

        let generator: Arc<dyn TextGenerator> = Arc::new(OpenAIGenerator::new(&settings.rag.model));
        let summarizer: Arc<dyn TextGenerator> =
            Arc::new(OpenAIGenerator::new(&settings.summary.model));
        // Classification wants determinism, not creativity.
        let classifier_llm: Arc<dyn TextGenerator> = Arc::new(
            OpenAIGenerator::new(&settings.rag.classifier_model)
                .with_temperature(0.0)
                .with_max_tokens(20),
        );

        Ok(Self::with_components(
            &settings,
            prompts,
            source,
            embedder,
            generator,
            summarizer,
            classifier_llm,
            store,
        ))
    }

    /// Create an orchestrator with custom components (used by tests and
    /// embedders of the library).
    #[allow(clippy::too_many_arguments)]
    pub fn with_components(
        settings: &Settings,
        prompts: Prompts,
        source: Arc<dyn TranscriptSource>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn TextGenerator>,
        summarizer: Arc<dyn TextGenerator>,
        classifier_llm: Arc<dyn TextGenerator>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        let chunker = TranscriptChunker::with_settings(&settings.chunking);
        let ingest = IngestPipeline::new(embedder.clone(), store.clone());

        let retrieval =
            RetrievalEngine::new(embedder, store.clone()).with_top_k(settings.rag.top_k);
        let summary = SummaryEngine::new(
            summarizer.clone(),
            store.clone(),
            prompts.clone(),
            &settings.summary,
        );
        let router = QueryRouter::new(
            IntentClassifier::new(classifier_llm, prompts.clone()),
            retrieval,
            SummaryEngine::new(summarizer, store.clone(), prompts.clone(), &settings.summary),
            AnswerEngine::new(generator, prompts),
        );

        Self {
            source,
            chunker,
            ingest,
            router,
            summary,
            store,
        }
    }

    /// Get the vector store.
    pub fn vector_store(&self) -> Arc<dyn VectorStore> {
        self.store.clone()
    }

    /// Process a video URL: fetch transcript, chunk, embed, index.
    ///
    /// Already-indexed videos are skipped (cheap no-op) unless `force` is
    /// set, in which case existing chunks are replaced.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn process_video(&self, url: &str, force: bool) -> Result<ProcessResult> {
        let video_id = extract_video_id(url)?;

        if self.store.is_video_indexed(&video_id).await? {
            if !force {
                info!("Video {} already indexed, skipping", video_id);
                return Ok(ProcessResult {
                    video_id,
                    chunks_indexed: 0,
                    skipped: true,
                });
            }
            info!("Reprocessing video {}: deleting existing chunks", video_id);
            self.store.delete_by_video_id(&video_id).await?;
        }

        let segments = self.source.fetch(&video_id).await?;
        info!("Fetched {} transcript segments", segments.len());

        let chunks = self.chunker.chunk(&video_id, &segments);
        if chunks.is_empty() {
            return Err(AskTubeError::Chunking(format!(
                "No chunks generated for video {}",
                video_id
            )));
        }

        let indexed = self.ingest.process_and_store(chunks).await?;

        Ok(ProcessResult {
            video_id,
            chunks_indexed: indexed,
            skipped: false,
        })
    }

    /// Answer a question about a video, routed by intent.
    pub async fn ask(
        &self,
        query: &str,
        video_id: &str,
        history: &[ChatTurn],
    ) -> Result<(String, Vec<RetrievedSource>)> {
        self.router.handle(query, video_id, history).await
    }

    /// Summarize an entire video (explicit, bypassing intent classification).
    pub async fn summarize(&self, video_id: &str) -> Result<(String, Vec<RetrievedSource>)> {
        self.summary.summarize_video(video_id).await
    }
}

/// Result of processing a video.
#[derive(Debug)]
pub struct ProcessResult {
    /// Video ID.
    pub video_id: String,
    /// Number of chunks indexed.
    pub chunks_indexed: usize,
    /// Whether processing was skipped (already indexed).
    pub skipped: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::EmbeddingMode;
    use crate::transcript::TranscriptSegment;
    use crate::vector_store::MemoryVectorStore;
    use async_trait::async_trait;

    struct StaticSource(Vec<TranscriptSegment>);

    #[async_trait]
    impl TranscriptSource for StaticSource {
        async fn fetch(&self, _video_id: &str) -> Result<Vec<TranscriptSegment>> {
            if self.0.is_empty() {
                Err(AskTubeError::TranscriptUnavailable("none".to_string()))
            } else {
                Ok(self.0.clone())
            }
        }
    }

    struct UnitEmbedder;

    #[async_trait]
    impl Embedder for UnitEmbedder {
        async fn embed(&self, texts: &[String], _mode: EmbeddingMode) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    struct StaticGenerator;

    #[async_trait]
    impl TextGenerator for StaticGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            if prompt.contains("intent classifier") {
                Ok("SPECIFIC_QUERY".to_string())
            } else {
                Ok("generated text".to_string())
            }
        }
    }

    fn orchestrator(segments: Vec<TranscriptSegment>) -> Orchestrator {
        let settings = Settings::default();
        let generator: Arc<dyn TextGenerator> = Arc::new(StaticGenerator);
        Orchestrator::with_components(
            &settings,
            Prompts::default(),
            Arc::new(StaticSource(segments)),
            Arc::new(UnitEmbedder),
            generator.clone(),
            generator.clone(),
            generator,
            Arc::new(MemoryVectorStore::new()),
        )
    }

    fn segments() -> Vec<TranscriptSegment> {
        vec![
            TranscriptSegment::new("Welcome to the video about Rust.", 0.0),
            TranscriptSegment::new("Today we discuss ownership and borrowing.", 6.0),
        ]
    }

    #[tokio::test]
    async fn test_process_then_ask_end_to_end() {
        let orch = orchestrator(segments());

        let result = orch
            .process_video("https://youtu.be/abc123def45", false)
            .await
            .unwrap();
        assert_eq!(result.video_id, "abc123def45");
        assert!(!result.skipped);
        assert!(result.chunks_indexed >= 1);

        let (response, sources) = orch
            .ask("what is ownership?", "abc123def45", &[])
            .await
            .unwrap();
        assert_eq!(response, "generated text");
        assert!(!sources.is_empty());
    }

    #[tokio::test]
    async fn test_reprocess_is_skipped_without_force() {
        let orch = orchestrator(segments());

        orch.process_video("abc123def45", false).await.unwrap();
        let second = orch.process_video("abc123def45", false).await.unwrap();

        assert!(second.skipped);
        assert_eq!(second.chunks_indexed, 0);
    }

    #[tokio::test]
    async fn test_force_reprocesses() {
        let orch = orchestrator(segments());

        orch.process_video("abc123def45", false).await.unwrap();
        let count_before = orch.vector_store().chunk_count().await.unwrap();
        let second = orch.process_video("abc123def45", true).await.unwrap();

        assert!(!second.skipped);
        assert_eq!(
            orch.vector_store().chunk_count().await.unwrap(),
            count_before
        );
    }

    #[tokio::test]
    async fn test_invalid_url_is_input_error() {
        let orch = orchestrator(segments());
        let result = orch.process_video("https://example.com/nope", false).await;
        assert!(matches!(result, Err(AskTubeError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_missing_transcript_propagates() {
        let orch = orchestrator(Vec::new());
        let result = orch.process_video("abc123def45", false).await;
        assert!(matches!(result, Err(AskTubeError::TranscriptUnavailable(_))));
    }
}
