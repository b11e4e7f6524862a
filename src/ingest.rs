//! Embedding and indexing pipeline.
//!
//! Turns chunked transcripts into persisted vectors: embeds chunk texts in
//! small sequential batches (with a polite pause between them), then upserts
//! the completed chunks in larger batches.

use crate::chunking::Chunk;
use crate::embedding::{Embedder, EmbeddingMode};
use crate::error::{AskTubeError, Result};
use crate::vector_store::{IndexedChunk, VectorStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Texts per embedding API call.
pub const EMBED_BATCH_SIZE: usize = 10;

/// Vectors per upsert call.
pub const UPSERT_BATCH_SIZE: usize = 100;

/// Pause between embedding batches to respect provider rate limits.
const EMBED_BATCH_PAUSE: Duration = Duration::from_millis(100);

/// Pipeline that embeds chunks and stores them in the vector index.
pub struct IngestPipeline {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl IngestPipeline {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }

    /// Embed and persist chunks, returning the number stored.
    ///
    /// A failed embedding batch is logged and skipped rather than aborting
    /// the run; the resulting partial index is flagged loudly in the logs.
    /// If every batch fails the whole operation errors.
    #[instrument(skip(self, chunks), fields(count = chunks.len()))]
    pub async fn process_and_store(&self, chunks: Vec<Chunk>) -> Result<usize> {
        if chunks.is_empty() {
            warn!("No chunks to process");
            return Ok(0);
        }

        let video_id = chunks[0].video_id.clone();
        info!("Embedding {} chunks for video {}", chunks.len(), video_id);

        let total = chunks.len();
        let mut completed: Vec<IndexedChunk> = Vec::with_capacity(total);

        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();

            match self.embedder.embed(&texts, EmbeddingMode::Document).await {
                Ok(vectors) if vectors.len() == batch.len() => {
                    for (chunk, embedding) in batch.iter().cloned().zip(vectors) {
                        completed.push(IndexedChunk::from_chunk(chunk, embedding));
                    }
                }
                Ok(vectors) => {
                    warn!(
                        "Embedding batch for video {} returned {} vectors for {} texts, skipping",
                        video_id,
                        vectors.len(),
                        batch.len()
                    );
                }
                Err(e) => {
                    warn!(
                        "Embedding batch failed for video {}, skipping {} chunks: {}",
                        video_id,
                        batch.len(),
                        e
                    );
                }
            }

            tokio::time::sleep(EMBED_BATCH_PAUSE).await;
        }

        if completed.is_empty() {
            return Err(AskTubeError::Embedding(format!(
                "No vectors generated for video {}",
                video_id
            )));
        }

        if completed.len() < total {
            warn!(
                "Video {} partially indexed: {}/{} chunks embedded",
                video_id,
                completed.len(),
                total
            );
        }

        let mut stored = 0usize;
        for batch in completed.chunks(UPSERT_BATCH_SIZE) {
            stored += self.store.upsert_batch(batch).await?;
            debug!("Upserted {}/{} vectors", stored, completed.len());
        }

        info!("Video {} indexed: {} chunks stored", video_id, stored);
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::MemoryVectorStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Embedder that fails on selected batch numbers.
    struct FlakyEmbedder {
        calls: AtomicUsize,
        fail_on: Vec<usize>,
    }

    #[async_trait]
    impl Embedder for FlakyEmbedder {
        async fn embed(
            &self,
            texts: &[String],
            _mode: EmbeddingMode,
        ) -> Result<Vec<Vec<f32>>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.contains(&call) {
                return Err(AskTubeError::Embedding("rate limited".to_string()));
            }
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    fn chunks(count: usize) -> Vec<Chunk> {
        (0..count)
            .map(|i| Chunk {
                id: format!("vid_{}_xxxxxxxx", i),
                video_id: "vid".to_string(),
                text: format!("chunk {}", i),
                start_time: i as f64,
                chunk_index: i,
                source_url: String::new(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_all_chunks_stored() {
        let store = Arc::new(MemoryVectorStore::new());
        let pipeline = IngestPipeline::new(
            Arc::new(FlakyEmbedder {
                calls: AtomicUsize::new(0),
                fail_on: vec![],
            }),
            store.clone(),
        );

        let stored = pipeline.process_and_store(chunks(25)).await.unwrap();
        assert_eq!(stored, 25);
        assert_eq!(store.chunk_count().await.unwrap(), 25);
    }

    #[tokio::test]
    async fn test_failed_batch_is_skipped() {
        let store = Arc::new(MemoryVectorStore::new());
        let pipeline = IngestPipeline::new(
            Arc::new(FlakyEmbedder {
                calls: AtomicUsize::new(0),
                fail_on: vec![1],
            }),
            store.clone(),
        );

        // 25 chunks -> 3 embedding batches of 10/10/5; middle one fails
        let stored = pipeline.process_and_store(chunks(25)).await.unwrap();
        assert_eq!(stored, 15);
        assert_eq!(store.chunk_count().await.unwrap(), 15);
    }

    #[tokio::test]
    async fn test_all_batches_failing_is_an_error() {
        let store = Arc::new(MemoryVectorStore::new());
        let pipeline = IngestPipeline::new(
            Arc::new(FlakyEmbedder {
                calls: AtomicUsize::new(0),
                fail_on: vec![0, 1, 2],
            }),
            store.clone(),
        );

        let result = pipeline.process_and_store(chunks(25)).await;
        assert!(matches!(result, Err(AskTubeError::Embedding(_))));
        assert_eq!(store.chunk_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_input_is_noop() {
        let store = Arc::new(MemoryVectorStore::new());
        let pipeline = IngestPipeline::new(
            Arc::new(FlakyEmbedder {
                calls: AtomicUsize::new(0),
                fail_on: vec![],
            }),
            store.clone(),
        );

        assert_eq!(pipeline.process_and_store(Vec::new()).await.unwrap(), 0);
    }
}
