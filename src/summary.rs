//! Whole-video hierarchical summarization.
//!
//! Fetches every chunk of a video in chronological order and summarizes it.
//! Short videos get a single-pass summary; long ones are partitioned into
//! size-bounded batches that are summarized independently and then merged by
//! a mandatory combine call.

use crate::config::{Prompts, SummarySettings};
use crate::error::Result;
use crate::llm::TextGenerator;
use crate::retrieval::RetrievedSource;
use crate::vector_store::{IndexedChunk, VectorStore};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Index-imposed maximum result count for a fetch-all query.
pub const MAX_FETCH_RESULTS: usize = 10_000;

/// Number of representative source samples returned with a summary.
const SAMPLE_COUNT: usize = 5;

/// Characters of text kept per sampled source.
const SAMPLE_TEXT_CHARS: usize = 200;

/// Summary engine with the hierarchical batching strategy.
pub struct SummaryEngine {
    generator: Arc<dyn TextGenerator>,
    store: Arc<dyn VectorStore>,
    prompts: Prompts,
    max_context_chars: usize,
    max_chunks_per_batch: usize,
    max_concurrent: usize,
}

impl SummaryEngine {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        store: Arc<dyn VectorStore>,
        prompts: Prompts,
        settings: &SummarySettings,
    ) -> Self {
        Self {
            generator,
            store,
            prompts,
            max_context_chars: settings.max_context_chars,
            max_chunks_per_batch: settings.max_chunks_per_batch,
            max_concurrent: settings.max_concurrent_batches.max(1),
        }
    }

    /// Generate a comprehensive summary of an entire video.
    ///
    /// Returns `("", [])` when the video has no indexed chunks, a valid
    /// "nothing found" result. Sources are five representative samples
    /// spread across the video, not similarity matches.
    #[instrument(skip(self))]
    pub async fn summarize_video(
        &self,
        video_id: &str,
    ) -> Result<(String, Vec<RetrievedSource>)> {
        let mut chunks = self
            .store
            .get_by_video_id(video_id, MAX_FETCH_RESULTS)
            .await?;

        if chunks.is_empty() {
            warn!("No chunks found for video {}", video_id);
            return Ok((String::new(), Vec::new()));
        }

        // Vector-store order is by chunk index; restore strict chronological
        // order by timestamp before batching.
        chunks.sort_by(|a, b| {
            a.start_time
                .partial_cmp(&b.start_time)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let total_chars: usize = chunks.iter().map(|c| c.text.len()).sum();
        info!(
            "Summarizing video {}: {} chunks, ~{} chars",
            video_id,
            chunks.len(),
            total_chars
        );

        let summary = if total_chars <= self.max_context_chars
            && chunks.len() <= self.max_chunks_per_batch
        {
            debug!("Using single-pass summarization");
            self.summarize_batch(&chunks).await?
        } else {
            let batches = self.partition(&chunks);
            info!("Using hierarchical summarization: {} batches", batches.len());

            // Build the batch futures eagerly into concrete boxed `Send`
            // futures. Feeding a lazy `map` closure straight into `buffered`
            // forces the closure to be higher-ranked over the borrow of `b`,
            // which the compiler cannot prove once this future must be `Send`
            // (surfaces as "FnOnce/Send is not general enough"). Collecting
            // first pins a concrete lifetime; concurrency and order are
            // unchanged.
            let batch_futures: Vec<
                std::pin::Pin<Box<dyn std::future::Future<Output = Result<String>> + Send + '_>>,
            > = batches
                .iter()
                .map(|b| Box::pin(self.summarize_batch(b)) as _)
                .collect();
            let partials: Vec<String> = stream::iter(batch_futures)
                .buffered(self.max_concurrent)
                .try_collect()
                .await?;

            // The combine step is mandatory whenever partitioning produced
            // more than one batch: batch summaries are independently lossy
            // and must be reconciled.
            if partials.len() == 1 {
                partials.into_iter().next().expect("one partial")
            } else {
                self.combine(&partials).await?
            }
        };

        let sources = sample_sources(&chunks);
        info!("Summary generated for video {}", video_id);
        Ok((summary, sources))
    }

    /// Partition chunks chronologically into batches bounded by both the
    /// character budget and the chunk-count cap. Batches are never empty and
    /// preserve chronological order within and across.
    fn partition<'a>(&self, chunks: &'a [IndexedChunk]) -> Vec<&'a [IndexedChunk]> {
        let mut batches = Vec::new();
        let mut start = 0usize;
        let mut chars = 0usize;

        for (i, chunk) in chunks.iter().enumerate() {
            let len = chunk.text.len();

            // Adding this chunk would blow the budget: close the batch first.
            if chars + len > self.max_context_chars && i > start {
                batches.push(&chunks[start..i]);
                start = i;
                chars = 0;
            }
            chars += len;

            // Count cap triggers after adding.
            if i + 1 - start >= self.max_chunks_per_batch {
                batches.push(&chunks[start..i + 1]);
                start = i + 1;
                chars = 0;
            }
        }

        if start < chunks.len() {
            batches.push(&chunks[start..]);
        }

        batches
    }

    /// Summarize a single batch of chunks (one LLM call).
    async fn summarize_batch(&self, chunks: &[IndexedChunk]) -> Result<String> {
        let transcript = chunks
            .iter()
            .map(|c| c.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");

        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), transcript);
        let prompt = self
            .prompts
            .render_with_custom(&self.prompts.summary.batch, &vars);

        self.generator.generate(&prompt).await
    }

    /// Combine partial summaries into one cohesive summary (one LLM call).
    async fn combine(&self, partials: &[String]) -> Result<String> {
        let combined = partials
            .iter()
            .enumerate()
            .map(|(i, s)| format!("Part {}:\n{}", i + 1, s))
            .collect::<Vec<_>>()
            .join("\n\n---\n\n");

        let mut vars = HashMap::new();
        vars.insert("summaries".to_string(), combined);
        let prompt = self
            .prompts
            .render_with_custom(&self.prompts.summary.combine, &vars);

        self.generator.generate(&prompt).await
    }
}

/// Pick representative samples spread evenly across the chronological chunk
/// sequence: first, quarter, half, three-quarters, last. Duplicate indices
/// (small videos) are collapsed.
fn sample_sources(chunks: &[IndexedChunk]) -> Vec<RetrievedSource> {
    let n = chunks.len();
    if n == 0 {
        return Vec::new();
    }

    let mut indices = vec![0, n / 4, n / 2, 3 * n / 4, n - 1];
    indices.dedup();
    debug_assert!(indices.len() <= SAMPLE_COUNT);

    indices
        .into_iter()
        .map(|i| RetrievedSource {
            text: truncate_chars(&chunks[i].text, SAMPLE_TEXT_CHARS),
            start_time: chunks[i].start_time,
            // Not a similarity score: samples exist for citation only.
            score: 1.0,
        })
        .collect()
}

/// Truncate to at most `max` characters on a char boundary.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
