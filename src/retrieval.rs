//! Semantic retrieval and context construction.
//!
//! Embeds a question, searches the vector index scoped to one video, and
//! assembles ranked context text plus citation sources.

use crate::embedding::{Embedder, EmbeddingMode};
use crate::error::{AskTubeError, Result};
use crate::vector_store::VectorStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A citation row returned alongside generated responses.
///
/// For retrieval the score is the similarity of the match; for summary
/// samples it is a placeholder 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedSource {
    /// Chunk text (possibly truncated for summary samples).
    pub text: String,
    /// Start time in seconds.
    pub start_time: f64,
    /// Similarity score, or 1.0 for summary samples.
    pub score: f32,
}

/// Retrieval engine for question answering.
pub struct RetrievalEngine {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    top_k: usize,
}

impl RetrievalEngine {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            store,
            top_k: 10,
        }
    }

    /// Set the number of chunks to retrieve.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Retrieve context for a question, scoped to one video.
    ///
    /// Returns the concatenated context string and a parallel source list in
    /// descending similarity order. Empty query/video_id or zero matches
    /// yield `("", [])`; "nothing found" is a valid result, not an error.
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn get_context(
        &self,
        query: &str,
        video_id: &str,
    ) -> Result<(String, Vec<RetrievedSource>)> {
        if query.trim().is_empty() || video_id.trim().is_empty() {
            warn!("Empty query or video_id for context retrieval");
            return Ok((String::new(), Vec::new()));
        }

        // Queries embed in Query mode; stored chunks were embedded in
        // Document mode (asymmetric embedding).
        let vectors = self
            .embedder
            .embed(&[query.to_string()], EmbeddingMode::Query)
            .await?;
        let query_vector = vectors
            .into_iter()
            .next()
            .ok_or_else(|| AskTubeError::Embedding("Empty embedding response".to_string()))?;

        let matches = self.store.query(&query_vector, video_id, self.top_k).await?;

        if matches.is_empty() {
            warn!("No relevant matches found for video {}", video_id);
            return Ok((String::new(), Vec::new()));
        }

        let mut context_parts = Vec::with_capacity(matches.len());
        let mut sources = Vec::with_capacity(matches.len());

        // Matches arrive sorted by descending similarity; context and
        // sources preserve that order.
        for m in matches {
            sources.push(RetrievedSource {
                text: m.chunk.text.clone(),
                start_time: m.chunk.start_time,
                score: m.score,
            });
            context_parts.push(m.chunk.text);
        }

        let context = context_parts.join("\n\n");
        info!(
            "Context constructed: {} chunks, {} chars",
            sources.len(),
            context.len()
        );

        Ok((context, sources))
    }
}
