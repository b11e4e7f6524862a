//! Vector store abstraction for asktube.
//!
//! Provides a trait-based interface for different vector index backends.
//! Queries are always hard-filtered to a single video so retrieval never
//! leaks chunks across videos.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::chunking::{format_seconds, Chunk};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chunk persisted in the vector index, embedding attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    /// Chunk ID (unique within the video).
    pub id: String,
    /// Video this chunk belongs to.
    pub video_id: String,
    /// Chunk text.
    pub text: String,
    /// Start time in seconds.
    pub start_time: f64,
    /// Position in the video's chunk sequence.
    pub chunk_index: usize,
    /// Watch URL with timestamp.
    pub source_url: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// When this chunk was indexed.
    pub indexed_at: DateTime<Utc>,
}

impl IndexedChunk {
    /// Attach an embedding to a chunk, completing it for persistence.
    pub fn from_chunk(chunk: Chunk, embedding: Vec<f32>) -> Self {
        Self {
            id: chunk.id,
            video_id: chunk.video_id,
            text: chunk.text,
            start_time: chunk.start_time,
            chunk_index: chunk.chunk_index,
            source_url: chunk.source_url,
            embedding,
            indexed_at: Utc::now(),
        }
    }

    /// Format the start time for display.
    pub fn format_timestamp(&self) -> String {
        format_seconds(self.start_time)
    }
}

/// A query match with similarity score.
#[derive(Debug, Clone)]
pub struct ChunkMatch {
    /// The matched chunk.
    pub chunk: IndexedChunk,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Summary information about an indexed video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedVideo {
    /// Video ID.
    pub video_id: String,
    /// Number of indexed chunks.
    pub chunk_count: u32,
    /// When the video was indexed.
    pub indexed_at: DateTime<Utc>,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Bulk upsert chunks, keyed by chunk id.
    async fn upsert_batch(&self, chunks: &[IndexedChunk]) -> Result<usize>;

    /// Find the `top_k` most similar chunks within one video.
    ///
    /// Results are ordered by descending similarity.
    async fn query(
        &self,
        query_embedding: &[f32],
        video_id: &str,
        top_k: usize,
    ) -> Result<Vec<ChunkMatch>>;

    /// Get up to `limit` chunks for a video, ordered by chunk index.
    async fn get_by_video_id(&self, video_id: &str, limit: usize) -> Result<Vec<IndexedChunk>>;

    /// Check if a video has any indexed chunks.
    async fn is_video_indexed(&self, video_id: &str) -> Result<bool>;

    /// Delete all chunks for a video (used by reprocessing, never by Q&A).
    async fn delete_by_video_id(&self, video_id: &str) -> Result<usize>;

    /// List all indexed videos.
    async fn list_videos(&self) -> Result<Vec<IndexedVideo>>;

    /// Get total chunk count.
    async fn chunk_count(&self) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
pub(crate) fn test_chunk(video_id: &str, index: usize, text: &str, start: f64, embedding: Vec<f32>) -> IndexedChunk {
    IndexedChunk {
        id: format!("{}_{}_test0000", video_id, index),
        video_id: video_id.to_string(),
        text: text.to_string(),
        start_time: start,
        chunk_index: index,
        source_url: format!("https://www.youtube.com/watch?v={}&t={}s", video_id, start as u64),
        embedding,
        indexed_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_degenerate() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_indexed_chunk_from_chunk() {
        let chunk = Chunk {
            id: "vid_0_abcd1234".to_string(),
            video_id: "vid".to_string(),
            text: "content".to_string(),
            start_time: 125.0,
            chunk_index: 0,
            source_url: "https://www.youtube.com/watch?v=vid&t=125s".to_string(),
        };

        let indexed = IndexedChunk::from_chunk(chunk, vec![0.1, 0.2]);
        assert_eq!(indexed.id, "vid_0_abcd1234");
        assert_eq!(indexed.embedding, vec![0.1, 0.2]);
        assert_eq!(indexed.format_timestamp(), "02:05");
    }
}
