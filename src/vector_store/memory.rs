//! In-memory vector store implementation.
//!
//! Useful for testing and small datasets.

use super::{cosine_similarity, ChunkMatch, IndexedChunk, IndexedVideo, VectorStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory vector store.
pub struct MemoryVectorStore {
    chunks: RwLock<HashMap<String, IndexedChunk>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            chunks: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert_batch(&self, chunks: &[IndexedChunk]) -> Result<usize> {
        let mut store = self.chunks.write().unwrap();
        for chunk in chunks {
            store.insert(chunk.id.clone(), chunk.clone());
        }
        Ok(chunks.len())
    }

    async fn query(
        &self,
        query_embedding: &[f32],
        video_id: &str,
        top_k: usize,
    ) -> Result<Vec<ChunkMatch>> {
        let store = self.chunks.read().unwrap();

        let mut matches: Vec<ChunkMatch> = store
            .values()
            .filter(|c| c.video_id == video_id)
            .map(|chunk| ChunkMatch {
                score: cosine_similarity(query_embedding, &chunk.embedding),
                chunk: chunk.clone(),
            })
            .collect();

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(top_k);

        Ok(matches)
    }

    async fn get_by_video_id(&self, video_id: &str, limit: usize) -> Result<Vec<IndexedChunk>> {
        let store = self.chunks.read().unwrap();
        let mut result: Vec<IndexedChunk> = store
            .values()
            .filter(|c| c.video_id == video_id)
            .cloned()
            .collect();
        result.sort_by_key(|c| c.chunk_index);
        result.truncate(limit);
        Ok(result)
    }

    async fn is_video_indexed(&self, video_id: &str) -> Result<bool> {
        let store = self.chunks.read().unwrap();
        Ok(store.values().any(|c| c.video_id == video_id))
    }

    async fn delete_by_video_id(&self, video_id: &str) -> Result<usize> {
        let mut store = self.chunks.write().unwrap();
        let initial_len = store.len();
        store.retain(|_, chunk| chunk.video_id != video_id);
        Ok(initial_len - store.len())
    }

    async fn list_videos(&self) -> Result<Vec<IndexedVideo>> {
        let store = self.chunks.read().unwrap();

        let mut video_map: HashMap<String, IndexedVideo> = HashMap::new();

        for chunk in store.values() {
            let entry = video_map
                .entry(chunk.video_id.clone())
                .or_insert_with(|| IndexedVideo {
                    video_id: chunk.video_id.clone(),
                    chunk_count: 0,
                    indexed_at: chunk.indexed_at,
                });

            entry.chunk_count += 1;
            if chunk.indexed_at > entry.indexed_at {
                entry.indexed_at = chunk.indexed_at;
            }
        }

        let mut videos: Vec<IndexedVideo> = video_map.into_values().collect();
        videos.sort_by(|a, b| b.indexed_at.cmp(&a.indexed_at));

        Ok(videos)
    }

    async fn chunk_count(&self) -> Result<usize> {
        let store = self.chunks.read().unwrap();
        Ok(store.len())
    }
}
