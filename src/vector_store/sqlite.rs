//! SQLite-based vector store implementation.
//!
//! Uses SQLite with cosine similarity computed in Rust for simplicity.
//! For production use cases with large datasets, consider the sqlite-vec
//! extension or a dedicated vector database.

use super::{cosine_similarity, ChunkMatch, IndexedChunk, IndexedVideo, VectorStore};
use crate::error::{AskTubeError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

/// SQLite-based vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS chunks (
    id TEXT PRIMARY KEY,
    video_id TEXT NOT NULL,
    text TEXT NOT NULL,
    start_time REAL NOT NULL,
    chunk_index INTEGER NOT NULL,
    source_url TEXT NOT NULL,
    embedding BLOB NOT NULL,
    indexed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chunks_video_id ON chunks(video_id);
"#;

impl SqliteVectorStore {
    /// Create a new SQLite vector store.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite vector store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite vector store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| AskTubeError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }

    /// Serialize embedding to little-endian bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn row_to_chunk(row: &Row<'_>) -> rusqlite::Result<IndexedChunk> {
        let embedding_bytes: Vec<u8> = row.get(6)?;
        let chunk_index: i64 = row.get(4)?;
        let indexed_at_str: String = row.get(7)?;

        Ok(IndexedChunk {
            id: row.get(0)?,
            video_id: row.get(1)?,
            text: row.get(2)?,
            start_time: row.get(3)?,
            chunk_index: chunk_index as usize,
            source_url: row.get(5)?,
            embedding: Self::bytes_to_embedding(&embedding_bytes),
            indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

const SELECT_COLUMNS: &str =
    "id, video_id, text, start_time, chunk_index, source_url, embedding, indexed_at";

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, chunks), fields(count = chunks.len()))]
    async fn upsert_batch(&self, chunks: &[IndexedChunk]) -> Result<usize> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;

        for chunk in chunks {
            let embedding_bytes = Self::embedding_to_bytes(&chunk.embedding);

            tx.execute(
                r#"
                INSERT OR REPLACE INTO chunks
                (id, video_id, text, start_time, chunk_index, source_url, embedding, indexed_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    chunk.id,
                    chunk.video_id,
                    chunk.text,
                    chunk.start_time,
                    chunk.chunk_index as i64,
                    chunk.source_url,
                    embedding_bytes,
                    chunk.indexed_at.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        info!("Batch upserted {} chunks", chunks.len());
        Ok(chunks.len())
    }

    #[instrument(skip(self, query_embedding))]
    async fn query(
        &self,
        query_embedding: &[f32],
        video_id: &str,
        top_k: usize,
    ) -> Result<Vec<ChunkMatch>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM chunks WHERE video_id = ?1",
            SELECT_COLUMNS
        ))?;

        let rows = stmt.query_map(params![video_id], Self::row_to_chunk)?;

        let mut matches: Vec<ChunkMatch> = rows
            .filter_map(|row| row.ok())
            .map(|chunk| ChunkMatch {
                score: cosine_similarity(query_embedding, &chunk.embedding),
                chunk,
            })
            .collect();

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(top_k);

        debug!("Found {} matches for video {}", matches.len(), video_id);
        Ok(matches)
    }

    #[instrument(skip(self))]
    async fn get_by_video_id(&self, video_id: &str, limit: usize) -> Result<Vec<IndexedChunk>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM chunks WHERE video_id = ?1 ORDER BY chunk_index LIMIT ?2",
            SELECT_COLUMNS
        ))?;

        let rows = stmt.query_map(params![video_id, limit as i64], Self::row_to_chunk)?;
        let result: Vec<IndexedChunk> = rows.filter_map(|row| row.ok()).collect();

        debug!("Found {} chunks for video {}", result.len(), video_id);
        Ok(result)
    }

    async fn is_video_indexed(&self, video_id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM chunks WHERE video_id = ?1",
            params![video_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn delete_by_video_id(&self, video_id: &str) -> Result<usize> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM chunks WHERE video_id = ?1", params![video_id])?;

        info!("Deleted {} chunks for video {}", deleted, video_id);
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn list_videos(&self) -> Result<Vec<IndexedVideo>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT video_id, COUNT(*) as chunk_count, MAX(indexed_at) as indexed_at
            FROM chunks
            GROUP BY video_id
            ORDER BY indexed_at DESC
            "#,
        )?;

        let videos = stmt.query_map([], |row| {
            let indexed_at_str: String = row.get(2)?;
            Ok(IndexedVideo {
                video_id: row.get(0)?,
                chunk_count: row.get(1)?,
                indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;

        Ok(videos.filter_map(|v| v.ok()).collect())
    }

    async fn chunk_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::test_chunk;

    #[tokio::test]
    async fn test_sqlite_store_roundtrip() {
        let store = SqliteVectorStore::in_memory().unwrap();

        let chunks = vec![
            test_chunk("video1", 0, "This is test content", 0.0, vec![1.0, 0.0, 0.0]),
            test_chunk("video1", 1, "More test content", 60.0, vec![0.0, 1.0, 0.0]),
        ];

        store.upsert_batch(&chunks).await.unwrap();

        assert!(store.is_video_indexed("video1").await.unwrap());
        assert!(!store.is_video_indexed("video2").await.unwrap());

        let matches = store.query(&[1.0, 0.0, 0.0], "video1", 10).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert!((matches[0].score - 1.0).abs() < 0.001);
        assert_eq!(matches[0].chunk.text, "This is test content");

        let fetched = store.get_by_video_id("video1", 100).await.unwrap();
        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].chunk_index, 0);
        assert_eq!(fetched[0].start_time, 0.0);
        assert_eq!(fetched[1].start_time, 60.0);

        let deleted = store.delete_by_video_id("video1").await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(store.chunk_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sqlite_store_persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.db");

        {
            let store = SqliteVectorStore::new(&path).unwrap();
            store
                .upsert_batch(&[test_chunk("vid", 0, "persisted", 5.0, vec![0.5, 0.5])])
                .await
                .unwrap();
        }

        let reopened = SqliteVectorStore::new(&path).unwrap();
        let chunks = reopened.get_by_video_id("vid", 10).await.unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "persisted");
        assert_eq!(chunks[0].embedding, vec![0.5, 0.5]);
    }

    #[tokio::test]
    async fn test_query_filters_by_video() {
        let store = SqliteVectorStore::in_memory().unwrap();
        store
            .upsert_batch(&[
                test_chunk("a", 0, "video a", 0.0, vec![1.0, 0.0]),
                test_chunk("b", 0, "video b", 0.0, vec![1.0, 0.0]),
            ])
            .await
            .unwrap();

        let matches = store.query(&[1.0, 0.0], "a", 10).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].chunk.video_id, "a");
    }

    #[tokio::test]
    async fn test_list_videos_groups_by_video() {
        let store = SqliteVectorStore::in_memory().unwrap();
        store
            .upsert_batch(&[
                test_chunk("a", 0, "one", 0.0, vec![1.0]),
                test_chunk("a", 1, "two", 10.0, vec![1.0]),
                test_chunk("b", 0, "three", 0.0, vec![1.0]),
            ])
            .await
            .unwrap();

        let videos = store.list_videos().await.unwrap();
        assert_eq!(videos.len(), 2);
        let a = videos.iter().find(|v| v.video_id == "a").unwrap();
        assert_eq!(a.chunk_count, 2);
    }
}
