//! Embedding generation for semantic search and retrieval.

mod openai;

pub use openai::OpenAIEmbedder;

use crate::error::Result;
use async_trait::async_trait;

/// Embedding task mode (asymmetric embedding).
///
/// Stored chunks and search queries are embedded differently: `Document` at
/// ingestion time, `Query` at search time. Implementations map the mode to
/// whatever their model supports (task types, text prefixes, or nothing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingMode {
    /// Embedding text for storage in the index.
    Document,
    /// Embedding a search query.
    Query,
}

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embeddings for multiple texts in the given mode.
    ///
    /// Returns one vector per input text, in input order.
    async fn embed(&self, texts: &[String], mode: EmbeddingMode) -> Result<Vec<Vec<f32>>>;

    /// Get the embedding dimensions.
    fn dimensions(&self) -> usize;
}
