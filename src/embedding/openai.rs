//! OpenAI embeddings implementation.

use super::{Embedder, EmbeddingMode};
use crate::config::EmbeddingSettings;
use crate::error::{AskTubeError, Result};
use crate::openai::create_client;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// OpenAI-based embedder.
///
/// Asymmetric embedding is expressed via optional mode prefixes: OpenAI's
/// embedding models have no task-type parameter, so models that benefit from
/// "query:"/"passage:" style prefixes can configure them; both default to
/// empty.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: usize,
    document_prefix: String,
    query_prefix: String,
}

impl OpenAIEmbedder {
    /// Create a new embedder from settings.
    pub fn new(settings: &EmbeddingSettings) -> Self {
        Self {
            client: create_client(),
            model: settings.model.clone(),
            dimensions: settings.dimensions as usize,
            document_prefix: settings.document_prefix.clone(),
            query_prefix: settings.query_prefix.clone(),
        }
    }

    fn apply_mode(&self, text: &str, mode: EmbeddingMode) -> String {
        let prefix = match mode {
            EmbeddingMode::Document => &self.document_prefix,
            EmbeddingMode::Query => &self.query_prefix,
        };
        if prefix.is_empty() {
            text.to_string()
        } else {
            format!("{}{}", prefix, text)
        }
    }
}

impl Default for OpenAIEmbedder {
    fn default() -> Self {
        Self::new(&EmbeddingSettings::default())
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, texts), fields(count = texts.len(), mode = ?mode))]
    async fn embed(&self, texts: &[String], mode: EmbeddingMode) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        // OpenAI has a limit on batch size, process in chunks
        const BATCH_SIZE: usize = 100;
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(BATCH_SIZE) {
            let input: Vec<String> = batch.iter().map(|t| self.apply_mode(t, mode)).collect();

            let request = CreateEmbeddingRequestArgs::default()
                .model(&self.model)
                .input(EmbeddingInput::StringArray(input))
                .dimensions(self.dimensions as u32)
                .build()
                .map_err(|e| AskTubeError::Embedding(format!("Failed to build request: {}", e)))?;

            let response = self
                .client
                .embeddings()
                .create(request)
                .await
                .map_err(|e| AskTubeError::Embedding(format!("Embedding API error: {}", e)))?;

            // Sort by index to ensure correct order
            let mut embeddings: Vec<_> = response.data.into_iter().collect();
            embeddings.sort_by_key(|e| e.index);

            for embedding_data in embeddings {
                all_embeddings.push(embedding_data.embedding);
            }
        }

        if all_embeddings.len() != texts.len() {
            return Err(AskTubeError::Embedding(format!(
                "Embedding count mismatch: got {} for {} texts",
                all_embeddings.len(),
                texts.len()
            )));
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_dimensions_from_settings() {
        let embedder = OpenAIEmbedder::default();
        assert_eq!(embedder.dimensions(), 768);

        let settings = EmbeddingSettings {
            dimensions: 1536,
            ..EmbeddingSettings::default()
        };
        assert_eq!(OpenAIEmbedder::new(&settings).dimensions(), 1536);
    }

    #[test]
    fn test_mode_prefixes() {
        let settings = EmbeddingSettings {
            document_prefix: "passage: ".to_string(),
            query_prefix: "query: ".to_string(),
            ..EmbeddingSettings::default()
        };
        let embedder = OpenAIEmbedder::new(&settings);

        assert_eq!(
            embedder.apply_mode("hello", EmbeddingMode::Document),
            "passage: hello"
        );
        assert_eq!(
            embedder.apply_mode("hello", EmbeddingMode::Query),
            "query: hello"
        );
    }
}
