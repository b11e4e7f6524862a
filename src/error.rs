//! Error types for asktube.

use thiserror::Error;

/// Library-level error type for asktube operations.
///
/// User-correctable problems surface as `InvalidInput`; everything else is
/// an upstream or internal failure. "No data found" situations (no
/// transcript chunks, no search matches) are NOT errors and are returned as
/// empty results by the components that hit them.
#[derive(Error, Debug)]
pub enum AskTubeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No transcript available: {0}")]
    TranscriptUnavailable(String),

    #[error("Transcript fetch failed: {0}")]
    TranscriptFetch(String),

    #[error("Chunking failed: {0}")]
    Chunking(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl AskTubeError {
    /// Whether the error is caused by bad caller input rather than an
    /// upstream/internal failure. Used to pick 4xx vs 5xx at the HTTP edge.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AskTubeError::InvalidInput(_) | AskTubeError::TranscriptUnavailable(_)
        )
    }
}

/// Result type alias for asktube operations.
pub type Result<T> = std::result::Result<T, AskTubeError>;
