//! Text generation for summarization, answering, and classification.

mod openai;

pub use openai::OpenAIGenerator;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for single-turn text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
