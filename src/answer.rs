//! RAG answer generation.
//!
//! Assembles the final prompt (system instruction, retrieved context,
//! conversation history, question) and calls the LLM.

use crate::config::Prompts;
use crate::llm::TextGenerator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{instrument, warn};

/// A single turn of conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// "user" or "model".
    pub role: String,
    /// Message text.
    pub content: String,
}

/// Fallback response when generation fails.
const GENERATION_FAILED_MESSAGE: &str =
    "I apologize, but I encountered an error while processing your request. Please try again.";

/// Answer engine: builds the RAG prompt and generates the response.
pub struct AnswerEngine {
    generator: Arc<dyn TextGenerator>,
    prompts: Prompts,
}

impl AnswerEngine {
    pub fn new(generator: Arc<dyn TextGenerator>, prompts: Prompts) -> Self {
        Self { generator, prompts }
    }

    /// Generate an answer grounded in the retrieved context.
    ///
    /// LLM failures return a fixed apology message rather than propagating;
    /// the retrieval work is already done and the caller has sources to show.
    #[instrument(skip(self, context, history), fields(context_len = context.len(), turns = history.len()))]
    pub async fn generate_answer(
        &self,
        query: &str,
        context: &str,
        history: &[ChatTurn],
    ) -> String {
        let history_text = format_history(history);

        // The system instruction is baked into the prompt for stronger
        // adherence in RAG scenarios.
        let prompt = format!(
            "{}\n\n\
             --- START OF CONTEXT ---\n{}\n--- END OF CONTEXT ---\n\n\
             --- CONVERSATION HISTORY ---\n{}\n--- END OF HISTORY ---\n\n\
             User Question: {}\nAnswer:",
            self.prompts.answer.system, context, history_text, query
        );

        match self.generator.generate(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Answer generation failed: {}", e);
                GENERATION_FAILED_MESSAGE.to_string()
            }
        }
    }
}

/// Render chat history as "User:"/"AI:" lines.
fn format_history(history: &[ChatTurn]) -> String {
    if history.is_empty() {
        return "No previous conversation.".to_string();
    }

    let mut formatted = String::new();
    for turn in history {
        let role = if turn.role == "user" { "User" } else { "AI" };
        formatted.push_str(role);
        formatted.push_str(": ");
        formatted.push_str(&turn.content);
        formatted.push('\n');
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AskTubeError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct EchoGenerator {
        last_prompt: Mutex<String>,
        fail: bool,
    }

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            *self.last_prompt.lock().unwrap() = prompt.to_string();
            if self.fail {
                Err(AskTubeError::Llm("down".to_string()))
            } else {
                Ok("the answer".to_string())
            }
        }
    }

    #[test]
    fn test_format_history_empty() {
        assert_eq!(format_history(&[]), "No previous conversation.");
    }

    #[test]
    fn test_format_history_roles() {
        let history = vec![
            ChatTurn {
                role: "user".to_string(),
                content: "hi".to_string(),
            },
            ChatTurn {
                role: "model".to_string(),
                content: "hello".to_string(),
            },
        ];
        assert_eq!(format_history(&history), "User: hi\nAI: hello\n");
    }

    #[tokio::test]
    async fn test_prompt_contains_all_sections() {
        let generator = Arc::new(EchoGenerator {
            last_prompt: Mutex::new(String::new()),
            fail: false,
        });
        let engine = AnswerEngine::new(generator.clone(), Prompts::default());

        let answer = engine
            .generate_answer("what is this?", "some context", &[])
            .await;

        assert_eq!(answer, "the answer");
        let prompt = generator.last_prompt.lock().unwrap().clone();
        assert!(prompt.contains("some context"));
        assert!(prompt.contains("No previous conversation."));
        assert!(prompt.contains("User Question: what is this?"));
    }

    #[tokio::test]
    async fn test_failure_returns_apology() {
        let generator = Arc::new(EchoGenerator {
            last_prompt: Mutex::new(String::new()),
            fail: true,
        });
        let engine = AnswerEngine::new(generator, Prompts::default());

        let answer = engine.generate_answer("q", "ctx", &[]).await;
        assert_eq!(answer, GENERATION_FAILED_MESSAGE);
    }
}
