//! Prompt templates for asktube.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub summary: SummaryPrompts,
    pub answer: AnswerPrompts,
    pub intent: IntentPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}


/// Prompts for whole-video summarization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPrompts {
    /// Summarizes one batch of transcript chunks.
    pub batch: String,
    /// Merges several partial summaries into one.
    pub combine: String,
}

impl Default for SummaryPrompts {
    fn default() -> Self {
        Self {
            batch: r#"You are a professional video content summarizer.

Based on the following video transcript segments, provide a comprehensive summary of the video.

Guidelines:
- Capture ALL main topics and key points discussed
- Organize information logically
- Use bullet points for clarity where appropriate
- Include important details, examples, and conclusions
- Be thorough but concise

--- VIDEO TRANSCRIPT ---
{{transcript}}
--- END TRANSCRIPT ---

Provide a comprehensive summary:"#
                .to_string(),

            combine: r#"You are a professional video content summarizer.

The following are summaries of different parts of a long video. Combine them into one cohesive, comprehensive summary.

Guidelines:
- Merge related topics that appear in multiple parts
- Eliminate redundancy while preserving all unique information
- Organize the final summary logically
- Maintain a natural flow

--- PARTIAL SUMMARIES ---
{{summaries}}
--- END SUMMARIES ---

Provide the unified comprehensive summary:"#
                .to_string(),
        }
    }
}

/// Prompts for RAG answer generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerPrompts {
    /// System instruction baked into the answer prompt.
    pub system: String,
}

impl Default for AnswerPrompts {
    fn default() -> Self {
        Self {
            system: "You are a helpful and intelligent AI assistant tailored for YouTube video Q&A. \
                     Your goal is to answer the user's question accurately using ONLY the provided \
                     Video Transcript Context. If the answer is not in the context, politely state \
                     that the information is not mentioned in the video. Do not hallucinate or use \
                     outside knowledge."
                .to_string(),
        }
    }
}

/// Prompt for query intent classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentPrompts {
    pub classify: String,
}

impl Default for IntentPrompts {
    fn default() -> Self {
        Self {
            classify: r#"You are an intent classifier for a YouTube video Q&A application.

Your task: Determine if the user wants a FULL SUMMARY of the entire video, or if they have a SPECIFIC question about a topic in the video.

FULL_VIDEO_SUMMARY - User wants:
- A complete overview of the video
- Summary of all main topics covered
- General "what is this video about" questions

SPECIFIC_QUERY - User wants:
- Information about a specific topic, concept, or section
- Summary of a PARTICULAR part/topic (not the whole video)
- Answers to specific questions

Examples:
- "Give me a summary" -> FULL_VIDEO_SUMMARY
- "What are the main points?" -> FULL_VIDEO_SUMMARY
- "Summarize the part about machine learning" -> SPECIFIC_QUERY
- "What does he say about Python?" -> SPECIFIC_QUERY
- "What are the key points about security?" -> SPECIFIC_QUERY

User Query: {{query}}

Respond with ONLY one word: either FULL_VIDEO_SUMMARY or SPECIFIC_QUERY"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let summary_path = custom_path.join("summary.toml");
            if summary_path.exists() {
                let content = std::fs::read_to_string(&summary_path)?;
                prompts.summary = toml::from_str(&content)?;
            }

            let answer_path = custom_path.join("answer.toml");
            if answer_path.exists() {
                let content = std::fs::read_to_string(&answer_path)?;
                prompts.answer = toml::from_str(&content)?;
            }

            let intent_path = custom_path.join("intent.toml");
            if intent_path.exists() {
                let content = std::fs::read_to_string(&intent_path)?;
                prompts.intent = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.summary.batch.contains("{{transcript}}"));
        assert!(prompts.summary.combine.contains("{{summaries}}"));
        assert!(prompts.intent.classify.contains("{{query}}"));
        assert!(!prompts.answer.system.is_empty());
    }

    #[test]
    fn test_render_template() {
        let template = "Summarize {{count}} chunks from {{video}}.";
        let mut vars = std::collections::HashMap::new();
        vars.insert("count".to_string(), "12".to_string());
        vars.insert("video".to_string(), "abc123".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Summarize 12 chunks from abc123.");
    }
}
