//! Configuration module for asktube.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AnswerPrompts, IntentPrompts, Prompts, SummaryPrompts};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, GeneralSettings, PromptSettings, RagSettings,
    ServerSettings, Settings, SummarySettings, TranscriptSettings, VectorStoreSettings,
};
