//! asktube - YouTube video Q&A
//!
//! A retrieval-augmented question-answering backend over YouTube video
//! transcripts: fetch a transcript, split it into overlapping timestamped
//! chunks, embed and index them, then answer free-form questions (or produce
//! whole-video summaries) with timestamped citations.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `transcript` - Transcript fetching and cleaning
//! - `chunking` - Splitting transcripts into timestamped chunks
//! - `embedding` - Embedding generation (document/query modes)
//! - `llm` - Text generation
//! - `vector_store` - Vector index abstraction
//! - `ingest` - Embed-and-store pipeline
//! - `retrieval` - Top-k semantic retrieval per video
//! - `summary` - Hierarchical whole-video summarization
//! - `intent` - Query intent classification
//! - `answer` - RAG answer generation
//! - `router` - Intent-routed dispatch
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use asktube::config::Settings;
//! use asktube::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let result = orchestrator
//!         .process_video("https://www.youtube.com/watch?v=dQw4w9WgXcQ", false)
//!         .await?;
//!     println!("Indexed {} chunks", result.chunks_indexed);
//!
//!     let (answer, sources) = orchestrator
//!         .ask("What is this video about?", &result.video_id, &[])
//!         .await?;
//!     println!("{} ({} sources)", answer, sources.len());
//!
//!     Ok(())
//! }
//! ```

pub mod answer;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod intent;
pub mod llm;
pub mod openai;
pub mod orchestrator;
pub mod retrieval;
pub mod router;
pub mod summary;
pub mod transcript;
pub mod vector_store;

pub use error::{AskTubeError, Result};
