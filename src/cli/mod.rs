//! CLI module for asktube.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// asktube - YouTube video Q&A
///
/// Index YouTube transcripts into a vector store and ask questions about
/// them, with timestamped citations.
#[derive(Parser, Debug)]
#[command(name = "asktube")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize asktube configuration and verify API keys
    Init,

    /// Fetch, chunk, and index a video transcript
    Process {
        /// YouTube URL or video ID
        url: String,

        /// Force re-processing even if already indexed
        #[arg(short, long)]
        force: bool,
    },

    /// Ask a question about an indexed video
    Ask {
        /// The question to ask
        question: String,

        /// Video ID (or URL) to ask about
        #[arg(short, long)]
        video: String,
    },

    /// Generate a full summary of an indexed video
    Summarize {
        /// Video ID (or URL) to summarize
        video_id: String,
    },

    /// List indexed videos
    List,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "rag.model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Show configuration file path
    Path,
}
