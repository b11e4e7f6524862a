//! Transcript fetching for asktube.
//!
//! A transcript is an ordered sequence of timestamped text segments fetched
//! from a captions API. Segments are cleaned (HTML entities, tags,
//! whitespace) before they reach the chunking stage.

mod clean;
mod fetch;

pub use clean::TranscriptCleaner;
pub use fetch::RapidApiTranscriptSource;

use crate::error::{AskTubeError, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single timestamped transcript segment, as produced by the source video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Cleaned caption text.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start: f64) -> Self {
        Self {
            text: text.into(),
            start,
        }
    }
}

/// Trait for transcript sources.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the transcript for a video, ordered by appearance.
    ///
    /// Returns `TranscriptUnavailable` when the video has no captions and
    /// `TranscriptFetch` on network/quota failures.
    async fn fetch(&self, video_id: &str) -> Result<Vec<TranscriptSegment>>;
}

/// Extract the 11-character video ID from a YouTube URL or bare ID.
///
/// Accepts watch, shorts, embed, /v/ and youtu.be forms.
pub fn extract_video_id(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AskTubeError::InvalidInput("URL cannot be empty".to_string()));
    }

    let re = Regex::new(
        r"(?x)
        (?:
            (?:https?://)?
            (?:www\.)?
            (?:youtube\.com/(?:watch\?(?:\S*?&)?v=|embed/|shorts/|v/)|youtu\.be/)
            ([a-zA-Z0-9_-]{11})
        )
        |
        ^([a-zA-Z0-9_-]{11})$
    ",
    )
    .expect("Invalid video ID regex");

    let caps = re.captures(input).ok_or_else(|| {
        AskTubeError::InvalidInput(format!("Not a recognized YouTube URL: {}", input))
    })?;

    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| AskTubeError::InvalidInput("Could not extract video ID".to_string()))
}

/// Build the canonical watch URL for a video.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}
