//! Transcript chunking for vector ingestion.
//!
//! Turns a raw timestamped transcript into an ordered sequence of
//! size-bounded, timestamped chunks ready for embedding. The splitter
//! reports exact source offsets for every piece, so each chunk's timestamp
//! comes straight from the offset map with no re-matching.

mod splitter;
mod timestamp;

pub use splitter::{RecursiveSplitter, SplitPiece};
pub use timestamp::OffsetMap;

use crate::config::ChunkingSettings;
use crate::transcript::{watch_url, TranscriptSegment};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// A timestamped span of transcript text, the unit of embedding/retrieval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique within one video: "{video_id}_{index}_{8-char suffix}".
    pub id: String,
    /// Video this chunk belongs to.
    pub video_id: String,
    /// Chunk text (non-empty).
    pub text: String,
    /// Start time in seconds of the segment where this chunk begins.
    pub start_time: f64,
    /// Position of this chunk in the video's chunk sequence.
    pub chunk_index: usize,
    /// Watch URL jumping straight to this chunk's timestamp.
    pub source_url: String,
}

impl Chunk {
    /// Format the start time for display (MM:SS or HH:MM:SS).
    pub fn format_timestamp(&self) -> String {
        format_seconds(self.start_time)
    }
}

/// Format seconds for display (MM:SS or HH:MM:SS).
pub fn format_seconds(seconds: f64) -> String {
    let total_seconds = seconds as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Splits transcripts into timestamped chunks.
pub struct TranscriptChunker {
    splitter: RecursiveSplitter,
}

impl TranscriptChunker {
    pub fn new() -> Self {
        Self::with_settings(&ChunkingSettings::default())
    }

    pub fn with_settings(settings: &ChunkingSettings) -> Self {
        Self {
            splitter: RecursiveSplitter::new(settings.chunk_size, settings.chunk_overlap),
        }
    }

    /// Chunk a transcript into timestamped, identified chunks.
    ///
    /// Empty input (or input whose every piece trims to nothing) yields an
    /// empty sequence with a warning; this method never fails.
    #[instrument(skip(self, segments), fields(count = segments.len()))]
    pub fn chunk(&self, video_id: &str, segments: &[TranscriptSegment]) -> Vec<Chunk> {
        if segments.is_empty() {
            warn!("No transcript segments provided for video {}", video_id);
            return Vec::new();
        }

        let (full_text, offset_map) = OffsetMap::build(segments);
        let pieces = self.splitter.split_with_offsets(&full_text);

        debug!(
            "Splitter produced {} pieces from {} chars for video {}",
            pieces.len(),
            full_text.len(),
            video_id
        );

        let chunks: Vec<Chunk> = pieces
            .into_iter()
            .enumerate()
            .map(|(index, piece)| {
                let start_time = offset_map.resolve(piece.offset);
                Chunk {
                    id: chunk_id(video_id, index),
                    video_id: video_id.to_string(),
                    source_url: format!("{}&t={}s", watch_url(video_id), start_time as u64),
                    text: piece.text,
                    start_time,
                    chunk_index: index,
                }
            })
            .collect();

        if chunks.is_empty() {
            warn!("Chunking resulted in 0 chunks for video {}", video_id);
        } else {
            info!("Created {} chunks for video {}", chunks.len(), video_id);
        }

        chunks
    }
}

impl Default for TranscriptChunker {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a chunk id unique within the video.
fn chunk_id(video_id: &str, index: usize) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}", video_id, index, &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_transcript_yields_no_chunks() {
        let chunker = TranscriptChunker::new();
        assert!(chunker.chunk("vid", &[]).is_empty());
    }

    #[test]
    fn test_two_segment_transcript() {
        let chunker = TranscriptChunker::new();
        let segments = vec![
            TranscriptSegment::new("Hello", 0.0),
            TranscriptSegment::new("world", 5.0),
        ];

        let chunks = chunker.chunk("abc123def45", &segments);

        assert!(!chunks.is_empty());
        assert_eq!(chunks[0].start_time, 0.0);
        assert_eq!(chunks[0].chunk_index, 0);
        assert!(chunks[0].source_url.contains("v=abc123def45"));
        assert!(chunks[0].source_url.contains("t=0s"));
        assert!(chunks[0].id.starts_with("abc123def45_0_"));
    }

    #[test]
    fn test_single_chunk_when_under_size() {
        let chunker = TranscriptChunker::new();
        let segments = vec![
            TranscriptSegment::new("A B C", 0.0),
            TranscriptSegment::new("D E F", 3.0),
        ];

        let chunks = chunker.chunk("vid", &segments);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "A B C D E F");
        assert_eq!(chunks[0].start_time, 0.0);
    }

    #[test]
    fn test_timestamps_non_decreasing() {
        let chunker = TranscriptChunker::with_settings(&ChunkingSettings {
            chunk_size: 60,
            chunk_overlap: 12,
        });
        let segments: Vec<TranscriptSegment> = (0..40)
            .map(|i| TranscriptSegment::new(format!("sentence number {} of the talk", i), i as f64 * 4.0))
            .collect();

        let chunks = chunker.chunk("vid", &segments);

        assert!(chunks.len() > 1);
        let mut last = 0.0;
        for chunk in &chunks {
            assert!(
                chunk.start_time >= last,
                "timestamps went backwards at chunk {}",
                chunk.chunk_index
            );
            last = chunk.start_time;
        }
    }

    #[test]
    fn test_chunk_indices_sequential() {
        let chunker = TranscriptChunker::with_settings(&ChunkingSettings {
            chunk_size: 50,
            chunk_overlap: 10,
        });
        let segments: Vec<TranscriptSegment> = (0..30)
            .map(|i| TranscriptSegment::new(format!("words spoken at step {}", i), i as f64))
            .collect();

        let chunks = chunker.chunk("vid", &segments);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i);
        }
    }

    #[test]
    fn test_rechunking_is_deterministic_modulo_ids() {
        let chunker = TranscriptChunker::new();
        let segments: Vec<TranscriptSegment> = (0..100)
            .map(|i| {
                TranscriptSegment::new(
                    format!("segment {} talks about topic {}", i, i % 7),
                    i as f64 * 5.0,
                )
            })
            .collect();

        let first = chunker.chunk("vid", &segments);
        let second = chunker.chunk("vid", &segments);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.text, b.text);
            assert_eq!(a.start_time, b.start_time);
            assert_eq!(a.chunk_index, b.chunk_index);
            // ids intentionally differ (random suffix)
        }
    }
}
