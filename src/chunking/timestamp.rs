//! Offset-to-timestamp mapping for concatenated transcripts.

use crate::transcript::TranscriptSegment;

/// Maps byte offsets in a concatenated transcript back to segment start times.
///
/// Built once per chunking run: segment texts are concatenated in order with
/// a single trailing space each, and the byte offset where each segment
/// begins is recorded alongside its start time. Offsets are strictly
/// increasing by construction.
#[derive(Debug, Clone, Default)]
pub struct OffsetMap {
    entries: Vec<(usize, f64)>,
}

impl OffsetMap {
    /// Concatenate segments and build the offset map in one pass.
    ///
    /// Returns the full concatenated text together with the map.
    pub fn build(segments: &[TranscriptSegment]) -> (String, OffsetMap) {
        let total: usize = segments.iter().map(|s| s.text.len() + 1).sum();
        let mut full_text = String::with_capacity(total);
        let mut entries = Vec::with_capacity(segments.len());

        for segment in segments {
            entries.push((full_text.len(), segment.start));
            full_text.push_str(&segment.text);
            full_text.push(' ');
        }

        (full_text, OffsetMap { entries })
    }

    /// Resolve a byte position to the start time of the segment containing it.
    ///
    /// Binary search for the last entry whose offset is <= `position`;
    /// positions before the first segment (or an empty map) resolve to 0.0.
    pub fn resolve(&self, position: usize) -> f64 {
        let idx = self.entries.partition_point(|&(offset, _)| offset <= position);
        if idx == 0 {
            0.0
        } else {
            self.entries[idx - 1].1
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
