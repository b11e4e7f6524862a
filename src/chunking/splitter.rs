//! Recursive character splitting with exact source offsets.
//!
//! Splits long text on a separator hierarchy (paragraph, line, word, raw
//! characters), merging adjacent small parts into size-bounded pieces with a
//! configurable overlap. Every piece carries the byte offset where it starts
//! in the input, so callers never have to re-locate a piece by string search.

use std::collections::VecDeque;

/// One output piece with its exact position in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPiece {
    /// Piece text (trimmed when trimming is enabled).
    pub text: String,
    /// Byte offset of the first character of `text` in the input.
    pub offset: usize,
}

/// Recursive splitter honoring a separator priority list.
///
/// Size and overlap are measured in bytes; all cuts land on char boundaries.
/// Splitting on a coarse separator keeps semantically coherent units (whole
/// paragraphs, sentences) together; finer separators and finally raw
/// character windows bound the piece size when a unit is too large.
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
    trim: bool,
}

impl RecursiveSplitter {
    /// Create a splitter with the default separator hierarchy and trimming on.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
            separators: Self::default_separators(),
            trim: true,
        }
    }

    /// Paragraph, line, word, then raw characters.
    pub fn default_separators() -> Vec<String> {
        vec![
            "\n\n".to_string(),
            "\n".to_string(),
            " ".to_string(),
            String::new(),
        ]
    }

    /// Override the separator priority list. An empty-string entry means
    /// "fall back to raw character windows".
    pub fn with_separators(mut self, separators: Vec<String>) -> Self {
        self.separators = separators;
        self
    }

    /// Enable or disable whitespace trimming of output pieces.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Split `text` into pieces, returning piece texts only.
    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_with_offsets(text)
            .into_iter()
            .map(|p| p.text)
            .collect()
    }

    /// Split `text` into pieces with exact source offsets, in source order.
    pub fn split_with_offsets(&self, text: &str) -> Vec<SplitPiece> {
        let mut out = Vec::new();
        if !text.is_empty() {
            self.split_level(text, 0, &self.separators, &mut out);
        }
        out
    }

    /// Split one level of the hierarchy: pick the first separator that occurs
    /// in `text`, split into contiguous parts (separator kept on the tail of
    /// each part), merge small parts and recurse into oversized ones.
    fn split_level(
        &self,
        text: &str,
        base: usize,
        separators: &[String],
        out: &mut Vec<SplitPiece>,
    ) {
        let found = separators
            .iter()
            .position(|s| s.is_empty() || text.contains(s.as_str()));

        let Some(i) = found else {
            // Nothing in the hierarchy applies; cut raw character windows.
            self.hard_slice(text, base, out);
            return;
        };

        let sep = &separators[i];
        let rest = &separators[i + 1..];

        if sep.is_empty() {
            self.hard_slice(text, base, out);
            return;
        }

        let mut run: Vec<(usize, usize)> = Vec::new();
        let mut pos = 0usize;

        for part in text.split_inclusive(sep.as_str()) {
            let (off, len) = (pos, part.len());
            pos += len;

            if len <= self.chunk_size {
                run.push((off, len));
                continue;
            }

            // Oversized part: flush the pending run, then split it finer.
            if !run.is_empty() {
                self.merge_run(text, base, &run, out);
                run.clear();
            }
            if rest.is_empty() {
                self.hard_slice(&text[off..off + len], base + off, out);
            } else {
                self.split_level(&text[off..off + len], base + off, rest, out);
            }
        }

        if !run.is_empty() {
            self.merge_run(text, base, &run, out);
        }
    }

    /// Merge a run of contiguous small parts into pieces of at most
    /// `chunk_size` bytes, retaining roughly `chunk_overlap` bytes of source
    /// tail between adjacent pieces. Because parts are contiguous slices of
    /// `text`, each merged piece is itself a direct source slice.
    fn merge_run(
        &self,
        text: &str,
        base: usize,
        parts: &[(usize, usize)],
        out: &mut Vec<SplitPiece>,
    ) {
        let mut window: VecDeque<(usize, usize)> = VecDeque::new();
        let mut window_len = 0usize;

        for &(off, len) in parts {
            if window_len + len > self.chunk_size && !window.is_empty() {
                let start = window.front().expect("window non-empty").0;
                self.emit(&text[start..start + window_len], base + start, out);

                while !window.is_empty()
                    && (window_len > self.chunk_overlap || window_len + len > self.chunk_size)
                {
                    let (_, popped) = window.pop_front().expect("window non-empty");
                    window_len -= popped;
                }
            }
            window.push_back((off, len));
            window_len += len;
        }

        if let Some(&(start, _)) = window.front() {
            self.emit(&text[start..start + window_len], base + start, out);
        }
    }

    /// Cut raw character windows of at most `chunk_size` bytes, stepping by
    /// `chunk_size - chunk_overlap`, never splitting inside a char.
    fn hard_slice(&self, text: &str, base: usize, out: &mut Vec<SplitPiece>) {
        if text.is_empty() {
            return;
        }
        let stride = (self.chunk_size - self.chunk_overlap).max(1);

        let mut start = 0usize;
        loop {
            let mut end = floor_char_boundary(text, (start + self.chunk_size).min(text.len()));
            if end <= start {
                // chunk_size smaller than one char: take the whole char anyway
                end = start
                    + text[start..]
                        .chars()
                        .next()
                        .map(|c| c.len_utf8())
                        .unwrap_or(1);
            }
            self.emit(&text[start..end], base + start, out);

            if end >= text.len() {
                break;
            }
            let next = floor_char_boundary(text, start + stride);
            start = if next > start { next } else { end };
        }
    }

    /// Emit a piece, applying trimming and dropping whitespace-only slices.
    fn emit(&self, slice: &str, offset: usize, out: &mut Vec<SplitPiece>) {
        if self.trim {
            let trimmed = slice.trim();
            if trimmed.is_empty() {
                return;
            }
            let lead = slice.len() - slice.trim_start().len();
            out.push(SplitPiece {
                text: trimmed.to_string(),
                offset: offset + lead,
            });
        } else if !slice.is_empty() {
            out.push(SplitPiece {
                text: slice.to_string(),
                offset,
            });
        }
    }
}

impl Default for RecursiveSplitter {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}

/// Largest char boundary <= index.
fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
