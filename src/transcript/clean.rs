//! Caption text sanitization.
//!
//! Raw caption text arrives with HTML entities, occasional markup tags in
//! manual captions, and arbitrary line breaks. Everything downstream expects
//! plain single-spaced text.

use html_escape::decode_html_entities;
use regex::Regex;

/// Cleans raw caption text into plain single-spaced text.
pub struct TranscriptCleaner {
    tag_regex: Regex,
    whitespace_regex: Regex,
}

impl TranscriptCleaner {
    pub fn new() -> Self {
        Self {
            tag_regex: Regex::new(r"<[^>]+>").expect("Invalid tag regex"),
            whitespace_regex: Regex::new(r"\s+").expect("Invalid whitespace regex"),
        }
    }

    /// Clean a single caption segment.
    ///
    /// 1. Decodes HTML entities (e.g. `&#39;` -> `'`)
    /// 2. Strips markup tags (e.g. `<i>`, `<b>`)
    /// 3. Collapses all whitespace runs (newlines, nbsp) to single spaces
    pub fn clean(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let decoded = decode_html_entities(text);
        let stripped = self.tag_regex.replace_all(&decoded, "");
        let despaced = stripped.replace('\u{a0}', " ");

        self.whitespace_regex
            .replace_all(despaced.trim(), " ")
            .to_string()
    }
}

impl Default for TranscriptCleaner {
    fn default() -> Self {
        Self::new()
    }
}
