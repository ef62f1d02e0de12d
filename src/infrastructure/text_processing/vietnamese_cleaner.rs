use regex::Regex;

use crate::application::ports::TranscriptCleaner;

/// Cleanup pass for Vietnamese transcripts out of the local model: collapse
/// whitespace, fix spacing around punctuation, and capitalize sentence
/// starts. Remote API transcripts arrive already normalized and skip this.
pub struct VietnameseCleaner {
    space_before_punct: Regex,
    missing_space_after_punct: Regex,
}

impl VietnameseCleaner {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            space_before_punct: Regex::new(r"\s+([.,!?;:])")?,
            missing_space_after_punct: Regex::new(r"([.,!?;:])(\p{L})")?,
        })
    }

    fn capitalize_sentences(text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut at_sentence_start = true;
        for c in text.chars() {
            if at_sentence_start && c.is_alphabetic() {
                result.extend(c.to_uppercase());
                at_sentence_start = false;
            } else {
                if matches!(c, '.' | '!' | '?') {
                    at_sentence_start = true;
                } else if !c.is_whitespace() {
                    at_sentence_start = false;
                }
                result.push(c);
            }
        }
        result
    }
}

impl TranscriptCleaner for VietnameseCleaner {
    fn clean(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let no_space_before = self.space_before_punct.replace_all(&collapsed, "$1");
        let spaced_after = self
            .missing_space_after_punct
            .replace_all(&no_space_before, "$1 $2");

        Self::capitalize_sentences(spaced_after.trim())
    }
}
