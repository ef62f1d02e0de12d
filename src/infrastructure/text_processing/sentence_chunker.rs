use crate::application::ports::TextChunker;
use crate::domain::TextChunk;

/// Character-budget chunker that prefers to cut at sentence ends. Each window
/// runs up to `max_chars`; the cut point backs up to the nearest sentence
/// ending within the last fifth of the window, falling back to a paragraph
/// break, then a word boundary, then a hard cut. The next window starts
/// `overlap_chars` before the previous cut.
pub struct SentenceChunker {
    max_chars: usize,
    overlap_chars: usize,
}

impl SentenceChunker {
    pub fn new(max_chars: usize, overlap_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
            overlap_chars: overlap_chars.min(max_chars.saturating_sub(1)),
        }
    }

    /// Best cut index in `(search_start, hard_end]`, counted in chars.
    fn find_break(&self, chars: &[char], start: usize, hard_end: usize) -> usize {
        let window = hard_end - start;
        let search_start = start + window * 4 / 5;

        // Sentence ending: terminal punctuation followed by whitespace. The
        // cut lands after the whitespace so the next chunk starts clean.
        let mut i = hard_end;
        while i >= search_start + 2 {
            if matches!(chars[i - 2], '.' | '!' | '?') && chars[i - 1].is_whitespace() {
                return i;
            }
            i -= 1;
        }

        let mut i = hard_end;
        while i >= search_start + 2 {
            if chars[i - 2] == '\n' && chars[i - 1] == '\n' {
                return i;
            }
            i -= 1;
        }

        let mut i = hard_end;
        while i > search_start {
            if chars[i - 1] == ' ' {
                return i;
            }
            i -= 1;
        }

        hard_end
    }
}

impl TextChunker for SentenceChunker {
    fn chunk(&self, text: &str) -> Vec<TextChunk> {
        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();

        if total <= self.max_chars {
            return vec![TextChunk::new(0, text.to_string(), 0)];
        }

        let mut chunks = Vec::new();
        let mut pos = 0usize;
        let mut index = 0usize;

        while pos < total {
            let hard_end = (pos + self.max_chars).min(total);
            let end = if hard_end < total {
                self.find_break(&chars, pos, hard_end)
            } else {
                hard_end
            };

            let chunk_text: String = chars[pos..end].iter().collect();
            if !chunk_text.trim().is_empty() {
                chunks.push(TextChunk::new(index, chunk_text, pos));
                index += 1;
            }

            if end >= total {
                break;
            }
            // Always advance even when the overlap would rewind past the
            // current position.
            pos = (end.saturating_sub(self.overlap_chars)).max(pos + 1);
        }

        chunks
    }
}
