use crate::domain::TextChunk;

/// Splits long text into bounded, overlapping chunks for summarization.
/// Pure: same input, same chunks.
pub trait TextChunker: Send + Sync {
    fn chunk(&self, text: &str) -> Vec<TextChunk>;
}
