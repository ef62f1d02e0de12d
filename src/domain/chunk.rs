/// A bounded slice of text produced for summarization. `start_offset` is the
/// character offset of the chunk within the source text; consecutive chunks
/// overlap so context survives the cut.
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    pub index: usize,
    pub text: String,
    pub start_offset: usize,
}

impl TextChunk {
    pub fn new(index: usize, text: String, start_offset: usize) -> Self {
        Self {
            index,
            text,
            start_offset,
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}
