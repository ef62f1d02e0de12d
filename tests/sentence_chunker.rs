use referat::application::ports::TextChunker;
use referat::infrastructure::text_processing::SentenceChunker;

const STANDARD_MAX_CHARS: usize = 2000;
const STANDARD_OVERLAP: usize = 200;
const SMALL_MAX_CHARS: usize = 50;
const SMALL_OVERLAP: usize = 10;

#[test]
fn given_text_under_budget_when_chunking_then_single_chunk_equals_input() {
    let chunker = SentenceChunker::new(STANDARD_MAX_CHARS, STANDARD_OVERLAP);
    let text = "A short meeting. Nothing to split here.";

    let chunks = chunker.chunk(text);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, text);
    assert_eq!(chunks[0].index, 0);
    assert_eq!(chunks[0].start_offset, 0);
}

#[test]
fn given_text_at_exact_budget_when_chunking_then_single_chunk() {
    let chunker = SentenceChunker::new(SMALL_MAX_CHARS, SMALL_OVERLAP);
    let text = "x".repeat(SMALL_MAX_CHARS);

    let chunks = chunker.chunk(&text);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, text);
}

#[test]
fn given_five_thousand_chars_when_chunking_then_three_overlapping_chunks() {
    let chunker = SentenceChunker::new(STANDARD_MAX_CHARS, STANDARD_OVERLAP);
    // "word " repeated: uniform text with word boundaries every 5 chars.
    let text = "word ".repeat(1000);
    assert_eq!(text.chars().count(), 5000);

    let chunks = chunker.chunk(&text);

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].start_offset, 0);
    // Each successive chunk rewinds by the overlap from the previous cut.
    assert!(chunks[1].start_offset < 2000);
    assert!(chunks[1].start_offset >= 2000 - STANDARD_OVERLAP - 5);
    assert!(chunks[2].start_offset < 4000);
    for chunk in &chunks {
        assert!(chunk.char_count() <= STANDARD_MAX_CHARS);
    }
}

#[test]
fn given_sentence_punctuation_near_cut_when_chunking_then_cut_lands_after_sentence_end() {
    let chunker = SentenceChunker::new(SMALL_MAX_CHARS, SMALL_OVERLAP);
    // A sentence ending sits inside the last fifth of the 50-char window.
    let text = "This is the first sentence of the record. And this second one keeps going for a while longer.";

    let chunks = chunker.chunk(text);

    assert!(chunks.len() >= 2);
    let first = chunks[0].text.trim_end();
    assert!(
        first.ends_with('.'),
        "first chunk should end at a sentence boundary: '{}'",
        chunks[0].text
    );
}

#[test]
fn given_text_without_any_boundary_when_chunking_then_hard_cut_at_budget() {
    let chunker = SentenceChunker::new(SMALL_MAX_CHARS, SMALL_OVERLAP);
    let text = "y".repeat(120);

    let chunks = chunker.chunk(&text);

    assert!(chunks.len() >= 2);
    assert_eq!(chunks[0].char_count(), SMALL_MAX_CHARS);
    assert_eq!(chunks[1].start_offset, SMALL_MAX_CHARS - SMALL_OVERLAP);
}

#[test]
fn given_overlapping_chunks_when_chunking_then_consecutive_chunks_share_text() {
    let chunker = SentenceChunker::new(SMALL_MAX_CHARS, SMALL_OVERLAP);
    let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu nu xi omicron pi rho sigma";

    let chunks = chunker.chunk(text);

    assert!(chunks.len() >= 2);
    for pair in chunks.windows(2) {
        let previous_end = pair[0].start_offset + pair[0].char_count();
        assert!(
            pair[1].start_offset < previous_end,
            "chunk {} must start before chunk {} ends",
            pair[1].index,
            pair[0].index
        );
    }
}

#[test]
fn given_same_input_twice_when_chunking_then_identical_output() {
    let chunker = SentenceChunker::new(STANDARD_MAX_CHARS, STANDARD_OVERLAP);
    let text = "One sentence here. ".repeat(300);

    let first = chunker.chunk(&text);
    let second = chunker.chunk(&text);

    assert_eq!(first, second);
}
