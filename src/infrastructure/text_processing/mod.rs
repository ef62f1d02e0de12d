pub mod sentence_chunker;
pub mod vietnamese_cleaner;

pub use sentence_chunker::SentenceChunker;
pub use vietnamese_cleaner::VietnameseCleaner;
