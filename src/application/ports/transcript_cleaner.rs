/// Pure text transform applied to local-model transcripts for languages that
/// need post-processing. The rule set behind it is adapter detail.
pub trait TranscriptCleaner: Send + Sync {
    fn clean(&self, text: &str) -> String;
}
