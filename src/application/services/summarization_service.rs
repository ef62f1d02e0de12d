use std::sync::Arc;

use tracing::{debug, info};

use crate::application::ports::{GenerativeClient, GenerativeError, TextChunker};
use crate::application::services::prompt_builder::PromptBuilder;
use crate::domain::{Language, Summary, SummaryStrategy};

const SECTION_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, thiserror::Error)]
pub enum SummarizationServiceError {
    #[error("summarization failed: {0}")]
    Generative(#[from] GenerativeError),
}

/// Produces a summary from a transcript. Short transcripts get a single
/// generative call; long ones are chunked, summarized per chunk, and the
/// partial summaries merged by one final combine call. Any generative
/// failure fails the whole summarization; no partial result is returned.
pub struct SummarizationService {
    generative: Arc<dyn GenerativeClient>,
    chunker: Arc<dyn TextChunker>,
    prompts: PromptBuilder,
    single_pass_chars: usize,
}

impl SummarizationService {
    pub fn new(
        generative: Arc<dyn GenerativeClient>,
        chunker: Arc<dyn TextChunker>,
        single_pass_chars: usize,
    ) -> Self {
        Self {
            generative,
            chunker,
            prompts: PromptBuilder::new(),
            single_pass_chars,
        }
    }

    pub async fn summarize(
        &self,
        transcript: &str,
        topic: Option<&str>,
        language: &Language,
    ) -> Result<Summary, SummarizationServiceError> {
        let chars = transcript.chars().count();
        if chars <= self.single_pass_chars {
            debug!(chars, "Summarizing transcript in a single pass");
            let text = self.summarize_once(transcript, topic, language).await?;
            return Ok(Summary::new(text, SummaryStrategy::SinglePass));
        }

        let chunks = self.chunker.chunk(transcript);
        info!(
            chars,
            chunks = chunks.len(),
            "Transcript exceeds single-pass budget, summarizing per chunk"
        );

        let mut partials = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            debug!(chunk = chunk.index, chars = chunk.char_count(), "Summarizing chunk");
            partials.push(self.summarize_once(&chunk.text, topic, language).await?);
        }

        if partials.len() == 1 {
            let text = partials.remove(0);
            return Ok(Summary::new(text, SummaryStrategy::Chunked { chunks: 1 }));
        }

        let sections = partials
            .iter()
            .enumerate()
            .map(|(i, summary)| format!("Section {} Summary:\n{}", i + 1, summary))
            .collect::<Vec<_>>()
            .join(SECTION_SEPARATOR);
        let (system, user) = self.prompts.combine_prompt(&sections, topic, language);
        let text = self.generative.complete(&system, &user).await?;
        info!(sections = partials.len(), "Combined section summaries");
        Ok(Summary::new(
            text,
            SummaryStrategy::Chunked {
                chunks: chunks.len(),
            },
        ))
    }

    async fn summarize_once(
        &self,
        text: &str,
        topic: Option<&str>,
        language: &Language,
    ) -> Result<String, SummarizationServiceError> {
        let (system, user) = self.prompts.summary_prompt(text, topic, language);
        Ok(self.generative.complete(&system, &user).await?)
    }
}
