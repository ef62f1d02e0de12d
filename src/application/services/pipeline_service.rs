use std::sync::Arc;

use tracing::info;

use crate::application::ports::Transcoder;
use crate::application::services::summarization_service::{
    SummarizationService, SummarizationServiceError,
};
use crate::application::services::transcription_service::{
    TranscriptionService, TranscriptionServiceError,
};
use crate::domain::{AudioAsset, Language, Summary, Transcript};

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub transcript: Transcript,
    pub summary: Summary,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("transcription stage failed: {0}")]
    Transcription(#[from] TranscriptionServiceError),
    #[error("summarization stage failed: {0}")]
    Summarization(#[from] SummarizationServiceError),
}

/// End-to-end pipeline: recording in, transcript plus summary out. The two
/// stages run strictly in order; a stage failure aborts the job.
pub struct PipelineService {
    transcription: Arc<TranscriptionService>,
    summarization: Arc<SummarizationService>,
    transcoder: Arc<dyn Transcoder>,
}

impl PipelineService {
    pub fn new(
        transcription: Arc<TranscriptionService>,
        summarization: Arc<SummarizationService>,
        transcoder: Arc<dyn Transcoder>,
    ) -> Self {
        Self {
            transcription,
            summarization,
            transcoder,
        }
    }

    pub async fn process(
        &self,
        asset: &AudioAsset,
        topic: Option<&str>,
        language: &Language,
    ) -> Result<PipelineOutput, PipelineError> {
        info!(
            asset_id = %asset.id,
            size_mb = format!("{:.1}", asset.size_mb()),
            language = %language,
            "Processing recording"
        );

        let transcript = self.transcription.transcribe(asset, language).await?;
        info!(
            asset_id = %asset.id,
            chars = transcript.text.chars().count(),
            source = %transcript.source,
            "Transcription stage completed"
        );

        let summary = self
            .summarization
            .summarize(&transcript.text, topic, language)
            .await?;
        info!(
            asset_id = %asset.id,
            strategy = %summary.strategy,
            "Summarization stage completed"
        );

        Ok(PipelineOutput {
            transcript,
            summary,
        })
    }

    /// Health query: whether oversized recordings can be reduced on this host.
    pub async fn is_transcoder_available(&self) -> bool {
        self.transcoder.is_available().await
    }
}
