use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::ports::{
    ApiEndpoint, InferenceError, RemoteTranscriber, RemoteTranscriberError, TranscriptCleaner,
};
use crate::application::services::audio_reducer::{AudioReducer, ReduceError};
use crate::application::services::model_cache::InferenceModelCache;
use crate::domain::{
    AssetId, AudioAsset, Language, ModelKey, ReducedAudio, Transcript, TranscriptSource,
};

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionServiceError {
    #[error(transparent)]
    Reduce(#[from] ReduceError),
    #[error("could not read audio asset at {path}: {source}")]
    AssetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Every strategy in the plan failed. Both underlying causes are kept so
    /// the operator sees why the remote path and the local fallback each gave
    /// up.
    #[error("transcription failed for asset {asset_id} (remote: {remote_cause}; local: {local_cause})")]
    AllStrategiesFailed {
        asset_id: AssetId,
        remote_cause: String,
        local_cause: String,
    },
}

/// Turns an audio asset into a transcript. The single-asset path is an
/// ordered strategy plan: remote API on the primary endpoint, one retry on
/// the alternate endpoint if the primary path does not exist, then the local
/// model. Oversized assets are reduced first; split jobs run the same plan
/// per segment and join the pieces in order.
pub struct TranscriptionService {
    remote: Arc<dyn RemoteTranscriber>,
    models: Arc<InferenceModelCache>,
    reducer: AudioReducer,
    cleaner: Arc<dyn TranscriptCleaner>,
    ceiling_bytes: u64,
}

impl TranscriptionService {
    pub fn new(
        remote: Arc<dyn RemoteTranscriber>,
        models: Arc<InferenceModelCache>,
        reducer: AudioReducer,
        cleaner: Arc<dyn TranscriptCleaner>,
        ceiling_bytes: u64,
    ) -> Self {
        Self {
            remote,
            models,
            reducer,
            cleaner,
            ceiling_bytes,
        }
    }

    pub async fn transcribe(
        &self,
        asset: &AudioAsset,
        language: &Language,
    ) -> Result<Transcript, TranscriptionServiceError> {
        if asset.fits_within(self.ceiling_bytes) {
            return self.transcribe_single(asset, language).await;
        }

        match self.reducer.reduce(asset, self.ceiling_bytes).await? {
            ReducedAudio::Compressed(reduced) => {
                let result = self.transcribe_single(&reduced, language).await;
                discard_artifact(&reduced, asset).await;
                result
            }
            ReducedAudio::Split(segments) => {
                let mut texts = Vec::with_capacity(segments.len());
                let mut sources = Vec::with_capacity(segments.len());
                let mut failure = None;
                for segment in &segments {
                    if failure.is_none() {
                        info!(
                            asset_id = %asset.id,
                            segment = segment.index,
                            total = segments.len(),
                            "Transcribing segment"
                        );
                        match self.transcribe_single(&segment.asset, language).await {
                            Ok(transcript) => {
                                sources.push(transcript.source);
                                texts.push(transcript.text);
                            }
                            Err(error) => failure = Some(error),
                        }
                    }
                    // Segment files only exist to feed the transcription; they
                    // are removed whether or not their transcript was produced.
                    discard_artifact(&segment.asset, asset).await;
                }
                if let Some(error) = failure {
                    return Err(error);
                }
                let source = if sources.iter().all(|s| *s == sources[0]) {
                    sources[0]
                } else {
                    TranscriptSource::Mixed
                };
                Ok(Transcript::new(texts.join(" "), source))
            }
        }
    }

    async fn transcribe_single(
        &self,
        asset: &AudioAsset,
        language: &Language,
    ) -> Result<Transcript, TranscriptionServiceError> {
        let audio_data = tokio::fs::read(&asset.path).await.map_err(|source| {
            TranscriptionServiceError::AssetRead {
                path: asset.path.clone(),
                source,
            }
        })?;
        let code = language.whisper_code();

        let remote_cause = match self
            .remote
            .transcribe(&audio_data, code, ApiEndpoint::Primary)
            .await
        {
            Ok(text) => return Ok(Transcript::new(text, TranscriptSource::RemoteApi)),
            Err(RemoteTranscriberError::EndpointNotFound) => {
                warn!(asset_id = %asset.id, "Primary transcription endpoint not found, retrying alternate path");
                match self
                    .remote
                    .transcribe(&audio_data, code, ApiEndpoint::Alternate)
                    .await
                {
                    Ok(text) => return Ok(Transcript::new(text, TranscriptSource::RemoteApi)),
                    Err(error) => format!("primary endpoint not found; alternate: {error}"),
                }
            }
            Err(error) => error.to_string(),
        };

        warn!(
            asset_id = %asset.id,
            error = %remote_cause,
            "Remote transcription failed, falling back to local model"
        );
        match self.transcribe_local(&audio_data, language).await {
            Ok(text) => Ok(Transcript::new(text, TranscriptSource::LocalModel)),
            Err(error) => Err(TranscriptionServiceError::AllStrategiesFailed {
                asset_id: asset.id,
                remote_cause,
                local_cause: error.to_string(),
            }),
        }
    }

    async fn transcribe_local(
        &self,
        audio_data: &[u8],
        language: &Language,
    ) -> Result<String, InferenceError> {
        let key = ModelKey::for_language(language);
        let cached = self.models.get(&key).await?;
        let text = cached
            .handle
            .transcribe(audio_data, key.language_hint.as_deref())
            .await?;
        let text = if matches!(language, Language::Vietnamese) {
            self.cleaner.clean(&text)
        } else {
            text
        };
        info!(model = %key, chars = text.chars().count(), "Local transcription completed");
        Ok(text)
    }
}

/// Removes a file the reducer derived from `original`. The original asset is
/// never touched; removal failures are logged and not surfaced because the
/// transcript itself is unaffected.
async fn discard_artifact(artifact: &AudioAsset, original: &AudioAsset) {
    if artifact.path == original.path {
        return;
    }
    if let Err(error) = tokio::fs::remove_file(&artifact.path).await {
        debug!(
            asset_id = %original.id,
            path = %artifact.path.display(),
            error = %error,
            "Could not remove reduction artifact"
        );
    }
}
