use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ModelKey;

/// A loaded speech-to-text model. Handles are shared (`Arc`) and live for the
/// process lifetime once cached; implementations that cannot run concurrent
/// inference serialize internally.
#[async_trait]
pub trait SpeechModel: Send + Sync {
    async fn transcribe(
        &self,
        audio_data: &[u8],
        language: Option<&str>,
    ) -> Result<String, InferenceError>;
}

/// Loads speech models by key. Loading is expensive (weights from disk or a
/// remote hub), so callers go through the model cache rather than this port
/// directly.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn load(&self, key: &ModelKey) -> Result<Arc<dyn SpeechModel>, InferenceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
}
