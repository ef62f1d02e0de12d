use async_trait::async_trait;

/// Which URL shape a transcription request targets. Some OpenAI-compatible
/// servers mount the audio route under `/v1`, some at the root; the alternate
/// path exists so a 404 on the primary gets exactly one retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiEndpoint {
    Primary,
    Alternate,
}

#[async_trait]
pub trait RemoteTranscriber: Send + Sync {
    async fn transcribe(
        &self,
        audio_data: &[u8],
        language: Option<&str>,
        endpoint: ApiEndpoint,
    ) -> Result<String, RemoteTranscriberError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RemoteTranscriberError {
    /// The endpoint path does not exist on this server. Retryable against the
    /// alternate path, unlike the other variants.
    #[error("transcription endpoint not found")]
    EndpointNotFound,
    #[error("transcription api unreachable: {0}")]
    Unavailable(String),
    #[error("transcription api request failed: {0}")]
    RequestFailed(String),
}
