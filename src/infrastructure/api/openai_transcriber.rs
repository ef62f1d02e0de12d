use async_trait::async_trait;
use reqwest::multipart;
use reqwest::StatusCode;

use crate::application::ports::{ApiEndpoint, RemoteTranscriber, RemoteTranscriberError};

/// OpenAI-compatible transcription client. The primary endpoint mounts the
/// audio route directly under the configured base URL; the alternate inserts
/// `/v1`, for servers that only expose the versioned path.
pub struct OpenAiTranscriber {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiTranscriber {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| "https://api.openai.com".to_string()),
            model: model.unwrap_or_else(|| "whisper-1".to_string()),
        }
    }

    fn endpoint_url(&self, endpoint: ApiEndpoint) -> String {
        let base = self.base_url.trim_end_matches('/');
        match endpoint {
            ApiEndpoint::Primary => format!("{base}/audio/transcriptions"),
            ApiEndpoint::Alternate => format!("{base}/v1/audio/transcriptions"),
        }
    }
}

#[async_trait]
impl RemoteTranscriber for OpenAiTranscriber {
    async fn transcribe(
        &self,
        audio_data: &[u8],
        language: Option<&str>,
        endpoint: ApiEndpoint,
    ) -> Result<String, RemoteTranscriberError> {
        let url = self.endpoint_url(endpoint);

        let file_part = multipart::Part::bytes(audio_data.to_vec())
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| RemoteTranscriberError::RequestFailed(format!("mime: {}", e)))?;

        let mut form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "text")
            .part("file", file_part);
        if let Some(code) = language {
            form = form.text("language", code.to_string());
        }

        tracing::debug!(model = %self.model, url = %url, "Sending audio to transcription API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RemoteTranscriberError::Unavailable(format!("request: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(RemoteTranscriberError::EndpointNotFound);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(RemoteTranscriberError::RequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let transcript = response
            .text()
            .await
            .map_err(|e| RemoteTranscriberError::RequestFailed(format!("body: {}", e)))?;
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(RemoteTranscriberError::RequestFailed(
                "empty transcript body".to_string(),
            ));
        }

        tracing::info!(chars = transcript.len(), "Remote transcription completed");

        Ok(transcript.to_string())
    }
}
