use async_trait::async_trait;

#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, GenerativeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GenerativeError {
    #[error("generative api unreachable: {0}")]
    Unavailable(String),
    #[error("generative api request failed: {0}")]
    RequestFailed(String),
    #[error("generative api returned no completion")]
    EmptyCompletion,
}
