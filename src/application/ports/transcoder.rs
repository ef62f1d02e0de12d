use async_trait::async_trait;

use crate::domain::AudioAsset;

/// Lossy compression presets, ordered by compression strength. `High`
/// squeezes hardest and is tried first when shrinking oversized audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionPreset {
    High,
    Medium,
    Low,
}

impl CompressionPreset {
    pub const LADDER: [CompressionPreset; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn bitrate(&self) -> &'static str {
        match self {
            Self::High => "64k",
            Self::Medium => "128k",
            Self::Low => "192k",
        }
    }

    pub fn sample_rate(&self) -> &'static str {
        match self {
            Self::High => "22050",
            Self::Medium => "44100",
            Self::Low => "44100",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// External audio transcoding tool (ffmpeg in production). Compression and
/// splitting write new files; the input asset is never touched.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Whether the tool is installed. Implementations may cache the probe for
    /// the process lifetime.
    async fn is_available(&self) -> bool;

    async fn compress(
        &self,
        asset: &AudioAsset,
        preset: CompressionPreset,
    ) -> Result<AudioAsset, TranscoderError>;

    /// Split into contiguous time segments, each at or under `max_bytes`,
    /// returned in playback order.
    async fn split(
        &self,
        asset: &AudioAsset,
        max_bytes: u64,
    ) -> Result<Vec<AudioAsset>, TranscoderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscoderError {
    /// The tool is not installed. The message carries installation
    /// instructions for the operator.
    #[error("transcoding tool unavailable: {0}")]
    Unavailable(String),
    #[error("transcoding failed: {0}")]
    Failed(String),
}
