use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::ports::{CompressionPreset, Transcoder, TranscoderError};
use crate::domain::{AudioAsset, AudioSegment, ReducedAudio};

#[derive(Debug, thiserror::Error)]
pub enum ReduceError {
    /// The transcoding tool is missing. Operational, not a processing bug;
    /// the message carries installation instructions.
    #[error("transcoding tool unavailable: {0}")]
    ToolUnavailable(String),
    #[error("audio size reduction failed: {0}")]
    Transcode(TranscoderError),
    #[error("splitting produced no segments for asset {0}")]
    EmptySplit(crate::domain::AssetId),
}

/// Brings an asset under the transcription size ceiling. Assets already under
/// it pass through untouched. Oversized assets walk the compression preset
/// ladder and take the first output that fits; when even the strongest preset
/// stays above the ceiling, the original is split into time segments instead.
pub struct AudioReducer {
    transcoder: Arc<dyn Transcoder>,
}

impl AudioReducer {
    pub fn new(transcoder: Arc<dyn Transcoder>) -> Self {
        Self { transcoder }
    }

    pub async fn reduce(
        &self,
        asset: &AudioAsset,
        ceiling_bytes: u64,
    ) -> Result<ReducedAudio, ReduceError> {
        if asset.fits_within(ceiling_bytes) {
            return Ok(ReducedAudio::Compressed(asset.clone()));
        }

        info!(
            asset_id = %asset.id,
            size_mb = format!("{:.1}", asset.size_mb()),
            "Audio exceeds size ceiling, compressing"
        );

        for preset in CompressionPreset::LADDER {
            match self.transcoder.compress(asset, preset).await {
                Ok(compressed) if compressed.fits_within(ceiling_bytes) => {
                    info!(
                        asset_id = %asset.id,
                        preset = preset.label(),
                        size_mb = format!("{:.1}", compressed.size_mb()),
                        "Compression brought audio under ceiling"
                    );
                    return Ok(ReducedAudio::Compressed(compressed));
                }
                Ok(compressed) => {
                    debug!(
                        asset_id = %asset.id,
                        preset = preset.label(),
                        size_mb = format!("{:.1}", compressed.size_mb()),
                        "Compressed output still over ceiling"
                    );
                    if compressed.path != asset.path {
                        if let Err(error) = tokio::fs::remove_file(&compressed.path).await {
                            debug!(
                                asset_id = %asset.id,
                                path = %compressed.path.display(),
                                error = %error,
                                "Could not remove discarded compressed output"
                            );
                        }
                    }
                }
                Err(TranscoderError::Unavailable(hint)) => {
                    return Err(ReduceError::ToolUnavailable(hint));
                }
                Err(error) => {
                    warn!(
                        asset_id = %asset.id,
                        preset = preset.label(),
                        error = %error,
                        "Compression attempt failed"
                    );
                }
            }
        }

        info!(asset_id = %asset.id, "Compression floor above ceiling, splitting into segments");
        let parts = self
            .transcoder
            .split(asset, ceiling_bytes)
            .await
            .map_err(|error| match error {
                TranscoderError::Unavailable(hint) => ReduceError::ToolUnavailable(hint),
                other => ReduceError::Transcode(other),
            })?;
        if parts.is_empty() {
            return Err(ReduceError::EmptySplit(asset.id));
        }

        let segments = parts
            .into_iter()
            .enumerate()
            .map(|(index, asset)| AudioSegment { index, asset })
            .collect::<Vec<_>>();
        info!(asset_id = %asset.id, segments = segments.len(), "Audio split complete");
        Ok(ReducedAudio::Split(segments))
    }
}
