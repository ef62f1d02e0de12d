use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::application::ports::{CompressionPreset, Transcoder, TranscoderError};
use crate::domain::AudioAsset;

/// Guard against splitting runaway inputs into unbounded file counts.
const MAX_SEGMENTS: usize = 100;

const INSTALL_HINT: &str = "ffmpeg is required to compress or split large recordings. \
Install it with `apt-get install ffmpeg` (Debian/Ubuntu), `brew install ffmpeg` (macOS), \
or `choco install ffmpeg` (Windows), then restart the service.";

/// Transcoder backed by the ffmpeg/ffprobe binaries. Outputs land in
/// `work_dir` with uuid-suffixed names so concurrent jobs never collide.
/// Availability is probed once per process and cached.
pub struct FfmpegTranscoder {
    work_dir: PathBuf,
    available: OnceCell<bool>,
}

impl FfmpegTranscoder {
    pub fn new() -> Self {
        Self::with_work_dir(std::env::temp_dir())
    }

    pub fn with_work_dir(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            available: OnceCell::new(),
        }
    }

    async fn probe_tool() -> bool {
        Command::new("ffmpeg")
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }

    async fn ensure_available(&self) -> Result<(), TranscoderError> {
        if self.is_available().await {
            Ok(())
        } else {
            Err(TranscoderError::Unavailable(INSTALL_HINT.to_string()))
        }
    }

    fn output_path(&self, prefix: &str, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());
        self.work_dir
            .join(format!("{prefix}_{stem}_{}.mp3", Uuid::new_v4()))
    }

    async fn run_ffmpeg(&self, args: Vec<String>) -> Result<(), TranscoderError> {
        let output = Command::new("ffmpeg")
            .args(&args)
            .output()
            .await
            .map_err(|e| TranscoderError::Failed(format!("spawn ffmpeg: {}", e)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: String = stderr
                .lines()
                .rev()
                .take(5)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect::<Vec<_>>()
                .join("\n");
            return Err(TranscoderError::Failed(format!(
                "ffmpeg exited with {}: {}",
                output.status, tail
            )));
        }
        Ok(())
    }

    /// Duration in seconds via ffprobe, with a size-based estimate as a last
    /// resort (roughly one minute per MB of typical speech audio).
    async fn probe_duration(&self, asset: &AudioAsset) -> f64 {
        let probed = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(&asset.path)
            .output()
            .await
            .ok()
            .filter(|output| output.status.success())
            .and_then(|output| {
                String::from_utf8_lossy(&output.stdout)
                    .trim()
                    .parse::<f64>()
                    .ok()
            });
        match probed {
            Some(duration) if duration > 0.0 => duration,
            _ => {
                tracing::warn!(asset_id = %asset.id, "ffprobe duration unavailable, estimating from size");
                asset.size_mb() * 60.0
            }
        }
    }

    /// Plans the time windows for splitting `size_bytes` of audio spanning
    /// `duration_secs` into parts that each target well under `max_bytes`.
    /// Inputs that would fan out past [`MAX_SEGMENTS`] are rejected outright
    /// rather than split partially.
    pub fn plan_segments(
        size_bytes: u64,
        max_bytes: u64,
        duration_secs: f64,
    ) -> Result<Vec<(f64, f64)>, TranscoderError> {
        let parts_needed = (size_bytes / max_bytes + 1).max(2);
        if parts_needed > MAX_SEGMENTS as u64 {
            return Err(TranscoderError::Failed(format!(
                "input of {size_bytes} bytes needs {parts_needed} segments of {max_bytes} bytes, \
                 over the {MAX_SEGMENTS} segment limit"
            )));
        }
        let segment_secs = duration_secs / parts_needed as f64;
        Ok((0..parts_needed)
            .map(|i| (i as f64 * segment_secs, segment_secs))
            .collect())
    }

    async fn extract_segment(
        &self,
        asset: &AudioAsset,
        start_secs: f64,
        length_secs: f64,
        index: usize,
    ) -> Result<AudioAsset, TranscoderError> {
        let output = self.output_path(&format!("segment_{index:03}"), &asset.path);
        let mut args: Vec<String> = vec!["-i".into(), asset.path.to_string_lossy().into_owned()];
        args.push("-ss".into());
        args.push(format!("{start_secs:.3}"));
        args.push("-t".into());
        args.push(format!("{length_secs:.3}"));
        args.extend(
            ["-acodec", "libmp3lame", "-b:a", "128k", "-ar", "44100", "-ac", "2", "-y"]
                .map(String::from),
        );
        args.push(output.to_string_lossy().into_owned());
        self.run_ffmpeg(args).await?;

        let metadata = tokio::fs::metadata(&output)
            .await
            .map_err(|e| TranscoderError::Failed(format!("stat segment output: {}", e)))?;
        Ok(AudioAsset::new(output, metadata.len()))
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn is_available(&self) -> bool {
        *self.available.get_or_init(Self::probe_tool).await
    }

    async fn compress(
        &self,
        asset: &AudioAsset,
        preset: CompressionPreset,
    ) -> Result<AudioAsset, TranscoderError> {
        self.ensure_available().await?;
        let output = self.output_path("compressed", &asset.path);

        tracing::info!(
            asset_id = %asset.id,
            preset = preset.label(),
            bitrate = preset.bitrate(),
            "Compressing audio with ffmpeg"
        );

        let mut args: Vec<String> = vec!["-i".into(), asset.path.to_string_lossy().into_owned()];
        args.extend(
            [
                "-acodec",
                "libmp3lame",
                "-b:a",
                preset.bitrate(),
                "-ar",
                preset.sample_rate(),
                "-ac",
                "2",
                "-y",
            ]
            .map(String::from),
        );
        args.push(output.to_string_lossy().into_owned());
        self.run_ffmpeg(args).await?;

        let metadata = tokio::fs::metadata(&output)
            .await
            .map_err(|e| TranscoderError::Failed(format!("stat compressed output: {}", e)))?;
        Ok(AudioAsset::new(output, metadata.len()))
    }

    async fn split(
        &self,
        asset: &AudioAsset,
        max_bytes: u64,
    ) -> Result<Vec<AudioAsset>, TranscoderError> {
        self.ensure_available().await?;

        let duration = self.probe_duration(asset).await;
        let windows = Self::plan_segments(asset.size_bytes, max_bytes, duration)?;

        tracing::info!(
            asset_id = %asset.id,
            duration_secs = format!("{duration:.0}"),
            parts = windows.len(),
            "Splitting audio into time segments"
        );

        let mut segments = Vec::new();
        for (index, (start, length)) in windows.into_iter().enumerate() {
            let part = self.extract_segment(asset, start, length, index).await?;
            if part.size_bytes > max_bytes {
                // Variable-bitrate sources can land a segment over budget;
                // split that segment again rather than returning it oversized.
                let sub_parts = self.split(&part, max_bytes).await?;
                if let Err(error) = tokio::fs::remove_file(&part.path).await {
                    tracing::debug!(path = %part.path.display(), error = %error, "Could not remove oversized segment");
                }
                segments.extend(sub_parts);
            } else if part.size_bytes > 0 {
                segments.push(part);
            }
        }

        if segments.is_empty() {
            return Err(TranscoderError::Failed(
                "splitting produced no segments".to_string(),
            ));
        }
        Ok(segments)
    }
}
