use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use referat::application::ports::{CompressionPreset, Transcoder, TranscoderError};
use referat::application::services::{AudioReducer, ReduceError};
use referat::domain::{AudioAsset, ReducedAudio};
use tokio::sync::Mutex;

const MB: u64 = 1024 * 1024;
const CEILING: u64 = 25 * MB;
const INSTALL_HINT: &str = "install ffmpeg and restart";

/// Transcoder whose compress outputs are scripted per call and whose split
/// output is fixed. Counts calls so the preset ladder can be asserted.
struct StubTranscoder {
    compress_sizes: Mutex<VecDeque<u64>>,
    compress_calls: AtomicUsize,
    split_sizes: Vec<u64>,
    split_calls: AtomicUsize,
    available: bool,
}

impl StubTranscoder {
    fn new(compress_sizes: Vec<u64>, split_sizes: Vec<u64>) -> Self {
        Self {
            compress_sizes: Mutex::new(VecDeque::from(compress_sizes)),
            compress_calls: AtomicUsize::new(0),
            split_sizes,
            split_calls: AtomicUsize::new(0),
            available: true,
        }
    }

    fn unavailable() -> Self {
        let mut stub = Self::new(vec![], vec![]);
        stub.available = false;
        stub
    }
}

#[async_trait::async_trait]
impl Transcoder for StubTranscoder {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn compress(
        &self,
        asset: &AudioAsset,
        _preset: CompressionPreset,
    ) -> Result<AudioAsset, TranscoderError> {
        if !self.available {
            return Err(TranscoderError::Unavailable(INSTALL_HINT.to_string()));
        }
        self.compress_calls.fetch_add(1, Ordering::SeqCst);
        let size = self
            .compress_sizes
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| TranscoderError::Failed("no scripted output".to_string()))?;
        Ok(AudioAsset::new(asset.path.clone(), size))
    }

    async fn split(
        &self,
        asset: &AudioAsset,
        _max_bytes: u64,
    ) -> Result<Vec<AudioAsset>, TranscoderError> {
        if !self.available {
            return Err(TranscoderError::Unavailable(INSTALL_HINT.to_string()));
        }
        self.split_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .split_sizes
            .iter()
            .map(|size| AudioAsset::new(asset.path.clone(), *size))
            .collect())
    }
}

#[tokio::test]
async fn given_asset_under_ceiling_when_reducing_then_returned_unchanged() {
    let transcoder = Arc::new(StubTranscoder::new(vec![], vec![]));
    let reducer = AudioReducer::new(Arc::clone(&transcoder) as Arc<dyn Transcoder>);
    let asset = AudioAsset::new("/tmp/small.mp3", 10 * MB);

    let reduced = reducer.reduce(&asset, CEILING).await.unwrap();

    match reduced {
        ReducedAudio::Compressed(result) => assert_eq!(result, asset),
        other => panic!("expected identity pass-through, got {other:?}"),
    }
    assert_eq!(transcoder.compress_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_first_preset_fits_when_reducing_then_single_compression_attempt() {
    // 30 MB input, first preset lands at 20 MB.
    let transcoder = Arc::new(StubTranscoder::new(vec![20 * MB], vec![]));
    let reducer = AudioReducer::new(Arc::clone(&transcoder) as Arc<dyn Transcoder>);
    let asset = AudioAsset::new("/tmp/meeting.mp3", 30 * MB);

    let reduced = reducer.reduce(&asset, CEILING).await.unwrap();

    match reduced {
        ReducedAudio::Compressed(result) => assert_eq!(result.size_bytes, 20 * MB),
        other => panic!("expected compressed result, got {other:?}"),
    }
    assert_eq!(transcoder.compress_calls.load(Ordering::SeqCst), 1);
    assert_eq!(transcoder.split_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_compression_floor_above_ceiling_when_reducing_then_original_is_split() {
    // 60 MB input; every preset bottoms out at 28 MB, still over the ceiling.
    let transcoder = Arc::new(StubTranscoder::new(
        vec![28 * MB, 28 * MB, 28 * MB],
        vec![20 * MB, 20 * MB, 20 * MB],
    ));
    let reducer = AudioReducer::new(Arc::clone(&transcoder) as Arc<dyn Transcoder>);
    let asset = AudioAsset::new("/tmp/allhands.mp3", 60 * MB);

    let reduced = reducer.reduce(&asset, CEILING).await.unwrap();

    match reduced {
        ReducedAudio::Split(segments) => {
            assert!(segments.len() >= 3);
            for (expected_index, segment) in segments.iter().enumerate() {
                assert_eq!(segment.index, expected_index);
                assert!(segment.asset.size_bytes <= CEILING);
            }
        }
        other => panic!("expected split result, got {other:?}"),
    }
    assert_eq!(transcoder.compress_calls.load(Ordering::SeqCst), 3);
    assert_eq!(transcoder.split_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn given_later_preset_fits_when_reducing_then_ladder_stops_there() {
    let transcoder = Arc::new(StubTranscoder::new(vec![28 * MB, 24 * MB], vec![]));
    let reducer = AudioReducer::new(Arc::clone(&transcoder) as Arc<dyn Transcoder>);
    let asset = AudioAsset::new("/tmp/meeting.mp3", 40 * MB);

    let reduced = reducer.reduce(&asset, CEILING).await.unwrap();

    match reduced {
        ReducedAudio::Compressed(result) => assert_eq!(result.size_bytes, 24 * MB),
        other => panic!("expected compressed result, got {other:?}"),
    }
    assert_eq!(transcoder.compress_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn given_missing_tool_when_reducing_oversized_asset_then_tool_unavailable_with_hint() {
    let transcoder = Arc::new(StubTranscoder::unavailable());
    let reducer = AudioReducer::new(transcoder as Arc<dyn Transcoder>);
    let asset = AudioAsset::new("/tmp/meeting.mp3", 30 * MB);

    let error = reducer.reduce(&asset, CEILING).await.unwrap_err();

    match error {
        ReduceError::ToolUnavailable(hint) => assert_eq!(hint, INSTALL_HINT),
        other => panic!("expected ToolUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn given_missing_tool_when_asset_fits_then_no_error() {
    let transcoder = Arc::new(StubTranscoder::unavailable());
    let reducer = AudioReducer::new(transcoder as Arc<dyn Transcoder>);
    let asset = AudioAsset::new("/tmp/small.mp3", 5 * MB);

    let reduced = reducer.reduce(&asset, CEILING).await;

    assert!(reduced.is_ok());
}
