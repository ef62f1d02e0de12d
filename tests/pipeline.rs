use std::sync::Arc;

use referat::application::ports::{
    ApiEndpoint, CompressionPreset, GenerativeClient, GenerativeError, InferenceBackend,
    InferenceError, RemoteTranscriber, RemoteTranscriberError, SpeechModel, Transcoder,
    TranscoderError, TranscriptCleaner,
};
use referat::application::services::{
    AudioReducer, InferenceModelCache, PipelineError, PipelineService, SummarizationService,
    TranscriptionService,
};
use referat::domain::{AudioAsset, Language, SummaryStrategy, TranscriptSource};
use referat::infrastructure::text_processing::SentenceChunker;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

const MB: u64 = 1024 * 1024;
const CEILING: u64 = 25 * MB;
const MAX_CHARS: usize = 2000;
const OVERLAP_CHARS: usize = 200;

struct EchoRemote;

#[async_trait::async_trait]
impl RemoteTranscriber for EchoRemote {
    async fn transcribe(
        &self,
        audio_data: &[u8],
        _language: Option<&str>,
        _endpoint: ApiEndpoint,
    ) -> Result<String, RemoteTranscriberError> {
        let content = String::from_utf8_lossy(audio_data).to_string();
        if content.contains("bad") {
            return Err(RemoteTranscriberError::RequestFailed(
                "scripted remote failure".to_string(),
            ));
        }
        Ok(content)
    }
}

struct NoBackend;

#[async_trait::async_trait]
impl InferenceBackend for NoBackend {
    async fn load(
        &self,
        _key: &referat::domain::ModelKey,
    ) -> Result<Arc<dyn SpeechModel>, InferenceError> {
        Err(InferenceError::ModelLoadFailed(
            "no local weights".to_string(),
        ))
    }
}

struct NoopCleaner;

impl TranscriptCleaner for NoopCleaner {
    fn clean(&self, text: &str) -> String {
        text.to_string()
    }
}

struct FixedAvailabilityTranscoder {
    available: bool,
}

#[async_trait::async_trait]
impl Transcoder for FixedAvailabilityTranscoder {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn compress(
        &self,
        _asset: &AudioAsset,
        _preset: CompressionPreset,
    ) -> Result<AudioAsset, TranscoderError> {
        Err(TranscoderError::Failed("not planned".to_string()))
    }

    async fn split(
        &self,
        _asset: &AudioAsset,
        _max_bytes: u64,
    ) -> Result<Vec<AudioAsset>, TranscoderError> {
        Err(TranscoderError::Failed("not planned".to_string()))
    }
}

struct CountingGenerative {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl GenerativeClient for CountingGenerative {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, GenerativeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("meeting summary".to_string())
    }
}

fn build_pipeline(available: bool) -> (Arc<PipelineService>, Arc<CountingGenerative>) {
    let transcoder: Arc<dyn Transcoder> = Arc::new(FixedAvailabilityTranscoder { available });
    let generative = Arc::new(CountingGenerative {
        calls: AtomicUsize::new(0),
    });
    let transcription = Arc::new(TranscriptionService::new(
        Arc::new(EchoRemote),
        Arc::new(InferenceModelCache::new(Arc::new(NoBackend))),
        AudioReducer::new(Arc::clone(&transcoder)),
        Arc::new(NoopCleaner),
        CEILING,
    ));
    let summarization = Arc::new(SummarizationService::new(
        Arc::clone(&generative) as Arc<dyn GenerativeClient>,
        Arc::new(SentenceChunker::new(MAX_CHARS, OVERLAP_CHARS)),
        MAX_CHARS,
    ));
    (
        Arc::new(PipelineService::new(
            transcription,
            summarization,
            transcoder,
        )),
        generative,
    )
}

#[tokio::test]
async fn given_recording_when_processing_then_transcript_and_summary_returned() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("meeting.mp3");
    std::fs::write(&path, "everyone agreed to the plan").unwrap();
    let asset = AudioAsset::new(path, 2 * MB);
    let (pipeline, generative) = build_pipeline(true);

    let output = pipeline
        .process(&asset, Some("planning"), &Language::English)
        .await
        .unwrap();

    assert_eq!(output.transcript.text, "everyone agreed to the plan");
    assert_eq!(output.transcript.source, TranscriptSource::RemoteApi);
    assert_eq!(output.summary.text, "meeting summary");
    assert_eq!(output.summary.strategy, SummaryStrategy::SinglePass);
    assert_eq!(generative.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn given_transcription_failure_when_processing_then_summarization_never_runs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("meeting.mp3");
    std::fs::write(&path, "bad recording").unwrap();
    let asset = AudioAsset::new(path, 2 * MB);
    let (pipeline, generative) = build_pipeline(true);

    let error = pipeline
        .process(&asset, None, &Language::English)
        .await
        .unwrap_err();

    assert!(matches!(error, PipelineError::Transcription(_)));
    assert_eq!(generative.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_transcoder_present_when_checking_health_then_available() {
    let (pipeline, _) = build_pipeline(true);

    assert!(pipeline.is_transcoder_available().await);
}

#[tokio::test]
async fn given_transcoder_missing_when_checking_health_then_unavailable() {
    let (pipeline, _) = build_pipeline(false);

    assert!(!pipeline.is_transcoder_available().await);
}
