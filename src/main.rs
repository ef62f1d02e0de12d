use std::sync::Arc;
use std::time::Duration;

use referat::application::ports::Transcoder;
use referat::application::services::{
    AudioReducer, BatchJob, BatchProcessor, InferenceModelCache, PipelineService,
    SummarizationService, TranscriptionService,
};
use referat::config::{Environment, Settings};
use referat::domain::{AudioAsset, Language, ModelKey};
use referat::infrastructure::api::{OpenAiGenerative, OpenAiTranscriber};
use referat::infrastructure::audio::{CandleWhisperBackend, FfmpegTranscoder};
use referat::infrastructure::observability::{init_tracing, TracingConfig};
use referat::infrastructure::text_processing::{SentenceChunker, VietnameseCleaner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::try_from(
        std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string()),
    )
    .map_err(anyhow::Error::msg)?;
    init_tracing(TracingConfig {
        environment: environment.to_string(),
        json_format: std::env::var("LOG_FORMAT")
            .map(|v| v.to_lowercase() == "json")
            .unwrap_or(false),
    });

    let settings = Settings::from_env();
    let pipeline = build_pipeline(&settings)?;

    if !pipeline.is_transcoder_available().await {
        tracing::warn!("ffmpeg not found; oversized recordings cannot be reduced");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.split_first() {
        Some((flag, paths)) if flag == "--batch" && !paths.is_empty() => {
            run_batch(&settings, pipeline, paths).await
        }
        Some((path, rest)) => {
            let topic = rest.first().cloned();
            let language_code = rest.get(1).cloned().unwrap_or_else(|| "en".to_string());
            run_single(pipeline, path, topic, &language_code).await
        }
        _ => anyhow::bail!(
            "usage: referat <audio-file> [topic] [language-code]\n       referat --batch <audio-file>..."
        ),
    }
}

async fn run_single(
    pipeline: Arc<PipelineService>,
    audio_path: &str,
    topic: Option<String>,
    language_code: &str,
) -> anyhow::Result<()> {
    let language = Language::from_code(language_code, None);
    let metadata = tokio::fs::metadata(audio_path).await?;
    let asset = AudioAsset::new(audio_path, metadata.len());

    let output = pipeline.process(&asset, topic.as_deref(), &language).await?;

    println!("--- transcript ({}) ---", output.transcript.source);
    println!("{}\n", output.transcript.text);
    println!("--- summary ({}) ---", output.summary.strategy);
    println!("{}", output.summary.text);
    Ok(())
}

async fn run_batch(
    settings: &Settings,
    pipeline: Arc<PipelineService>,
    paths: &[String],
) -> anyhow::Result<()> {
    let language = Language::from_code(
        &std::env::var("BATCH_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
        None,
    );

    let mut jobs = Vec::with_capacity(paths.len());
    for path in paths {
        let metadata = tokio::fs::metadata(path).await?;
        jobs.push(BatchJob::new(
            AudioAsset::new(path, metadata.len()),
            None,
            language.clone(),
        ));
    }

    let processor = BatchProcessor::new(
        pipeline,
        settings.batch.workers,
        Duration::from_secs(settings.batch.job_timeout_secs),
    );

    let outcomes = processor.run(jobs).await;
    for (path, outcome) in paths.iter().zip(&outcomes) {
        match &outcome.result {
            Ok(output) => {
                println!("=== {path} ({}) ===", output.summary.strategy);
                println!("{}\n", output.summary.text);
            }
            Err(error) => {
                eprintln!("=== {path}: FAILED ===");
                eprintln!("{error}\n");
            }
        }
    }

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} jobs failed", outcomes.len());
    }
    Ok(())
}

fn build_pipeline(settings: &Settings) -> anyhow::Result<Arc<PipelineService>> {
    let transcoder: Arc<dyn Transcoder> = Arc::new(FfmpegTranscoder::new());

    let remote = Arc::new(OpenAiTranscriber::new(
        settings.api.api_key.clone(),
        Some(settings.api.base_url.clone()),
        Some(settings.api.transcription_model.clone()),
    ));
    let generative = Arc::new(OpenAiGenerative::new(
        settings.api.api_key.clone(),
        Some(settings.api.base_url.clone()),
        Some(settings.api.summary_model.clone()),
    ));

    let backend = Arc::new(CandleWhisperBackend::new());
    let models = Arc::new(InferenceModelCache::new(backend));
    Arc::clone(&models).preload(ModelKey::default_keys());

    let cleaner = Arc::new(VietnameseCleaner::new()?);
    let reducer = AudioReducer::new(Arc::clone(&transcoder));
    let transcription = Arc::new(TranscriptionService::new(
        remote,
        models,
        reducer,
        cleaner,
        settings.audio.ceiling_bytes(),
    ));

    let chunker = Arc::new(SentenceChunker::new(
        settings.chunking.max_chars,
        settings.chunking.overlap_chars,
    ));
    let summarization = Arc::new(SummarizationService::new(
        generative,
        chunker,
        settings.chunking.max_chars,
    ));

    Ok(Arc::new(PipelineService::new(
        transcription,
        summarization,
        transcoder,
    )))
}
