pub mod candle_whisper_backend;
pub mod ffmpeg_transcoder;
pub mod whisper_pcm;

pub use candle_whisper_backend::CandleWhisperBackend;
pub use ffmpeg_transcoder::FfmpegTranscoder;
