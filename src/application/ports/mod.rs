pub mod generative_client;
pub mod inference_backend;
pub mod remote_transcriber;
pub mod text_chunker;
pub mod transcoder;
pub mod transcript_cleaner;

pub use generative_client::{GenerativeClient, GenerativeError};
pub use inference_backend::{InferenceBackend, InferenceError, SpeechModel};
pub use remote_transcriber::{ApiEndpoint, RemoteTranscriber, RemoteTranscriberError};
pub use text_chunker::TextChunker;
pub use transcoder::{CompressionPreset, Transcoder, TranscoderError};
pub use transcript_cleaner::TranscriptCleaner;
