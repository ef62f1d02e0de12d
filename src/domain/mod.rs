pub mod audio;
pub mod chunk;
pub mod job;
pub mod language;
pub mod model;
pub mod provenance;

pub use audio::{AssetId, AudioAsset, AudioSegment, ReducedAudio};
pub use chunk::TextChunk;
pub use job::JobId;
pub use language::Language;
pub use model::ModelKey;
pub use provenance::{Summary, SummaryStrategy, Transcript, TranscriptSource};
