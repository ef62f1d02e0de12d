pub mod audio_reducer;
pub mod batch_processor;
pub mod model_cache;
pub mod pipeline_service;
pub mod prompt_builder;
pub mod summarization_service;
pub mod transcription_service;

pub use audio_reducer::{AudioReducer, ReduceError};
pub use batch_processor::{BatchJob, BatchJobError, BatchOutcome, BatchProcessor};
pub use model_cache::{CachedModel, InferenceModelCache};
pub use pipeline_service::{PipelineError, PipelineOutput, PipelineService};
pub use prompt_builder::PromptBuilder;
pub use summarization_service::{SummarizationService, SummarizationServiceError};
pub use transcription_service::{TranscriptionService, TranscriptionServiceError};
