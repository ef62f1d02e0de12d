pub mod openai_generative;
pub mod openai_transcriber;

pub use openai_generative::OpenAiGenerative;
pub use openai_transcriber::OpenAiTranscriber;
