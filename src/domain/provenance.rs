/// Where a transcript came from. Diagnostic only; no behavior branches on it
/// downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptSource {
    RemoteApi,
    LocalModel,
    /// Split jobs whose segments were not all served by the same strategy.
    Mixed,
}

impl std::fmt::Display for TranscriptSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::RemoteApi => "remote_api",
            Self::LocalModel => "local_model",
            Self::Mixed => "mixed",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub source: TranscriptSource,
}

impl Transcript {
    pub fn new(text: String, source: TranscriptSource) -> Self {
        Self { text, source }
    }
}

/// How a summary was produced: one generative call over the whole transcript,
/// or per-chunk summaries combined by a final call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryStrategy {
    SinglePass,
    Chunked { chunks: usize },
}

impl std::fmt::Display for SummaryStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SinglePass => write!(f, "single_pass"),
            Self::Chunked { chunks } => write!(f, "chunked({chunks})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub text: String,
    pub strategy: SummaryStrategy,
}

impl Summary {
    pub fn new(text: String, strategy: SummaryStrategy) -> Self {
        Self { text, strategy }
    }
}
