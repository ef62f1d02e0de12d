/// Spoken language of a recording. Drives the Whisper language hint, the
/// local model variant selection, and the output-language instruction in
/// summarization prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Language {
    Vietnamese,
    English,
    Chinese,
    Japanese,
    Korean,
    French,
    German,
    Spanish,
    /// Language outside the supported table, with an optional caller-supplied
    /// display name used in prompts.
    Other(Option<String>),
}

impl Language {
    pub fn from_code(code: &str, custom_name: Option<String>) -> Self {
        match code.to_ascii_lowercase().as_str() {
            "vi" => Self::Vietnamese,
            "en" => Self::English,
            "zh" => Self::Chinese,
            "ja" => Self::Japanese,
            "ko" => Self::Korean,
            "fr" => Self::French,
            "de" => Self::German,
            "es" => Self::Spanish,
            _ => Self::Other(custom_name),
        }
    }

    /// ISO code passed as the transcription language hint. `None` lets the
    /// model auto-detect.
    pub fn whisper_code(&self) -> Option<&str> {
        match self {
            Self::Vietnamese => Some("vi"),
            Self::English => Some("en"),
            Self::Chinese => Some("zh"),
            Self::Japanese => Some("ja"),
            Self::Korean => Some("ko"),
            Self::French => Some("fr"),
            Self::German => Some("de"),
            Self::Spanish => Some("es"),
            Self::Other(_) => None,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::Vietnamese => "Vietnamese",
            Self::English => "English",
            Self::Chinese => "Chinese",
            Self::Japanese => "Japanese",
            Self::Korean => "Korean",
            Self::French => "French",
            Self::German => "German",
            Self::Spanish => "Spanish",
            Self::Other(Some(name)) => name,
            Self::Other(None) => "the language used in the meeting",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
