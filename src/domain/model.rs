use crate::domain::language::Language;

const DEFAULT_MODEL: &str = "base";
const VIETNAMESE_MODEL: &str = "medium";

/// Cache key for a local speech model: the Whisper variant name plus an
/// optional language hint baked into decoding. Two keys with the same fields
/// resolve to the same cached handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelKey {
    pub name: String,
    pub language_hint: Option<String>,
}

impl ModelKey {
    pub fn new(name: impl Into<String>, language_hint: Option<String>) -> Self {
        Self {
            name: name.into(),
            language_hint,
        }
    }

    /// Variant selection table. Vietnamese gets the larger variant; every
    /// other language shares the default.
    pub fn for_language(language: &Language) -> Self {
        match language {
            Language::Vietnamese => Self::new(VIETNAMESE_MODEL, Some("vi".to_string())),
            other => Self::new(DEFAULT_MODEL, other.whisper_code().map(str::to_string)),
        }
    }

    /// Keys worth warming at startup so the first fallback does not pay the
    /// load cost.
    pub fn default_keys() -> Vec<ModelKey> {
        vec![
            Self::new(DEFAULT_MODEL, None),
            Self::new(VIETNAMESE_MODEL, Some("vi".to_string())),
        ]
    }
}

impl std::fmt::Display for ModelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.language_hint {
            Some(hint) => write!(f, "{}:{}", self.name, hint),
            None => write!(f, "{}", self.name),
        }
    }
}
