#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub chunking: ChunkingSettings,
    pub audio: AudioSettings,
    pub batch: BatchSettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub api_key: String,
    pub base_url: String,
    pub transcription_model: String,
    pub summary_model: String,
}

#[derive(Debug, Clone)]
pub struct ChunkingSettings {
    pub max_chars: usize,
    pub overlap_chars: usize,
}

#[derive(Debug, Clone)]
pub struct AudioSettings {
    pub max_file_size_mb: u64,
}

impl AudioSettings {
    pub fn ceiling_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub workers: usize,
    pub job_timeout_secs: u64,
}

impl Settings {
    /// Loads settings from environment variables, with working defaults for
    /// everything except the API key.
    pub fn from_env() -> Self {
        Self {
            api: ApiSettings {
                api_key: env_or("OPENAI_API_KEY", ""),
                base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com"),
                transcription_model: env_or("TRANSCRIPTION_MODEL", "whisper-1"),
                summary_model: env_or("SUMMARY_MODEL", "gpt-4o-mini"),
            },
            chunking: ChunkingSettings {
                max_chars: env_or_parse("CHUNK_MAX_CHARS", 2000),
                overlap_chars: env_or_parse("CHUNK_OVERLAP_CHARS", 200),
            },
            audio: AudioSettings {
                max_file_size_mb: env_or_parse("AUDIO_MAX_FILE_SIZE_MB", 25),
            },
            batch: BatchSettings {
                workers: env_or_parse("BATCH_WORKERS", 4),
                job_timeout_secs: env_or_parse("BATCH_JOB_TIMEOUT_SECS", 600),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
