use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Explanation service (OpenAI-compatible chat completions)
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_url: String,

    // Speech service
    pub tts_api_url: String,

    // Storage
    pub samples_dir: PathBuf,
    pub static_dir: PathBuf,
    pub audio_cache_max_files: usize,

    // Server
    pub bind_address: String,
    pub port: u16,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(v) => v.parse().context(format!("PORT is not a valid port: {}", v))?,
            Err(_) => 5000,
        };

        Ok(Self {
            // A missing key is not fatal; explanations degrade to an error placeholder
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            gemini_api_url: std::env::var("GEMINI_API_URL").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions"
                    .to_string()
            }),

            tts_api_url: std::env::var("TTS_API_URL")
                .unwrap_or_else(|_| "https://translate.google.com/translate_tts".to_string()),

            samples_dir: std::env::var("SAMPLES_DIR")
                .unwrap_or_else(|_| "sample_texts".to_string())
                .into(),
            static_dir: std::env::var("STATIC_DIR")
                .unwrap_or_else(|_| "static".to_string())
                .into(),
            audio_cache_max_files: std::env::var("AUDIO_CACHE_MAX_FILES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(200),

            bind_address: std::env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        })
    }
}
