//! Speech service adapter.
//!
//! Talks to a Google-Translate-style TTS endpoint that returns MP3 for short
//! text fragments. Long text is split on whitespace into fragments the
//! endpoint accepts and the MP3 bodies are concatenated in order.

use crate::config::Config;
use crate::i18n::Language;
use anyhow::{Context, Result};
use tracing::debug;

/// Longest fragment the speech endpoint accepts, in characters.
const MAX_CHUNK_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct SpeechClient {
    client: reqwest::Client,
    api_url: String,
}

impl SpeechClient {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            api_url: config.tts_api_url.clone(),
        }
    }

    /// Synthesize `text` in `language`, returning MP3 bytes.
    pub async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            anyhow::bail!("No text to speak");
        }

        debug!(
            "Synthesizing {} chunks in {}",
            chunks.len(),
            language.speech_code()
        );

        let total = chunks.len().to_string();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let idx = idx.to_string();
            let response = self
                .client
                .get(&self.api_url)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", language.speech_code()),
                    ("q", chunk.as_str()),
                    ("idx", idx.as_str()),
                    ("total", total.as_str()),
                ])
                .send()
                .await
                .context("Failed to send request to speech API")?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                anyhow::bail!("Speech API error ({}): {}", status, body);
            }

            let bytes = response
                .bytes()
                .await
                .context("Failed to read speech API response")?;
            audio.extend_from_slice(&bytes);
        }

        Ok(audio)
    }
}

/// Split text into whitespace-delimited fragments of at most `max_chars`
/// characters. Words longer than `max_chars` are hard-split.
fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            chunks.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current.is_empty() {
            word.len()
        } else {
            current_len + 1 + word.len()
        };

        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
