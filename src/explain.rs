//! Explanation service adapter.
//!
//! Sends study text to an OpenAI-compatible chat completions endpoint (Gemini
//! by default) and shapes the free-form reply into an [`Explanation`]. This
//! layer never returns an error: upstream failures become a placeholder
//! explanation with an empty glossary.

use crate::config::Config;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

const NO_RESPONSE: &str = "⚠️ No response from model.";
const RATE_LIMITED: &str =
    "⚠️ Too many requests! The explanation service quota was reached. Please wait a moment or try again later.";

/// Explanation text plus the glossary extracted from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub explanation: String,
    pub glossary: BTreeMap<String, String>,
}

impl Explanation {
    /// An explanation with no glossary, used for placeholders and non-glossary prompts.
    pub fn plain(explanation: impl Into<String>) -> Self {
        Self {
            explanation: explanation.into(),
            glossary: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for the hosted explanation model.
#[derive(Debug, Clone)]
pub struct ExplanationClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl ExplanationClient {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            api_url: config.gemini_api_url.clone(),
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
        }
    }

    /// Produce a structured explanation and glossary for `text`.
    ///
    /// `text` may already carry a trailing language instruction.
    pub async fn explain(&self, text: &str) -> Explanation {
        match self.complete(&build_explanation_prompt(text)).await {
            Ok(reply) => {
                let reply = reply.trim();
                let explanation = if reply.is_empty() {
                    NO_RESPONSE.to_string()
                } else {
                    reply.to_string()
                };
                let glossary = parse_glossary(&explanation);
                debug!("Explanation parsed with {} glossary terms", glossary.len());
                Explanation {
                    explanation,
                    glossary,
                }
            }
            Err(e) => {
                warn!("Explanation request failed: {:#}", e);
                Explanation::plain(failure_message(&e))
            }
        }
    }

    /// Explain a single term in simple words. The glossary is always empty.
    pub async fn explain_term(&self, term: &str) -> Explanation {
        let prompt = format!("Explain the term '{}' in simple words for a student.", term);

        match self.complete(&prompt).await {
            Ok(reply) if !reply.trim().is_empty() => Explanation::plain(reply.trim()),
            Ok(_) => Explanation::plain(format!("⚠️ Couldn't explain {}.", term)),
            Err(e) => {
                warn!("Term explanation request failed: {:#}", e);
                Explanation::plain(format!("⚠️ Error: {:#}", e))
            }
        }
    }

    /// Single chat completion round trip. No retries.
    async fn complete(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .context("GEMINI_API_KEY not set")?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.7,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to explanation API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            anyhow::bail!("Explanation API error ({}): {}", status, body);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse explanation API response")?;

        Ok(chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

/// Build the fixed-format instructional prompt around `text`.
fn build_explanation_prompt(text: &str) -> String {
    format!(
        r#"You are EduVision AI, a teaching assistant.
Read the content below and generate a structured explanation and glossary.

Content:
{}

Format the response exactly like this:
📄 Simplified Explanation: <clear explanation in simple words>

📝 Key Points:
- <point 1>
- <point 2>
- <point 3>

💡 Example/Analogy:
<short example or analogy if possible; if not, say "Not applicable">

Glossary:
- <term 1>: <short simple meaning>
- <term 2>: <short simple meaning>"#,
        text
    )
}

/// Collect `- term: meaning` lines from a model reply.
///
/// Best effort: a reply that ignores the format yields an empty map. Key point
/// bullets that contain a colon are captured as well. Later duplicates win.
pub fn parse_glossary(reply: &str) -> BTreeMap<String, String> {
    reply
        .lines()
        .filter_map(|line| line.strip_prefix("- "))
        .filter_map(|entry| entry.split_once(':'))
        .map(|(term, meaning)| (term.trim().to_string(), meaning.trim().to_string()))
        .collect()
}

/// Placeholder text for a failed explanation call.
fn failure_message(error: &anyhow::Error) -> String {
    let message = format!("{:#}", error);
    if message.contains("429") || message.to_lowercase().contains("quota") {
        RATE_LIMITED.to_string()
    } else {
        format!("⚠️ Error generating explanation: {}", message)
    }
}
