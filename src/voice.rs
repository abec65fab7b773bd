//! Spoken-style commands: "read <sample>" and "explain <term>".

use crate::explain::{Explanation, ExplanationClient};
use crate::store::{FileStore, StoreError};
use regex::Regex;
use std::sync::OnceLock;
use tracing::info;

static READ_REGEX: OnceLock<Regex> = OnceLock::new();
static EXPLAIN_REGEX: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceCommand {
    /// Read and explain a sample; holds the derived file name
    Read(String),
    /// Explain a single term
    Explain(String),
    Unknown,
}

impl VoiceCommand {
    /// Parse a command case-insensitively. "read" takes precedence over "explain".
    pub fn parse(command: &str) -> Self {
        let command = command.to_lowercase();

        let read = READ_REGEX.get_or_init(|| Regex::new(r"read (.+)").expect("valid regex"));
        if let Some(caps) = read.captures(&command) {
            let name = caps[1].trim().replace(' ', "_");
            return VoiceCommand::Read(format!("{}.txt", name));
        }

        let explain =
            EXPLAIN_REGEX.get_or_init(|| Regex::new(r"explain (.+)").expect("valid regex"));
        if let Some(caps) = explain.captures(&command) {
            return VoiceCommand::Explain(caps[1].trim().to_string());
        }

        VoiceCommand::Unknown
    }

    /// Carry out the command.
    ///
    /// A missing sample falls back to the last `.txt` sample in name order.
    /// Only store I/O failures are errors.
    pub async fn run(
        &self,
        store: &FileStore,
        explainer: &ExplanationClient,
    ) -> Result<Explanation, StoreError> {
        match self {
            VoiceCommand::Read(name) => {
                let text = match store.read(name).await {
                    Ok(text) => text,
                    Err(StoreError::NotFound) | Err(StoreError::InvalidName(_)) => {
                        let latest = store
                            .list()
                            .await?
                            .into_iter()
                            .filter(|n| n.ends_with(".txt"))
                            .last();
                        match latest {
                            Some(latest) => {
                                info!("{} not found, reading {} instead", name, latest);
                                store.read(&latest).await?
                            }
                            None => return Ok(Explanation::plain("⚠️ No files found to read.")),
                        }
                    }
                    Err(e) => return Err(e),
                };
                Ok(explainer.explain(&text).await)
            }
            VoiceCommand::Explain(term) => Ok(explainer.explain_term(term).await),
            VoiceCommand::Unknown => Ok(Explanation::plain(
                "⚠️ Sorry, I didn't understand your command.",
            )),
        }
    }
}
