//! Public store for generated speech.
//!
//! Audio is written to a temp file inside `<static>/tts` and renamed into
//! place, so a half-written file is never served under its final name. The
//! directory is a bounded cache: after each write the oldest files beyond
//! `max_files` are removed, except those written within the grace window.

use anyhow::{Context, Result};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

const URL_PREFIX: &str = "/static/tts";

/// Files younger than this are never evicted, so a URL handed out by a
/// concurrent request stays fetchable.
const EVICTION_GRACE: Duration = Duration::from_secs(60);

/// Attempts at finding an unused final name.
const MAX_NAME_ATTEMPTS: usize = 16;

/// Random characters in generated names, as tempfile defaults to.
const NAME_RAND_CHARS: usize = 6;

#[derive(Debug, Clone)]
pub struct AudioStore {
    dir: PathBuf,
    /// 0 disables eviction
    max_files: usize,
    grace: Duration,
    rand_chars: usize,
}

impl AudioStore {
    /// Store audio under `<static_dir>/tts`.
    pub fn new(static_dir: &Path, max_files: usize) -> Self {
        Self {
            dir: static_dir.join("tts"),
            max_files,
            grace: EVICTION_GRACE,
            rand_chars: NAME_RAND_CHARS,
        }
    }

    /// Write `audio` under a fresh unique name and return its public URL.
    pub async fn persist(&self, audio: Vec<u8>) -> Result<String> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.persist_blocking(&audio))
            .await
            .context("Audio write task failed")?
    }

    fn persist_blocking(&self, audio: &[u8]) -> Result<String> {
        std::fs::create_dir_all(&self.dir)
            .context(format!("Failed to create audio directory {}", self.dir.display()))?;

        let file_name = self.write_unique(audio)?;
        debug!("Stored {} bytes of audio as {}", audio.len(), file_name);

        if let Err(e) = self.evict_excess(&file_name) {
            warn!("Audio cache eviction failed: {:#}", e);
        }

        Ok(format!("{}/{}", URL_PREFIX, file_name))
    }

    /// Write to a `.part` temp file, then move it to `<stem>.mp3` without
    /// replacing an existing file. A taken name means a fresh temp file.
    fn write_unique(&self, audio: &[u8]) -> Result<String> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let mut file = tempfile::Builder::new()
                .prefix("tmp")
                .suffix(".part")
                .rand_bytes(self.rand_chars)
                .tempfile_in(&self.dir)
                .context("Failed to create temporary audio file")?;
            file.write_all(audio)
                .context("Failed to write temporary audio file")?;

            let stem = file
                .path()
                .file_stem()
                .and_then(|s| s.to_str())
                .context("Temporary audio file has no usable name")?
                .to_string();
            let file_name = format!("{}.mp3", stem);
            let final_path = self.dir.join(&file_name);

            match file.persist_noclobber(&final_path) {
                Ok(_) => return Ok(file_name),
                Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                    debug!("Audio name {} already taken, retrying", file_name);
                }
                Err(e) => {
                    return Err(e.error)
                        .context(format!("Failed to move audio into {}", final_path.display()))
                }
            }
        }

        anyhow::bail!(
            "No free audio file name after {} attempts",
            MAX_NAME_ATTEMPTS
        )
    }

    /// Remove the oldest `.mp3` files so at most `max_files` remain.
    /// `keep` (the file just written) and files inside the grace window are
    /// never removed, so the cache may briefly exceed its bound.
    fn evict_excess(&self, keep: &str) -> Result<usize> {
        if self.max_files == 0 {
            return Ok(0);
        }

        let now = SystemTime::now();
        let mut candidates: Vec<(SystemTime, PathBuf)> = Vec::new();
        let mut total = 0;
        for entry in std::fs::read_dir(&self.dir).context("Failed to list audio directory")? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("mp3") {
                continue;
            }
            total += 1;
            if entry.file_name().to_str() == Some(keep) {
                continue;
            }
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            // Clock skew counts as fresh
            let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
            if age < self.grace {
                continue;
            }
            candidates.push((modified, path));
        }

        if total <= self.max_files {
            return Ok(0);
        }

        candidates.sort();
        let excess = total - self.max_files;
        let mut removed = 0;
        for (_, path) in candidates.into_iter().take(excess) {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!("Failed to evict {}: {}", path.display(), e),
            }
        }

        if removed > 0 {
            info!("Evicted {} cached audio files", removed);
        }
        Ok(removed)
    }
}
