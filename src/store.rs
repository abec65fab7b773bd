//! Directory-backed store for uploaded sample texts.
//!
//! Files are identified by name only. Saving an existing name overwrites it.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("File not found")]
    NotFound,

    #[error("Invalid file name: '{0}'")]
    InvalidName(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the store, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        info!("Sample store at {}", dir.display());
        Ok(Self { dir })
    }

    /// File names in lexicographic order.
    pub async fn list(&self) -> StoreResult<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    pub async fn save(&self, name: &str, contents: &[u8]) -> StoreResult<()> {
        let path = self.path_for(name)?;
        tokio::fs::write(&path, contents).await?;
        info!("Saved {} ({} bytes)", name, contents.len());
        Ok(())
    }

    /// Read a file as UTF-8 text. Invalid sequences are replaced.
    pub async fn read(&self, name: &str) -> StoreResult<String> {
        let path = self.path_for(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn exists(&self, name: &str) -> StoreResult<bool> {
        let path = self.path_for(name)?;
        match tokio::fs::metadata(&path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, name: &str) -> StoreResult<()> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted {}", name);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve `name` inside the store directory, refusing anything that
    /// would escape it.
    fn path_for(&self, name: &str) -> StoreResult<PathBuf> {
        let invalid = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(&['/', '\\', '\0'][..]);
        if invalid {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(name))
    }
}
