use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::repository::{DeckBackend, StorageError};

/// Deck backend writing one JSON file in an app-private data directory.
///
/// Saves are atomic: the payload is written to a sibling temp file which is
/// then renamed over the target, so a failed write leaves the previous file
/// untouched.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Uses `path` as the deck file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the parent directories cannot be created.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut os = self.path.as_os_str().to_owned();
        os.push(".tmp");
        PathBuf::from(os)
    }

    fn write_atomic(&self, bytes: &[u8]) -> Result<(), StorageError> {
        let temp = self.temp_path();
        {
            let mut file = fs::File::create(&temp)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

#[async_trait]
impl DeckBackend for JsonFileBackend {
    async fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn save(&self, bytes: &[u8]) -> Result<(), StorageError> {
        self.write_atomic(bytes)
    }
}
