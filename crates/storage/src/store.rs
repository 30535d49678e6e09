//! Model Blob Stores

use crate::StorageError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// Location a serialized model is written to and read back from
pub trait ModelStore: Send + Sync {
    /// Replace the stored blob
    fn save(&self, blob: &[u8]) -> Result<(), StorageError>;

    /// Read the stored blob
    fn load(&self) -> Result<Vec<u8>, StorageError>;

    /// Human readable location, for logs and errors
    fn location(&self) -> String;
}

/// Model blob kept in a single file on disk
#[derive(Debug, Clone)]
pub struct FileModelStore {
    path: PathBuf,
}

impl FileModelStore {
    /// Create a store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the model file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.location(),
            source,
        }
    }
}

impl ModelStore for FileModelStore {
    fn save(&self, blob: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        // Write next to the target and rename so readers never see a partial file
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, blob).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        info!("Saved model ({} bytes) to {}", blob.len(), self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Vec<u8>, StorageError> {
        match fs::read(&self.path) {
            Ok(blob) => {
                debug!("Read model ({} bytes) from {}", blob.len(), self.path.display());
                Ok(blob)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(self.location())),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory model store, for tests and embedded use
#[derive(Debug, Default)]
pub struct MemoryModelStore {
    blob: Mutex<Option<Vec<u8>>>,
}

impl MemoryModelStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// True if a blob has been saved
    pub fn is_empty(&self) -> bool {
        self.blob.lock().map(|b| b.is_none()).unwrap_or(true)
    }
}

impl ModelStore for MemoryModelStore {
    fn save(&self, blob: &[u8]) -> Result<(), StorageError> {
        let mut slot = self
            .blob
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        *slot = Some(blob.to_vec());
        debug!("Saved model ({} bytes) in memory", blob.len());
        Ok(())
    }

    fn load(&self) -> Result<Vec<u8>, StorageError> {
        let slot = self
            .blob
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        slot.clone().ok_or_else(|| StorageError::NotFound(self.location()))
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
