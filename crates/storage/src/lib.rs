//! Storage Layer
//!
//! Persists the trained delay model as a single opaque blob.

mod store;

pub use store::{FileModelStore, MemoryModelStore, ModelStore};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("No model stored at {0}")]
    NotFound(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Lock error: {0}")]
    Lock(String),
}
