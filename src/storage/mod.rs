// Object store module
// Whole-object writes to a bucket/key addressed blob store

mod fs;
mod memory;
mod s3;

use hyper::body::Bytes;
use std::future::Future;
use thiserror::Error;

pub use fs::FilesystemStore;
pub use memory::MemoryStore;
pub use s3::S3Store;

use crate::config::{StorageBackend, StorageConfig};

/// A single full-object overwrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObject {
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
    pub content_type: String,
    pub cache_control: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Bucket or key cannot be mapped onto the backend
    #[error("invalid object location: {0}")]
    InvalidLocation(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode object metadata: {0}")]
    Metadata(#[from] toml::ser::Error),

    /// Failure reported by the remote service
    #[error("{0}")]
    Remote(String),
}

/// Reusable handle to an object store
///
/// Implementations are constructed once per process and shared by every
/// invocation. Writes are unconditional; the last write wins.
pub trait ObjectStore: Send + Sync {
    fn put_object(&self, request: PutObject) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// The store selected by configuration
pub enum Backend {
    S3(S3Store),
    Filesystem(FilesystemStore),
    Memory(MemoryStore),
}

impl Backend {
    /// Build the configured backend; the S3 client resolves credentials and region here
    pub async fn from_config(storage: &StorageConfig) -> Self {
        match storage.backend {
            StorageBackend::S3 => Self::S3(S3Store::from_config(storage).await),
            StorageBackend::Filesystem => Self::Filesystem(FilesystemStore::new(&storage.root_dir)),
            StorageBackend::Memory => Self::Memory(MemoryStore::new()),
        }
    }
}

impl ObjectStore for Backend {
    async fn put_object(&self, request: PutObject) -> Result<(), StoreError> {
        match self {
            Self::S3(store) => store.put_object(request).await,
            Self::Filesystem(store) => store.put_object(request).await,
            Self::Memory(store) => store.put_object(request).await,
        }
    }
}
