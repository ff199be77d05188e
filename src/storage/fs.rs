// Filesystem object store
// Maps bucket/key onto <root>/<bucket>/<key>, with object metadata in a TOML sidecar

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;

use super::{ObjectStore, PutObject, StoreError};

/// Metadata kept next to each object as `<key>.meta.toml`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub content_type: String,
    pub cache_control: String,
    pub size: usize,
    pub written_at: String,
}

pub struct FilesystemStore {
    root: PathBuf,
    /// Distinguishes temp files of concurrent writes to the same key
    sequence: AtomicU64,
}

impl FilesystemStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Resolve bucket and key under the root, refusing anything that could escape it
    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
        let mut path = self.root.clone();
        for part in [bucket, key] {
            let relative = Path::new(part);
            let plain = relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
            if part.is_empty() || !plain {
                return Err(StoreError::InvalidLocation(format!("{bucket}/{key}")));
            }
            path.push(relative);
        }
        Ok(path)
    }

    /// Write `data` to `path` through a temp file and a rename
    async fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), StoreError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StoreError::InvalidLocation(path.display().to_string()))?;
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let tmp = path.with_file_name(format!(".{file_name}.{}.{seq}.tmp", std::process::id()));

        fs::write(&tmp, data).await.map_err(|source| StoreError::Io {
            context: format!("Failed to write {}", tmp.display()),
            source,
        })?;
        fs::rename(&tmp, path).await.map_err(|source| StoreError::Io {
            context: format!("Failed to move object into place at {}", path.display()),
            source,
        })
    }
}

/// Sidecar path for an object path
fn metadata_path(object_path: &Path) -> PathBuf {
    let mut name = object_path.as_os_str().to_owned();
    name.push(".meta.toml");
    PathBuf::from(name)
}

impl ObjectStore for FilesystemStore {
    async fn put_object(&self, request: PutObject) -> Result<(), StoreError> {
        let path = self.object_path(&request.bucket, &request.key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|source| StoreError::Io {
                context: format!("Failed to create {}", parent.display()),
                source,
            })?;
        }

        let metadata = ObjectMetadata {
            content_type: request.content_type,
            cache_control: request.cache_control,
            size: request.body.len(),
            written_at: chrono::Utc::now().to_rfc3339(),
        };
        let metadata = toml::to_string_pretty(&metadata)?;

        self.write_atomic(&path, &request.body).await?;
        self.write_atomic(&metadata_path(&path), metadata.as_bytes())
            .await
    }
}
