// In-process object store
// Keeps objects in a shared map; clones share the same contents

use hyper::body::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::{ObjectStore, PutObject, StoreError};

/// Object as it was last written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
    pub cache_control: String,
}

#[derive(Debug, Default)]
struct Inner {
    objects: HashMap<(String, String), StoredObject>,
    writes: usize,
    failure: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes so far
    #[cfg(test)]
    pub fn write_count(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).writes
    }

    #[cfg(test)]
    pub fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Make every following write fail with `message`
    #[cfg(test)]
    pub fn fail_writes(&self, message: &str) {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).failure = Some(message.to_string());
    }
}

impl ObjectStore for MemoryStore {
    async fn put_object(&self, request: PutObject) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(message) = &inner.failure {
            return Err(StoreError::Remote(message.clone()));
        }

        inner.objects.insert(
            (request.bucket, request.key),
            StoredObject {
                body: request.body,
                content_type: request.content_type,
                cache_control: request.cache_control,
            },
        );
        inner.writes += 1;
        Ok(())
    }
}
