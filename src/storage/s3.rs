// S3 object store
// One client per process, built from the ambient AWS configuration

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use super::{ObjectStore, PutObject, StoreError};
use crate::config::StorageConfig;

pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Load credentials and region the standard way, then apply the optional overrides
    ///
    /// A custom endpoint switches to path-style addressing, which is what
    /// S3-compatible stores expect.
    pub async fn from_config(storage: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &storage.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &storage.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::new(Client::from_conf(builder.build()))
    }
}

impl ObjectStore for S3Store {
    async fn put_object(&self, request: PutObject) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(request.bucket)
            .key(request.key)
            .body(ByteStream::from(request.body))
            .content_type(request.content_type)
            .cache_control(request.cache_control)
            .send()
            .await
            .map_err(|e| StoreError::Remote(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}
