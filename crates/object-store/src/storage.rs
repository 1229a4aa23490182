//! Object storage backend abstraction (S3/MinIO/local filesystem/memory).

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Configuration for the object storage backend.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectStoreConfig {
    /// In-memory storage (for testing)
    #[default]
    Memory,

    /// Local filesystem storage
    Local {
        /// Path to the storage directory
        path: PathBuf,
    },

    /// S3-compatible storage (AWS S3, MinIO, etc.)
    S3 {
        /// S3 endpoint URL (e.g., "http://localhost:9000" for MinIO)
        endpoint: String,
        /// Access key ID
        access_key: String,
        /// Secret access key
        secret_key: String,
        /// Bucket name
        bucket: String,
        /// Optional region (defaults to "us-east-1")
        region: Option<String>,
    },
}

/// Metadata for a stored object, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    /// Object size in bytes
    pub size: u64,
    /// Last-modified timestamp
    pub last_modified: DateTime<Utc>,
    /// Backend entity tag, if the backend reports one
    pub etag: Option<String>,
}

impl From<object_store::ObjectMeta> for ObjectMeta {
    fn from(meta: object_store::ObjectMeta) -> Self {
        Self {
            size: meta.size as u64,
            last_modified: meta.last_modified,
            etag: meta.e_tag,
        }
    }
}

/// Wrapper around different object storage backends.
///
/// Paths are opaque to this crate; callers own the key layout.
#[derive(Debug, Clone)]
pub struct Storage {
    inner: Arc<dyn ObjectStore>,
}

impl Storage {
    /// Create a new storage backend from configuration.
    pub async fn new(config: ObjectStoreConfig) -> Result<Self> {
        let inner: Arc<dyn ObjectStore> = match &config {
            ObjectStoreConfig::Memory => Arc::new(InMemory::new()),

            ObjectStoreConfig::Local { path } => {
                // Ensure directory exists
                tokio::fs::create_dir_all(path).await?;
                tracing::debug!(path = %path.display(), "local object store ready");
                Arc::new(
                    LocalFileSystem::new_with_prefix(path)
                        .map_err(|e| StoreError::InvalidConfig(e.to_string()))?,
                )
            }

            ObjectStoreConfig::S3 {
                endpoint,
                access_key,
                secret_key,
                bucket,
                region,
            } => {
                let builder = AmazonS3Builder::new()
                    .with_endpoint(endpoint)
                    .with_access_key_id(access_key)
                    .with_secret_access_key(secret_key)
                    .with_bucket_name(bucket)
                    .with_region(region.as_deref().unwrap_or("us-east-1"))
                    .with_allow_http(endpoint.starts_with("http://"));

                let store: Arc<dyn ObjectStore> = Arc::new(
                    builder
                        .build()
                        .map_err(|e| StoreError::InvalidConfig(e.to_string()))?,
                );

                // Verify bucket exists by listing (empty prefix)
                // This will fail fast if the bucket doesn't exist
                {
                    use futures::TryStreamExt;
                    let prefix = ObjectPath::from("");
                    let mut stream = store.list(Some(&prefix));
                    match stream.try_next().await {
                        Ok(_) => {} // Bucket exists (may or may not have items)
                        Err(object_store::Error::NotFound { .. }) => {
                            return Err(StoreError::BucketNotFound(bucket.clone()));
                        }
                        Err(e) => {
                            // Check if error message indicates bucket doesn't exist
                            let msg = e.to_string();
                            if msg.contains("NoSuchBucket")
                                || msg.contains("bucket") && msg.contains("not")
                            {
                                return Err(StoreError::BucketNotFound(bucket.clone()));
                            }
                            return Err(e.into());
                        }
                    }
                }
                tracing::debug!(bucket = %bucket, "s3 bucket verified");

                store
            }
        };

        Ok(Self { inner })
    }

    /// Create an in-memory storage backend.
    pub fn memory() -> Self {
        Self {
            inner: Arc::new(InMemory::new()),
        }
    }

    /// Put object data into storage, overwriting any existing object.
    pub async fn put(&self, path: &str, data: Bytes) -> Result<()> {
        let path = ObjectPath::from(path);
        self.inner.put(&path, data.into()).await?;
        Ok(())
    }

    /// Get object data from storage.
    pub async fn get(&self, path: &str) -> Result<Option<Bytes>> {
        let path = ObjectPath::from(path);
        match self.inner.get(&path).await {
            Ok(result) => {
                let bytes = result.bytes().await?;
                Ok(Some(bytes))
            }
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch object metadata without reading the data.
    pub async fn meta(&self, path: &str) -> Result<Option<ObjectMeta>> {
        let path = ObjectPath::from(path);
        match self.inner.head(&path).await {
            Ok(meta) => Ok(Some(meta.into())),
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete an object from storage.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let path = ObjectPath::from(path);
        // Ignore NotFound errors - the object may already be deleted
        match self.inner.delete(&path).await {
            Ok(()) => Ok(()),
            Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a batch of objects, issuing the deletes concurrently.
    ///
    /// Runs every delete to completion before reporting the first error, so
    /// a failure on one object does not strand the rest of the batch.
    pub async fn delete_many<I, S>(&self, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let deletes = paths
            .into_iter()
            .map(|path| {
                let store = self.clone();
                let path = path.as_ref().to_string();
                async move { store.delete(&path).await }
            })
            .collect::<Vec<_>>();

        let results = futures::future::join_all(deletes).await;
        results.into_iter().collect::<Result<Vec<()>>>()?;
        Ok(())
    }

    /// Probe the backend for liveness.
    ///
    /// A missing probe object is a healthy answer; only transport or
    /// credential failures surface as errors.
    pub async fn probe(&self) -> Result<()> {
        let path = ObjectPath::from("_probe");
        match self.inner.head(&path).await {
            Ok(_) => Ok(()),
            Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = Storage::memory();

        let path = "user/1/report.txt";
        let data = Bytes::from("hello world");

        // Put and get data
        storage.put(path, data.clone()).await.unwrap();
        let retrieved = storage.get(path).await.unwrap().unwrap();
        assert_eq!(retrieved, data);

        // Metadata reflects the stored bytes
        let meta = storage.meta(path).await.unwrap().unwrap();
        assert_eq!(meta.size, data.len() as u64);

        // Delete
        storage.delete(path).await.unwrap();
        assert!(storage.get(path).await.unwrap().is_none());
        assert!(storage.meta(path).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_local_storage() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = ObjectStoreConfig::Local {
            path: temp_dir.path().to_path_buf(),
        };

        let storage = Storage::new(config).await.unwrap();

        let path = "user/7/data.bin";
        let data = Bytes::from("test data");

        storage.put(path, data.clone()).await.unwrap();
        let retrieved = storage.get(path).await.unwrap().unwrap();
        assert_eq!(retrieved, data);

        // Verify file exists on disk
        let file_path = temp_dir.path().join("user").join("7").join("data.bin");
        assert!(file_path.exists());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let storage = Storage::memory();

        storage.put("user/1/a", Bytes::from("a")).await.unwrap();
        storage.delete("user/1/a").await.unwrap();

        // Deleting again (or deleting something never stored) succeeds
        storage.delete("user/1/a").await.unwrap();
        storage.delete("user/1/never-existed").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_many() {
        let storage = Storage::memory();

        storage.put("user/2/a", Bytes::from("a")).await.unwrap();
        storage.put("user/2/b", Bytes::from("b")).await.unwrap();
        storage.put("user/2/keep", Bytes::from("k")).await.unwrap();

        storage
            .delete_many(["user/2/a", "user/2/b", "user/2/missing"])
            .await
            .unwrap();

        assert!(storage.get("user/2/a").await.unwrap().is_none());
        assert!(storage.get("user/2/b").await.unwrap().is_none());
        assert!(storage.get("user/2/keep").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_probe() {
        let storage = Storage::memory();
        storage.probe().await.unwrap();
    }
}
