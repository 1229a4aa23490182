//! Pluggable Object Storage Backend
//!
//! This crate wraps the `object_store` ecosystem crate behind a small
//! interface suited to user file storage: put/get/head/delete on opaque
//! string paths, with a config enum selecting the backend.
//!
//! # Features
//!
//! - Multiple storage backends: S3, MinIO, local filesystem, in-memory
//! - NotFound-tolerant deletes, so removal is idempotent
//! - Batched concurrent deletes for bulk removal
//!
//! # Example
//!
//! ```rust,no_run
//! use depot_object_store::{ObjectStoreConfig, Storage};
//!
//! # async fn example() -> Result<(), depot_object_store::StoreError> {
//! // Create a local file-backed store
//! let storage = Storage::new(ObjectStoreConfig::Local {
//!     path: "/tmp/depot".into(),
//! })
//! .await?;
//!
//! storage.put("user/1/hello.txt", "hi".into()).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod storage;

pub use error::{Result, StoreError};
pub use storage::{ObjectMeta, ObjectStoreConfig, Storage};
