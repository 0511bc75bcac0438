//! Storage gateway abstraction.
//!
//! The publish pipeline and the browse/delete services talk to object storage
//! only through this trait, so tests can swap in the in-memory backend.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Remove failed: {0}")]
    RemoveFailed(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage gateway trait
///
/// **Key format:** keys are owner-scoped: `{user_id}/{category}/{filename}`.
/// See the crate root documentation.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Upload a blob under `{bucket}/{key}` and return the stored reference.
    ///
    /// The reference is the opaque string persisted in project rows and later
    /// handed back to `resolve_display_url`.
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Resolve a stored reference to a fetchable display URL.
    ///
    /// Tries a time-limited signed URL first and falls back to the public
    /// object URL. References that are already absolute `http(s)` URLs
    /// resolve to themselves. Returns `None` when nothing resolves; this is
    /// a per-item outcome, never an error.
    async fn resolve_display_url(&self, bucket: &str, reference: &str) -> Option<String>;

    /// Remove a batch of objects. Used by deletion flows, not by publish.
    async fn remove(&self, bucket: &str, references: &[String]) -> StorageResult<()>;
}
