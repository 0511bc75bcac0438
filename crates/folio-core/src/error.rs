//! Error types module
//!
//! All errors are unified under the `AppError` enum, which covers local
//! validation, identity resolution, storage uploads, and record-store writes.
//!
//! Propagation policy: validation failures are raised before any network call
//! is made; network failures are caught at the pipeline boundary and converted
//! into a single user-facing message. Nothing in this crate retries.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required field was missing or empty. Never reaches the network layer.
    #[error("Missing required field: {field}")]
    Validation { field: &'static str },

    /// No signed-in identity could be resolved. The caller should redirect
    /// the user to sign-in; this is not retried automatically.
    #[error("Not signed in")]
    Unauthenticated,

    /// A fatal upload failure (thumbnail slot). Per-gallery-file failures are
    /// tolerated by the pipeline and never surface as this variant.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// The record insert failed after the uploads completed. Already-uploaded
    /// files are left in storage.
    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("BaaS request failed: {0}")]
    Baas(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// True when the user can fix the problem locally and try again without
    /// any state having been written remotely.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AppError::Validation { .. } | AppError::InvalidInput(_) | AppError::Config(_)
        )
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("UUID parsing error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_local() {
        assert!(AppError::Validation { field: "title" }.is_local());
        assert!(!AppError::Unauthenticated.is_local());
        assert!(!AppError::Publish("insert failed".into()).is_local());
    }

    #[test]
    fn messages_name_the_field() {
        let err = AppError::Validation { field: "title" };
        assert_eq!(err.to_string(), "Missing required field: title");
    }
}
