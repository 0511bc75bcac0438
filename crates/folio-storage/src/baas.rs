//! BaaS-backed storage gateway.

use async_trait::async_trait;
use bytes::Bytes;

use folio_baas::BaasClient;

use crate::traits::{StorageError, StorageGateway, StorageResult};

/// Storage gateway over the BaaS object API.
#[derive(Clone)]
pub struct BaasStorage {
    client: BaasClient,
    signed_url_ttl_secs: u64,
}

impl BaasStorage {
    pub fn new(client: BaasClient) -> Self {
        let signed_url_ttl_secs = client.config().signed_url_ttl_secs;
        Self {
            client,
            signed_url_ttl_secs,
        }
    }
}

#[async_trait]
impl StorageGateway for BaasStorage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        if key.starts_with('/') || key.contains("..") {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        let size = data.len();
        let start = std::time::Instant::now();

        self.client
            .storage_upload(bucket, key, data, content_type)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Storage upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Storage upload successful"
        );

        Ok(key.to_string())
    }

    async fn resolve_display_url(&self, bucket: &str, reference: &str) -> Option<String> {
        // Rows occasionally hold full URLs already; pass them through.
        if reference.starts_with("http") {
            return Some(reference.to_string());
        }

        match self
            .client
            .storage_signed_url(bucket, reference, self.signed_url_ttl_secs)
            .await
        {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    bucket = %bucket,
                    reference = %reference,
                    "Signed URL unavailable, falling back to public URL"
                );
                Some(self.client.storage_public_url(bucket, reference))
            }
        }
    }

    async fn remove(&self, bucket: &str, references: &[String]) -> StorageResult<()> {
        self.client
            .storage_remove(bucket, references)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    count = references.len(),
                    "Storage remove failed"
                );
                StorageError::RemoveFailed(e.to_string())
            })
    }
}
