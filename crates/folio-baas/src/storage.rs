//! Object storage surface of the BaaS.
//!
//! Objects live under `{bucket}/{key}`; keys are slash-separated with the
//! owning user id as the first segment (the storage policies key on it).
//! Display access goes through a time-limited signed URL, with the public
//! object URL as fallback for public buckets.

use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::Method;
use serde::Deserialize;

use crate::BaasClient;

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

/// Encode a slash-separated object key, escaping each segment but keeping
/// the separators addressable.
fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

impl BaasClient {
    /// Upload a blob to `{bucket}/{key}`, overwriting any existing object
    /// (the source app uploads with `upsert: true`).
    pub async fn storage_upload(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<()> {
        let path = format!("/storage/v1/object/{}/{}", bucket, encode_key(key));
        let request = self
            .request(Method::POST, &path)
            .header("Content-Type", content_type.to_string())
            .header("Cache-Control", "max-age=3600")
            .header("x-upsert", "true")
            .body(data);
        self.send(request)
            .await
            .with_context(|| format!("Storage upload to {}/{} failed", bucket, key))?;
        Ok(())
    }

    /// Request a time-limited signed URL for an object.
    pub async fn storage_signed_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in_secs: u64,
    ) -> Result<String> {
        let path = format!("/storage/v1/object/sign/{}/{}", bucket, encode_key(key));
        let body = serde_json::json!({ "expiresIn": expires_in_secs });
        let request = self.request(Method::POST, &path).json(&body);
        let response: SignedUrlResponse = self.send_json(request).await?;

        // The endpoint returns a path relative to the storage root.
        if response.signed_url.starts_with("http") {
            Ok(response.signed_url)
        } else {
            Ok(format!(
                "{}/storage/v1{}",
                self.base_url(),
                response.signed_url
            ))
        }
    }

    /// Public object URL. No round trip; whether it actually serves depends
    /// on the bucket being public.
    pub fn storage_public_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url(),
            bucket,
            encode_key(key)
        )
    }

    /// Remove a batch of objects from a bucket.
    pub async fn storage_remove(&self, bucket: &str, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let path = format!("/storage/v1/object/{}", bucket);
        let body = serde_json::json!({ "prefixes": keys });
        let request = self.request(Method::DELETE, &path).json(&body);
        self.send(request)
            .await
            .with_context(|| format!("Storage remove from {} failed", bucket))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_key_preserves_separators() {
        assert_eq!(encode_key("u1/gallery/a b.png"), "u1/gallery/a%20b.png");
    }
}
