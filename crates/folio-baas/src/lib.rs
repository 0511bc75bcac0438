//! Shared HTTP client for the BaaS platform.
//!
//! Provides a minimal client carrying the project API key and the signed-in
//! user's bearer token, generic request helpers, and domain methods split
//! across the three BaaS surfaces: auth (`auth`), the table API (`rest`),
//! and object storage (`storage`). The storage-gateway and record-store
//! crates build their trait implementations on top of this client.

pub mod auth;
pub mod rest;
pub mod storage;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use folio_core::BaasConfig;

/// HTTP client for the BaaS with key/bearer auth applied to every request.
#[derive(Clone, Debug)]
pub struct BaasClient {
    client: Client,
    config: BaasConfig,
}

impl BaasClient {
    pub fn new(config: BaasConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Create a client from environment: FOLIO_BAAS_URL, FOLIO_BAAS_ANON_KEY,
    /// and optionally FOLIO_ACCESS_TOKEN for the signed-in user.
    pub fn from_env() -> Result<Self> {
        let config = BaasConfig::from_env().context("Invalid BaaS configuration")?;
        Self::new(config)
    }

    pub fn config(&self) -> &BaasConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Apply the project API key and the bearer token. When nobody is signed
    /// in, the anon key doubles as the bearer, which the platform accepts for
    /// public reads and rejects for row-protected writes.
    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let bearer = self
            .config
            .access_token
            .as_deref()
            .unwrap_or(&self.config.anon_key);
        request
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {}", bearer))
    }

    pub(crate) fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> reqwest::RequestBuilder {
        self.apply_auth(self.client.request(method, self.build_url(path)))
    }

    /// Send a request and fail with the response body on a non-success status.
    pub(crate) async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "BaaS request failed with status {}: {}",
                status,
                error_text
            ));
        }

        Ok(response)
    }

    /// Send a request and deserialize the JSON response.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = self.send(request).await?;
        response
            .json()
            .await
            .context("Failed to parse response as JSON")
    }

    /// Raw client for requests outside the BaaS base URL.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

// Re-export domain types for convenience.
pub use auth::AuthSession;
pub use folio_core::models::AuthUser;
