//! Configuration module
//!
//! Connection settings for the external BaaS (base URL, API keys, bucket
//! names), loaded from the environment with sensible defaults.

use std::env;

use crate::constants;
use crate::error::AppError;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Connection configuration for the BaaS collaborator.
///
/// `anon_key` is the project-scoped public API key sent with every request;
/// `access_token` is the signed-in user's bearer token, absent when nobody is
/// signed in (publish then fails with `AppError::Unauthenticated`).
#[derive(Clone, Debug)]
pub struct BaasConfig {
    pub base_url: String,
    pub anon_key: String,
    pub access_token: Option<String>,
    pub projects_bucket: String,
    pub avatars_bucket: String,
    pub covers_bucket: String,
    pub signed_url_ttl_secs: u64,
    pub http_timeout_secs: u64,
}

impl BaasConfig {
    /// Load configuration from the environment.
    ///
    /// Required: `FOLIO_BAAS_URL`, `FOLIO_BAAS_ANON_KEY`.
    /// Optional: `FOLIO_ACCESS_TOKEN`, bucket overrides, TTL/timeout overrides.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let base_url = env::var("FOLIO_BAAS_URL")
            .map_err(|_| AppError::Config("FOLIO_BAAS_URL must be set".to_string()))?;
        let anon_key = env::var("FOLIO_BAAS_ANON_KEY")
            .map_err(|_| AppError::Config("FOLIO_BAAS_ANON_KEY must be set".to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            access_token: env::var("FOLIO_ACCESS_TOKEN").ok(),
            projects_bucket: env::var("FOLIO_PROJECTS_BUCKET")
                .unwrap_or_else(|_| constants::PROJECTS_BUCKET.to_string()),
            avatars_bucket: env::var("FOLIO_AVATARS_BUCKET")
                .unwrap_or_else(|_| constants::AVATARS_BUCKET.to_string()),
            covers_bucket: env::var("FOLIO_COVERS_BUCKET")
                .unwrap_or_else(|_| constants::COVERS_BUCKET.to_string()),
            signed_url_ttl_secs: parse_env_u64(
                "FOLIO_SIGNED_URL_TTL_SECS",
                constants::SIGNED_URL_TTL_SECS,
            )?,
            http_timeout_secs: parse_env_u64("FOLIO_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
        })
    }

    /// Build a config directly, for tests and embedding.
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            access_token: None,
            projects_bucket: constants::PROJECTS_BUCKET.to_string(),
            avatars_bucket: constants::AVATARS_BUCKET.to_string(),
            covers_bucket: constants::COVERS_BUCKET.to_string(),
            signed_url_ttl_secs: constants::SIGNED_URL_TTL_SECS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|_| AppError::Config(format!("{} must be an integer, got {:?}", name, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_trailing_slash_and_uses_default_buckets() {
        let config = BaasConfig::new("https://abc.example.co/", "anon");
        assert_eq!(config.base_url, "https://abc.example.co");
        assert_eq!(config.projects_bucket, "projects");
        assert_eq!(config.covers_bucket, "covers");
        assert!(config.access_token.is_none());
    }

    #[test]
    fn with_access_token_sets_bearer() {
        let config = BaasConfig::new("https://abc.example.co", "anon").with_access_token("jwt");
        assert_eq!(config.access_token.as_deref(), Some("jwt"));
    }
}
