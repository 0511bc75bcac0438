//! Auth surface of the BaaS: session lifecycle and identity resolution.
//!
//! Sign-up and sign-in lowercase the email before sending, matching the
//! account-creation behavior the rest of the app relies on. OAuth provider
//! flows are browser redirects and have no place in this client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;

use folio_core::models::AuthUser;
use folio_core::{AppError, AppResult, Identity};

use crate::BaasClient;

/// A signed-in session as returned by the auth endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

impl BaasClient {
    /// Create an account. Returns the new session when email confirmation is
    /// disabled on the project; otherwise the session token may be absent
    /// until the user confirms.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession> {
        let body = serde_json::json!({
            "email": email.to_lowercase(),
            "password": password,
        });
        let request = self.request(Method::POST, "/auth/v1/signup").json(&body);
        self.send_json(request).await.context("Sign-up failed")
    }

    /// Password sign-in. The returned access token should be stored in the
    /// config (`with_access_token`) for subsequent row-protected calls.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession> {
        let body = serde_json::json!({
            "email": email.to_lowercase(),
            "password": password,
        });
        let request = self
            .request(Method::POST, "/auth/v1/token?grant_type=password")
            .json(&body);
        self.send_json(request).await.context("Sign-in failed")
    }

    /// Revoke the current session's token.
    pub async fn sign_out(&self) -> Result<()> {
        let request = self.request(Method::POST, "/auth/v1/logout");
        self.send(request).await?;
        Ok(())
    }

    /// Fetch the user behind the current bearer token. A 401/403 means no
    /// valid session, which is a normal outcome, not an error.
    pub async fn get_user(&self) -> Result<Option<AuthUser>> {
        let request = self.request(Method::GET, "/auth/v1/user");
        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Ok(None);
        }
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

        let user: AuthUser = response
            .json()
            .await
            .context("Failed to parse user response")?;
        Ok(Some(user))
    }
}

#[async_trait]
impl Identity for BaasClient {
    async fn current_user(&self) -> AppResult<Option<AuthUser>> {
        // Without a stored access token there is nothing to resolve.
        if self.config().access_token.is_none() {
            return Ok(None);
        }
        self.get_user()
            .await
            .map_err(|e| AppError::Baas(e.to_string()))
    }
}
