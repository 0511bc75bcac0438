//! Identity resolution seam.
//!
//! The publish pipeline and the social services only need "who is signed in
//! right now"; session lifecycle itself lives in the BaaS auth service.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::AuthUser;

/// Resolves the currently signed-in user, if any.
#[async_trait]
pub trait Identity: Send + Sync {
    /// Returns the authenticated user, or `None` when nobody is signed in.
    /// Transport failures are errors; a missing session is not.
    async fn current_user(&self) -> AppResult<Option<AuthUser>>;
}
