use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated user as reported by the BaaS auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}
