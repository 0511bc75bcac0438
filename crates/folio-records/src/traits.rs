//! Repository traits over the record store.
//!
//! Services depend on these seams only; the BaaS-backed implementations live
//! in `baas`, the test mocks in `memory`.

use async_trait::async_trait;
use uuid::Uuid;

use folio_core::models::{NewProject, Profile, Project, ProjectId, UserSettings};
use folio_core::AppResult;

/// Project rows (`projects` table).
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Insert a project and return the id the store assigned.
    async fn insert(&self, project: &NewProject) -> AppResult<ProjectId>;

    /// Recent projects first (created_at descending).
    async fn list_recent(&self) -> AppResult<Vec<Project>>;

    /// One user's projects, newest first.
    async fn list_by_owner(&self, owner: Uuid) -> AppResult<Vec<Project>>;

    async fn get(&self, id: ProjectId) -> AppResult<Option<Project>>;

    async fn delete(&self, id: ProjectId) -> AppResult<()>;
}

/// Follow edges (`follows` table).
#[async_trait]
pub trait FollowRepository: Send + Sync {
    async fn is_following(&self, follower: Uuid, following: Uuid) -> AppResult<bool>;

    async fn follow(&self, follower: Uuid, following: Uuid) -> AppResult<()>;

    async fn unfollow(&self, follower: Uuid, following: Uuid) -> AppResult<()>;
}

/// User settings (`settings` table), keyed by user id.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self, user_id: Uuid) -> AppResult<Option<UserSettings>>;

    /// Point the user's cover photo at a new storage reference.
    async fn upsert_cover(&self, user_id: Uuid, cover_path: &str) -> AppResult<()>;
}

/// Sign-up profiles (`profiles` table), the fallback source for names.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get(&self, user_id: Uuid) -> AppResult<Option<Profile>>;
}
