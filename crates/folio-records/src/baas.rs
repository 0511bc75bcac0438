//! BaaS-backed repositories over the table API.

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use folio_baas::BaasClient;
use folio_core::constants::{FOLLOWS_TABLE, PROFILES_TABLE, PROJECTS_TABLE, SETTINGS_TABLE};
use folio_core::models::{NewProject, Profile, Project, ProjectId, UserSettings};
use folio_core::{AppError, AppResult};

use crate::traits::{FollowRepository, ProfileRepository, ProjectRepository, SettingsRepository};

const PROJECT_COLUMNS: &str =
    "id,owner,title,description,creator,project_link,repo_link,thumbnail_path,gallery_paths,created_at";

#[derive(Debug, Deserialize)]
struct IdRow {
    id: Uuid,
}

/// All record-store repositories over one shared client.
#[derive(Clone)]
pub struct BaasRecords {
    client: BaasClient,
}

impl BaasRecords {
    pub fn new(client: BaasClient) -> Self {
        Self { client }
    }
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

#[async_trait]
impl ProjectRepository for BaasRecords {
    async fn insert(&self, project: &NewProject) -> AppResult<ProjectId> {
        let row: IdRow = self
            .client
            .rest_insert_returning(PROJECTS_TABLE, project, "id")
            .await
            .map_err(|e| AppError::Baas(e.to_string()))?;
        Ok(row.id)
    }

    async fn list_recent(&self) -> AppResult<Vec<Project>> {
        self.client
            .rest_select(
                PROJECTS_TABLE,
                PROJECT_COLUMNS,
                &[("order", "created_at.desc".to_string())],
            )
            .await
            .map_err(|e| AppError::Baas(e.to_string()))
    }

    async fn list_by_owner(&self, owner: Uuid) -> AppResult<Vec<Project>> {
        self.client
            .rest_select(
                PROJECTS_TABLE,
                PROJECT_COLUMNS,
                &[
                    ("owner", eq(owner)),
                    ("order", "created_at.desc".to_string()),
                ],
            )
            .await
            .map_err(|e| AppError::Baas(e.to_string()))
    }

    async fn get(&self, id: ProjectId) -> AppResult<Option<Project>> {
        self.client
            .rest_select_maybe_one(PROJECTS_TABLE, PROJECT_COLUMNS, &[("id", eq(id))])
            .await
            .map_err(|e| AppError::Baas(e.to_string()))
    }

    async fn delete(&self, id: ProjectId) -> AppResult<()> {
        self.client
            .rest_delete(PROJECTS_TABLE, &[("id", eq(id))])
            .await
            .map_err(|e| AppError::Baas(e.to_string()))
    }
}

#[async_trait]
impl FollowRepository for BaasRecords {
    async fn is_following(&self, follower: Uuid, following: Uuid) -> AppResult<bool> {
        let row: Option<serde_json::Value> = self
            .client
            .rest_select_maybe_one(
                FOLLOWS_TABLE,
                "follower_id",
                &[
                    ("follower_id", eq(follower)),
                    ("following_id", eq(following)),
                ],
            )
            .await
            .map_err(|e| AppError::Baas(e.to_string()))?;
        Ok(row.is_some())
    }

    async fn follow(&self, follower: Uuid, following: Uuid) -> AppResult<()> {
        let body = serde_json::json!({
            "follower_id": follower,
            "following_id": following,
        });
        self.client
            .rest_insert(FOLLOWS_TABLE, &body)
            .await
            .map_err(|e| AppError::Baas(e.to_string()))
    }

    async fn unfollow(&self, follower: Uuid, following: Uuid) -> AppResult<()> {
        self.client
            .rest_delete(
                FOLLOWS_TABLE,
                &[
                    ("follower_id", eq(follower)),
                    ("following_id", eq(following)),
                ],
            )
            .await
            .map_err(|e| AppError::Baas(e.to_string()))
    }
}

#[async_trait]
impl SettingsRepository for BaasRecords {
    async fn get(&self, user_id: Uuid) -> AppResult<Option<UserSettings>> {
        self.client
            .rest_select_maybe_one(SETTINGS_TABLE, "*", &[("id", eq(user_id))])
            .await
            .map_err(|e| AppError::Baas(e.to_string()))
    }

    async fn upsert_cover(&self, user_id: Uuid, cover_path: &str) -> AppResult<()> {
        let body = serde_json::json!({
            "id": user_id,
            "cover_path": cover_path,
        });
        self.client
            .rest_upsert(SETTINGS_TABLE, &body)
            .await
            .map_err(|e| AppError::Baas(e.to_string()))
    }
}

#[async_trait]
impl ProfileRepository for BaasRecords {
    async fn get(&self, user_id: Uuid) -> AppResult<Option<Profile>> {
        self.client
            .rest_select_maybe_one(
                PROFILES_TABLE,
                "id,first_name,last_name,display_name,username,avatar_path",
                &[("id", eq(user_id))],
            )
            .await
            .map_err(|e| AppError::Baas(e.to_string()))
    }
}
