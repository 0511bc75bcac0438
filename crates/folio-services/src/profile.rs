//! Profile page assembly and cover upload.

use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use folio_core::constants::{AVATARS_BUCKET, COVERS_BUCKET, PROJECTS_BUCKET};
use folio_core::{AppError, AppResult, Identity};
use folio_records::{FollowRepository, ProfileRepository, ProjectRepository, SettingsRepository};
use folio_storage::{ObjectKeyGen, StorageGateway, TimestampKeyGen};

use crate::projects::{build_cards, ProjectCard};

/// Social links shown on the profile sidebar.
#[derive(Debug, Clone, Default)]
pub struct SocialLinks {
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
}

/// Everything the profile page needs, assembled in one pass.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub user_id: Uuid,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub cover_url: Option<String>,
    pub links: SocialLinks,
    pub works: Vec<ProjectCard>,
    pub is_own_profile: bool,
    /// The viewer follows this profile.
    pub is_following: bool,
    /// This profile follows the viewer (drives "Follow Back").
    pub is_followed_by: bool,
}

/// Assembles profile views and handles the cover photo upload.
pub struct ProfileService {
    identity: Arc<dyn Identity>,
    storage: Arc<dyn StorageGateway>,
    projects: Arc<dyn ProjectRepository>,
    settings: Arc<dyn SettingsRepository>,
    profiles: Arc<dyn ProfileRepository>,
    follows: Arc<dyn FollowRepository>,
    keygen: Arc<dyn ObjectKeyGen>,
    projects_bucket: String,
    avatars_bucket: String,
    covers_bucket: String,
}

impl ProfileService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        identity: Arc<dyn Identity>,
        storage: Arc<dyn StorageGateway>,
        projects: Arc<dyn ProjectRepository>,
        settings: Arc<dyn SettingsRepository>,
        profiles: Arc<dyn ProfileRepository>,
        follows: Arc<dyn FollowRepository>,
    ) -> Self {
        Self {
            identity,
            storage,
            projects,
            settings,
            profiles,
            follows,
            keygen: Arc::new(TimestampKeyGen),
            projects_bucket: PROJECTS_BUCKET.to_string(),
            avatars_bucket: AVATARS_BUCKET.to_string(),
            covers_bucket: COVERS_BUCKET.to_string(),
        }
    }

    pub fn with_keygen(mut self, keygen: Arc<dyn ObjectKeyGen>) -> Self {
        self.keygen = keygen;
        self
    }

    /// Assemble the profile page for `target`, or the signed-in user's own
    /// page when `target` is `None`.
    pub async fn view(&self, target: Option<Uuid>) -> AppResult<ProfileView> {
        let current = self.identity.current_user().await?;
        let target_id = match target.or_else(|| current.as_ref().map(|u| u.id)) {
            Some(id) => id,
            None => return Err(AppError::Unauthenticated),
        };
        let is_own_profile = current.as_ref().map(|u| u.id) == Some(target_id);

        let settings = self.settings.get(target_id).await?;
        let profile = self.profiles.get(target_id).await?;

        let effective = settings.clone().unwrap_or_default();
        let display_name = effective.resolve_display_name(profile.as_ref());

        let avatar_path = effective
            .avatar_path
            .clone()
            .or_else(|| profile.as_ref().and_then(|p| p.avatar_path.clone()));
        let avatar_url = match avatar_path {
            Some(path) => {
                self.storage
                    .resolve_display_url(&self.avatars_bucket, &path)
                    .await
            }
            None => None,
        };
        let cover_url = match &effective.cover_path {
            Some(path) => {
                self.storage
                    .resolve_display_url(&self.covers_bucket, path)
                    .await
            }
            None => None,
        };

        // Follow state only matters between two distinct signed-in users.
        let (is_following, is_followed_by) = match current.as_ref() {
            Some(user) if user.id != target_id => (
                self.follows.is_following(user.id, target_id).await?,
                self.follows.is_following(target_id, user.id).await?,
            ),
            _ => (false, false),
        };

        let projects = self.projects.list_by_owner(target_id).await?;
        let works = build_cards(self.storage.as_ref(), &self.projects_bucket, projects).await;

        Ok(ProfileView {
            user_id: target_id,
            display_name,
            bio: effective.bio.clone(),
            avatar_url,
            cover_url,
            links: SocialLinks {
                facebook: effective.facebook.clone(),
                instagram: effective.instagram.clone(),
                github: effective.github.clone(),
                linkedin: effective.linkedin.clone(),
            },
            works,
            is_own_profile,
            is_following,
            is_followed_by,
        })
    }

    /// Upload a new cover photo for the signed-in user and point their
    /// settings row at it. Returns the stored reference.
    pub async fn upload_cover(
        &self,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> AppResult<String> {
        let user = self
            .identity
            .current_user()
            .await?
            .ok_or(AppError::Unauthenticated)?;

        let key = self.keygen.cover_key(user.id, filename);
        let reference = self
            .storage
            .upload(&self.covers_bucket, &key, data, content_type)
            .await
            .map_err(|e| AppError::Upload(e.to_string()))?;

        self.settings.upsert_cover(user.id, &reference).await?;
        tracing::info!(user_id = %user.id, reference = %reference, "Cover photo updated");
        Ok(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::models::{Profile, UserSettings};
    use folio_records::MemoryRecords;
    use folio_storage::MemoryStorage;

    use crate::test_helpers::MockIdentity;

    fn service(identity: MockIdentity, storage: MemoryStorage, records: MemoryRecords) -> ProfileService {
        let records = Arc::new(records);
        ProfileService::new(
            Arc::new(identity),
            Arc::new(storage),
            records.clone(),
            records.clone(),
            records.clone(),
            records,
        )
    }

    #[tokio::test]
    async fn own_profile_without_target_requires_identity() {
        let service = service(
            MockIdentity::nobody(),
            MemoryStorage::new(),
            MemoryRecords::new(),
        );
        let err = service.view(None).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[tokio::test]
    async fn foreign_profile_reports_follow_state_both_ways() {
        let viewer = Uuid::new_v4();
        let target = Uuid::new_v4();
        let records = MemoryRecords::new();
        records.add_profile(Profile {
            id: target,
            first_name: None,
            last_name: None,
            display_name: None,
            username: Some("ada42".into()),
            avatar_path: None,
        });
        records.follow(target, viewer).await.unwrap();

        let service = service(
            MockIdentity::signed_in(viewer),
            MemoryStorage::new(),
            records,
        );
        let view = service.view(Some(target)).await.unwrap();
        assert!(!view.is_own_profile);
        assert!(!view.is_following);
        assert!(view.is_followed_by);
        assert_eq!(view.display_name, "ada42");
    }

    #[tokio::test]
    async fn anonymous_viewer_sees_profile_without_follow_state() {
        let target = Uuid::new_v4();
        let records = MemoryRecords::new();
        records.add_settings(UserSettings {
            id: target,
            display_name: Some("Ada".into()),
            bio: Some("builder".into()),
            ..Default::default()
        });

        let service = service(MockIdentity::nobody(), MemoryStorage::new(), records);
        let view = service.view(Some(target)).await.unwrap();
        assert_eq!(view.display_name, "Ada");
        assert_eq!(view.bio.as_deref(), Some("builder"));
        assert!(!view.is_following && !view.is_followed_by);
    }

    #[tokio::test]
    async fn cover_upload_stores_and_points_settings() {
        let user = Uuid::new_v4();
        let storage = MemoryStorage::new();
        let records = MemoryRecords::new();
        let service = service(
            MockIdentity::signed_in(user),
            storage.clone(),
            records.clone(),
        );

        let reference = service
            .upload_cover("beach.jpg", "image/jpeg", Bytes::from_static(b"jpeg"))
            .await
            .unwrap();
        assert!(reference.starts_with(&user.to_string()));
        assert!(storage.contains(COVERS_BUCKET, &reference));
        let settings = SettingsRepository::get(&records, user).await.unwrap().unwrap();
        assert_eq!(settings.cover_path.as_deref(), Some(reference.as_str()));
    }
}
