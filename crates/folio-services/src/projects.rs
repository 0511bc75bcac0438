//! Browsing and lifecycle of published projects: the feed, the detail view,
//! and owner-initiated deletion.

use std::sync::Arc;

use futures::future::join_all;
use uuid::Uuid;

use folio_core::constants::{AVATARS_BUCKET, PROJECTS_BUCKET};
use folio_core::models::{Project, ProjectId};
use folio_core::{AppError, AppResult};
use folio_records::{ProfileRepository, ProjectRepository, SettingsRepository};
use folio_storage::StorageGateway;

/// One feed/profile card. A missing image is a rendering fallback, never an
/// error.
#[derive(Debug, Clone)]
pub struct ProjectCard {
    pub id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Fully assembled detail view of one project.
#[derive(Debug, Clone)]
pub struct ProjectDetail {
    pub project: Project,
    /// Display URLs in gallery order; unresolvable references are dropped.
    pub image_urls: Vec<String>,
    pub owner_name: String,
    pub owner_avatar_url: Option<String>,
}

/// Resolve display URLs for a batch of projects, preserving order. Cards
/// prefer the thumbnail slot and fall back to the gallery head.
pub async fn build_cards(
    storage: &dyn StorageGateway,
    bucket: &str,
    projects: Vec<Project>,
) -> Vec<ProjectCard> {
    let resolutions = projects.iter().map(|project| async {
        match project.card_image_path() {
            Some(path) => storage.resolve_display_url(bucket, path).await,
            None => None,
        }
    });
    let image_urls = join_all(resolutions).await;

    projects
        .into_iter()
        .zip(image_urls)
        .map(|(project, image_url)| ProjectCard {
            id: project.id,
            title: project.title,
            description: project.description,
            image_url,
        })
        .collect()
}

/// Read side of the projects table plus owner-initiated deletion.
pub struct ProjectService {
    storage: Arc<dyn StorageGateway>,
    projects: Arc<dyn ProjectRepository>,
    settings: Arc<dyn SettingsRepository>,
    profiles: Arc<dyn ProfileRepository>,
    projects_bucket: String,
    avatars_bucket: String,
}

impl ProjectService {
    pub fn new(
        storage: Arc<dyn StorageGateway>,
        projects: Arc<dyn ProjectRepository>,
        settings: Arc<dyn SettingsRepository>,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            storage,
            projects,
            settings,
            profiles,
            projects_bucket: PROJECTS_BUCKET.to_string(),
            avatars_bucket: AVATARS_BUCKET.to_string(),
        }
    }

    /// Latest projects first, with resolved card images.
    pub async fn feed(&self) -> AppResult<Vec<ProjectCard>> {
        let projects = self.projects.list_recent().await?;
        Ok(build_cards(self.storage.as_ref(), &self.projects_bucket, projects).await)
    }

    /// One user's projects, newest first, with resolved card images.
    pub async fn works_of(&self, owner: Uuid) -> AppResult<Vec<ProjectCard>> {
        let projects = self.projects.list_by_owner(owner).await?;
        Ok(build_cards(self.storage.as_ref(), &self.projects_bucket, projects).await)
    }

    /// Assemble the detail view: images in display order, the owner's name
    /// and avatar resolved with the same fallbacks the profile page uses.
    pub async fn detail(&self, id: ProjectId) -> AppResult<ProjectDetail> {
        let project = self
            .projects
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("project {}", id)))?;

        // Gallery when present, thumbnail otherwise.
        let paths: Vec<String> = match &project.gallery_paths {
            Some(paths) if !paths.is_empty() => paths.clone(),
            _ => project.thumbnail_path.clone().into_iter().collect(),
        };
        let resolutions = paths
            .iter()
            .map(|path| self.storage.resolve_display_url(&self.projects_bucket, path));
        let image_urls: Vec<String> = join_all(resolutions).await.into_iter().flatten().collect();

        let settings = self.settings.get(project.owner).await?;
        let profile = self.profiles.get(project.owner).await?;
        let owner_name = settings
            .as_ref()
            .cloned()
            .unwrap_or_default()
            .resolve_display_name(profile.as_ref());

        let avatar_path = settings
            .as_ref()
            .and_then(|s| s.avatar_path.clone())
            .or_else(|| profile.as_ref().and_then(|p| p.avatar_path.clone()));
        let owner_avatar_url = match avatar_path {
            Some(path) => {
                self.storage
                    .resolve_display_url(&self.avatars_bucket, &path)
                    .await
            }
            None => None,
        };

        Ok(ProjectDetail {
            project,
            image_urls,
            owner_name,
            owner_avatar_url,
        })
    }

    /// Delete a project: best-effort removal of its stored images, then the
    /// row. A storage failure is logged and does not keep the row alive.
    pub async fn delete(&self, id: ProjectId) -> AppResult<()> {
        let project = self
            .projects
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("project {}", id)))?;

        let mut references: Vec<String> = Vec::new();
        if let Some(path) = &project.thumbnail_path {
            references.push(path.clone());
        }
        if let Some(paths) = &project.gallery_paths {
            references.extend(paths.iter().cloned());
        }

        if !references.is_empty() {
            if let Err(e) = self.storage.remove(&self.projects_bucket, &references).await {
                tracing::warn!(
                    error = %e,
                    project_id = %id,
                    count = references.len(),
                    "Some project files failed to delete from storage"
                );
            }
        }

        self.projects.delete(id).await?;
        tracing::info!(project_id = %id, "Project deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::Utc;
    use folio_core::models::UserSettings;
    use folio_records::MemoryRecords;
    use folio_storage::MemoryStorage;

    fn service(storage: MemoryStorage, records: MemoryRecords) -> ProjectService {
        let records = Arc::new(records);
        ProjectService::new(
            Arc::new(storage),
            records.clone(),
            records.clone(),
            records,
        )
    }

    fn project(owner: Uuid, title: &str, thumbnail: Option<&str>, gallery: &[&str]) -> Project {
        Project {
            id: Uuid::new_v4(),
            owner,
            title: title.to_string(),
            description: None,
            creator: None,
            project_link: None,
            repo_link: None,
            thumbnail_path: thumbnail.map(str::to_string),
            gallery_paths: if gallery.is_empty() {
                None
            } else {
                Some(gallery.iter().map(|s| s.to_string()).collect())
            },
            created_at: Utc::now(),
        }
    }

    async fn store(storage: &MemoryStorage, key: &str) {
        storage
            .upload(PROJECTS_BUCKET, key, Bytes::from_static(b"img"), "image/png")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn feed_resolves_card_images_and_tolerates_missing_ones() {
        let storage = MemoryStorage::new();
        let records = MemoryRecords::new();
        let owner = Uuid::new_v4();

        store(&storage, "u/thumbnails/1.png").await;
        records.add_project(project(owner, "With image", Some("u/thumbnails/1.png"), &[]));
        records.add_project(project(owner, "Broken image", Some("u/missing.png"), &[]));
        records.add_project(project(owner, "No image", None, &[]));

        let cards = service(storage, records).feed().await.unwrap();
        assert_eq!(cards.len(), 3);
        let by_title = |title: &str| cards.iter().find(|c| c.title == title).unwrap();
        assert!(by_title("With image").image_url.is_some());
        assert!(by_title("Broken image").image_url.is_none());
        assert!(by_title("No image").image_url.is_none());
    }

    #[tokio::test]
    async fn detail_prefers_gallery_and_resolves_owner_name() {
        let storage = MemoryStorage::new();
        let records = MemoryRecords::new();
        let owner = Uuid::new_v4();

        store(&storage, "u/gallery/1.png").await;
        store(&storage, "u/gallery/2.png").await;
        let p = project(
            owner,
            "Site",
            Some("u/thumbnails/1.png"),
            &["u/gallery/1.png", "u/gallery/2.png"],
        );
        let id = p.id;
        records.add_project(p);
        records.add_settings(UserSettings {
            id: owner,
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            ..Default::default()
        });

        let detail = service(storage, records).detail(id).await.unwrap();
        assert_eq!(detail.image_urls.len(), 2);
        assert!(detail.image_urls[0].ends_with("u/gallery/1.png"));
        assert_eq!(detail.owner_name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn delete_removes_files_then_row() {
        let storage = MemoryStorage::new();
        let records = MemoryRecords::new();
        let owner = Uuid::new_v4();

        store(&storage, "u/thumbnails/1.png").await;
        store(&storage, "u/gallery/1.png").await;
        let p = project(owner, "Doomed", Some("u/thumbnails/1.png"), &["u/gallery/1.png"]);
        let id = p.id;
        records.add_project(p);

        let service = service(storage.clone(), records.clone());
        service.delete(id).await.unwrap();

        assert_eq!(
            storage.removed_keys(),
            vec!["u/thumbnails/1.png".to_string(), "u/gallery/1.png".to_string()]
        );
        assert!(records.projects().is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_project_is_not_found() {
        let err = service(MemoryStorage::new(), MemoryRecords::new())
            .delete(Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
