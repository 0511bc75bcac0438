//! In-memory repository implementations for testing.
//!
//! These mocks allow testing the services without a network. Writes are
//! counted so tests can assert "zero writes" outcomes, and the project
//! insert can be scripted to fail.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use folio_core::models::{NewProject, Profile, Project, ProjectId, UserSettings};
use folio_core::{AppError, AppResult};

use crate::traits::{FollowRepository, ProfileRepository, ProjectRepository, SettingsRepository};

#[derive(Default)]
struct Inner {
    projects: Vec<Project>,
    follows: HashSet<(Uuid, Uuid)>,
    settings: HashMap<Uuid, UserSettings>,
    profiles: HashMap<Uuid, Profile>,
    insert_failure: Option<String>,
    insert_count: usize,
    write_count: usize,
}

/// In-memory record store backing every repository trait.
#[derive(Clone, Default)]
pub struct MemoryRecords {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next project inserts to fail with this message.
    pub fn fail_inserts(&self, message: impl Into<String>) {
        self.inner.lock().unwrap().insert_failure = Some(message.into());
    }

    pub fn add_settings(&self, settings: UserSettings) {
        let mut inner = self.inner.lock().unwrap();
        inner.settings.insert(settings.id, settings);
    }

    pub fn add_profile(&self, profile: Profile) {
        let mut inner = self.inner.lock().unwrap();
        inner.profiles.insert(profile.id, profile);
    }

    pub fn add_project(&self, project: Project) {
        self.inner.lock().unwrap().projects.push(project);
    }

    pub fn insert_count(&self) -> usize {
        self.inner.lock().unwrap().insert_count
    }

    /// Total mutating calls across all tables.
    pub fn write_count(&self) -> usize {
        self.inner.lock().unwrap().write_count
    }

    pub fn projects(&self) -> Vec<Project> {
        self.inner.lock().unwrap().projects.clone()
    }
}

#[async_trait]
impl ProjectRepository for MemoryRecords {
    async fn insert(&self, project: &NewProject) -> AppResult<ProjectId> {
        let mut inner = self.inner.lock().unwrap();
        inner.insert_count += 1;
        inner.write_count += 1;
        if let Some(message) = inner.insert_failure.clone() {
            return Err(AppError::Baas(message));
        }
        let id = Uuid::new_v4();
        inner.projects.push(Project {
            id,
            owner: project.owner,
            title: project.title.clone(),
            description: project.description.clone(),
            creator: project.creator.clone(),
            project_link: project.project_link.clone(),
            repo_link: project.repo_link.clone(),
            thumbnail_path: project.thumbnail_path.clone(),
            gallery_paths: project.gallery_paths.clone(),
            created_at: project.created_at,
        });
        Ok(id)
    }

    async fn list_recent(&self) -> AppResult<Vec<Project>> {
        let mut projects = self.inner.lock().unwrap().projects.clone();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn list_by_owner(&self, owner: Uuid) -> AppResult<Vec<Project>> {
        let mut projects: Vec<Project> = self
            .inner
            .lock()
            .unwrap()
            .projects
            .iter()
            .filter(|p| p.owner == owner)
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn get(&self, id: ProjectId) -> AppResult<Option<Project>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .projects
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn delete(&self, id: ProjectId) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.write_count += 1;
        inner.projects.retain(|p| p.id != id);
        Ok(())
    }
}

#[async_trait]
impl FollowRepository for MemoryRecords {
    async fn is_following(&self, follower: Uuid, following: Uuid) -> AppResult<bool> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .follows
            .contains(&(follower, following)))
    }

    async fn follow(&self, follower: Uuid, following: Uuid) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.write_count += 1;
        inner.follows.insert((follower, following));
        Ok(())
    }

    async fn unfollow(&self, follower: Uuid, following: Uuid) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.write_count += 1;
        inner.follows.remove(&(follower, following));
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for MemoryRecords {
    async fn get(&self, user_id: Uuid) -> AppResult<Option<UserSettings>> {
        Ok(self.inner.lock().unwrap().settings.get(&user_id).cloned())
    }

    async fn upsert_cover(&self, user_id: Uuid, cover_path: &str) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.write_count += 1;
        let entry = inner.settings.entry(user_id).or_insert_with(|| UserSettings {
            id: user_id,
            ..Default::default()
        });
        entry.cover_path = Some(cover_path.to_string());
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for MemoryRecords {
    async fn get(&self, user_id: Uuid) -> AppResult<Option<Profile>> {
        Ok(self.inner.lock().unwrap().profiles.get(&user_id).cloned())
    }
}
