use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier assigned by the record store on insert.
pub type ProjectId = Uuid;

/// Persisted project row (`projects` table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    /// Owning user; immutable once created.
    pub owner: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub creator: Option<String>,
    pub project_link: Option<String>,
    pub repo_link: Option<String>,
    /// Storage reference for the thumbnail slot.
    pub thumbnail_path: Option<String>,
    /// Storage references in display order; None when no gallery was staged
    /// or every gallery upload failed.
    pub gallery_paths: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// The storage reference used for card thumbnails: the thumbnail slot
    /// when set, otherwise the first gallery image.
    pub fn card_image_path(&self) -> Option<&str> {
        self.thumbnail_path
            .as_deref()
            .or_else(|| self.gallery_paths.as_ref()?.first().map(String::as_str))
    }
}

/// Payload inserted by the publish pipeline. Field names match the table
/// columns; `created_at` is filled client-side like the source app does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProject {
    pub owner: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub creator: Option<String>,
    pub project_link: Option<String>,
    pub repo_link: Option<String>,
    pub thumbnail_path: Option<String>,
    pub gallery_paths: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

/// Free-text fields collected in the upload form. Everything is optional
/// except the title, which must be non-empty after trimming at publish time.
#[derive(Debug, Clone, Default)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub creator_name: String,
    pub project_link: String,
    pub repo_link: String,
}

/// Addressable form fields, for the session's `edit_field` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    CreatorName,
    ProjectLink,
    RepoLink,
}

impl ProjectForm {
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Title => self.title = value,
            FormField::Description => self.description = value,
            FormField::CreatorName => self.creator_name = value,
            FormField::ProjectLink => self.project_link = value,
            FormField::RepoLink => self.repo_link = value,
        }
    }

    pub fn trimmed_title(&self) -> &str {
        self.title.trim()
    }

    /// Trimmed optional field, mapped to None when empty (stored as null).
    fn optional(value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Assemble the insert payload from the trimmed form and upload results.
    pub fn to_record(
        &self,
        owner: Uuid,
        thumbnail_path: Option<String>,
        gallery_paths: Vec<String>,
    ) -> NewProject {
        NewProject {
            owner,
            title: self.trimmed_title().to_string(),
            description: Self::optional(&self.description),
            creator: Self::optional(&self.creator_name),
            project_link: Self::optional(&self.project_link),
            repo_link: Self::optional(&self.repo_link),
            thumbnail_path,
            gallery_paths: if gallery_paths.is_empty() {
                None
            } else {
                Some(gallery_paths)
            },
            created_at: Utc::now(),
        }
    }
}
