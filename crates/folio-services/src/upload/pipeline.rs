//! Publish pipeline: resolve identity → upload thumbnail → fan out gallery
//! uploads → insert record → return the new project id.
//!
//! Gallery uploads are best-effort: one file failing drops that file and the
//! publish continues. The thumbnail slot and the record insert are fatal.
//! Nothing here retries, and uploaded blobs are not rolled back when the
//! insert fails.

use std::sync::Arc;

use futures::future::join_all;

use folio_core::constants::{GALLERY_CATEGORY, PROJECTS_BUCKET, THUMBNAILS_CATEGORY};
use folio_core::models::{ProjectForm, ProjectId};
use folio_core::{AppError, AppResult, Identity};
use folio_records::ProjectRepository;
use folio_storage::{ObjectKeyGen, StorageGateway, TimestampKeyGen};

use super::session::StagedImage;

/// A borrowed snapshot of the session's staged state at publish time.
pub struct PublishInput<'a> {
    pub form: &'a ProjectForm,
    pub thumbnail: Option<&'a StagedImage>,
    pub gallery: &'a [StagedImage],
    pub thumbnail_id: Option<u64>,
}

impl<'a> PublishInput<'a> {
    /// The image feeding the thumbnail slot: the standalone staged thumbnail
    /// when present, otherwise the elected gallery image.
    fn thumbnail_source(&self) -> Option<&'a StagedImage> {
        self.thumbnail.or_else(|| {
            let id = self.thumbnail_id?;
            self.gallery.iter().find(|image| image.id == id)
        })
    }
}

/// Converts a validated upload session into one persisted project record.
pub struct PublishPipeline {
    identity: Arc<dyn Identity>,
    storage: Arc<dyn StorageGateway>,
    projects: Arc<dyn ProjectRepository>,
    keygen: Arc<dyn ObjectKeyGen>,
    bucket: String,
}

impl PublishPipeline {
    pub fn new(
        identity: Arc<dyn Identity>,
        storage: Arc<dyn StorageGateway>,
        projects: Arc<dyn ProjectRepository>,
    ) -> Self {
        Self {
            identity,
            storage,
            projects,
            keygen: Arc::new(TimestampKeyGen),
            bucket: PROJECTS_BUCKET.to_string(),
        }
    }

    pub fn with_keygen(mut self, keygen: Arc<dyn ObjectKeyGen>) -> Self {
        self.keygen = keygen;
        self
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Run the pipeline. The caller (the session) has already validated the
    /// title; identity resolution is the first step and the only remote
    /// precondition.
    pub async fn publish(&self, input: PublishInput<'_>) -> AppResult<ProjectId> {
        let user = self
            .identity
            .current_user()
            .await?
            .ok_or(AppError::Unauthenticated)?;

        // Thumbnail slot first. The elected gallery image is uploaded here
        // and again in the fan-out below; the duplicate write mirrors the
        // observed behavior of the production flow.
        let thumbnail_path = match input.thumbnail_source() {
            Some(image) => {
                let key = self
                    .keygen
                    .object_key(user.id, THUMBNAILS_CATEGORY, &image.filename);
                let reference = self
                    .storage
                    .upload(&self.bucket, &key, image.data.clone(), &image.content_type)
                    .await
                    .map_err(|e| AppError::Upload(e.to_string()))?;
                Some(reference)
            }
            None => None,
        };

        // Gallery fan-out: concurrent uploads, results re-associated with
        // staging order, per-file failures dropped.
        let uploads = input.gallery.iter().map(|image| {
            let key = self
                .keygen
                .object_key(user.id, GALLERY_CATEGORY, &image.filename);
            let storage = Arc::clone(&self.storage);
            let bucket = self.bucket.clone();
            async move {
                match storage
                    .upload(&bucket, &key, image.data.clone(), &image.content_type)
                    .await
                {
                    Ok(reference) => Some(reference),
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            image_id = image.id,
                            filename = %image.filename,
                            "Gallery upload failed for one image, dropping it"
                        );
                        None
                    }
                }
            }
        });
        let gallery_paths: Vec<String> = join_all(uploads).await.into_iter().flatten().collect();

        let record = input
            .form
            .to_record(user.id, thumbnail_path, gallery_paths);

        let id = self
            .projects
            .insert(&record)
            .await
            .map_err(|e| AppError::Publish(e.to_string()))?;

        tracing::info!(
            project_id = %id,
            owner = %user.id,
            gallery_count = record.gallery_paths.as_ref().map_or(0, Vec::len),
            has_thumbnail = record.thumbnail_path.is_some(),
            "Project published"
        );

        Ok(id)
    }
}
