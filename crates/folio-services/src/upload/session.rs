//! Upload session state machine.
//!
//! All state here is session-local memory; nothing touches the network until
//! `publish`. The session owns its staged images and their preview URLs and
//! releases them on removal, cancel, and post-publish teardown.

use bytes::Bytes;

use folio_core::models::{FormField, ProjectForm, ProjectId};
use folio_core::{AppError, AppResult};

use super::pipeline::{PublishInput, PublishPipeline};
use super::preview::PreviewUrls;

/// A user-selected image held in session memory, not yet uploaded.
#[derive(Debug, Clone)]
pub struct StagedImage {
    /// Locally unique within the session; stable until teardown.
    pub id: u64,
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
    /// Transient preview URL; owned by this image, released by the session.
    pub preview_url: String,
}

/// Mutually exclusive UI phases of the upload flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Starter grid shown, nothing staged yet.
    Idle,
    /// The details form is open.
    EditingDescription,
    /// The gallery builder is open.
    BuildingGallery,
    /// Preview of the assembled content.
    ReviewingContent,
    /// Terminal: the project record was created.
    Published,
    /// Terminal: the user discarded the session.
    Cancelled,
}

impl SessionMode {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionMode::Published | SessionMode::Cancelled)
    }
}

/// Client-side state for one pass through the upload flow.
///
/// Invariants:
/// - at most one of {standalone `thumbnail`, `thumbnail_id`} is set;
///   selecting one clears the other;
/// - gallery ids are unique (monotonic allocator);
/// - gallery order is insertion order and equals display order.
pub struct UploadSession {
    mode: SessionMode,
    thumbnail: Option<StagedImage>,
    gallery: Vec<StagedImage>,
    thumbnail_id: Option<u64>,
    form: ProjectForm,
    next_image_id: u64,
    previews: PreviewUrls,
}

impl Default for UploadSession {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadSession {
    pub fn new() -> Self {
        Self {
            mode: SessionMode::Idle,
            thumbnail: None,
            gallery: Vec::new(),
            thumbnail_id: None,
            form: ProjectForm::default(),
            next_image_id: 1,
            previews: PreviewUrls::new(),
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn form(&self) -> &ProjectForm {
        &self.form
    }

    pub fn gallery(&self) -> &[StagedImage] {
        &self.gallery
    }

    pub fn thumbnail(&self) -> Option<&StagedImage> {
        self.thumbnail.as_ref()
    }

    pub fn thumbnail_id(&self) -> Option<u64> {
        self.thumbnail_id
    }

    /// The preview allocator, exposed so teardown can be verified in tests.
    pub fn previews(&self) -> &PreviewUrls {
        &self.previews
    }

    fn stage(&mut self, filename: String, content_type: String, data: Bytes) -> StagedImage {
        let id = self.next_image_id;
        self.next_image_id += 1;
        let preview_url = self.previews.allocate(id, &filename);
        StagedImage {
            id,
            filename,
            content_type,
            data,
            preview_url,
        }
    }

    fn release(&mut self, image: StagedImage) {
        self.previews.release(image.id);
    }

    /// Stage a standalone thumbnail and jump to the content preview.
    /// Clears any gallery-based thumbnail selection.
    pub fn select_thumbnail_file(
        &mut self,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: Bytes,
    ) {
        if self.mode.is_terminal() {
            return;
        }
        let staged = self.stage(filename.into(), content_type.into(), data);
        if let Some(previous) = self.thumbnail.replace(staged) {
            self.release(previous);
        }
        self.thumbnail_id = None;
        self.mode = SessionMode::ReviewingContent;
    }

    /// Open the details form.
    pub fn begin_description_edit(&mut self) {
        if !self.mode.is_terminal() {
            self.mode = SessionMode::EditingDescription;
        }
    }

    /// Open the gallery builder.
    pub fn begin_gallery_build(&mut self) {
        if !self.mode.is_terminal() {
            self.mode = SessionMode::BuildingGallery;
        }
    }

    /// Append files to the gallery, in order. Only valid while building the
    /// gallery. When no thumbnail is chosen yet, the gallery head becomes
    /// the default thumbnail. Clears any standalone thumbnail.
    pub fn add_gallery_files(
        &mut self,
        files: impl IntoIterator<Item = (String, String, Bytes)>,
    ) {
        if self.mode != SessionMode::BuildingGallery {
            return;
        }
        for (filename, content_type, data) in files {
            let staged = self.stage(filename, content_type, data);
            self.gallery.push(staged);
        }
        if let Some(previous) = self.thumbnail.take() {
            self.release(previous);
        }
        if self.thumbnail_id.is_none() {
            self.thumbnail_id = self.gallery.first().map(|image| image.id);
        }
    }

    /// Pick a gallery image as the thumbnail. Unknown ids are ignored.
    pub fn set_thumbnail_from_gallery(&mut self, id: u64) {
        if self.mode != SessionMode::BuildingGallery {
            return;
        }
        if !self.gallery.iter().any(|image| image.id == id) {
            return;
        }
        self.thumbnail_id = Some(id);
        if let Some(previous) = self.thumbnail.take() {
            self.release(previous);
        }
    }

    /// Remove a gallery image, releasing its preview. When the removed image
    /// was the elected thumbnail, the new gallery head takes over.
    pub fn remove_gallery_image(&mut self, id: u64) {
        if self.mode != SessionMode::BuildingGallery {
            return;
        }
        let Some(position) = self.gallery.iter().position(|image| image.id == id) else {
            return;
        };
        let removed = self.gallery.remove(position);
        self.release(removed);
        if self.thumbnail_id == Some(id) {
            self.thumbnail_id = self.gallery.first().map(|image| image.id);
        }
    }

    /// Close the gallery builder and show the assembled content.
    pub fn finish_gallery_build(&mut self) {
        if self.mode == SessionMode::BuildingGallery {
            self.mode = SessionMode::ReviewingContent;
        }
    }

    /// Update one form field. Valid in any non-terminal state; does not
    /// change the mode.
    pub fn edit_field(&mut self, field: FormField, value: impl Into<String>) {
        if !self.mode.is_terminal() {
            self.form.set(field, value);
        }
    }

    /// Discard the session: release every preview URL and clear all staged
    /// state. Terminal; a new session backs the next pass through the flow.
    pub fn cancel(&mut self) {
        if self.mode.is_terminal() {
            return;
        }
        self.teardown();
        self.mode = SessionMode::Cancelled;
    }

    fn teardown(&mut self) {
        if let Some(thumbnail) = self.thumbnail.take() {
            self.previews.release(thumbnail.id);
        }
        for image in self.gallery.drain(..) {
            self.previews.release(image.id);
        }
        self.thumbnail_id = None;
        self.form = ProjectForm::default();
    }

    /// Validate and publish. A title that trims to empty fails locally with
    /// no network call, and the details form is re-shown. On pipeline
    /// success the session releases its resources and becomes terminal.
    pub async fn publish(&mut self, pipeline: &PublishPipeline) -> AppResult<ProjectId> {
        if self.mode.is_terminal() {
            return Err(AppError::InvalidInput(
                "upload session is already closed".to_string(),
            ));
        }
        if self.form.trimmed_title().is_empty() {
            self.mode = SessionMode::EditingDescription;
            return Err(AppError::Validation { field: "title" });
        }

        let input = PublishInput {
            form: &self.form,
            thumbnail: self.thumbnail.as_ref(),
            gallery: &self.gallery,
            thumbnail_id: self.thumbnail_id,
        };
        let id = pipeline.publish(input).await?;

        self.teardown();
        self.mode = SessionMode::Published;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> (String, String, Bytes) {
        (
            name.to_string(),
            "image/png".to_string(),
            Bytes::from(name.as_bytes().to_vec()),
        )
    }

    #[test]
    fn starts_idle_and_empty() {
        let session = UploadSession::new();
        assert_eq!(session.mode(), SessionMode::Idle);
        assert!(session.thumbnail().is_none());
        assert!(session.gallery().is_empty());
        assert_eq!(session.thumbnail_id(), None);
    }

    #[test]
    fn selecting_standalone_thumbnail_reviews_content() {
        let mut session = UploadSession::new();
        let (name, ct, data) = png("cover.png");
        session.select_thumbnail_file(name, ct, data);
        assert_eq!(session.mode(), SessionMode::ReviewingContent);
        assert!(session.thumbnail().is_some());
        assert_eq!(session.thumbnail_id(), None);
    }

    #[test]
    fn first_gallery_batch_elects_head_as_thumbnail() {
        let mut session = UploadSession::new();
        session.begin_gallery_build();
        session.add_gallery_files([png("a.png"), png("b.png"), png("c.png")]);
        let head_id = session.gallery()[0].id;
        assert_eq!(session.thumbnail_id(), Some(head_id));
        assert_eq!(session.gallery().len(), 3);
    }

    #[test]
    fn second_batch_keeps_existing_election() {
        let mut session = UploadSession::new();
        session.begin_gallery_build();
        session.add_gallery_files([png("a.png")]);
        let head_id = session.gallery()[0].id;
        session.add_gallery_files([png("b.png")]);
        assert_eq!(session.thumbnail_id(), Some(head_id));
    }

    #[test]
    fn thumbnail_sources_are_mutually_exclusive() {
        let mut session = UploadSession::new();
        session.begin_gallery_build();
        session.add_gallery_files([png("a.png"), png("b.png")]);
        assert!(session.thumbnail_id().is_some());
        assert!(session.thumbnail().is_none());

        let (name, ct, data) = png("cover.png");
        session.select_thumbnail_file(name, ct, data);
        assert!(session.thumbnail().is_some());
        assert_eq!(session.thumbnail_id(), None);

        session.begin_gallery_build();
        let second_id = session.gallery()[1].id;
        session.set_thumbnail_from_gallery(second_id);
        assert_eq!(session.thumbnail_id(), Some(second_id));
        assert!(session.thumbnail().is_none());
    }

    #[test]
    fn unknown_gallery_id_is_ignored() {
        let mut session = UploadSession::new();
        session.begin_gallery_build();
        session.add_gallery_files([png("a.png")]);
        let elected = session.thumbnail_id();
        session.set_thumbnail_from_gallery(9999);
        assert_eq!(session.thumbnail_id(), elected);
    }

    #[test]
    fn gallery_file_additions_outside_builder_are_ignored() {
        let mut session = UploadSession::new();
        session.add_gallery_files([png("a.png")]);
        assert!(session.gallery().is_empty());
    }

    #[test]
    fn removing_elected_head_reelects_new_head() {
        let mut session = UploadSession::new();
        session.begin_gallery_build();
        session.add_gallery_files([png("a.png"), png("b.png")]);
        let (head, second) = (session.gallery()[0].id, session.gallery()[1].id);
        assert_eq!(session.thumbnail_id(), Some(head));

        session.remove_gallery_image(head);
        assert_eq!(session.thumbnail_id(), Some(second));
        assert_eq!(session.previews().release_count(head), 1);
    }

    #[test]
    fn removing_last_gallery_image_clears_election() {
        let mut session = UploadSession::new();
        session.begin_gallery_build();
        session.add_gallery_files([png("a.png")]);
        let head = session.gallery()[0].id;
        session.remove_gallery_image(head);
        assert_eq!(session.thumbnail_id(), None);
        assert!(session.gallery().is_empty());
    }

    #[test]
    fn cancel_releases_every_preview_exactly_once() {
        let mut session = UploadSession::new();
        let (name, ct, data) = png("cover.png");
        session.select_thumbnail_file(name, ct, data);
        session.begin_gallery_build();
        session.add_gallery_files([png("a.png"), png("b.png")]);

        session.cancel();
        assert_eq!(session.mode(), SessionMode::Cancelled);
        assert!(session.previews().fully_released());
        assert!(session.gallery().is_empty());
        assert!(session.thumbnail().is_none());
    }

    #[test]
    fn replacing_standalone_thumbnail_releases_previous() {
        let mut session = UploadSession::new();
        let (name, ct, data) = png("one.png");
        session.select_thumbnail_file(name, ct, data);
        let first_id = session.thumbnail().map(|t| t.id).unwrap();
        let (name, ct, data) = png("two.png");
        session.select_thumbnail_file(name, ct, data);
        assert_eq!(session.previews().release_count(first_id), 1);
        assert_eq!(session.previews().live_count(), 1);
    }

    #[test]
    fn terminal_sessions_ignore_edits() {
        let mut session = UploadSession::new();
        session.cancel();
        session.edit_field(folio_core::models::FormField::Title, "late");
        assert!(session.form().title.is_empty());
        let (name, ct, data) = png("cover.png");
        session.select_thumbnail_file(name, ct, data);
        assert!(session.thumbnail().is_none());
    }
}
