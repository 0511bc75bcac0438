//! End-to-end publish workflow tests over the in-memory collaborators.

use std::sync::Arc;

use bytes::Bytes;

use folio_core::models::FormField;
use folio_core::AppError;
use folio_records::MemoryRecords;
use folio_services::test_helpers::{MockIdentity, SequenceKeyGen};
use folio_services::{PublishPipeline, SessionMode, UploadSession};
use folio_storage::MemoryStorage;

fn pipeline(
    identity: &MockIdentity,
    storage: &MemoryStorage,
    records: &MemoryRecords,
) -> PublishPipeline {
    PublishPipeline::new(
        Arc::new(identity.clone()),
        Arc::new(storage.clone()),
        Arc::new(records.clone()),
    )
    .with_keygen(Arc::new(SequenceKeyGen::new()))
}

fn png(name: &str) -> (String, String, Bytes) {
    (
        name.to_string(),
        "image/png".to_string(),
        Bytes::from(name.as_bytes().to_vec()),
    )
}

#[tokio::test]
async fn empty_title_fails_locally_with_zero_network_calls() {
    let identity = MockIdentity::signed_in(uuid::Uuid::new_v4());
    let storage = MemoryStorage::new();
    let records = MemoryRecords::new();
    let pipeline = pipeline(&identity, &storage, &records);

    let mut session = UploadSession::new();
    session.begin_gallery_build();
    session.add_gallery_files([png("a.png")]);
    session.edit_field(FormField::Title, "   ");

    let err = session.publish(&pipeline).await.unwrap_err();
    assert!(matches!(err, AppError::Validation { field: "title" }));

    assert_eq!(identity.call_count(), 0);
    assert_eq!(storage.upload_count(), 0);
    assert_eq!(records.insert_count(), 0);

    // The user stays in place: form re-shown, staged state intact.
    assert_eq!(session.mode(), SessionMode::EditingDescription);
    assert_eq!(session.gallery().len(), 1);
}

#[tokio::test]
async fn unauthenticated_publish_writes_nothing() {
    let identity = MockIdentity::nobody();
    let storage = MemoryStorage::new();
    let records = MemoryRecords::new();
    let pipeline = pipeline(&identity, &storage, &records);

    let mut session = UploadSession::new();
    session.edit_field(FormField::Title, "Portfolio Site");
    session.begin_gallery_build();
    session.add_gallery_files([png("a.png")]);

    let err = session.publish(&pipeline).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated));
    assert_eq!(storage.upload_count(), 0);
    assert_eq!(records.insert_count(), 0);
    assert!(!session.mode().is_terminal());
}

#[tokio::test]
async fn success_path_publishes_with_elected_gallery_thumbnail() {
    let owner = uuid::Uuid::new_v4();
    let identity = MockIdentity::signed_in(owner);
    let storage = MemoryStorage::new();
    let records = MemoryRecords::new();
    let pipeline = pipeline(&identity, &storage, &records);

    let mut session = UploadSession::new();
    session.edit_field(FormField::Title, "Portfolio Site");
    session.begin_gallery_build();
    session.add_gallery_files([png("img1.png"), png("img2.png")]);
    session.finish_gallery_build();

    let id = session.publish(&pipeline).await.unwrap();

    // The elected gallery thumbnail is uploaded twice: once for the
    // thumbnail slot, once in the gallery fan-out.
    assert_eq!(
        storage.uploaded_keys(),
        vec![
            format!("{owner}/thumbnails/200.png"),
            format!("{owner}/gallery/100.png"),
            format!("{owner}/gallery/101.png"),
        ]
    );

    let projects = records.projects();
    assert_eq!(projects.len(), 1);
    let record = &projects[0];
    assert_eq!(record.id, id);
    assert_eq!(record.owner, owner);
    assert_eq!(record.title, "Portfolio Site");
    assert_eq!(record.description, None);
    assert_eq!(
        record.thumbnail_path.as_deref(),
        Some(format!("{owner}/thumbnails/200.png").as_str())
    );
    assert_eq!(
        record.gallery_paths,
        Some(vec![
            format!("{owner}/gallery/100.png"),
            format!("{owner}/gallery/101.png"),
        ])
    );

    assert_eq!(session.mode(), SessionMode::Published);
    assert!(session.previews().fully_released());
}

#[tokio::test]
async fn standalone_thumbnail_skips_gallery_entirely() {
    let owner = uuid::Uuid::new_v4();
    let identity = MockIdentity::signed_in(owner);
    let storage = MemoryStorage::new();
    let records = MemoryRecords::new();
    let pipeline = pipeline(&identity, &storage, &records);

    let mut session = UploadSession::new();
    session.edit_field(FormField::Title, "Cover Only");
    let (name, ct, data) = png("cover.png");
    session.select_thumbnail_file(name, ct, data);

    session.publish(&pipeline).await.unwrap();

    assert_eq!(
        storage.uploaded_keys(),
        vec![format!("{owner}/thumbnails/200.png")]
    );
    let record = &records.projects()[0];
    assert!(record.thumbnail_path.is_some());
    assert_eq!(record.gallery_paths, None);
}

#[tokio::test]
async fn failed_gallery_upload_is_dropped_preserving_order() {
    let owner = uuid::Uuid::new_v4();
    let identity = MockIdentity::signed_in(owner);
    let storage = MemoryStorage::new();
    let records = MemoryRecords::new();
    let pipeline = pipeline(&identity, &storage, &records);

    let mut session = UploadSession::new();
    session.edit_field(FormField::Title, "Lossy Gallery");
    session.begin_gallery_build();
    session.add_gallery_files([png("a.png"), png("b.png"), png("c.png")]);

    // `b` fails during the fan-out; `a` and `c` survive in order.
    storage.fail_uploads_of(Bytes::from_static(b"b.png"));

    session.publish(&pipeline).await.unwrap();

    let record = &records.projects()[0];
    assert_eq!(
        record.gallery_paths,
        Some(vec![
            format!("{owner}/gallery/100.png"),
            format!("{owner}/gallery/102.png"),
        ])
    );
}

#[tokio::test]
async fn all_gallery_uploads_failing_yields_null_gallery() {
    let owner = uuid::Uuid::new_v4();
    let identity = MockIdentity::signed_in(owner);
    let storage = MemoryStorage::new();
    let records = MemoryRecords::new();
    let pipeline = pipeline(&identity, &storage, &records);

    let mut session = UploadSession::new();
    session.edit_field(FormField::Title, "Unlucky");
    let (name, ct, data) = png("cover.png");
    session.select_thumbnail_file(name, ct, data);
    session.begin_gallery_build();
    session.add_gallery_files([png("a.png")]);
    storage.fail_uploads_of(Bytes::from_static(b"a.png"));

    session.publish(&pipeline).await.unwrap();

    let record = &records.projects()[0];
    assert!(record.thumbnail_path.is_some());
    assert_eq!(record.gallery_paths, None);
}

#[tokio::test]
async fn thumbnail_upload_failure_is_fatal() {
    let identity = MockIdentity::signed_in(uuid::Uuid::new_v4());
    let storage = MemoryStorage::new();
    let records = MemoryRecords::new();
    let pipeline = pipeline(&identity, &storage, &records);

    let mut session = UploadSession::new();
    session.edit_field(FormField::Title, "Doomed");
    let (name, ct, data) = png("cover.png");
    session.select_thumbnail_file(name, ct, data);
    storage.fail_uploads_of(Bytes::from_static(b"cover.png"));

    let err = session.publish(&pipeline).await.unwrap_err();
    assert!(matches!(err, AppError::Upload(_)));
    assert_eq!(records.insert_count(), 0);
    assert!(!session.mode().is_terminal());
}

#[tokio::test]
async fn insert_failure_surfaces_and_leaves_uploads_in_place() {
    let owner = uuid::Uuid::new_v4();
    let identity = MockIdentity::signed_in(owner);
    let storage = MemoryStorage::new();
    let records = MemoryRecords::new();
    records.fail_inserts("row-level security violation");
    let pipeline = pipeline(&identity, &storage, &records);

    let mut session = UploadSession::new();
    session.edit_field(FormField::Title, "Orphaned");
    session.begin_gallery_build();
    session.add_gallery_files([png("a.png")]);

    let err = session.publish(&pipeline).await.unwrap_err();
    match err {
        AppError::Publish(message) => assert!(message.contains("row-level security violation")),
        other => panic!("expected Publish error, got {other:?}"),
    }

    // Uploaded blobs are not rolled back; the user keeps their staged state.
    assert!(storage.upload_count() > 0);
    assert!(storage.removed_keys().is_empty());
    assert!(!session.mode().is_terminal());
    assert_eq!(session.gallery().len(), 1);
}
