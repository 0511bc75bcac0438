//! In-memory storage gateway for tests.
//!
//! Records every call so tests can assert ordering and counts, and supports
//! scripted per-blob failures for exercising the best-effort gallery fan-out.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{StorageError, StorageGateway, StorageResult};

#[derive(Default)]
struct Inner {
    objects: HashMap<(String, String), Bytes>,
    uploads: Vec<(String, String)>,
    removed: Vec<(String, String)>,
    poisoned_bodies: Vec<Bytes>,
}

/// In-memory storage backend.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script an upload failure for any blob with exactly this body.
    pub fn fail_uploads_of(&self, body: Bytes) {
        self.inner.lock().unwrap().poisoned_bodies.push(body);
    }

    /// Keys uploaded so far, in call order.
    pub fn uploaded_keys(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .uploads
            .iter()
            .map(|(_, key)| key.clone())
            .collect()
    }

    pub fn upload_count(&self) -> usize {
        self.inner.lock().unwrap().uploads.len()
    }

    /// References removed so far, in call order.
    pub fn removed_keys(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .removed
            .iter()
            .map(|(_, key)| key.clone())
            .collect()
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .objects
            .contains_key(&(bucket.to_string(), key.to_string()))
    }
}

#[async_trait]
impl StorageGateway for MemoryStorage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> StorageResult<String> {
        let mut inner = self.inner.lock().unwrap();
        if inner.poisoned_bodies.iter().any(|b| *b == data) {
            return Err(StorageError::UploadFailed(format!(
                "scripted failure for {}/{}",
                bucket, key
            )));
        }
        inner
            .uploads
            .push((bucket.to_string(), key.to_string()));
        inner
            .objects
            .insert((bucket.to_string(), key.to_string()), data);
        Ok(key.to_string())
    }

    async fn resolve_display_url(&self, bucket: &str, reference: &str) -> Option<String> {
        if reference.starts_with("http") {
            return Some(reference.to_string());
        }
        let inner = self.inner.lock().unwrap();
        if inner
            .objects
            .contains_key(&(bucket.to_string(), reference.to_string()))
        {
            Some(format!("memory://{}/{}", bucket, reference))
        } else {
            None
        }
    }

    async fn remove(&self, bucket: &str, references: &[String]) -> StorageResult<()> {
        let mut inner = self.inner.lock().unwrap();
        for reference in references {
            inner
                .objects
                .remove(&(bucket.to_string(), reference.clone()));
            inner
                .removed
                .push((bucket.to_string(), reference.clone()));
        }
        Ok(())
    }
}
