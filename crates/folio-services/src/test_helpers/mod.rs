//! Shared test doubles for the service layer.
//!
//! These complement the in-memory collaborators (`MemoryStorage`,
//! `MemoryRecords`) with a scriptable identity and a deterministic object
//! key generator.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use folio_core::models::AuthUser;
use folio_core::{AppResult, Identity};
use folio_storage::ObjectKeyGen;

/// Identity double: either nobody, or a fixed signed-in user.
#[derive(Clone, Default)]
pub struct MockIdentity {
    user: Arc<Mutex<Option<AuthUser>>>,
    calls: Arc<AtomicU64>,
}

impl MockIdentity {
    /// Nobody signed in.
    pub fn nobody() -> Self {
        Self::default()
    }

    pub fn signed_in(id: Uuid) -> Self {
        let identity = Self::default();
        *identity.user.lock().unwrap() = Some(AuthUser { id, email: None });
        identity
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Identity for MockIdentity {
    async fn current_user(&self) -> AppResult<Option<AuthUser>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.user.lock().unwrap().clone())
    }
}

/// Deterministic key generator: `{owner}/{category}/{n}.{ext}` with an
/// independent counter per category, so tests can predict every reference.
pub struct SequenceKeyGen {
    thumbnails: AtomicU64,
    gallery: AtomicU64,
    other: AtomicU64,
}

impl Default for SequenceKeyGen {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceKeyGen {
    /// Gallery keys count from 100, thumbnail keys from 200.
    pub fn new() -> Self {
        Self {
            thumbnails: AtomicU64::new(200),
            gallery: AtomicU64::new(100),
            other: AtomicU64::new(300),
        }
    }
}

impl ObjectKeyGen for SequenceKeyGen {
    fn object_key(&self, owner: Uuid, category: &str, original_filename: &str) -> String {
        let counter = match category {
            "thumbnails" => &self.thumbnails,
            "gallery" => &self.gallery,
            _ => &self.other,
        };
        let n = counter.fetch_add(1, Ordering::SeqCst);
        let ext = original_filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or("bin");
        format!("{}/{}/{}.{}", owner, category, n, ext)
    }
}
