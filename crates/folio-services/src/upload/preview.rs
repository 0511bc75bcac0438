//! Session-local preview URLs.
//!
//! Staged images get a transient preview URL for rendering before any network
//! call, standing in for the browser's object URLs. The allocator tracks
//! every handle so teardown can be verified: a handle must be released
//! exactly once — releasing twice or leaking one is a bug.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Inner {
    live: HashMap<u64, String>,
    release_counts: HashMap<u64, u32>,
    allocated: u64,
}

/// Allocator for session-local preview URLs, keyed by staged-image id.
#[derive(Clone, Default)]
pub struct PreviewUrls {
    inner: Arc<Mutex<Inner>>,
}

impl PreviewUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a preview URL for a staged image.
    pub fn allocate(&self, image_id: u64, filename: &str) -> String {
        let mut inner = self.inner.lock().unwrap();
        inner.allocated += 1;
        let url = format!("preview://{}/{}", image_id, filename);
        inner.live.insert(image_id, url.clone());
        url
    }

    /// Release the preview URL for a staged image. Double releases are
    /// counted rather than panicking so tests can detect them.
    pub fn release(&self, image_id: u64) {
        let mut inner = self.inner.lock().unwrap();
        inner.live.remove(&image_id);
        *inner.release_counts.entry(image_id).or_insert(0) += 1;
    }

    /// Preview URLs still held by staged images.
    pub fn live_count(&self) -> usize {
        self.inner.lock().unwrap().live.len()
    }

    /// How many URLs this allocator handed out over its lifetime.
    pub fn allocated_count(&self) -> u64 {
        self.inner.lock().unwrap().allocated
    }

    /// How many times a given image's preview was released.
    pub fn release_count(&self, image_id: u64) -> u32 {
        self.inner
            .lock()
            .unwrap()
            .release_counts
            .get(&image_id)
            .copied()
            .unwrap_or(0)
    }

    /// True when every allocated handle was released exactly once.
    pub fn fully_released(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.live.is_empty() && inner.release_counts.values().all(|&count| count == 1)
    }
}
