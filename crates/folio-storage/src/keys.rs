//! Shared object key generation.
//!
//! Key format: `{user_id}/{category}/{filename}`. The storage policies
//! authorize writes on the first segment, so every generator must keep the
//! owner id there.

use rand::Rng;
use uuid::Uuid;

/// Strategy for naming uploaded objects. The default derives filenames from
/// the wall clock; tests substitute a deterministic sequence.
pub trait ObjectKeyGen: Send + Sync {
    /// Generate a key for a staged file under the given category
    /// (`thumbnails`, `gallery`).
    fn object_key(&self, owner: Uuid, category: &str, original_filename: &str) -> String;

    /// Generate a key for a profile cover photo.
    fn cover_key(&self, owner: Uuid, original_filename: &str) -> String {
        format!(
            "{}/cover_{}.{}",
            owner,
            chrono::Utc::now().timestamp_millis(),
            extension_of(original_filename)
        )
    }
}

/// Extension after the last dot, falling back when the name has none.
pub(crate) fn extension_of(filename: &str) -> &str {
    filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("bin")
}

/// Default generator: `{user}/{category}/{millis}_{nonce}.{ext}`, matching
/// the naming the storage bucket already contains.
#[derive(Debug, Default, Clone)]
pub struct TimestampKeyGen;

impl ObjectKeyGen for TimestampKeyGen {
    fn object_key(&self, owner: Uuid, category: &str, original_filename: &str) -> String {
        let nonce: u32 = rand::rng().random_range(0..10_000);
        format!(
            "{}/{}/{}_{}.{}",
            owner,
            category,
            chrono::Utc::now().timestamp_millis(),
            nonce,
            extension_of(original_filename)
        )
    }
}
