//! Shared constants for buckets, tables, and storage key layout.

/// Bucket holding project thumbnails and gallery images (exact bucket id,
/// lowercase — the BaaS storage policies are keyed on it).
pub const PROJECTS_BUCKET: &str = "projects";

/// Bucket holding user avatars.
pub const AVATARS_BUCKET: &str = "avatars";

/// Bucket holding profile cover photos.
pub const COVERS_BUCKET: &str = "covers";

/// Table names in the record store.
pub const PROJECTS_TABLE: &str = "projects";
pub const FOLLOWS_TABLE: &str = "follows";
pub const SETTINGS_TABLE: &str = "settings";
pub const PROFILES_TABLE: &str = "profiles";

/// Storage key categories under a user's prefix. The first path segment of
/// every object key is the owner's user id; the row-level policies expect it.
pub const THUMBNAILS_CATEGORY: &str = "thumbnails";
pub const GALLERY_CATEGORY: &str = "gallery";

/// Default lifetime of a signed display URL, in seconds.
pub const SIGNED_URL_TTL_SECS: u64 = 60 * 60;
