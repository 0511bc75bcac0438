//! Folio Storage Library
//!
//! Storage-gateway abstraction over the BaaS object store, plus an in-memory
//! backend for tests.
//!
//! # Object key format
//!
//! Keys are owner-scoped: `{user_id}/{category}/{filename}`. The first path
//! segment must be the owning user's id because the remote storage policies
//! authorize writes on it. Key generation is centralized in the `keys` module.

pub mod baas;
pub mod keys;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use baas::BaasStorage;
pub use keys::{ObjectKeyGen, TimestampKeyGen};
pub use memory::MemoryStorage;
pub use traits::{StorageError, StorageGateway, StorageResult};
