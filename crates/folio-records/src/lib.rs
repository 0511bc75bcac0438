//! Folio Records Library
//!
//! Repository traits over the BaaS table API, the HTTP-backed implementation,
//! and in-memory mocks for testing without a network.

pub mod baas;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use baas::BaasRecords;
pub use memory::MemoryRecords;
pub use traits::{FollowRepository, ProfileRepository, ProjectRepository, SettingsRepository};
