//! Folio Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! constants shared across all folio components.

pub mod config;
pub mod constants;
pub mod error;
pub mod identity;
pub mod models;

// Re-export commonly used types
pub use config::BaasConfig;
pub use error::{AppError, AppResult};
pub use identity::Identity;
pub use models::{AuthUser, NewProject, Profile, Project, ProjectForm, UserSettings};
