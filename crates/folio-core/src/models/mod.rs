//! Domain models shared across folio components.

pub mod auth;
pub mod profile;
pub mod project;

pub use auth::AuthUser;
pub use profile::{Profile, UserSettings};
pub use project::{FormField, NewProject, Project, ProjectForm, ProjectId};
