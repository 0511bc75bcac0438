//! Folio Services Library
//!
//! The application services over the collaborator seams: the upload session
//! state machine and publish pipeline (the core workflow), plus browsing,
//! profile assembly, and the follow graph.

pub mod follows;
pub mod profile;
pub mod projects;
pub mod test_helpers;
pub mod upload;

// Re-export commonly used types
pub use follows::FollowService;
pub use profile::{ProfileService, ProfileView, SocialLinks};
pub use projects::{ProjectCard, ProjectDetail, ProjectService};
pub use upload::pipeline::PublishPipeline;
pub use upload::session::{SessionMode, StagedImage, UploadSession};
