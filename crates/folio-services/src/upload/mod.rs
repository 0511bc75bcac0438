//! The upload-and-publish workflow: local staging in `session`, remote
//! writes in `pipeline`.

pub mod pipeline;
pub mod preview;
pub mod session;
