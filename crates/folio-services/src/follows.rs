//! Follow graph operations.

use std::sync::Arc;

use uuid::Uuid;

use folio_core::{AppError, AppResult, Identity};
use folio_records::FollowRepository;

/// Follow/unfollow on behalf of the signed-in user.
pub struct FollowService {
    identity: Arc<dyn Identity>,
    follows: Arc<dyn FollowRepository>,
}

impl FollowService {
    pub fn new(identity: Arc<dyn Identity>, follows: Arc<dyn FollowRepository>) -> Self {
        Self { identity, follows }
    }

    /// Flip the follow relation towards `target` and return the new state
    /// (true = now following). Self-follow is a no-op.
    pub async fn toggle(&self, target: Uuid) -> AppResult<bool> {
        let user = self
            .identity
            .current_user()
            .await?
            .ok_or(AppError::Unauthenticated)?;

        if user.id == target {
            return Ok(false);
        }

        if self.follows.is_following(user.id, target).await? {
            self.follows.unfollow(user.id, target).await?;
            tracing::info!(follower = %user.id, following = %target, "Unfollowed");
            Ok(false)
        } else {
            self.follows.follow(user.id, target).await?;
            tracing::info!(follower = %user.id, following = %target, "Followed");
            Ok(true)
        }
    }
}
