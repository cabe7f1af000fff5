use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::ContentStore;
use crate::error::{AppError, Result};
use crate::models::{PostView, User};
use crate::pagination::{Page, PageRequest, PageWindow};

#[derive(Clone)]
pub struct FollowService {
    store: Arc<dyn ContentStore>,
}

impl FollowService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    async fn target(&self, username: &str) -> Result<User> {
        self.store
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", username)))
    }

    /// Idempotent follow; returns true if a new edge was created. Following
    /// yourself is silently ignored.
    pub async fn follow(&self, user_id: Uuid, target_username: &str) -> Result<bool> {
        let author = self.target(target_username).await?;

        if author.id == user_id {
            debug!(%user_id, "self-follow ignored");
            return Ok(false);
        }

        let created = self.store.insert_follow(user_id, author.id).await?;
        if created {
            info!(%user_id, author_id = %author.id, "follow created");
        }
        Ok(created)
    }

    /// Idempotent unfollow; returns true if an edge was removed.
    pub async fn unfollow(&self, user_id: Uuid, target_username: &str) -> Result<bool> {
        let author = self.target(target_username).await?;

        let removed = self.store.delete_follow(user_id, author.id).await?;
        if removed {
            info!(%user_id, author_id = %author.id, "follow removed");
        }
        Ok(removed)
    }

    pub async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        self.store.follow_exists(user_id, author_id).await
    }

    /// Posts of every author `user_id` follows, newest first.
    pub async fn feed_for_follower(
        &self,
        user_id: Uuid,
        request: PageRequest,
    ) -> Result<Page<PostView>> {
        let total = self.store.count_feed_for_follower(user_id).await?;
        let window = PageWindow::resolve(request, total);
        let posts = self
            .store
            .feed_for_follower(user_id, window.limit(), window.offset())
            .await?;

        Ok(window.into_page(posts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryContentStore, UserRepo};

    #[tokio::test]
    async fn follow_graph_rules() {
        let store = Arc::new(MemoryContentStore::new());
        let reader = store.create_user(Uuid::new_v4(), "reader").await.unwrap();
        let author = store.create_user(Uuid::new_v4(), "author").await.unwrap();
        let service = FollowService::new(store.clone());

        assert!(service.follow(reader.id, "author").await.unwrap());
        assert!(!service.follow(reader.id, "author").await.unwrap());
        assert!(!service.follow(reader.id, "reader").await.unwrap());
        assert!(service.is_following(reader.id, author.id).await.unwrap());
        assert!(!service.is_following(reader.id, reader.id).await.unwrap());

        assert!(service.unfollow(reader.id, "author").await.unwrap());
        assert!(!service.unfollow(reader.id, "author").await.unwrap());

        let err = service.follow(reader.id, "ghost").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
