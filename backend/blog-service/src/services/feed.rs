/// Feed builder - paginated post listings for every page that shows posts
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::FollowService;
use crate::db::{ContentStore, PostFilter};
use crate::error::{AppError, Result};
use crate::models::{Group, PostView, User};
use crate::pagination::{Page, PageRequest, PageWindow};

/// Author page: their posts plus the viewer's relation to them
#[derive(Debug, Clone, Serialize)]
pub struct ProfileFeed {
    pub author: User,
    pub total_count: i64,
    pub page: Page<PostView>,
    pub is_following: bool,
}

#[derive(Clone)]
pub struct FeedService {
    store: Arc<dyn ContentStore>,
    follows: FollowService,
}

impl FeedService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            follows: FollowService::new(store.clone()),
            store,
        }
    }

    async fn paginate(&self, filter: PostFilter, request: PageRequest) -> Result<Page<PostView>> {
        let total = self.store.count_posts(filter).await?;
        let window = PageWindow::resolve(request, total);
        let posts = self
            .store
            .list_posts(filter, window.limit(), window.offset())
            .await?;

        Ok(window.into_page(posts))
    }

    /// Every post, newest first
    pub async fn list_all(&self, request: PageRequest) -> Result<Page<PostView>> {
        self.paginate(PostFilter::All, request).await
    }

    pub async fn list_by_group(
        &self,
        slug: &str,
        request: PageRequest,
    ) -> Result<(Group, Page<PostView>)> {
        let group = self
            .store
            .find_group_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("group {}", slug)))?;

        let page = self.paginate(PostFilter::Group(group.id), request).await?;
        Ok((group, page))
    }

    /// `viewer` is `None` for anonymous requests, which never follow anyone.
    pub async fn list_by_author(
        &self,
        username: &str,
        request: PageRequest,
        viewer: Option<Uuid>,
    ) -> Result<ProfileFeed> {
        let author = self
            .store
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", username)))?;

        let page = self.paginate(PostFilter::Author(author.id), request).await?;
        let is_following = match viewer {
            Some(viewer_id) => self.follows.is_following(viewer_id, author.id).await?,
            None => false,
        };

        Ok(ProfileFeed {
            total_count: page.total_count,
            author,
            page,
            is_following,
        })
    }

    pub async fn list_followed_feed(
        &self,
        viewer_id: Uuid,
        request: PageRequest,
    ) -> Result<Page<PostView>> {
        self.follows.feed_for_follower(viewer_id, request).await
    }
}
