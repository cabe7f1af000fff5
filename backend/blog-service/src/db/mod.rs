/// Database access layer
///
/// The content store is split into one repository trait per aggregate so
/// that services only depend on what they touch. `ContentStore` bundles them
/// for the application state.
///
/// - `PgContentStore`: PostgreSQL implementation, one transaction per mutation
/// - `MemoryContentStore`: in-process implementation for local runs and tests
pub mod comment_repo;
pub mod directory_repo;
pub mod follow_repo;
pub mod memory;
pub mod pool;
pub mod post_repo;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Comment, CommentView, Group, Post, PostDraft, PostView, User};

pub use memory::MemoryContentStore;
pub use pool::{create_pool, run_migrations, DbConfig};

/// Error for a post that names a group the store does not have. Raised by
/// the form check and by the store when the group disappears before the
/// write lands.
pub fn unknown_group(group_id: i64) -> AppError {
    AppError::ValidationError(format!(
        "group: select a valid choice, {} is not one of the available groups",
        group_id
    ))
}

/// Which slice of the post table a listing reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(i64),
    Author(Uuid),
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Mirror an identity-provider user into the store.
    async fn create_user(&self, id: Uuid, username: &str) -> Result<User>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait GroupRepo: Send + Sync {
    async fn create_group(&self, slug: &str, title: &str, description: &str) -> Result<Group>;
    async fn find_group_by_id(&self, id: i64) -> Result<Option<Group>>;
    async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>>;
}

#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn insert_post(&self, author_id: Uuid, draft: &PostDraft) -> Result<Post>;

    /// Updates text, group and image of a post owned by `author_id`. A `None`
    /// image keeps the stored one. Returns `None` when no such post exists
    /// for that author.
    async fn update_post(
        &self,
        post_id: i64,
        author_id: Uuid,
        draft: &PostDraft,
    ) -> Result<Option<Post>>;

    async fn delete_post(&self, post_id: i64) -> Result<bool>;
    async fn find_post(&self, post_id: i64) -> Result<Option<PostView>>;
    async fn count_posts(&self, filter: PostFilter) -> Result<i64>;

    /// Newest first.
    async fn list_posts(&self, filter: PostFilter, limit: i64, offset: i64)
        -> Result<Vec<PostView>>;
}

#[async_trait]
pub trait CommentRepo: Send + Sync {
    /// Returns `None` when the post does not exist.
    async fn insert_comment(
        &self,
        post_id: i64,
        author_id: Uuid,
        text: &str,
    ) -> Result<Option<Comment>>;

    /// Newest first.
    async fn list_comments(&self, post_id: i64) -> Result<Vec<CommentView>>;
    async fn count_comments(&self, post_id: i64) -> Result<i64>;
}

#[async_trait]
pub trait FollowRepo: Send + Sync {
    /// Returns true if a new edge was created. Self edges are never created.
    async fn insert_follow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool>;

    /// Returns true if an edge was removed.
    async fn delete_follow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool>;
    async fn follow_exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool>;
    async fn count_follows(&self, user_id: Uuid) -> Result<i64>;

    /// Posts whose author is followed by `user_id`, newest first.
    async fn feed_for_follower(&self, user_id: Uuid, limit: i64, offset: i64)
        -> Result<Vec<PostView>>;
    async fn count_feed_for_follower(&self, user_id: Uuid) -> Result<i64>;
}

/// Everything the service layer needs from storage
pub trait ContentStore: UserRepo + GroupRepo + PostRepo + CommentRepo + FollowRepo {}

impl<T> ContentStore for T where T: UserRepo + GroupRepo + PostRepo + CommentRepo + FollowRepo {}

/// PostgreSQL-backed content store
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Shared SELECT list for `PostViewRow`
pub(crate) const POST_VIEW_COLUMNS: &str = r#"
    p.id, p.text, p.image, p.created_at,
    p.author_id, u.username AS author_username,
    p.group_id, g.slug AS group_slug, g.title AS group_title
"#;

pub(crate) const POST_VIEW_JOINS: &str = r#"
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN groups g ON g.id = p.group_id
"#;
