//! In-process content store.
//!
//! Mirrors the PostgreSQL schema rules (unique usernames/slugs/follow pairs,
//! cascading deletes, newest-first ordering) behind a single `RwLock`; every
//! mutation runs under one write guard.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    unknown_group, CommentRepo, FollowRepo, GroupRepo, PostFilter, PostRepo, UserRepo,
};
use crate::error::{AppError, Result};
use crate::models::{Comment, CommentView, Follow, Group, Post, PostDraft, PostView, User};

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    groups: BTreeMap<i64, Group>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    follows: BTreeMap<i64, Follow>,
    next_group_id: i64,
    next_post_id: i64,
    next_comment_id: i64,
    next_follow_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

impl MemoryState {
    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn view(&self, post: &Post) -> Result<PostView> {
        let author = self
            .user(post.author_id)
            .ok_or_else(|| AppError::Internal(format!("post {} has no author", post.id)))?;
        let group = post.group_id.and_then(|id| self.groups.get(&id));
        Ok(PostView::new(post.clone(), author, group))
    }

    /// Newest first, id breaks ties.
    fn sorted_posts<'a>(&'a self, keep: impl Fn(&Post) -> bool) -> Vec<&'a Post> {
        let mut posts: Vec<&Post> = self.posts.values().filter(|p| keep(*p)).collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts
    }

    fn page_of(&self, posts: Vec<&Post>, limit: i64, offset: i64) -> Result<Vec<PostView>> {
        posts
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|p| self.view(p))
            .collect()
    }

    fn followed_authors(&self, user_id: Uuid) -> Vec<Uuid> {
        self.follows
            .values()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.author_id)
            .collect()
    }

    fn check_group(&self, group_id: Option<i64>) -> Result<()> {
        match group_id {
            Some(id) if !self.groups.contains_key(&id) => Err(unknown_group(id)),
            _ => Ok(()),
        }
    }
}

fn filter_matches(filter: PostFilter, post: &Post) -> bool {
    match filter {
        PostFilter::All => true,
        PostFilter::Group(group_id) => post.group_id == Some(group_id),
        PostFilter::Author(author_id) => post.author_id == author_id,
    }
}

/// In-memory `ContentStore`
#[derive(Default)]
pub struct MemoryContentStore {
    state: RwLock<MemoryState>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryContentStore {
    async fn create_user(&self, id: Uuid, username: &str) -> Result<User> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.id == id || u.username == username) {
            return Err(AppError::Conflict(format!("user {} already exists", username)));
        }

        let user = User {
            id,
            username: username.to_string(),
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.state.read().await.user(id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }
}

#[async_trait]
impl GroupRepo for MemoryContentStore {
    async fn create_group(&self, slug: &str, title: &str, description: &str) -> Result<Group> {
        let mut state = self.state.write().await;
        if state.groups.values().any(|g| g.slug == slug) {
            return Err(AppError::Conflict(format!("group {} already exists", slug)));
        }

        let group = Group {
            id: next_id(&mut state.next_group_id),
            slug: slug.to_string(),
            title: title.to_string(),
            description: description.to_string(),
        };
        state.groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn find_group_by_id(&self, id: i64) -> Result<Option<Group>> {
        Ok(self.state.read().await.groups.get(&id).cloned())
    }

    async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>> {
        let state = self.state.read().await;
        Ok(state.groups.values().find(|g| g.slug == slug).cloned())
    }
}

#[async_trait]
impl PostRepo for MemoryContentStore {
    async fn insert_post(&self, author_id: Uuid, draft: &PostDraft) -> Result<Post> {
        let mut state = self.state.write().await;
        if state.user(author_id).is_none() {
            return Err(AppError::DatabaseError(format!(
                "author {} violates foreign key",
                author_id
            )));
        }
        state.check_group(draft.group_id)?;

        let post = Post {
            id: next_id(&mut state.next_post_id),
            text: draft.text.clone(),
            image: draft.image.clone(),
            created_at: Utc::now(),
            author_id,
            group_id: draft.group_id,
        };
        state.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update_post(
        &self,
        post_id: i64,
        author_id: Uuid,
        draft: &PostDraft,
    ) -> Result<Option<Post>> {
        let mut state = self.state.write().await;
        state.check_group(draft.group_id)?;

        let Some(post) = state
            .posts
            .get_mut(&post_id)
            .filter(|p| p.author_id == author_id)
        else {
            return Ok(None);
        };

        post.text = draft.text.clone();
        post.group_id = draft.group_id;
        if let Some(image) = &draft.image {
            post.image = Some(image.clone());
        }
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, post_id: i64) -> Result<bool> {
        let mut state = self.state.write().await;
        let removed = state.posts.remove(&post_id).is_some();
        if removed {
            state.comments.retain(|_, c| c.post_id != post_id);
        }
        Ok(removed)
    }

    async fn find_post(&self, post_id: i64) -> Result<Option<PostView>> {
        let state = self.state.read().await;
        state.posts.get(&post_id).map(|p| state.view(p)).transpose()
    }

    async fn count_posts(&self, filter: PostFilter) -> Result<i64> {
        let state = self.state.read().await;
        Ok(state.posts.values().filter(|p| filter_matches(filter, p)).count() as i64)
    }

    async fn list_posts(
        &self,
        filter: PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostView>> {
        let state = self.state.read().await;
        let posts = state.sorted_posts(|p| filter_matches(filter, p));
        state.page_of(posts, limit, offset)
    }
}

#[async_trait]
impl CommentRepo for MemoryContentStore {
    async fn insert_comment(
        &self,
        post_id: i64,
        author_id: Uuid,
        text: &str,
    ) -> Result<Option<Comment>> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&post_id) {
            return Ok(None);
        }

        let comment = Comment {
            id: next_id(&mut state.next_comment_id),
            post_id,
            author_id,
            text: text.to_string(),
            created_at: Utc::now(),
        };
        state.comments.insert(comment.id, comment.clone());
        Ok(Some(comment))
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<CommentView>> {
        let state = self.state.read().await;
        let mut comments: Vec<&Comment> = state
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        comments
            .into_iter()
            .map(|c| -> Result<CommentView> {
                let author = state.user(c.author_id).ok_or_else(|| {
                    AppError::Internal(format!("comment {} has no author", c.id))
                })?;
                Ok(CommentView {
                    id: c.id,
                    post_id: c.post_id,
                    text: c.text.clone(),
                    created_at: c.created_at,
                    author_id: author.id,
                    author_username: author.username.clone(),
                })
            })
            .collect()
    }

    async fn count_comments(&self, post_id: i64) -> Result<i64> {
        let state = self.state.read().await;
        Ok(state.comments.values().filter(|c| c.post_id == post_id).count() as i64)
    }
}

#[async_trait]
impl FollowRepo for MemoryContentStore {
    async fn insert_follow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        if user_id == author_id {
            return Ok(false);
        }
        if state
            .follows
            .values()
            .any(|f| f.user_id == user_id && f.author_id == author_id)
        {
            return Ok(false);
        }

        let follow = Follow {
            id: next_id(&mut state.next_follow_id),
            user_id,
            author_id,
            created_at: Utc::now(),
        };
        state.follows.insert(follow.id, follow);
        Ok(true)
    }

    async fn delete_follow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.follows.len();
        state
            .follows
            .retain(|_, f| !(f.user_id == user_id && f.author_id == author_id));
        Ok(state.follows.len() < before)
    }

    async fn follow_exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let state = self.state.read().await;
        Ok(state
            .follows
            .values()
            .any(|f| f.user_id == user_id && f.author_id == author_id))
    }

    async fn count_follows(&self, user_id: Uuid) -> Result<i64> {
        let state = self.state.read().await;
        Ok(state.follows.values().filter(|f| f.user_id == user_id).count() as i64)
    }

    async fn feed_for_follower(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostView>> {
        let state = self.state.read().await;
        let authors = state.followed_authors(user_id);
        let posts = state.sorted_posts(|p| authors.contains(&p.author_id));
        state.page_of(posts, limit, offset)
    }

    async fn count_feed_for_follower(&self, user_id: Uuid) -> Result<i64> {
        let state = self.state.read().await;
        let authors = state.followed_authors(user_id);
        Ok(state
            .posts
            .values()
            .filter(|p| authors.contains(&p.author_id))
            .count() as i64)
    }
}
