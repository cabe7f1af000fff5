/// Post service - handles post creation, editing and the detail view
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{unknown_group, ContentStore, PostFilter};
use crate::error::{AppError, Result};
use crate::middleware::check_post_ownership;
use crate::models::{CommentForm, CommentView, Post, PostDraft, PostForm, PostView};

/// Everything the post page shows
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: PostView,
    pub author_post_count: i64,
    pub comments: Vec<CommentView>,
    pub comment_form: CommentForm,
}

#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn ContentStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    async fn clean(&self, form: &PostForm) -> Result<PostDraft> {
        let draft = form.to_draft()?;

        if let Some(group_id) = draft.group_id {
            if self.store.find_group_by_id(group_id).await?.is_none() {
                return Err(unknown_group(group_id));
            }
        }

        Ok(draft)
    }

    async fn find(&self, post_id: i64) -> Result<PostView> {
        self.store
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))
    }

    /// Create a new post
    pub async fn create(&self, author_id: Uuid, form: &PostForm) -> Result<Post> {
        let draft = self.clean(form).await?;
        let post = self.store.insert_post(author_id, &draft).await?;

        tracing::info!(
            post_id = post.id,
            %author_id,
            group_id = ?post.group_id,
            "post created"
        );
        Ok(post)
    }

    /// Edit a post in place. Only its author may do this.
    pub async fn edit(&self, post_id: i64, editor_id: Uuid, form: &PostForm) -> Result<Post> {
        let existing = self.find(post_id).await?;
        check_post_ownership(editor_id, &existing)?;

        let draft = self.clean(form).await?;
        let post = self
            .store
            .update_post(post_id, editor_id, &draft)
            .await?
            // deleted or reassigned between the check and the write
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

        tracing::info!(post_id, %editor_id, "post edited");
        Ok(post)
    }

    /// Pre-filled form for the edit page
    pub async fn edit_form(&self, post_id: i64, editor_id: Uuid) -> Result<(PostView, PostForm)> {
        let post = self.find(post_id).await?;
        check_post_ownership(editor_id, &post)?;

        let form = PostForm {
            text: post.text.clone(),
            group: post.group.as_ref().map(|g| g.id),
            image: post.image.clone(),
        };
        Ok((post, form))
    }

    pub async fn detail(&self, post_id: i64) -> Result<PostDetail> {
        let post = self.find(post_id).await?;
        let author_post_count = self
            .store
            .count_posts(PostFilter::Author(post.author.id))
            .await?;
        let comments = self.store.list_comments(post_id).await?;

        Ok(PostDetail {
            post,
            author_post_count,
            comments,
            comment_form: CommentForm::default(),
        })
    }
}
