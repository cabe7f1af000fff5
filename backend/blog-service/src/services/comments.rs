/// Comment service - comments are append-only
use std::sync::Arc;
use uuid::Uuid;

use crate::db::ContentStore;
use crate::error::{AppError, Result};
use crate::models::{Comment, CommentForm, CommentView};

#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn ContentStore>,
}

impl CommentService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Unknown posts are reported before invalid text.
    pub async fn add(&self, post_id: i64, author_id: Uuid, form: &CommentForm) -> Result<Comment> {
        if self.store.find_post(post_id).await?.is_none() {
            return Err(AppError::NotFound(format!("post {}", post_id)));
        }
        let text = form.cleaned_text()?;

        let comment = self
            .store
            .insert_comment(post_id, author_id, &text)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

        tracing::info!(comment_id = comment.id, post_id, %author_id, "comment added");
        Ok(comment)
    }

    pub async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentView>> {
        self.store.list_comments(post_id).await
    }
}
