use async_trait::async_trait;
use uuid::Uuid;

use super::{CommentRepo, PgContentStore};
use crate::error::Result;
use crate::models::{Comment, CommentView};

#[async_trait]
impl CommentRepo for PgContentStore {
    async fn insert_comment(
        &self,
        post_id: i64,
        author_id: Uuid,
        text: &str,
    ) -> Result<Option<Comment>> {
        let mut tx = self.pool.begin().await?;

        // Hold the post row against concurrent deletes
        let post_exists = sqlx::query_scalar::<_, i64>("SELECT id FROM posts WHERE id = $1 FOR SHARE")
            .bind(post_id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();

        if !post_exists {
            tx.rollback().await?;
            return Ok(None);
        }

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, author_id, text)
            VALUES ($1, $2, $3)
            RETURNING id, post_id, author_id, text, created_at
            "#,
        )
        .bind(post_id)
        .bind(author_id)
        .bind(text)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(comment))
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<CommentView>> {
        let comments = sqlx::query_as::<_, CommentView>(
            r#"
            SELECT c.id, c.post_id, c.text, c.created_at,
                   c.author_id, u.username AS author_username
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn count_comments(&self, post_id: i64) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
