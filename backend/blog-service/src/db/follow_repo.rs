use async_trait::async_trait;
use uuid::Uuid;

use super::{FollowRepo, PgContentStore, POST_VIEW_COLUMNS, POST_VIEW_JOINS};
use crate::error::Result;
use crate::models::{PostView, PostViewRow};

#[async_trait]
impl FollowRepo for PgContentStore {
    async fn insert_follow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO follows (user_id, author_id)
            SELECT $1, $2
            WHERE $1 <> $2
            ON CONFLICT (user_id, author_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(inserted.is_some())
    }

    async fn delete_follow(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let affected = sqlx::query(
            r#"
            DELETE FROM follows
            WHERE user_id = $1 AND author_id = $2
            "#,
        )
        .bind(user_id)
        .bind(author_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;
        Ok(affected > 0)
    }

    async fn follow_exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2)",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn count_follows(&self, user_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn feed_for_follower(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostView>> {
        let sql = format!(
            r#"
            SELECT {} {}
            JOIN follows f ON f.author_id = p.author_id
            WHERE f.user_id = $1
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $2 OFFSET $3
            "#,
            POST_VIEW_COLUMNS, POST_VIEW_JOINS
        );
        let rows = sqlx::query_as::<_, PostViewRow>(&sql)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(PostView::from).collect())
    }

    async fn count_feed_for_follower(&self, user_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM posts p
            JOIN follows f ON f.author_id = p.author_id
            WHERE f.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
