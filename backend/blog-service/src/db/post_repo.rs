use async_trait::async_trait;
use uuid::Uuid;

use super::{
    unknown_group, PgContentStore, PostFilter, PostRepo, POST_VIEW_COLUMNS, POST_VIEW_JOINS,
};
use crate::error::{AppError, Result};
use crate::models::{Post, PostDraft, PostView, PostViewRow};

const POST_COLUMNS: &str = "id, text, image, created_at, author_id, group_id";
const GROUP_FK: &str = "posts_group_id_fkey";

/// A group deleted after the form check trips the foreign key.
fn map_group_violation(err: sqlx::Error, draft: &PostDraft) -> AppError {
    match (&err, draft.group_id) {
        (sqlx::Error::Database(db), Some(group_id))
            if db.is_foreign_key_violation() && db.constraint() == Some(GROUP_FK) =>
        {
            unknown_group(group_id)
        }
        _ => AppError::from(err),
    }
}

fn filter_clause(filter: PostFilter) -> &'static str {
    match filter {
        PostFilter::All => "",
        PostFilter::Group(_) => "WHERE p.group_id = $1",
        PostFilter::Author(_) => "WHERE p.author_id = $1",
    }
}

#[async_trait]
impl PostRepo for PgContentStore {
    async fn insert_post(&self, author_id: Uuid, draft: &PostDraft) -> Result<Post> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO posts (text, image, author_id, group_id) VALUES ($1, $2, $3, $4) RETURNING {}",
            POST_COLUMNS
        );
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(&draft.text)
            .bind(&draft.image)
            .bind(author_id)
            .bind(draft.group_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_group_violation(e, draft))?;

        tx.commit().await?;
        Ok(post)
    }

    async fn update_post(
        &self,
        post_id: i64,
        author_id: Uuid,
        draft: &PostDraft,
    ) -> Result<Option<Post>> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            UPDATE posts
            SET text = $1, group_id = $2, image = COALESCE($3, image)
            WHERE id = $4 AND author_id = $5
            RETURNING {}
            "#,
            POST_COLUMNS
        );
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(&draft.text)
            .bind(draft.group_id)
            .bind(&draft.image)
            .bind(post_id)
            .bind(author_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_group_violation(e, draft))?;

        tx.commit().await?;
        Ok(post)
    }

    async fn delete_post(&self, post_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_post(&self, post_id: i64) -> Result<Option<PostView>> {
        let sql = format!(
            "SELECT {} {} WHERE p.id = $1",
            POST_VIEW_COLUMNS, POST_VIEW_JOINS
        );
        let row = sqlx::query_as::<_, PostViewRow>(&sql)
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(PostView::from))
    }

    async fn count_posts(&self, filter: PostFilter) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM posts p {}", filter_clause(filter));
        let query = sqlx::query_scalar::<_, i64>(&sql);
        let count = match filter {
            PostFilter::All => query.fetch_one(&self.pool).await?,
            PostFilter::Group(group_id) => query.bind(group_id).fetch_one(&self.pool).await?,
            PostFilter::Author(author_id) => query.bind(author_id).fetch_one(&self.pool).await?,
        };

        Ok(count)
    }

    async fn list_posts(
        &self,
        filter: PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostView>> {
        let (limit_param, offset_param) = match filter {
            PostFilter::All => ("$1", "$2"),
            _ => ("$2", "$3"),
        };
        let sql = format!(
            "SELECT {} {} {} ORDER BY p.created_at DESC, p.id DESC LIMIT {} OFFSET {}",
            POST_VIEW_COLUMNS,
            POST_VIEW_JOINS,
            filter_clause(filter),
            limit_param,
            offset_param
        );

        let query = sqlx::query_as::<_, PostViewRow>(&sql);
        let query = match filter {
            PostFilter::All => query,
            PostFilter::Group(group_id) => query.bind(group_id),
            PostFilter::Author(author_id) => query.bind(author_id),
        };
        let rows = query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(PostView::from).collect())
    }
}
