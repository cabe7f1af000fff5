//! Users and groups. Both are provisioned by collaborators (identity
//! provider, administrators); the service only reads them, apart from the
//! create calls used for provisioning and seeding.

use async_trait::async_trait;
use uuid::Uuid;

use super::{GroupRepo, PgContentStore, UserRepo};
use crate::error::{AppError, Result};
use crate::models::{Group, User};

fn map_unique_violation(err: sqlx::Error, what: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(format!("{} already exists", what))
        }
        _ => AppError::from(err),
    }
}

#[async_trait]
impl UserRepo for PgContentStore {
    async fn create_user(&self, id: Uuid, username: &str) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username)
            VALUES ($1, $2)
            RETURNING id, username, created_at
            "#,
        )
        .bind(id)
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &format!("user {}", username)))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, username, created_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl GroupRepo for PgContentStore {
    async fn create_group(&self, slug: &str, title: &str, description: &str) -> Result<Group> {
        sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (slug, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, slug, title, description
            "#,
        )
        .bind(slug)
        .bind(title)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &format!("group {}", slug)))
    }

    async fn find_group_by_id(&self, id: i64) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT id, slug, title, description FROM groups WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT id, slug, title, description FROM groups WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }
}
