/// Data models for blog-service
///
/// - `User`, `Group`, `Post`, `Comment`, `Follow`: stored rows
/// - `PostView`, `CommentView`: rows joined with author/group for rendering
/// - `forms`: validated client input
/// - `context`: JSON documents handed to the presentation layer
pub mod context;
pub mod forms;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use forms::{CommentForm, PostDraft, PostForm};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Directed edge: `user_id` receives `author_id`'s posts in their feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub id: i64,
    pub user_id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Group summary embedded in a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    pub id: i64,
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: Uuid,
    pub username: String,
}

/// Post with its author and group resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub id: i64,
    pub text: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author: AuthorRef,
    pub group: Option<GroupRef>,
}

impl PostView {
    pub fn new(post: Post, author: &User, group: Option<&Group>) -> Self {
        Self {
            id: post.id,
            text: post.text,
            image: post.image,
            created_at: post.created_at,
            author: AuthorRef {
                id: author.id,
                username: author.username.clone(),
            },
            group: group.map(|g| GroupRef {
                id: g.id,
                slug: g.slug.clone(),
                title: g.title.clone(),
            }),
        }
    }
}

/// Flat row produced by the post queries (posts joined with users/groups)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostViewRow {
    pub id: i64,
    pub text: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_username: String,
    pub group_id: Option<i64>,
    pub group_slug: Option<String>,
    pub group_title: Option<String>,
}

impl From<PostViewRow> for PostView {
    fn from(row: PostViewRow) -> Self {
        let group = match (row.group_id, row.group_slug, row.group_title) {
            (Some(id), Some(slug), Some(title)) => Some(GroupRef { id, slug, title }),
            _ => None,
        };

        Self {
            id: row.id,
            text: row.text,
            image: row.image,
            created_at: row.created_at,
            author: AuthorRef {
                id: row.author_id,
                username: row.author_username,
            },
            group,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentView {
    pub id: i64,
    pub post_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_username: String,
}
