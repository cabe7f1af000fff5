//! Shared fixtures for HTTP integration tests
//!
//! Every test gets its own in-memory store and cache, two users and a group.
#![allow(dead_code)]

use actix_web::web;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use blog_service::cache::MemoryPageCache;
use blog_service::db::{ContentStore, GroupRepo, MemoryContentStore, PostRepo, UserRepo};
use blog_service::handlers::AppState;
use blog_service::middleware::USER_ID_HEADER;
use blog_service::models::{Group, Post, PostDraft, User};

pub const LOGIN_URL: &str = "/auth/login/";

pub struct TestContext {
    pub store: Arc<MemoryContentStore>,
    pub cache: Arc<MemoryPageCache>,
    pub state: web::Data<AppState>,
    pub author: User,
    pub reader: User,
    pub group: Group,
}

impl TestContext {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryContentStore::new());
        let cache = Arc::new(MemoryPageCache::new());

        let author = store
            .create_user(Uuid::new_v4(), "leo")
            .await
            .expect("seed author");
        let reader = store
            .create_user(Uuid::new_v4(), "mia")
            .await
            .expect("seed reader");
        let group = store
            .create_group("cats", "Cats", "Everything about cats")
            .await
            .expect("seed group");

        let state = web::Data::new(AppState::new(
            store.clone(),
            cache.clone(),
            Duration::from_secs(20),
            LOGIN_URL,
        ));

        Self {
            store,
            cache,
            state,
            author,
            reader,
            group,
        }
    }

    pub fn store_dyn(&self) -> Arc<dyn ContentStore> {
        self.store.clone()
    }

    pub async fn seed_post(&self, author: &User, text: &str, group_id: Option<i64>) -> Post {
        let draft = PostDraft {
            text: text.to_string(),
            group_id,
            image: None,
        };
        self.store
            .insert_post(author.id, &draft)
            .await
            .expect("seed post")
    }
}

pub fn as_user(user: &User) -> (&'static str, String) {
    (USER_ID_HEADER, user.id.to_string())
}

/// Builds the full application around a `TestContext`.
#[macro_export]
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($ctx.state.clone())
                .wrap(blog_service::middleware::IdentityMiddleware::new(
                    $ctx.store_dyn(),
                ))
                .configure(blog_service::handlers::configure),
        )
        .await
    };
}

pub fn location<B>(resp: &actix_web::dev::ServiceResponse<B>) -> String {
    resp.headers()
        .get(actix_web::http::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
