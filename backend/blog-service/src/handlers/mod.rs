/// HTTP handlers for blog-service
///
/// Every page is served as a JSON context document:
/// - Feed: index (cached), group, profile and follow feeds
/// - Posts: detail, create and edit
/// - Comments: add a comment to a post
/// - Follow: follow and unfollow authors
/// - Health: liveness and store checks
pub mod comments;
pub mod feed;
pub mod follow;
pub mod health;
pub mod posts;

pub use comments::add_comment;
pub use feed::{follow_index, group_posts, index, profile};
pub use follow::{profile_follow, profile_unfollow};
pub use health::{health_summary, liveness_check};
pub use posts::{create_form, edit_form, post_create, post_detail, post_edit};

use actix_web::{http::header, web, HttpRequest, HttpResponse};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::PageCache;
use crate::db::ContentStore;
use crate::error::AppError;
use crate::services::{CommentService, FeedService, FollowService, PostService};

/// Shared state for every worker
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub cache: Arc<dyn PageCache>,
    pub feed: FeedService,
    pub posts: PostService,
    pub comments: CommentService,
    pub follows: FollowService,
    pub index_ttl: Duration,
    pub login_url: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ContentStore>,
        cache: Arc<dyn PageCache>,
        index_ttl: Duration,
        login_url: impl Into<String>,
    ) -> Self {
        Self {
            feed: FeedService::new(store.clone()),
            posts: PostService::new(store.clone()),
            comments: CommentService::new(store.clone()),
            follows: FollowService::new(store.clone()),
            store,
            cache,
            index_ttl,
            login_url: login_url.into(),
        }
    }
}

/// Register every route. `AppState` must be provided as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/group/{slug}/", web::get().to(group_posts))
        .route("/profile/{username}/", web::get().to(profile))
        .route("/posts/{post_id}/", web::get().to(post_detail))
        .service(
            web::resource("/create/")
                .route(web::get().to(create_form))
                .route(web::post().to(post_create)),
        )
        .service(
            web::resource("/posts/{post_id}/edit/")
                .route(web::get().to(edit_form))
                .route(web::post().to(post_edit)),
        )
        .route("/posts/{post_id}/comment/", web::post().to(add_comment))
        .route("/follow/", web::get().to(follow_index))
        .service(
            web::resource("/profile/{username}/follow/")
                .route(web::get().to(profile_follow))
                .route(web::post().to(profile_follow)),
        )
        .service(
            web::resource("/profile/{username}/unfollow/")
                .route(web::get().to(profile_unfollow))
                .route(web::post().to(profile_unfollow)),
        )
        .route("/api/v1/health", web::get().to(health_summary))
        .route("/api/v1/health/live", web::get().to(liveness_check));
}

pub(crate) fn redirect(location: impl Into<String>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.into()))
        .finish()
}

pub(crate) fn profile_url(username: &str) -> String {
    format!("/profile/{}/", urlencoding::encode(username))
}

pub(crate) fn post_url(post_id: i64) -> String {
    format!("/posts/{}/", post_id)
}

/// Decode a JSON form body. Form handlers take the raw bytes and call this
/// after `require_user`, so the login redirect never depends on the payload.
pub(crate) fn parse_form<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("form body: {}", e)))
}

/// Path and query of the request, used as the login `next` target
pub(crate) fn full_path(req: &HttpRequest) -> String {
    match req.query_string() {
        "" => req.path().to_string(),
        query => format!("{}?{}", req.path(), query),
    }
}
