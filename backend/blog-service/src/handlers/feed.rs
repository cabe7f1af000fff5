/// Feed handlers - every listing page
use actix_web::{http::header::ContentType, web, HttpRequest, HttpResponse, Result};

use super::{full_path, AppState};
use crate::cache::index_key;
use crate::error::AppError;
use crate::middleware::{require_user, CurrentUser};
use crate::models::context::{FollowFeedContext, GroupContext, IndexContext, ProfileContext};
use crate::pagination::PageQuery;

/// Home page. The rendered body is cached per raw `page` value, so posts
/// created or removed within the TTL are not visible here until it expires.
pub async fn index(state: web::Data<AppState>, query: web::Query<PageQuery>) -> Result<HttpResponse> {
    let key = index_key(query.page.as_deref());

    match state.cache.get(&key).await {
        Ok(Some(body)) => {
            tracing::debug!(%key, "index cache hit");
            return Ok(json_body(body));
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(%key, error = %e, "index cache read failed"),
    }

    let page = state.feed.list_all(query.request()).await?;
    let body = serde_json::to_string(&IndexContext::new(page)).map_err(AppError::from)?;

    if let Err(e) = state.cache.set(&key, &body, state.index_ttl).await {
        tracing::warn!(%key, error = %e, "index cache write failed");
    }

    Ok(json_body(body))
}

fn json_body(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(body)
}

pub async fn group_posts(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let (group, page_obj) = state.feed.list_by_group(&slug, query.request()).await?;

    Ok(HttpResponse::Ok().json(GroupContext {
        title: group.title.clone(),
        group,
        page_obj,
    }))
}

pub async fn profile(
    state: web::Data<AppState>,
    current: CurrentUser,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let feed = state
        .feed
        .list_by_author(&username, query.request(), current.id())
        .await?;

    Ok(HttpResponse::Ok().json(ProfileContext {
        title: format!("Profile of user {}", feed.author.username),
        author: feed.author,
        count_posts: feed.total_count,
        page_obj: feed.page,
        following: feed.is_following,
    }))
}

/// Posts by the authors the current user follows
pub async fn follow_index(
    state: web::Data<AppState>,
    req: HttpRequest,
    current: CurrentUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let user = require_user(&current, &state.login_url, &full_path(&req))?;
    let page_obj = state
        .feed
        .list_followed_feed(user.id, query.request())
        .await?;

    Ok(HttpResponse::Ok().json(FollowFeedContext { page_obj }))
}
