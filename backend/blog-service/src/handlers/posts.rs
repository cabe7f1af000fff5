/// Post handlers - detail page, creation and editing
use actix_web::{web, HttpRequest, HttpResponse, Result};

use super::{full_path, parse_form, post_url, profile_url, redirect, AppState};
use crate::error::AppError;
use crate::middleware::{require_user, CurrentUser, GateRejection};
use crate::models::context::{PostDetailContext, PostFormContext};
use crate::models::PostForm;

pub async fn post_detail(
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let detail = state.posts.detail(post_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(PostDetailContext {
        title: detail.post.group.as_ref().map(|g| g.title.clone()),
        post: detail.post,
        author_posts: detail.author_post_count,
        comments: detail.comments,
        form: detail.comment_form,
    }))
}

/// Blank form for a new post
pub async fn create_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    current: CurrentUser,
) -> Result<HttpResponse> {
    require_user(&current, &state.login_url, &full_path(&req))?;

    Ok(HttpResponse::Ok().json(PostFormContext {
        form: PostForm::default(),
        is_edit: false,
        post: None,
        errors: Vec::new(),
    }))
}

/// Create a post and send the author to their profile
pub async fn post_create(
    state: web::Data<AppState>,
    req: HttpRequest,
    current: CurrentUser,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let user = require_user(&current, &state.login_url, &full_path(&req))?;
    let form: PostForm = parse_form(&body)?;

    match state.posts.create(user.id, &form).await {
        Ok(_) => Ok(redirect(profile_url(&user.username))),
        Err(AppError::ValidationError(msg)) => {
            Ok(HttpResponse::BadRequest().json(PostFormContext {
                form,
                is_edit: false,
                post: None,
                errors: error_lines(&msg),
            }))
        }
        Err(e) => Err(e.into()),
    }
}

/// Pre-filled form; only the author gets it, everyone else is sent back
/// to the post.
pub async fn edit_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    current: CurrentUser,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = require_user(&current, &state.login_url, &full_path(&req))?;
    let post_id = post_id.into_inner();

    match state.posts.edit_form(post_id, user.id).await {
        Ok((post, form)) => Ok(HttpResponse::Ok().json(PostFormContext {
            form,
            is_edit: true,
            post: Some(post),
            errors: Vec::new(),
        })),
        Err(AppError::Forbidden(_)) => Err(back_to_post(post_id).into()),
        Err(e) => Err(e.into()),
    }
}

/// Save an edit. Ownership is settled before the body is read, so a
/// non-author is sent back to the post whatever they submitted.
pub async fn post_edit(
    state: web::Data<AppState>,
    req: HttpRequest,
    current: CurrentUser,
    post_id: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let user = require_user(&current, &state.login_url, &full_path(&req))?;
    let post_id = post_id.into_inner();

    let post = match state.posts.edit_form(post_id, user.id).await {
        Ok((post, _)) => post,
        Err(AppError::Forbidden(_)) => return Err(back_to_post(post_id).into()),
        Err(e) => return Err(e.into()),
    };
    let form: PostForm = parse_form(&body)?;

    match state.posts.edit(post_id, user.id, &form).await {
        Ok(_) => Ok(redirect(post_url(post_id))),
        Err(AppError::Forbidden(_)) => Err(back_to_post(post_id).into()),
        Err(AppError::ValidationError(msg)) => {
            Ok(HttpResponse::BadRequest().json(PostFormContext {
                form,
                is_edit: true,
                post: Some(post),
                errors: error_lines(&msg),
            }))
        }
        Err(e) => Err(e.into()),
    }
}

fn back_to_post(post_id: i64) -> GateRejection {
    GateRejection::Forbidden {
        redirect_to: post_url(post_id),
    }
}

fn error_lines(msg: &str) -> Vec<String> {
    msg.split("; ").map(str::to_string).collect()
}
