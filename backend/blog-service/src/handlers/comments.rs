use actix_web::{web, HttpRequest, HttpResponse, Result};

use super::{full_path, parse_form, post_url, redirect, AppState};
use crate::error::AppError;
use crate::middleware::{require_user, CurrentUser};
use crate::models::CommentForm;

/// Add a comment, then go back to the post. Blank text and unreadable
/// bodies are dropped without an error page.
pub async fn add_comment(
    state: web::Data<AppState>,
    req: HttpRequest,
    current: CurrentUser,
    post_id: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let user = require_user(&current, &state.login_url, &full_path(&req))?;
    let post_id = post_id.into_inner();

    let form = parse_form::<CommentForm>(&body).unwrap_or_else(|e| {
        tracing::debug!(post_id, error = %e, "unreadable comment body");
        CommentForm::default()
    });

    match state.comments.add(post_id, user.id, &form).await {
        Ok(_) => {}
        Err(AppError::ValidationError(msg)) => {
            tracing::debug!(post_id, user_id = %user.id, reason = %msg, "comment rejected");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(redirect(post_url(post_id)))
}
