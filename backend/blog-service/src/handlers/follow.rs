/// Follow handlers - both accept GET and POST and end on the author's profile
use actix_web::{web, HttpRequest, HttpResponse, Result};

use super::{full_path, profile_url, redirect, AppState};
use crate::middleware::{require_user, CurrentUser};

pub async fn profile_follow(
    state: web::Data<AppState>,
    req: HttpRequest,
    current: CurrentUser,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let user = require_user(&current, &state.login_url, &full_path(&req))?;
    state.follows.follow(user.id, &username).await?;

    Ok(redirect(profile_url(&username)))
}

pub async fn profile_unfollow(
    state: web::Data<AppState>,
    req: HttpRequest,
    current: CurrentUser,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let user = require_user(&current, &state.login_url, &full_path(&req))?;
    state.follows.unfollow(user.id, &username).await?;

    Ok(redirect(profile_url(&username)))
}
