/// Authorization gate for blog-service
///
/// Protected routes need an authenticated user, and posts may only be edited
/// by their author. Rejections are redirects rather than error pages:
/// anonymous users go to the login page, non-authors go back to the post.
use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use std::fmt;
use uuid::Uuid;

use super::CurrentUser;
use crate::error::AppError;
use crate::models::{PostView, User};

/// Why the gate refused a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateRejection {
    /// No user on the request
    Unauthenticated { login_url: String, next: String },
    /// Authenticated but not allowed
    Forbidden { redirect_to: String },
}

impl GateRejection {
    pub fn location(&self) -> String {
        match self {
            GateRejection::Unauthenticated { login_url, next } => {
                login_redirect(login_url, next)
            }
            GateRejection::Forbidden { redirect_to } => redirect_to.clone(),
        }
    }
}

impl fmt::Display for GateRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateRejection::Unauthenticated { next, .. } => {
                write!(f, "Login required to access {}", next)
            }
            GateRejection::Forbidden { redirect_to } => {
                write!(f, "Not allowed, redirecting to {}", redirect_to)
            }
        }
    }
}

impl ResponseError for GateRejection {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, self.location()))
            .finish()
    }
}

/// `{login_url}?next={path}` with the path percent-encoded except for `/`
pub fn login_redirect(login_url: &str, next: &str) -> String {
    let next = urlencoding::encode(next).replace("%2F", "/");
    format!("{}?next={}", login_url, next)
}

/// Returns the authenticated user or the login redirect for `path`.
pub fn require_user(
    current: &CurrentUser,
    login_url: &str,
    path: &str,
) -> Result<User, GateRejection> {
    current
        .user()
        .cloned()
        .ok_or_else(|| GateRejection::Unauthenticated {
            login_url: login_url.to_string(),
            next: path.to_string(),
        })
}

/// Check if a user authored a post
pub fn check_post_ownership(user_id: Uuid, post: &PostView) -> Result<(), AppError> {
    if post.author.id == user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You don't have permission to modify this post".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthorRef;
    use chrono::Utc;

    fn post_by(author_id: Uuid) -> PostView {
        PostView {
            id: 1,
            text: "text".into(),
            image: None,
            created_at: Utc::now(),
            author: AuthorRef {
                id: author_id,
                username: "author".into(),
            },
            group: None,
        }
    }

    #[test]
    fn anonymous_is_sent_to_login_with_next() {
        let rejection = require_user(&CurrentUser::anonymous(), "/auth/login/", "/create/")
            .unwrap_err();
        assert_eq!(rejection.location(), "/auth/login/?next=/create/");

        let response = rejection.error_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/auth/login/?next=/create/"
        );
    }

    #[test]
    fn next_keeps_slashes_but_encodes_query() {
        assert_eq!(
            login_redirect("/auth/login/", "/follow/?page=2"),
            "/auth/login/?next=/follow/%3Fpage%3D2"
        );
    }

    #[test]
    fn authenticated_user_passes() {
        let user = User {
            id: Uuid::new_v4(),
            username: "leo".into(),
            created_at: Utc::now(),
        };
        let current = CurrentUser(Some(user.clone()));
        assert_eq!(require_user(&current, "/auth/login/", "/create/").unwrap().id, user.id);
    }

    #[test]
    fn only_author_owns_post() {
        let author = Uuid::new_v4();
        let post = post_by(author);
        assert!(check_post_ownership(author, &post).is_ok());
        assert!(matches!(
            check_post_ownership(Uuid::new_v4(), &post),
            Err(AppError::Forbidden(_))
        ));
    }
}
