use actix_web::{web, HttpResponse};
use serde_json::json;

use super::AppState;
use crate::db::PostFilter;

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Reports unhealthy when the content store cannot answer a count query.
pub async fn health_summary(state: web::Data<AppState>) -> HttpResponse {
    match state.store.count_posts(PostFilter::All).await {
        Ok(_) => HttpResponse::Ok().json(json!({
            "status": "healthy",
            "service": "blog-service",
        })),
        Err(e) => {
            tracing::warn!(error = %e, "content store health check failed");
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unhealthy",
                "service": "blog-service",
                "message": e.to_string(),
            }))
        }
    }
}
