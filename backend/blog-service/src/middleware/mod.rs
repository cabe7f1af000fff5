/// HTTP middleware utilities for blog-service
///
/// Identity resolution from the gateway header, the authorization gate and
/// request timing logs.
pub mod permissions;

pub use permissions::*;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::db::ContentStore;
use crate::models::User;

/// Header the upstream gateway uses to forward the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";

// =====================================================================
// Identity
// =====================================================================

/// The requesting user, or `None` for anonymous requests.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<User>);

impl CurrentUser {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }

    pub fn id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|u| u.id)
    }
}

/// Resolves `x-user-id` against the user table and stores a `CurrentUser`
/// in the request extensions. Malformed or unknown ids are anonymous.
#[derive(Clone)]
pub struct IdentityMiddleware {
    store: Arc<dyn ContentStore>,
}

impl IdentityMiddleware {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddlewareService {
            service: Rc::new(service),
            store: self.store.clone(),
        }))
    }
}

pub struct IdentityMiddlewareService<S> {
    service: Rc<S>,
    store: Arc<dyn ContentStore>,
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let store = self.store.clone();

        Box::pin(async move {
            let user_id = req
                .headers()
                .get(USER_ID_HEADER)
                .and_then(|h| h.to_str().ok())
                .and_then(|raw| Uuid::parse_str(raw.trim()).ok());

            let user = match user_id {
                Some(id) => {
                    let found = store.find_user_by_id(id).await?;
                    if found.is_none() {
                        tracing::debug!(user_id = %id, "unknown user id, treating as anonymous");
                    }
                    found
                }
                None => None,
            };

            req.extensions_mut().insert(CurrentUser(user));
            service.call(req).await
        })
    }
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(req
            .extensions()
            .get::<CurrentUser>()
            .cloned()
            .unwrap_or_default()))
    }
}

// =====================================================================
// Request timing
// =====================================================================

pub struct RequestTimingMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestTimingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTimingMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTimingMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestTimingMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestTimingMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let path = req.path().to_string();
        let method = req.method().to_string();
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start.elapsed().as_millis();
            match &res {
                Ok(response) => {
                    let status = response.status().as_u16();
                    tracing::debug!(%method, %path, status, %elapsed, "request completed");
                }
                Err(err) => {
                    tracing::debug!(%method, %path, %elapsed, error = %err, "request failed");
                }
            }
            res
        })
    }
}
