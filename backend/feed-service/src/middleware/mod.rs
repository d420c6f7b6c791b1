/// HTTP middleware for the feed service
///
/// Provides bearer-token authentication and request metrics. Auth policy for
/// the API scope: GET routes are public (identity is attached when a valid
/// token is presented), every other method requires a valid token. A token
/// that is present but invalid is rejected regardless of method.
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::Method;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;
use uuid::Uuid;

use crate::auth::TokenVerifier;
use crate::error::AppError;
use crate::metrics::{HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS};

// =====================================================================
// Authentication
// =====================================================================

/// Extracted caller identity stored in request extensions after auth.
#[derive(Debug, Clone)]
pub struct UserId(pub Uuid);

/// Caller identity for routes that work with or without credentials.
#[derive(Debug, Clone)]
pub struct MaybeUserId(pub Option<Uuid>);

/// Actix middleware that authenticates Bearer tokens against an explicit
/// [`TokenVerifier`] value.
pub struct AuthMiddleware {
    verifier: TokenVerifier,
}

impl AuthMiddleware {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            verifier: self.verifier.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    verifier: TokenVerifier,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
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
        let verifier = self.verifier.clone();

        Box::pin(async move {
            let header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .map(str::to_owned);

            match header {
                Some(value) => {
                    let user_id = verifier.verify_bearer(&value)?;
                    req.extensions_mut().insert(UserId(user_id));
                }
                None if req.method() != Method::GET => {
                    return Err(
                        AppError::Unauthorized("Missing authorization token".to_string()).into(),
                    );
                }
                None => {}
            }

            service.call(req).await
        })
    }
}

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(req.extensions().get::<UserId>().cloned().ok_or_else(|| {
            AppError::Unauthorized("Missing authorization token".to_string()).into()
        }))
    }
}

impl FromRequest for MaybeUserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let user_id = req.extensions().get::<UserId>().map(|u| u.0);
        ready(Ok(MaybeUserId(user_id)))
    }
}

// =====================================================================
// Request metrics
// =====================================================================

pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
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
        let method = req.method().to_string();
        let route = req
            .match_pattern()
            .unwrap_or_else(|| req.path().to_string());
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start.elapsed();

            let status = match &res {
                Ok(response) => response.status().as_u16(),
                Err(err) => err.as_response_error().status_code().as_u16(),
            };
            HTTP_REQUESTS_TOTAL
                .with_label_values(&[&method, &route, &status.to_string()])
                .inc();
            HTTP_REQUEST_DURATION_SECONDS
                .with_label_values(&[&method, &route])
                .observe(elapsed.as_secs_f64());
            tracing::debug!(%method, %route, status, elapsed_ms = elapsed.as_millis() as u64, "request completed");

            res
        })
    }
}
