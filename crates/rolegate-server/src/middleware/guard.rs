//! Route guard middleware layer.

use super::path::canonical_path;
use crate::{error::ApiError, session::SessionCookies};
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use rolegate_core::{AccessError, GuardOutcome, RouteGuard};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::{debug, info, warn};

/// Applies the route guard to every request before it reaches a handler.
#[derive(Clone)]
pub struct GuardLayer {
    guard: RouteGuard,
    cookies: Arc<SessionCookies>,
}

impl GuardLayer {
    pub fn new(guard: RouteGuard, cookies: Arc<SessionCookies>) -> Self {
        Self { guard, cookies }
    }
}

impl<S> Layer<S> for GuardLayer {
    type Service = GuardMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GuardMiddleware {
            inner,
            guard: self.guard.clone(),
            cookies: self.cookies.clone(),
        }
    }
}

/// Route guard middleware service.
#[derive(Clone)]
pub struct GuardMiddleware<S> {
    inner: S,
    guard: RouteGuard,
    cookies: Arc<SessionCookies>,
}

impl<S> GuardMiddleware<S> {
    /// Redirect for a refused request, clearing the session when the
    /// token itself was unusable.
    fn deny(&self, path: &str, outcome: GuardOutcome, jar: CookieJar) -> Response {
        let redirects = self.guard.redirects();
        let target = redirects
            .target(outcome.decision)
            .unwrap_or(redirects.home.as_str());
        let reason = outcome.denial.as_ref().map_or("unknown", AccessError::code);
        let rule = outcome.rule.as_deref().unwrap_or_default();

        match &outcome.denial {
            Some(AccessError::MissingToken) => {
                info!(path, rule, reason, target, "Redirecting unauthenticated request");
            }
            _ => {
                warn!(
                    path,
                    rule,
                    reason,
                    roles = %outcome.roles,
                    target,
                    "Access denied"
                );
            }
        }

        if outcome.clears_session() {
            (self.cookies.clear(jar), Redirect::temporary(target)).into_response()
        } else {
            Redirect::temporary(target).into_response()
        }
    }
}

impl<S> Service<Request<Body>> for GuardMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        // Only the canonical spelling is evaluated and served; anything
        // else is sent there first.
        let raw = req.uri().path();
        let Some(path) = canonical_path(raw) else {
            warn!(path = raw, "Refusing path without a canonical form");
            let response =
                ApiError::BadRequest("path has no canonical form".into()).into_response();
            return Box::pin(async move { Ok(response) });
        };
        if path != raw {
            let location = match req.uri().query() {
                Some(query) => format!("{path}?{query}"),
                None => path,
            };
            debug!(path = raw, location, "Redirecting to canonical path");
            let response = Redirect::permanent(&location).into_response();
            return Box::pin(async move { Ok(response) });
        }

        let jar = CookieJar::from_headers(req.headers());
        let token = self.cookies.token_from(&jar);

        let outcome = self.guard.evaluate(&path, &token);
        if outcome.is_allowed() {
            // The clone that was polled ready is the one that must be called.
            let clone = self.inner.clone();
            let mut inner = std::mem::replace(&mut self.inner, clone);
            return Box::pin(async move { inner.call(req).await });
        }

        let response = self.deny(&path, outcome, jar);
        Box::pin(async move { Ok(response) })
    }
}
