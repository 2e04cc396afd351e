//! Forwarding of allowed traffic to the front-end origin.

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    upstream::UpstreamError,
};
use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    response::Response,
};
use tracing::{debug, warn};

/// Headers that describe a single connection and are never forwarded.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn is_forwardable(name: &str) -> bool {
    !HOP_BY_HOP.contains(&name) && name != "host" && name != "content-length"
}

/// Fallback handler. Only requests the guard already allowed get here.
pub async fn forward(State(state): State<AppState>, req: Request) -> ApiResult<Response> {
    let Some(origin) = state.upstream.frontend_url() else {
        return Err(ApiError::NotFound(req.uri().path().to_string()));
    };

    let (parts, body) = req.into_parts();

    let mut url = origin.clone();
    url.set_path(parts.uri.path());
    url.set_query(parts.uri.query());

    // The guard judged `parts.uri.path()`; forward nothing else.
    if url.path() != parts.uri.path() {
        warn!(path = parts.uri.path(), forwarded = url.path(), "Refusing to forward rewritten path");
        return Err(ApiError::BadRequest("path has no canonical form".into()));
    }

    // reqwest and axum sit on different `http` majors; convert by value.
    let method = reqwest::Method::from_bytes(parts.method.as_str().as_bytes())
        .map_err(|_| ApiError::BadRequest(format!("unsupported method {}", parts.method)))?;

    let mut headers = reqwest::header::HeaderMap::new();
    for (name, value) in &parts.headers {
        if !is_forwardable(name.as_str()) {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            reqwest::header::HeaderName::from_bytes(name.as_str().as_bytes()),
            reqwest::header::HeaderValue::from_bytes(value.as_bytes()),
        ) {
            headers.append(name, value);
        }
    }

    let limit = state.config.server.body_limit_bytes;
    let body = axum::body::to_bytes(body, limit)
        .await
        .map_err(|_| ApiError::PayloadTooLarge { limit })?;

    debug!(method = %parts.method, %url, "Forwarding to front end");
    let upstream = state
        .upstream
        .inner()
        .request(method, url)
        .headers(headers)
        .body(body.to_vec())
        .send()
        .await
        .map_err(UpstreamError::from)?;

    let status = StatusCode::from_u16(upstream.status().as_u16())
        .map_err(|e| ApiError::Internal(e.into()))?;

    let mut builder = Response::builder().status(status);
    for (name, value) in upstream.headers() {
        if is_forwardable(name.as_str()) {
            builder = builder.header(name.as_str(), value.as_bytes());
        }
    }

    let bytes = upstream.bytes().await.map_err(UpstreamError::from)?;
    builder
        .body(Body::from(bytes))
        .map_err(|e| ApiError::Internal(e.into()))
}
