//! Shared fixtures for gateway integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use rolegate_server::{config::ConfigLoader, routes::create_router, AppState, GatewayConfig};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::MockServer;

pub const AUTH_PATH: &str = "/api/v1/auth/authenticate";

/// A gateway wired to a mock server that plays both the authentication API
/// and the front-end origin.
pub struct TestGateway {
    pub upstream: MockServer,
    pub config: GatewayConfig,
}

impl TestGateway {
    pub async fn start() -> Self {
        Self::build(false).await
    }

    /// Same, with the front-end proxy enabled.
    pub async fn with_frontend() -> Self {
        Self::build(true).await
    }

    async fn build(frontend: bool) -> Self {
        let upstream = MockServer::start().await;
        let mut config = ConfigLoader::new()
            .with_env_prefix("ROLEGATE_INTEGRATION")
            .load()
            .expect("defaults load");
        config.upstream.auth_url = format!("{}{}", upstream.uri(), AUTH_PATH);
        if frontend {
            config.upstream.frontend_url = Some(upstream.uri());
        }
        Self { upstream, config }
    }

    pub fn router(&self) -> Router {
        create_router(AppState::new(&self.config).expect("state builds"))
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router().oneshot(request).await.expect("infallible")
    }
}

/// HS256-signed token with the given claims. The gateway never checks the
/// signature, but real tokens carry one.
pub fn mint(claims: Value) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"integration-secret"),
    )
    .expect("token encodes")
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Token for `roles`, valid for another hour.
pub fn token_for(roles: &[&str]) -> String {
    mint(json!({
        "sub": "user@example.com",
        "roles": roles,
        "exp": now() + 3600,
    }))
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

pub fn get_with_cookie(path: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header("cookie", format!("jwt_token={token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

pub fn cookie_named<'a>(cookies: &'a [String], name: &str) -> Option<&'a String> {
    let prefix = format!("{name}=");
    cookies.iter().find(|c| c.starts_with(&prefix))
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
