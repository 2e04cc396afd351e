//! Login, logout and session inspection.

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    upstream::Credentials,
};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use rolegate_core::{
    decode_claims, expires_at, resolve_roles, AccessDecision, ClientVerdict, RoleSet,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(session))
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub roles: RoleSet,
    pub redirect_to: String,
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let Json(credentials) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(ApiError::BadRequest(
            "email and password are required".to_string(),
        ));
    }

    let token = state.upstream.authenticate(&credentials).await?;

    // A token the guard cannot read would bounce the user straight back.
    let claims = decode_claims(&token).map_err(|e| {
        warn!(error = %e, "Authentication service issued an unreadable token");
        ApiError::UpstreamError("authentication service returned an unreadable token".into())
    })?;
    let roles = resolve_roles(&claims);
    let redirect_to = state
        .dashboards
        .landing_for(&roles, state.guard.redirects())
        .to_string();

    info!(roles = %roles, redirect_to, "Login succeeded");
    debug!(email = %credentials.email, subject = claims.subject(), "Signed-in identity");

    let jar = state.cookies.issue(jar, &token, &credentials.email, &roles);
    Ok((
        jar,
        Json(LoginResponse {
            token,
            roles,
            redirect_to,
        }),
    ))
}

async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let home = &state.guard.redirects().home;
    info!("Session cleared");
    (state.cookies.clear(jar), Json(json!({ "redirect_to": home })))
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub subject: Option<String>,
    pub roles: RoleSet,
    pub expires_at: Option<DateTime<Utc>>,
    pub verdict: ClientVerdict,
    pub decision: AccessDecision,
    pub redirect_to: Option<String>,
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

/// What the browser-side gate says about `path` for the caller's token.
/// A bearer token (the browser's local copy) wins over the cookie.
async fn session(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Json<SessionResponse> {
    let token = bearer_token(&headers).or_else(|| state.cookies.token_from(&jar));
    let path = query.path.unwrap_or_else(|| "/".to_string());
    let check = state.client_gate.check(&path, &token);

    let session = check.session.as_ref();
    Json(SessionResponse {
        authenticated: session.is_some(),
        subject: session.and_then(|s| s.claims.subject().map(String::from)),
        roles: session.map(|s| s.roles.clone()).unwrap_or_default(),
        expires_at: session.and_then(|s| expires_at(&s.claims)),
        verdict: check.verdict,
        decision: check.decision,
        redirect_to: check.redirect_to,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def.ghi"));

        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}
