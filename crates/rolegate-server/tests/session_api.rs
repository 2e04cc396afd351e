//! Login, logout and session endpoints.

mod common;

use axum::{body::Body, http::{Request, StatusCode}};
use common::*;
use serde_json::json;
use wiremock::{
    matchers::{body_json, method, path},
    Mock, ResponseTemplate,
};

async fn mock_auth(gateway: &TestGateway, status: u16, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&gateway.upstream)
        .await;
}

#[tokio::test]
async fn login_sets_session_cookie_and_lands_on_dashboard() {
    let gateway = TestGateway::start().await;
    let token = token_for(&["ROLE_ENTERPRISE"]);
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .and(body_json(json!({"email": "boss@example.com", "password": "hunter2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
        .expect(1)
        .mount(&gateway.upstream)
        .await;

    let response = gateway
        .send(post_json(
            "/auth/login",
            json!({"email": "boss@example.com", "password": "hunter2"}),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    let session = cookie_named(&cookies, "jwt_token").unwrap();
    assert!(session.starts_with(&format!("jwt_token={token}")));
    assert!(session.contains("Max-Age=86400"));
    assert!(session.contains("SameSite=Lax"));
    assert!(session.contains("Path=/"));
    assert!(cookie_named(&cookies, "email").is_some());
    let role = cookie_named(&cookies, "user_role").unwrap();
    assert!(role.starts_with("user_role=ENTERPRISE;"));
    assert!(role.contains("Max-Age=86400"));

    let body = json_body(response).await;
    assert_eq!(body["token"], token.as_str());
    assert_eq!(body["roles"], json!(["ENTERPRISE"]));
    assert_eq!(body["redirect_to"], "/Enterprise");
}

#[tokio::test]
async fn login_with_unmapped_role_lands_on_root() {
    let gateway = TestGateway::start().await;
    mock_auth(&gateway, 200, json!({ "token": token_for(&["RECRUITER"]) })).await;

    let response = gateway
        .send(post_json("/auth/login", json!({"email": "r@example.com", "password": "x"})))
        .await;

    assert_eq!(json_body(response).await["redirect_to"], "/");
}

#[tokio::test]
async fn rejected_credentials_carry_upstream_message() {
    let gateway = TestGateway::start().await;
    mock_auth(&gateway, 401, json!({ "message": "Bad credentials" })).await;

    let response = gateway
        .send(post_json("/auth/login", json!({"email": "a@example.com", "password": "nope"})))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&response).is_empty());
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "invalid_credentials");
    assert_eq!(body["error"]["message"], "Bad credentials");
}

#[tokio::test]
async fn upstream_failure_is_bad_gateway() {
    let gateway = TestGateway::start().await;
    mock_auth(&gateway, 500, json!({ "message": "database down" })).await;

    let response = gateway
        .send(post_json("/auth/login", json!({"email": "a@example.com", "password": "pw"})))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "upstream_error");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("database down"));
}

#[tokio::test]
async fn response_without_token_is_bad_gateway() {
    let gateway = TestGateway::start().await;
    mock_auth(&gateway, 200, json!({ "status": "ok" })).await;

    let response = gateway
        .send(post_json("/auth/login", json!({"email": "a@example.com", "password": "pw"})))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn login_requires_both_fields() {
    let gateway = TestGateway::start().await;

    let response = gateway
        .send(post_json("/auth/login", json!({"email": "", "password": "pw"})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = gateway
        .send(post_json("/auth/login", json!({"email": "a@example.com"})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"]["code"], "bad_request");
}

#[tokio::test]
async fn logout_clears_cookies() {
    let gateway = TestGateway::start().await;
    let request = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .header("cookie", format!("jwt_token={}; email=a@example.com", token_for(&["ADMIN"])))
        .body(Body::empty())
        .unwrap();

    let response = gateway.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    for name in ["jwt_token", "email", "user_role"] {
        assert!(cookie_named(&cookies, name).unwrap().contains("Max-Age=0"));
    }
    assert_eq!(json_body(response).await["redirect_to"], "/Job_portail/Home");
}

#[tokio::test]
async fn session_prefers_bearer_token() {
    let gateway = TestGateway::start().await;
    let request = Request::builder()
        .uri("/auth/session?path=/Job/Settings")
        .header("authorization", format!("Bearer {}", token_for(&["admin"])))
        .header("cookie", format!("jwt_token={}", token_for(&["PATIENT"])))
        .body(Body::empty())
        .unwrap();

    let body = json_body(gateway.send(request).await).await;

    assert_eq!(body["authenticated"], true);
    assert_eq!(body["subject"], "user@example.com");
    assert_eq!(body["roles"], json!(["ADMIN"]));
    assert_eq!(body["verdict"], "render");
    assert_eq!(body["decision"], "allow");
    assert!(body["expires_at"].is_string());
    assert!(body["redirect_to"].is_null());
}

#[tokio::test]
async fn session_reports_redirects() {
    let gateway = TestGateway::start().await;

    let body = json_body(
        gateway
            .send(get_with_cookie("/auth/session?path=/Job/Settings", &token_for(&["PATIENT"])))
            .await,
    )
    .await;
    assert_eq!(body["verdict"], "redirect");
    assert_eq!(body["redirect_to"], "/unauthorized");

    let body = json_body(gateway.send(get("/auth/session?path=/Job/Settings")).await).await;
    assert_eq!(body["authenticated"], false);
    assert_eq!(body["redirect_to"], "/Job_portail/Home");

    // Non-public pages need some token even without a rule.
    let body = json_body(gateway.send(get("/auth/session?path=/profile")).await).await;
    assert_eq!(body["decision"], "redirect_home");
}

#[tokio::test]
async fn session_renders_public_pages() {
    let gateway = TestGateway::start().await;

    for page in ["/", "/login", "/LOGIN", "/Job_portail/Home"] {
        let body = json_body(
            gateway
                .send(get(&format!("/auth/session?path={page}")))
                .await,
        )
        .await;
        assert_eq!(body["verdict"], "render", "{page}");
    }
}
