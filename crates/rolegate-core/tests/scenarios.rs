use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rolegate_core::{
    AccessDecision, AccessError, FixedClock, Redirects, RoleSet, RouteGuard, RouteRule, RouteTable,
};
use serde_json::{json, Value};
use test_case::test_case;

const NOW: i64 = 1_750_000_000;

fn job_guard() -> RouteGuard {
    let table = RouteTable::new(vec![RouteRule::new(
        "/Job",
        ["ADMIN", "TECHNICIAN", "JOBSEEKER", "ENTERPRISE"],
    )]);
    RouteGuard::new(table, Redirects::default()).with_clock(FixedClock(NOW))
}

fn token(claims: Value) -> Option<String> {
    Some(format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims.to_string()),
        URL_SAFE_NO_PAD.encode("not-verified"),
    ))
}

#[test_case(json!({"roles": ["role_enterprise"], "exp": NOW + 3600}), AccessDecision::Allow ; "enterprise role allowed")]
#[test_case(json!({"roles": ["ADMIN"], "exp": NOW + 1}), AccessDecision::Allow ; "admin allowed")]
#[test_case(json!({"role": "technician", "exp": NOW + 60}), AccessDecision::Allow ; "single role claim")]
#[test_case(json!({"roles": ["PATIENT"], "exp": NOW + 3600}), AccessDecision::RedirectUnauthorized ; "patient forbidden")]
#[test_case(json!({"exp": NOW + 3600}), AccessDecision::RedirectUnauthorized ; "no roles forbidden")]
#[test_case(json!({"roles": ["ADMIN"], "exp": NOW - 300}), AccessDecision::RedirectHome ; "expired admin")]
#[test_case(json!({"exp": NOW - 300}), AccessDecision::RedirectHome ; "expired without roles")]
#[test_case(json!({"roles": ["ADMIN"], "exp": "tomorrow"}), AccessDecision::RedirectHome ; "non numeric exp")]
fn job_settings(claims: Value, expected: AccessDecision) {
    let outcome = job_guard().evaluate("/Job/Settings", &token(claims));
    assert_eq!(outcome.decision, expected);
}

#[test_case("only-one-segment" ; "missing segments")]
#[test_case("header.%%%%.sig" ; "non base64 payload")]
#[test_case("header.bm90IGpzb24.sig" ; "non json payload")]
#[test_case("header..sig" ; "empty payload")]
fn malformed_tokens_redirect_home(raw: &str) {
    let outcome = job_guard().evaluate("/Job/Settings", &Some(raw));
    assert_eq!(outcome.decision, AccessDecision::RedirectHome);
    assert!(matches!(outcome.denial, Some(AccessError::MalformedToken(_))));
}

#[test]
fn no_cookie_redirects_home() {
    let outcome = job_guard().evaluate("/Job/Settings", &None::<&str>);
    assert_eq!(outcome.decision, AccessDecision::RedirectHome);
    assert_eq!(outcome.denial, Some(AccessError::MissingToken));
}

#[test]
fn expired_token_requests_session_removal() {
    let outcome = job_guard().evaluate("/Job/Settings", &token(json!({"exp": NOW - 300})));
    assert_eq!(outcome.decision, AccessDecision::RedirectHome);
    assert!(outcome.clears_session());
}

#[test]
fn public_paths_ignore_tokens() {
    let guard = job_guard();
    for path in ["/", "/Job_portail/Home", "/unauthorized", "/Jobs"] {
        assert!(guard.evaluate(path, &Some("garbage")).is_allowed(), "{path}");
    }
}

#[test]
fn role_normalization_collapses_variants() {
    let roles: RoleSet = ["ROLE_admin", "Admin"].into_iter().collect();
    assert_eq!(roles.into_vec(), vec!["ADMIN".to_string()]);
}
