//! Route configuration for the gateway.

mod proxy;
mod session;

pub use session::{LoginResponse, SessionResponse};

use crate::{middleware::GuardLayer, state::AppState};
use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Create the gateway router. The guard sits innermost so that every
/// request it sees already carries a request id and a trace span.
pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(GuardLayer::new(state.guard.clone(), state.cookies.clone()));

    let mut router = Router::new()
        .merge(session::router())
        .route("/healthz", get(healthz));

    if state.config.redirects.redirect_root {
        router = router.route("/", get(root_redirect));
    }

    router
        .fallback(proxy::forward)
        .layer(middleware)
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn root_redirect(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.guard.redirects().home)
}
