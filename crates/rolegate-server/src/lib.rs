//! Rolegate edge gateway.
//!
//! Puts [`rolegate_core::RouteGuard`] in front of a web front end: every
//! request is checked against the rule table before any page is served, and
//! refused requests are redirected before first paint.
//!
//! # Architecture
//!
//! - **Middleware**: [`middleware::GuardLayer`] reads the session cookie and
//!   redirects or clears it
//! - **Routes**: login/logout proxying to the authentication API, session
//!   inspection for the browser-side gate, liveness
//! - **Proxy**: allowed traffic is forwarded to the front-end origin
//! - **Config**: layered defaults, file and environment

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;
pub mod upstream;

pub use config::GatewayConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use anyhow::Context;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Server builder for constructing and running the gateway.
pub struct Server {
    addr: SocketAddr,
    state: AppState,
}

impl Server {
    /// Create a new server with the given configuration.
    pub fn new(config: &GatewayConfig) -> anyhow::Result<Self> {
        let addr = config
            .server
            .socket_addr()
            .with_context(|| format!("Invalid bind address {}", config.server.host))?;
        let state = AppState::new(config)?;
        Ok(Self { addr, state })
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        routes::create_router(self.state.clone())
    }

    /// Run the server, binding to the configured address.
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.addr))?;

        info!(addr = %self.addr, "Gateway listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }

    /// Get the server's socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
