//! Shared application state.

use crate::{config::GatewayConfig, session::SessionCookies, upstream::UpstreamClient};
use anyhow::Context;
use rolegate_core::{ClientGate, Clock, Dashboards, RouteGuard};
use std::sync::Arc;

/// State handed to every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub guard: RouteGuard,
    pub client_gate: ClientGate,
    pub dashboards: Arc<Dashboards>,
    pub cookies: Arc<SessionCookies>,
    pub upstream: Arc<UpstreamClient>,
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    /// Build state from validated configuration.
    pub fn new(config: &GatewayConfig) -> anyhow::Result<Self> {
        let guard = RouteGuard::new(config.route_table(), config.redirects.to_redirects());
        Self::assemble(config, guard)
    }

    /// Build state with an injected time source.
    pub fn with_clock(config: &GatewayConfig, clock: impl Clock + 'static) -> anyhow::Result<Self> {
        let guard = RouteGuard::new(config.route_table(), config.redirects.to_redirects())
            .with_clock(clock);
        Self::assemble(config, guard)
    }

    fn assemble(config: &GatewayConfig, guard: RouteGuard) -> anyhow::Result<Self> {
        let upstream =
            UpstreamClient::new(&config.upstream).context("Failed to build upstream client")?;

        tracing::debug!(
            rules = guard.table().rules().len(),
            public = config.client.public_prefixes.len(),
            "Route guard configured"
        );

        Ok(Self {
            client_gate: ClientGate::new(guard.clone(), config.client.public_prefixes.clone()),
            guard,
            dashboards: Arc::new(config.dashboards()),
            cookies: Arc::new(SessionCookies::from_config(&config.session)),
            upstream: Arc::new(upstream),
            config: Arc::new(config.clone()),
        })
    }
}
