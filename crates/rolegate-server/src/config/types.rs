//! Gateway configuration types.

use rolegate_core::{Dashboards, Redirects, RouteRule, RouteTable};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::{AddrParseError, SocketAddr};

/// Main gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Server binding configuration.
    pub server: ServerBindConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Session cookie configuration.
    pub session: SessionConfig,
    /// Redirect targets.
    pub redirects: RedirectConfig,
    /// Protected path prefixes.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
    /// Browser-side gate configuration.
    pub client: ClientConfig,
    /// Landing page per role after sign-in.
    #[serde(default)]
    pub dashboards: HashMap<String, String>,
    /// Upstream services.
    pub upstream: UpstreamConfig,
}

/// Server binding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerBindConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request timeout.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Largest request body forwarded to the front end.
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_body_limit() -> usize {
    10 * 1024 * 1024
}

impl ServerBindConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty, compact or json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// Session cookie configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Cookie carrying the token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Cookies cleared together with the token.
    #[serde(default = "default_companion_cookies")]
    pub companion_cookies: Vec<String>,
    /// Cookie lifetime.
    #[serde(default = "default_max_age")]
    pub max_age_secs: i64,
    /// SameSite attribute (lax, strict or none).
    #[serde(default = "default_same_site")]
    pub same_site: String,
    /// Mark cookies Secure.
    #[serde(default)]
    pub secure: bool,
}

fn default_cookie_name() -> String {
    "jwt_token".to_string()
}

fn default_companion_cookies() -> Vec<String> {
    vec!["email".to_string(), "user_role".to_string()]
}

fn default_max_age() -> i64 {
    86400
}

fn default_same_site() -> String {
    "lax".to_string()
}

/// Redirect targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectConfig {
    /// Where unauthenticated visitors go.
    pub home: String,
    /// Where signed-in visitors without the right role go.
    pub unauthorized: String,
    /// Redirect `/` to `home`.
    #[serde(default = "default_true")]
    pub redirect_root: bool,
}

fn default_true() -> bool {
    true
}

impl RedirectConfig {
    pub fn to_redirects(&self) -> Redirects {
        Redirects {
            home: self.home.clone(),
            unauthorized: self.unauthorized.clone(),
        }
    }
}

/// One protected prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub prefix: String,
    pub roles: Vec<String>,
}

/// Browser-side gate configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Paths that render without a token.
    #[serde(default)]
    pub public_prefixes: Vec<String>,
}

/// Upstream services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Authentication endpoint returning `{ token }`.
    pub auth_url: String,
    /// Front-end origin that allowed traffic is forwarded to.
    #[serde(default)]
    pub frontend_url: Option<String>,
    /// Connection timeout.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Request timeout.
    #[serde(default = "default_upstream_timeout")]
    pub request_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_upstream_timeout() -> u64 {
    15
}

impl GatewayConfig {
    /// Rule table for the guard.
    pub fn route_table(&self) -> RouteTable {
        self.rules
            .iter()
            .map(|rule| RouteRule::new(rule.prefix.clone(), &rule.roles))
            .collect()
    }

    /// Landing pages; the built-in map when none are configured.
    pub fn dashboards(&self) -> Dashboards {
        if self.dashboards.is_empty() {
            Dashboards::default()
        } else {
            self.dashboards
                .iter()
                .map(|(role, path)| (role.as_str(), path.clone()))
                .collect()
        }
    }
}
