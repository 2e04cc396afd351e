//! Configuration validation.

use super::types::GatewayConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid port: {0}")]
    InvalidPort(u16),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}")]
    InvalidLogFormat(String),

    #[error("Session cookie name must not be empty")]
    EmptyCookieName,

    #[error("Session max age must be positive, got {0}")]
    InvalidMaxAge(i64),

    #[error("Invalid SameSite value: {0}")]
    InvalidSameSite(String),

    #[error("SameSite=None requires secure cookies")]
    InsecureSameSiteNone,

    #[error("Redirect target must be an absolute path: {0}")]
    InvalidRedirect(String),

    #[error("Rule prefix must be an absolute path: {0}")]
    InvalidRulePrefix(String),

    #[error("Rule {0} accepts no roles")]
    EmptyRule(String),

    #[error("Invalid upstream URL {url}: {reason}")]
    InvalidUpstreamUrl { url: String, reason: String },
}

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "warning", "error"];
const LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];
const SAME_SITE: [&str; 3] = ["lax", "strict", "none"];

/// Validate gateway configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.server.socket_addr().is_err() {
        errors.push(ConfigError::InvalidBindAddress(config.server.host.clone()));
    }

    if config.server.port == 0 {
        errors.push(ConfigError::InvalidPort(0));
    }

    if !LOG_LEVELS.contains(&config.logging.level.to_lowercase().as_str()) {
        errors.push(ConfigError::InvalidLogLevel(config.logging.level.clone()));
    }

    if !LOG_FORMATS.contains(&config.logging.format.to_lowercase().as_str()) {
        errors.push(ConfigError::InvalidLogFormat(config.logging.format.clone()));
    }

    let session = &config.session;
    if session.cookie_name.trim().is_empty() {
        errors.push(ConfigError::EmptyCookieName);
    }
    if session.max_age_secs <= 0 {
        errors.push(ConfigError::InvalidMaxAge(session.max_age_secs));
    }
    let same_site = session.same_site.to_lowercase();
    if !SAME_SITE.contains(&same_site.as_str()) {
        errors.push(ConfigError::InvalidSameSite(session.same_site.clone()));
    } else if same_site == "none" && !session.secure {
        errors.push(ConfigError::InsecureSameSiteNone);
    }

    for target in [&config.redirects.home, &config.redirects.unauthorized] {
        if !target.starts_with('/') {
            errors.push(ConfigError::InvalidRedirect(target.clone()));
        }
    }

    for rule in &config.rules {
        if !rule.prefix.starts_with('/') {
            errors.push(ConfigError::InvalidRulePrefix(rule.prefix.clone()));
        }
        if rule.roles.iter().all(|r| r.trim().is_empty()) {
            errors.push(ConfigError::EmptyRule(rule.prefix.clone()));
        }
    }

    let upstream = &config.upstream;
    for url in std::iter::once(&upstream.auth_url).chain(upstream.frontend_url.as_ref()) {
        if let Err(e) = url::Url::parse(url) {
            errors.push(ConfigError::InvalidUpstreamUrl {
                url: url.clone(),
                reason: e.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
