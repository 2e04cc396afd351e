//! Per-request access decisions.

use crate::{
    error::AccessError,
    expiry::{check_expiry, Clock, Expiry, SystemClock},
    roles::{resolve_roles, RoleSet},
    rules::{RouteRule, RouteTable},
    token::{decode_claims, Claims, TokenSource},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Default landing page for unauthenticated visitors.
pub const DEFAULT_HOME_PATH: &str = "/Job_portail/Home";

/// Default page for authenticated but forbidden visitors.
pub const DEFAULT_UNAUTHORIZED_PATH: &str = "/unauthorized";

/// What to do with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    RedirectHome,
    RedirectUnauthorized,
}

/// Redirect targets, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirects {
    pub home: String,
    pub unauthorized: String,
}

impl Default for Redirects {
    fn default() -> Self {
        Self {
            home: DEFAULT_HOME_PATH.to_string(),
            unauthorized: DEFAULT_UNAUTHORIZED_PATH.to_string(),
        }
    }
}

impl Redirects {
    /// Target path for a decision; `None` for `Allow`.
    pub fn target(&self, decision: AccessDecision) -> Option<&str> {
        match decision {
            AccessDecision::Allow => None,
            AccessDecision::RedirectHome => Some(&self.home),
            AccessDecision::RedirectUnauthorized => Some(&self.unauthorized),
        }
    }
}

/// A token that decoded, has a usable expiry, and the roles it carries.
#[derive(Debug, Clone)]
pub struct Session {
    pub claims: Claims,
    pub roles: RoleSet,
}

/// Full result of a guard evaluation.
#[derive(Debug, Clone)]
pub struct GuardOutcome {
    pub decision: AccessDecision,
    /// Prefix of the rule that applied; `None` for public paths.
    pub rule: Option<String>,
    /// Roles resolved from the token, when it got that far.
    pub roles: RoleSet,
    /// Why the request was refused.
    pub denial: Option<AccessError>,
}

impl GuardOutcome {
    fn public() -> Self {
        Self {
            decision: AccessDecision::Allow,
            rule: None,
            roles: RoleSet::new(),
            denial: None,
        }
    }

    fn denied(rule: &RouteRule, roles: RoleSet, err: AccessError) -> Self {
        Self {
            decision: err.decision(),
            rule: Some(rule.prefix().to_string()),
            roles,
            denial: Some(err),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.decision == AccessDecision::Allow
    }

    /// Whether the stored token must be discarded alongside the redirect.
    pub fn clears_session(&self) -> bool {
        self.denial.as_ref().is_some_and(AccessError::clears_session)
    }
}

/// Evaluates requests against the route table.
#[derive(Clone)]
pub struct RouteGuard {
    table: Arc<RouteTable>,
    redirects: Redirects,
    clock: Arc<dyn Clock>,
}

impl RouteGuard {
    /// Guard using the system clock.
    pub fn new(table: RouteTable, redirects: Redirects) -> Self {
        Self {
            table: Arc::new(table),
            redirects,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn redirects(&self) -> &Redirects {
        &self.redirects
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Decode and expiry-check the token held by `source`.
    pub fn authenticate<T: TokenSource + ?Sized>(&self, source: &T) -> Result<Session, AccessError> {
        let token = source.token().ok_or(AccessError::MissingToken)?;
        let claims = decode_claims(token)?;

        match check_expiry(&claims, self.clock.as_ref()) {
            Expiry::Valid => {}
            Expiry::Expired | Expiry::Unknown => return Err(AccessError::ExpiredToken),
        }

        let roles = resolve_roles(&claims);
        Ok(Session { claims, roles })
    }

    /// Decide whether `path` may be served to the holder of `source`'s token.
    pub fn evaluate<T: TokenSource + ?Sized>(&self, path: &str, source: &T) -> GuardOutcome {
        let Some(rule) = self.table.find(path) else {
            return GuardOutcome::public();
        };

        let session = match self.authenticate(source) {
            Ok(session) => session,
            Err(err) => {
                debug!(path, rule = rule.prefix(), reason = err.code(), "Guard refused token");
                return GuardOutcome::denied(rule, RoleSet::new(), err);
            }
        };

        if session.roles.intersects(rule.roles()) {
            debug!(path, rule = rule.prefix(), roles = %session.roles, "Guard granted access");
            return GuardOutcome {
                decision: AccessDecision::Allow,
                rule: Some(rule.prefix().to_string()),
                roles: session.roles,
                denial: None,
            };
        }

        let err = AccessError::InsufficientRole {
            roles: session.roles.clone().into_vec(),
        };
        debug!(
            path,
            rule = rule.prefix(),
            roles = %session.roles,
            required = %rule.roles(),
            "Guard refused role"
        );
        GuardOutcome::denied(rule, session.roles, err)
    }
}
