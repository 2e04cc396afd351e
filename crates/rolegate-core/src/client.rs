//! Browser-side mirror of the route guard.
//!
//! Pages rendered without the gateway in front of them ask this gate before
//! painting. It layers a public-path list over the same [`RouteGuard`], and
//! additionally requires a token for any non-public page. The gateway layer
//! stays the source of truth; this only narrows the window in which a
//! protected page could flash before redirecting.

use crate::{
    guard::{AccessDecision, GuardOutcome, RouteGuard, Session},
    token::TokenSource,
};
use serde::Serialize;

/// What the browser should do with the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientVerdict {
    Render,
    Redirect,
}

/// Result of a client-side check.
#[derive(Debug, Clone)]
pub struct ClientCheck {
    pub verdict: ClientVerdict,
    pub redirect_to: Option<String>,
    pub decision: AccessDecision,
    /// The decoded session, when the token was usable.
    pub session: Option<Session>,
}

/// Public-path list plus the shared route guard.
#[derive(Clone)]
pub struct ClientGate {
    guard: RouteGuard,
    public_prefixes: Vec<String>,
}

impl ClientGate {
    pub fn new(guard: RouteGuard, public_prefixes: Vec<String>) -> Self {
        Self {
            guard,
            public_prefixes,
        }
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    /// Case-insensitive prefix match on segment boundaries. `/` is only
    /// public as an exact path.
    pub fn is_public(&self, path: &str) -> bool {
        let path = path.to_lowercase();
        self.public_prefixes.iter().any(|prefix| {
            let prefix = prefix.trim_end_matches('/').to_lowercase();
            if prefix.is_empty() {
                return path == "/";
            }
            match path.strip_prefix(prefix.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            }
        })
    }

    /// Decide whether to render `path` for the holder of `source`'s token.
    pub fn check<T: TokenSource + ?Sized>(&self, path: &str, source: &T) -> ClientCheck {
        let session = self.guard.authenticate(source).ok();

        if self.is_public(path) {
            return ClientCheck {
                verdict: ClientVerdict::Render,
                redirect_to: None,
                decision: AccessDecision::Allow,
                session,
            };
        }

        let GuardOutcome { decision, rule, .. } = self.guard.evaluate(path, source);
        let decision = match decision {
            // Unruled pages still need some token on the client.
            AccessDecision::Allow if rule.is_none() && source.token().is_none() => {
                AccessDecision::RedirectHome
            }
            other => other,
        };

        let redirect_to = self.guard.redirects().target(decision).map(str::to_string);
        ClientCheck {
            verdict: if redirect_to.is_some() {
                ClientVerdict::Redirect
            } else {
                ClientVerdict::Render
            },
            redirect_to,
            decision,
            session,
        }
    }
}
