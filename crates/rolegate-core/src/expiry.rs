//! Token expiry checks against an injected clock.

use crate::token::Claims;
use chrono::{DateTime, Utc};

/// Source of the current time, in seconds since the epoch.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}

/// Result of comparing `exp` with the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    Valid,
    Expired,
    /// `exp` missing or not numeric. Callers treat this as expired.
    Unknown,
}

impl Expiry {
    /// Only `Valid` lets a request through.
    pub fn is_usable(self) -> bool {
        self == Expiry::Valid
    }
}

/// Classify the claims' expiry. `exp` strictly before now is expired.
pub fn check_expiry(claims: &Claims, clock: &dyn Clock) -> Expiry {
    match claims.exp() {
        Some(exp) if exp < clock.now() as f64 => Expiry::Expired,
        Some(_) => Expiry::Valid,
        None => Expiry::Unknown,
    }
}

/// `exp` as a timestamp, for display.
pub fn expires_at(claims: &Claims) -> Option<DateTime<Utc>> {
    claims
        .exp()
        .and_then(|exp| DateTime::from_timestamp(exp.floor() as i64, 0))
}
