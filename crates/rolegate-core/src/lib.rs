//! Rolegate access-control core.
//!
//! Decides, for a request path and whatever token the client holds, whether
//! the page may be served, or whether the visitor goes back to the home
//! page (not signed in) or to the unauthorized page (signed in, wrong role).
//!
//! # Components
//!
//! - [`token`]: decodes the claims segment of a compact token
//! - [`roles`]: extracts and normalizes `role` / `roles` claims
//! - [`expiry`]: compares `exp` with an injected [`Clock`]
//! - [`rules`]: the static prefix → roles table
//! - [`guard`]: the per-request decision
//! - [`client`]: the browser-side mirror of the guard
//! - [`dashboards`]: landing pages per role
//!
//! Token signatures are never verified here. Everything this crate decides
//! is a routing convenience; the APIs behind the pages must enforce access
//! on their own.

#![warn(clippy::all)]

pub mod client;
pub mod dashboards;
pub mod error;
pub mod expiry;
pub mod guard;
pub mod roles;
pub mod rules;
pub mod token;

pub use client::{ClientCheck, ClientGate, ClientVerdict};
pub use dashboards::Dashboards;
pub use error::{AccessError, DecodeError};
pub use expiry::{check_expiry, expires_at, Clock, Expiry, FixedClock, SystemClock};
pub use guard::{AccessDecision, GuardOutcome, Redirects, RouteGuard, Session};
pub use roles::{normalize_role, resolve_roles, RoleSet};
pub use rules::{RouteRule, RouteTable};
pub use token::{decode_claims, Claims, TokenSource};
