//! Role extraction and normalization.

use crate::token::Claims;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

const ROLE_PREFIX: &str = "ROLE_";

/// Normalize a role name: trim surrounding whitespace, uppercase, then drop
/// any leading `ROLE_`.
pub fn normalize_role(role: &str) -> String {
    let upper = role.trim().to_uppercase();
    let mut name = upper.as_str();
    while let Some(stripped) = name.strip_prefix(ROLE_PREFIX) {
        name = stripped;
    }
    name.to_string()
}

/// Normalized role names, deduplicated, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RoleSet(Vec<String>);

impl RoleSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw role name. Returns `false` when it normalizes to nothing
    /// or is already present.
    pub fn insert(&mut self, raw: &str) -> bool {
        let role = normalize_role(raw);
        if role.is_empty() || self.0.contains(&role) {
            return false;
        }
        self.0.push(role);
        true
    }

    /// Whether the normalized form of `role` is present.
    pub fn contains(&self, role: &str) -> bool {
        let role = normalize_role(role);
        self.0.iter().any(|r| *r == role)
    }

    /// Whether the two sets share at least one role.
    pub fn intersects(&self, other: &RoleSet) -> bool {
        self.0.iter().any(|r| other.0.contains(r))
    }

    /// First role seen, used for landing-page selection.
    pub fn primary(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<S: AsRef<str>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = RoleSet::new();
        for role in iter {
            set.insert(role.as_ref());
        }
        set
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

/// Resolve the subject's roles from its claims.
///
/// A non-empty `roles` array wins; otherwise a `role` string (or array) is
/// used. Non-string entries are skipped.
pub fn resolve_roles(claims: &Claims) -> RoleSet {
    let from_roles = claims
        .get("roles")
        .and_then(Value::as_array)
        .filter(|roles| !roles.is_empty());

    match (from_roles, claims.get("role")) {
        (Some(roles), _) => strings(roles),
        (None, Some(Value::String(role))) => std::iter::once(role.as_str()).collect(),
        (None, Some(Value::Array(roles))) => strings(roles),
        _ => RoleSet::new(),
    }
}

fn strings(values: &[Value]) -> RoleSet {
    values.iter().filter_map(Value::as_str).collect()
}
