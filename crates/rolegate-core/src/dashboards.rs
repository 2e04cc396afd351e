//! Role → landing page mapping used after sign-in.

use crate::{
    guard::Redirects,
    roles::{normalize_role, RoleSet},
};
use std::collections::HashMap;

/// Landing page for roles with no dashboard of their own.
pub const FALLBACK_LANDING: &str = "/";

/// Landing pages keyed by normalized role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboards {
    routes: HashMap<String, String>,
}

impl Default for Dashboards {
    fn default() -> Self {
        [
            ("ADMIN", "/Admin"),
            ("TECHNICIAN", "/Technician"),
            ("JOBSEEKER", "/Job_Seeker"),
            ("JOB_SEEKER", "/Job_Seeker"),
            ("ENTERPRISE", "/Enterprise"),
        ]
        .into_iter()
        .collect()
    }
}

impl<R: AsRef<str>, P: Into<String>> FromIterator<(R, P)> for Dashboards {
    fn from_iter<I: IntoIterator<Item = (R, P)>>(iter: I) -> Self {
        Self {
            routes: iter
                .into_iter()
                .map(|(role, path)| (normalize_role(role.as_ref()), path.into()))
                .collect(),
        }
    }
}

impl Dashboards {
    /// Page for a single role, if it has one.
    pub fn get(&self, role: &str) -> Option<&str> {
        self.routes.get(&normalize_role(role)).map(String::as_str)
    }

    /// Where to send a freshly signed-in subject. The first role decides;
    /// no roles at all lands on the unauthorized page.
    pub fn landing_for<'a>(&'a self, roles: &RoleSet, redirects: &'a Redirects) -> &'a str {
        match roles.primary() {
            None => &redirects.unauthorized,
            Some(role) => self.get(role).unwrap_or(FALLBACK_LANDING),
        }
    }
}
