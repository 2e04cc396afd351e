//! Session cookie handling.

use crate::config::SessionConfig;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rolegate_core::RoleSet;

/// Issues, reads and clears the token cookie and its companions.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    name: String,
    companions: Vec<String>,
    max_age: time::Duration,
    same_site: SameSite,
    secure: bool,
}

/// Companion cookie holding the signed-in email.
pub const EMAIL_COOKIE: &str = "email";

/// Companion cookie holding the primary role, read by page chrome.
pub const ROLE_COOKIE: &str = "user_role";

/// `user_role` value when the token carries no role.
pub const UNKNOWN_ROLE: &str = "UNKNOWN";

fn parse_same_site(value: &str) -> SameSite {
    match value.to_lowercase().as_str() {
        "strict" => SameSite::Strict,
        "none" => SameSite::None,
        _ => SameSite::Lax,
    }
}

impl SessionCookies {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            companions: config.companion_cookies.clone(),
            max_age: time::Duration::seconds(config.max_age_secs),
            same_site: parse_same_site(&config.same_site),
            secure: config.secure,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The token cookie's value; empty counts as absent.
    pub fn token_from(&self, jar: &CookieJar) -> Option<String> {
        jar.get(&self.name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }

    fn cookie(&self, name: &str, value: &str) -> Cookie<'static> {
        Cookie::build((name.to_string(), value.to_string()))
            .path("/")
            .max_age(self.max_age)
            .same_site(self.same_site)
            .secure(self.secure)
            .build()
    }

    /// Store a freshly issued token, the email it belongs to and its
    /// primary role.
    pub fn issue(&self, jar: CookieJar, token: &str, email: &str, roles: &RoleSet) -> CookieJar {
        let role = roles.primary().unwrap_or(UNKNOWN_ROLE);
        let jar = jar
            .add(self.cookie(&self.name, token))
            .add(self.cookie(ROLE_COOKIE, role));
        if email.is_empty() {
            jar
        } else {
            jar.add(self.cookie(EMAIL_COOKIE, email))
        }
    }

    /// Emit removals for the token cookie and every companion.
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        std::iter::once(&self.name)
            .chain(&self.companions)
            .fold(jar, |jar, name| {
                let mut cookie = Cookie::new(name.clone(), "");
                cookie.set_path("/");
                cookie.make_removal();
                jar.add(cookie)
            })
    }
}
