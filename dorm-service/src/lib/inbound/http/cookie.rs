use auth::IssuedSession;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;
use axum_extra::extract::CookieJar;
use time::OffsetDateTime;

use crate::config::CookieConfig;
use crate::config::SameSitePolicy;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

/// How the session token travels: HttpOnly, root path, optional domain,
/// Secure when configured, Max-Age equal to the token lifetime.
#[derive(Debug, Clone)]
pub struct CookiePolicy {
    domain: Option<String>,
    secure: bool,
    same_site: SameSite,
}

impl CookiePolicy {
    pub fn new(domain: Option<String>, secure: bool, same_site: SameSite) -> Self {
        Self {
            domain,
            secure,
            same_site,
        }
    }

    /// Cookie carrying a freshly issued session.
    pub fn session_cookie(&self, session: &IssuedSession) -> Cookie<'static> {
        let mut cookie = self.base(session.token.clone());
        cookie.set_max_age(time::Duration::seconds(session.max_age().num_seconds()));
        cookie
    }

    /// Expired, empty cookie with the same scope, so the browser drops its copy.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.base(String::new());
        cookie.set_max_age(time::Duration::ZERO);
        cookie.set_expires(OffsetDateTime::UNIX_EPOCH);
        cookie
    }

    fn base(&self, value: String) -> Cookie<'static> {
        let mut cookie = Cookie::build((SESSION_COOKIE, value))
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .path("/")
            .build();

        if let Some(domain) = &self.domain {
            cookie.set_domain(domain.clone());
        }

        cookie
    }
}

impl From<&CookieConfig> for CookiePolicy {
    fn from(config: &CookieConfig) -> Self {
        let same_site = match config.same_site {
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::Strict => SameSite::Strict,
        };

        Self::new(config.domain.clone(), config.secure, same_site)
    }
}

/// Session token replayed by the client, if any. Empty values count as absent.
pub fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
}
