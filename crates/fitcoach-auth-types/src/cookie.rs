//! Cookie builders for the session token.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the signed session token.
pub const FITCOACH_SESSION: &str = "fitcoach_session";

/// Session lifetime in seconds (7 days). Used for both the token `exp` and cookie Max-Age.
pub const SESSION_TTL_SECS: u64 = 604800;

fn session_cookie(value: String, domain: Option<String>, max_age: Duration) -> Cookie<'static> {
    let mut builder = Cookie::build((FITCOACH_SESSION, value))
        .path("/")
        .max_age(max_age)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax);
    if let Some(domain) = domain {
        builder = builder.domain(domain);
    }
    builder.build()
}

/// Set the session cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use fitcoach_auth_types::cookie::{set_session_cookie, FITCOACH_SESSION};
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "token_value".to_string(), Some("example.com".to_string()));
/// let cookie = jar.get(FITCOACH_SESSION).unwrap();
/// assert_eq!(cookie.value(), "token_value");
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("example.com"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604800)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(jar: CookieJar, value: String, domain: Option<String>) -> CookieJar {
    jar.add(session_cookie(
        value,
        domain,
        Duration::seconds(SESSION_TTL_SECS as i64),
    ))
}

/// Expire the session cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use fitcoach_auth_types::cookie::{clear_session_cookie, set_session_cookie, FITCOACH_SESSION};
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "t".to_string(), None);
/// let jar = clear_session_cookie(jar, None);
/// let cookie = jar.get(FITCOACH_SESSION).unwrap();
/// assert_eq!(cookie.value(), "");
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookie(jar: CookieJar, domain: Option<String>) -> CookieJar {
    jar.add(session_cookie(String::new(), domain, Duration::ZERO))
}
