//! Route guards backed by the session manager.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use fitcoach_auth_types::cookie::FITCOACH_SESSION;
use fitcoach_domain::identity::SessionIdentity;

use crate::error::SiteError;
use crate::state::AppState;

/// Session cookie value from the request headers, if present and non-empty.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(FITCOACH_SESSION)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}

/// Any signed-in identity. 401 when signed out.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionIdentity);

/// A signed-in admin. 401 when signed out, 403 for a client.
#[derive(Debug, Clone)]
pub struct AdminUser(pub SessionIdentity);

async fn resolve(state: AppState, token: Option<String>) -> Result<SessionIdentity, SiteError> {
    state
        .session_manager()
        .current_user(token.as_deref())
        .await
        .ok_or(SiteError::Unauthorized)
}

// Values are pulled out of `parts` synchronously and moved into a 'static
// future, matching the `impl Future + Send` signature axum-core declares.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = SiteError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = session_token(&parts.headers);
        let state = state.clone();
        async move { resolve(state, token).await.map(Self) }
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = SiteError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = session_token(&parts.headers);
        let state = state.clone();
        async move {
            let identity = resolve(state, token).await?;
            if !identity.role.is_admin() {
                return Err(SiteError::Forbidden);
            }
            Ok(Self(identity))
        }
    }
}
