use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use fitcoach_auth_types::cookie::{FITCOACH_SESSION, clear_session_cookie, set_session_cookie};
use fitcoach_domain::identity::SessionIdentity;
use fitcoach_domain::role::Role;

use crate::error::SiteError;
use crate::handlers::body::JsonBody;
use crate::handlers::guard::CurrentUser;
use crate::handlers::otp::{is_valid_email, required};
use crate::state::AppState;
use crate::usecase::session::{PasscodeSignIn, SignedIn};

#[derive(Serialize)]
pub struct SessionResponse {
    pub user: SessionIdentity,
    /// Session token expiry, seconds since epoch.
    pub expires_at: u64,
}

fn presented_token(jar: &CookieJar) -> Option<String> {
    jar.get(FITCOACH_SESSION)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}

fn signed_in_response(state: &AppState, jar: CookieJar, signed_in: SignedIn) -> Response {
    let jar = set_session_cookie(jar, signed_in.token, state.cookie_domain.clone());
    let body = SessionResponse {
        user: signed_in.identity,
        expires_at: signed_in.token_exp,
    };
    (StatusCode::CREATED, jar, Json(body)).into_response()
}

// ── POST /auth/login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Response, SiteError> {
    let email = required(body.email, "email")?;
    let password = required(body.password, "password")?;
    let previous = presented_token(&jar);

    let signed_in = state
        .session_manager()
        .sign_in_with_password(&email, &password, previous.as_deref())
        .await?
        .ok_or(SiteError::InvalidCredentials)?;
    Ok(signed_in_response(&state, jar, signed_in))
}

// ── POST /auth/provider ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ProviderSignInRequest {
    #[serde(default)]
    pub access_token: Option<String>,
}

pub async fn provider_sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(body): JsonBody<ProviderSignInRequest>,
) -> Result<Response, SiteError> {
    let access_token = required(body.access_token, "access_token")?;
    let previous = presented_token(&jar);

    let signed_in = state
        .session_manager()
        .sign_in_with_provider(&access_token, previous.as_deref())
        .await?;
    Ok(signed_in_response(&state, jar, signed_in))
}

// ── POST /auth/passcode ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PasscodeSignInRequest {
    #[serde(default)]
    pub email: Option<String>,
    /// Only needed once the email has been verified.
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Serialize)]
pub struct RequiresPasscodeResponse {
    pub requires_passcode: bool,
    pub message: String,
}

pub async fn passcode_sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(body): JsonBody<PasscodeSignInRequest>,
) -> Result<Response, SiteError> {
    let email = required(body.email, "email")?;
    if !is_valid_email(&email) {
        return Err(SiteError::InvalidEmail);
    }
    let access_token = body.access_token.filter(|t| !t.is_empty());
    let previous = presented_token(&jar);

    let passcodes = state.passcode_service();
    let outcome = state
        .session_manager()
        .sign_in_with_passcode(
            &passcodes,
            &email,
            access_token.as_deref(),
            previous.as_deref(),
        )
        .await?;

    match outcome {
        PasscodeSignIn::RequiresPasscode => {
            let body = RequiresPasscodeResponse {
                requires_passcode: true,
                message: format!("Verification required. A passcode was sent to {email}."),
            };
            Ok((StatusCode::ACCEPTED, Json(body)).into_response())
        }
        PasscodeSignIn::SignedIn(signed_in) => Ok(signed_in_response(&state, jar, signed_in)),
    }
}

// ── GET /auth/session ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SessionQuery {
    pub role: Option<Role>,
}

/// Page guard: the current identity, optionally requiring an exact role.
pub async fn get_session(
    CurrentUser(identity): CurrentUser,
    Query(query): Query<SessionQuery>,
) -> Result<Json<SessionIdentity>, SiteError> {
    if let Some(required_role) = query.role {
        if identity.role != required_role {
            return Err(SiteError::Forbidden);
        }
    }
    Ok(Json(identity))
}

// ── DELETE /auth/session ──────────────────────────────────────────────────────

pub async fn sign_out(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, SiteError> {
    let token = presented_token(&jar);
    state.session_manager().sign_out(token.as_deref()).await?;
    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    Ok((StatusCode::NO_CONTENT, jar))
}
