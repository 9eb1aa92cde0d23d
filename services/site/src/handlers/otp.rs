use std::sync::LazyLock;

use axum::{Json, extract::State};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SiteError;
use crate::handlers::body::JsonBody;
use crate::state::AppState;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// Boundary format check; the passcode service itself accepts any string.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Non-empty field or `MissingField`.
pub fn required(value: Option<String>, field: &'static str) -> Result<String, SiteError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(SiteError::MissingField(field))
}

#[derive(Serialize)]
pub struct PasscodeResponse {
    pub success: bool,
    pub message: String,
}

// ── POST /otp/send ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendPasscodeRequest {
    #[serde(default)]
    pub email: Option<String>,
}

pub async fn send_passcode(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SendPasscodeRequest>,
) -> Result<Json<PasscodeResponse>, SiteError> {
    let email = required(body.email, "email")?;
    if !is_valid_email(&email) {
        return Err(SiteError::InvalidEmail);
    }

    let outcome = state.passcode_service().issue(&email).await?;
    Ok(Json(PasscodeResponse {
        success: outcome.is_success(),
        message: outcome.message(),
    }))
}

// ── POST /otp/verify ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyPasscodeRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub otp: Option<String>,
}

pub async fn verify_passcode(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<VerifyPasscodeRequest>,
) -> Result<Json<PasscodeResponse>, SiteError> {
    let email = required(body.email, "email")?;
    let otp = required(body.otp, "otp")?;

    let outcome = state.passcode_service().verify(&email, &otp).await?;
    Ok(Json(PasscodeResponse {
        success: outcome.is_success(),
        message: outcome.message().to_owned(),
    }))
}
