//! Signed session-token codec.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fitcoach_domain::role::Role;

use crate::cookie::SESSION_TTL_SECS;

/// Session reference extracted from a validated token.
///
/// A valid signature only proves the token was issued by this service. The
/// caller must still look the session up server-side: sign-out revokes by
/// deleting the record, not the token.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub session_id: Uuid,
    pub email: String,
    pub role: Role,
    pub exp: u64,
}

/// Errors returned by the token codec.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// JWT claims payload of the session cookie.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sid` | custom | server-side session id (UUID string) |
/// | `sub` | `sub` | email the session was opened for |
/// | `role` | custom | role resolved at sign-in |
/// | `exp` | `exp` | seconds since epoch |
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sid: String,
    pub sub: String,
    pub role: Role,
    pub exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Sign a session token for `session_id`. Returns the token and its `exp`.
pub fn issue_session_token(
    session_id: Uuid,
    email: &str,
    role: Role,
    secret: &str,
) -> Result<(String, u64), TokenError> {
    let exp = now_secs() + SESSION_TTL_SECS;
    let claims = SessionClaims {
        sid: session_id.to_string(),
        sub: email.to_owned(),
        role,
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Signing)?;
    Ok((token, exp))
}

/// Validate a session cookie value.
///
/// Validation: HS256, exp checked with the default 60s leeway, required claims `exp` + `sub`.
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionInfo, TokenError> {
    decode_session(token, secret, true)
}

/// Validate the signature only, accepting expired tokens.
///
/// Used on sign-out so an expired cookie still lets the server drop its record.
pub fn validate_session_token_for_revocation(
    token: &str,
    secret: &str,
) -> Result<SessionInfo, TokenError> {
    decode_session(token, secret, false)
}

fn decode_session(token: &str, secret: &str, check_exp: bool) -> Result<SessionInfo, TokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = check_exp;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    let claims = data.claims;
    let session_id = claims
        .sid
        .parse::<Uuid>()
        .map_err(|_| TokenError::Malformed)?;
    Ok(SessionInfo {
        session_id,
        email: claims.sub,
        role: claims.role,
        exp: claims.exp,
    })
}
