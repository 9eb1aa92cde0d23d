use chrono::{DateTime, Utc};
use uuid::Uuid;

use fitcoach_domain::identity::SessionIdentity;

/// Pending one-time passcode for an email address. At most one per email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasscodeRecord {
    pub email: String,
    /// Six decimal digits, leading zeros kept.
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub verified: bool,
}

impl PasscodeRecord {
    /// A record is still usable at the exact instant of `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Local account allowed to sign in with a password.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub email: String,
    pub name: String,
    /// Argon2id PHC string, see `infra::credentials`.
    pub password_hash: String,
}

/// Profile returned by the external identity provider for an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

/// Server-side session record referenced by the session cookie.
///
/// The provider access token lives here rather than in a second cookie, so
/// identity and token are always created and removed together.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub identity: SessionIdentity,
    pub provider_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Passcode length in decimal digits.
pub const PASSCODE_LEN: usize = 6;

/// Passcode time-to-live in seconds (10 minutes).
pub const PASSCODE_TTL_SECS: i64 = 600;
