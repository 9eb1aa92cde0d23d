#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use fitcoach_domain::intake::{ClientSubmission, SubmissionStatus, Transformation};

use crate::domain::types::{PasscodeRecord, ProviderProfile, Session, UserAccount};
use crate::error::{ProviderError, SiteError};

/// Keyed storage of at most one passcode record per email.
pub trait PasscodeStore: Send + Sync {
    /// Unconditional upsert; replaces any record for `email`.
    async fn put(&self, email: &str, record: PasscodeRecord) -> Result<(), SiteError>;

    async fn get(&self, email: &str) -> Result<Option<PasscodeRecord>, SiteError>;

    /// Idempotent; removing an absent key is a no-op.
    async fn remove(&self, email: &str) -> Result<(), SiteError>;

    /// Remove and return the record only if it is verified, as one step.
    /// An unverified record is left in place.
    async fn take_verified(&self, email: &str) -> Result<Option<PasscodeRecord>, SiteError>;
}

/// Out-of-band channel that delivers a passcode to an email address.
pub trait CodeDelivery: Send + Sync {
    async fn deliver(&self, email: &str, code: &str) -> anyhow::Result<()>;
}

/// Local accounts for password sign-in.
pub trait CredentialStore: Send + Sync {
    /// Returns the account only if `email` exists and `password` matches its stored hash.
    async fn verify(&self, email: &str, password: &str)
    -> Result<Option<UserAccount>, SiteError>;
}

/// External identity provider (OAuth access-token based).
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, access_token: &str) -> Result<ProviderProfile, ProviderError>;

    async fn revoke(&self, access_token: &str) -> Result<(), ProviderError>;
}

/// Server-side session records.
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), SiteError>;

    async fn find(&self, id: Uuid) -> Result<Option<Session>, SiteError>;

    /// Remove and return the record, if present.
    async fn delete(&self, id: Uuid) -> Result<Option<Session>, SiteError>;
}

/// Intake submissions reviewed on the admin dashboard.
pub trait SubmissionRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<ClientSubmission>, SiteError>;

    async fn append(&self, submission: &ClientSubmission) -> Result<(), SiteError>;

    /// Returns the updated submission, or `None` if `id` is unknown.
    async fn update_status(
        &self,
        id: &str,
        status: SubmissionStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<ClientSubmission>, SiteError>;
}

/// Published transformation stories.
pub trait TransformationRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Transformation>, SiteError>;

    async fn append(&self, transformation: &Transformation) -> Result<(), SiteError>;
}
