use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use tracing::{debug, info, warn};

use crate::domain::repository::{CodeDelivery, PasscodeStore};
use crate::domain::types::{PASSCODE_LEN, PASSCODE_TTL_SECS, PasscodeRecord};
use crate::error::SiteError;

/// Exclusive upper bound of the passcode space (`10^PASSCODE_LEN`).
const CODE_SPACE: u32 = 10u32.pow(PASSCODE_LEN as u32);

/// Uniformly random code in `000000..=999999`, zero-padded.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    format!("{:0width$}", rng.random_range(0..CODE_SPACE), width = PASSCODE_LEN)
}

/// Result of [`PasscodeService::issue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueOutcome {
    Sent {
        email: String,
        expires_at: DateTime<Utc>,
    },
    DeliveryFailed,
}

impl IssueOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }

    pub fn message(&self) -> String {
        match self {
            Self::Sent { email, .. } => format!("Passcode sent to {email}."),
            Self::DeliveryFailed => "Failed to send passcode. Please try again.".to_owned(),
        }
    }
}

/// Result of [`PasscodeService::verify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Verified,
    NotFound,
    Expired,
    Mismatch,
}

impl VerifyOutcome {
    pub fn is_success(self) -> bool {
        self == Self::Verified
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Verified => "Passcode verified successfully!",
            Self::NotFound => "No passcode found for this email. Please request a new one.",
            Self::Expired => "Passcode has expired. Please request a new one.",
            Self::Mismatch => "Invalid passcode. Please check and try again.",
        }
    }
}

/// Issues, checks and retires email passcodes. The only writer of the passcode store.
pub struct PasscodeService<S, D>
where
    S: PasscodeStore,
    D: CodeDelivery,
{
    pub store: S,
    pub delivery: D,
}

impl<S, D> PasscodeService<S, D>
where
    S: PasscodeStore,
    D: CodeDelivery,
{
    /// Store a fresh code for `email` (replacing any previous one) and deliver it.
    ///
    /// The email is not validated here; any string is accepted as a key.
    pub async fn issue(&self, email: &str) -> Result<IssueOutcome, SiteError> {
        let record = PasscodeRecord {
            email: email.to_owned(),
            code: generate_code(),
            expires_at: Utc::now() + Duration::seconds(PASSCODE_TTL_SECS),
            verified: false,
        };
        let code = record.code.clone();
        let expires_at = record.expires_at;
        self.store.put(email, record).await?;

        if let Err(e) = self.delivery.deliver(email, &code).await {
            warn!(email, error = %e, "passcode delivery failed");
            return Ok(IssueOutcome::DeliveryFailed);
        }

        info!(email, %expires_at, "passcode issued");
        Ok(IssueOutcome::Sent {
            email: email.to_owned(),
            expires_at,
        })
    }

    /// Check `code` against the stored record. Exact string comparison.
    ///
    /// An expired record is removed as a side effect. A verified, unexpired
    /// record verifies again with the same code.
    pub async fn verify(&self, email: &str, code: &str) -> Result<VerifyOutcome, SiteError> {
        let Some(mut record) = self.store.get(email).await? else {
            debug!(email, "passcode verify: no record");
            return Ok(VerifyOutcome::NotFound);
        };

        if record.is_expired_at(Utc::now()) {
            self.store.remove(email).await?;
            debug!(email, "passcode verify: expired");
            return Ok(VerifyOutcome::Expired);
        }

        if record.code != code {
            debug!(email, "passcode verify: mismatch");
            return Ok(VerifyOutcome::Mismatch);
        }

        record.verified = true;
        self.store.put(email, record).await?;
        info!(email, "passcode verified");
        Ok(VerifyOutcome::Verified)
    }

    /// `true` only if a record exists for `email` and it has been verified.
    pub async fn is_verified(&self, email: &str) -> Result<bool, SiteError> {
        Ok(self
            .store
            .get(email)
            .await?
            .is_some_and(|record| record.verified))
    }

    /// Drop the record once its verified state has been consumed.
    pub async fn clear(&self, email: &str) -> Result<(), SiteError> {
        self.store.remove(email).await
    }

    /// Atomically retire a verified record so it can back exactly one sign-in.
    /// `None` if the email has no verified record.
    pub async fn consume_verified(
        &self,
        email: &str,
    ) -> Result<Option<PasscodeRecord>, SiteError> {
        self.store.take_verified(email).await
    }

    /// Put back a record taken by `consume_verified` after the sign-in it was
    /// meant for failed. A passcode issued in the meantime is kept instead.
    pub async fn restore(&self, record: PasscodeRecord) -> Result<(), SiteError> {
        if self.store.get(&record.email).await?.is_some() {
            return Ok(());
        }
        let email = record.email.clone();
        self.store.put(&email, record).await
    }
}
