use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use fitcoach_auth_types::cookie::SESSION_TTL_SECS;
use fitcoach_auth_types::token::{
    issue_session_token, validate_session_token, validate_session_token_for_revocation,
};
use fitcoach_domain::identity::SessionIdentity;

use crate::domain::repository::{
    CodeDelivery, CredentialStore, IdentityProvider, PasscodeStore, SessionRepository,
};
use crate::domain::types::{ProviderProfile, Session};
use crate::error::SiteError;
use crate::usecase::passcode::{IssueOutcome, PasscodeService};
use crate::usecase::role::AdminAllowList;

/// A freshly opened session: the identity plus the signed cookie value for it.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub identity: SessionIdentity,
    pub token: String,
    pub token_exp: u64,
}

/// Result of the passcode-gated provider sign-in.
#[derive(Debug, Clone)]
pub enum PasscodeSignIn {
    /// The email is not verified yet; a passcode was sent and the caller must
    /// verify it and call again.
    RequiresPasscode,
    SignedIn(SignedIn),
}

/// Sole authority on who the current user of a client context is.
///
/// `previous` arguments carry the session cookie the client presented, if any;
/// a successful sign-in closes that session so one identity is active per client.
pub struct SessionManager<R, P, C>
where
    R: SessionRepository,
    P: IdentityProvider,
    C: CredentialStore,
{
    pub sessions: R,
    pub provider: P,
    pub credentials: C,
    pub admins: Arc<AdminAllowList>,
    pub secret: String,
}

impl<R, P, C> SessionManager<R, P, C>
where
    R: SessionRepository,
    P: IdentityProvider,
    C: CredentialStore,
{
    /// Local account sign-in. `None` for an unknown email or a wrong password.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
        previous: Option<&str>,
    ) -> Result<Option<SignedIn>, SiteError> {
        let Some(account) = self.credentials.verify(email, password).await? else {
            debug!(email, "password sign-in rejected");
            return Ok(None);
        };
        let profile = ProviderProfile {
            id: account.id,
            email: account.email,
            name: account.name,
            picture: None,
        };
        self.open(profile, None, previous).await.map(Some)
    }

    /// Provider sign-in without a passcode gate.
    pub async fn sign_in_with_provider(
        &self,
        access_token: &str,
        previous: Option<&str>,
    ) -> Result<SignedIn, SiteError> {
        let profile = self.provider.authenticate(access_token).await?;
        self.open(profile, Some(access_token.to_owned()), previous)
            .await
    }

    /// Provider sign-in gated on a verified passcode for `email`.
    ///
    /// Unverified: issues a passcode and stays signed out. Verified: the
    /// verification is consumed before the provider is called, so concurrent
    /// requests cannot both ride it. The provider must report the same email;
    /// on any failure after the consume the record is put back for a retry.
    pub async fn sign_in_with_passcode<S, D>(
        &self,
        passcodes: &PasscodeService<S, D>,
        email: &str,
        access_token: Option<&str>,
        previous: Option<&str>,
    ) -> Result<PasscodeSignIn, SiteError>
    where
        S: PasscodeStore,
        D: CodeDelivery,
    {
        let Some(record) = passcodes.consume_verified(email).await? else {
            return match passcodes.issue(email).await? {
                IssueOutcome::Sent { .. } => Ok(PasscodeSignIn::RequiresPasscode),
                IssueOutcome::DeliveryFailed => Err(SiteError::DeliveryFailed),
            };
        };

        let signed_in = self
            .open_for_verified(email, access_token, previous)
            .await;
        if signed_in.is_err() {
            if let Err(e) = passcodes.restore(record).await {
                warn!(email, error = %e, "failed to restore passcode record");
            }
        }
        signed_in.map(PasscodeSignIn::SignedIn)
    }

    async fn open_for_verified(
        &self,
        email: &str,
        access_token: Option<&str>,
        previous: Option<&str>,
    ) -> Result<SignedIn, SiteError> {
        let access_token = access_token.ok_or(SiteError::MissingField("access_token"))?;
        let profile = self.provider.authenticate(access_token).await?;
        if profile.email != email {
            warn!(email, provider_email = %profile.email, "provider email mismatch");
            return Err(SiteError::EmailMismatch);
        }
        self.open(profile, Some(access_token.to_owned()), previous)
            .await
    }

    /// Close the session referenced by `token` and revoke its provider token.
    ///
    /// Idempotent. The record is gone before revocation is attempted; a failed
    /// revocation is logged and does not restore it.
    pub async fn sign_out(&self, token: Option<&str>) -> Result<(), SiteError> {
        let Some(token) = token else {
            return Ok(());
        };
        let Ok(info) = validate_session_token_for_revocation(token, &self.secret) else {
            return Ok(());
        };
        if let Some(session) = self.sessions.delete(info.session_id).await? {
            info!(email = %session.identity.email, session_id = %session.id, "session closed");
            self.revoke(session.provider_token.as_deref()).await;
        }
        Ok(())
    }

    /// The identity of the session referenced by `token`, if it is live.
    ///
    /// Never fails: a bad token, a missing or expired record, or an unreadable
    /// store all read as signed out.
    pub async fn current_user(&self, token: Option<&str>) -> Option<SessionIdentity> {
        let info = validate_session_token(token?, &self.secret).ok()?;
        let session = match self.sessions.find(info.session_id).await {
            Ok(session) => session?,
            Err(e) => {
                warn!(error = %e, "session lookup failed");
                return None;
            }
        };
        if session.expires_at <= Utc::now() {
            if let Err(e) = self.sessions.delete(session.id).await {
                warn!(error = %e, "failed to drop expired session");
            }
            return None;
        }
        if session.identity.email != info.email {
            warn!(session_id = %session.id, "session token does not match record");
            return None;
        }
        Some(session.identity)
    }

    async fn open(
        &self,
        profile: ProviderProfile,
        provider_token: Option<String>,
        previous: Option<&str>,
    ) -> Result<SignedIn, SiteError> {
        let role = self.admins.resolve_role(&profile.email);
        let identity = SessionIdentity {
            id: profile.id,
            email: profile.email,
            name: profile.name,
            picture: profile.picture,
            role,
        };

        let session_id = Uuid::now_v7();
        let (token, token_exp) =
            issue_session_token(session_id, &identity.email, role, &self.secret)
                .map_err(|e| SiteError::Internal(e.into()))?;

        let now = Utc::now();
        let session = Session {
            id: session_id,
            identity: identity.clone(),
            provider_token,
            created_at: now,
            expires_at: now + Duration::seconds(SESSION_TTL_SECS as i64),
        };
        self.sessions.create(&session).await?;
        info!(email = %identity.email, %role, %session_id, "session opened");

        self.close_previous(previous, session.provider_token.as_deref())
            .await;

        Ok(SignedIn {
            identity,
            token,
            token_exp,
        })
    }

    async fn close_previous(&self, previous: Option<&str>, keep_token: Option<&str>) {
        let Some(info) =
            previous.and_then(|t| validate_session_token_for_revocation(t, &self.secret).ok())
        else {
            return;
        };
        match self.sessions.delete(info.session_id).await {
            Ok(Some(old)) => {
                debug!(session_id = %old.id, "replaced previous session");
                if old.provider_token.as_deref() != keep_token {
                    self.revoke(old.provider_token.as_deref()).await;
                }
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to close previous session"),
        }
    }

    async fn revoke(&self, provider_token: Option<&str>) {
        if let Some(token) = provider_token {
            if let Err(e) = self.provider.revoke(token).await {
                warn!(error = %e, "provider token revocation failed");
            }
        }
    }
}
