//! Local password accounts loaded from a JSON file at startup.
//!
//! `password_hash` holds an Argon2id PHC string (`$argon2id$v=19$...`).

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use tracing::{info, warn};

use crate::domain::repository::CredentialStore;
use crate::domain::types::UserAccount;
use crate::error::SiteError;

/// Hash `password` with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| anyhow::anyhow!("failed to hash password"))?
        .to_string();
    Ok(hash)
}

/// `false` for a wrong password and for a stored value that is not a PHC string.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Read-only account table keyed by exact email.
#[derive(Clone, Default)]
pub struct StaticCredentialStore {
    accounts: Arc<HashMap<String, UserAccount>>,
}

impl StaticCredentialStore {
    pub fn new(accounts: Vec<UserAccount>) -> Self {
        let accounts = accounts
            .into_iter()
            .map(|account| (account.email.clone(), account))
            .collect();
        Self {
            accounts: Arc::new(accounts),
        }
    }

    /// Load `[{id, email, name, password_hash}]` from `path`. A missing file is an empty table.
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = match tokio::fs::read(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "no users file, password sign-in disabled");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("read users file {}", path.display()));
            }
        };
        let accounts: Vec<UserAccount> = serde_json::from_slice(&raw)
            .with_context(|| format!("parse users file {}", path.display()))?;
        info!(count = accounts.len(), "loaded local accounts");
        Ok(Self::new(accounts))
    }
}

impl CredentialStore for StaticCredentialStore {
    async fn verify(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<UserAccount>, SiteError> {
        let Some(account) = self.accounts.get(email).cloned() else {
            return Ok(None);
        };
        let password = password.to_owned();
        let stored = account.password_hash.clone();
        // Argon2 is deliberately slow; keep it off the async workers.
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
            .await
            .context("password verification task")?;
        Ok(matches.then_some(account))
    }
}
