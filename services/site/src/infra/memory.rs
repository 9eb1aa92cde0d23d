use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::domain::repository::{PasscodeStore, SessionRepository};
use crate::domain::types::{PasscodeRecord, Session};
use crate::error::SiteError;

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>, SiteError> {
    mutex
        .lock()
        .map_err(|_| SiteError::Internal(anyhow::anyhow!("{what} lock poisoned")))
}

/// Process-local passcode store. Contents are lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryPasscodeStore {
    records: Arc<Mutex<HashMap<String, PasscodeRecord>>>,
}

impl InMemoryPasscodeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasscodeStore for InMemoryPasscodeStore {
    async fn put(&self, email: &str, record: PasscodeRecord) -> Result<(), SiteError> {
        lock(&self.records, "passcode store")?.insert(email.to_owned(), record);
        Ok(())
    }

    async fn get(&self, email: &str) -> Result<Option<PasscodeRecord>, SiteError> {
        Ok(lock(&self.records, "passcode store")?.get(email).cloned())
    }

    async fn remove(&self, email: &str) -> Result<(), SiteError> {
        lock(&self.records, "passcode store")?.remove(email);
        Ok(())
    }

    async fn take_verified(&self, email: &str) -> Result<Option<PasscodeRecord>, SiteError> {
        let mut records = lock(&self.records, "passcode store")?;
        if !records.get(email).is_some_and(|record| record.verified) {
            return Ok(None);
        }
        Ok(records.remove(email))
    }
}

/// Process-local session records. Contents are lost on restart.
#[derive(Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: &Session) -> Result<(), SiteError> {
        lock(&self.sessions, "session store")?.insert(session.id, session.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Session>, SiteError> {
        Ok(lock(&self.sessions, "session store")?.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Session>, SiteError> {
        Ok(lock(&self.sessions, "session store")?.remove(&id))
    }
}
