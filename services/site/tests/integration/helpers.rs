use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex};

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Algorithm, Argon2, Params, PasswordHasher, Version};

use url::Url;

use fitcoach_site::domain::repository::{CodeDelivery, IdentityProvider, PasscodeStore};
use fitcoach_site::domain::types::{PasscodeRecord, ProviderProfile, UserAccount};
use fitcoach_site::error::{ProviderError, SiteError};
use fitcoach_site::infra::credentials::StaticCredentialStore;
use fitcoach_site::infra::files::JsonFileStore;
use fitcoach_site::infra::google::{GoogleEndpoints, GoogleIdentityProvider};
use fitcoach_site::infra::mail::MailDelivery;
use fitcoach_site::infra::memory::{InMemoryPasscodeStore, InMemorySessionRepository};
use fitcoach_site::state::AppState;
use fitcoach_site::usecase::passcode::PasscodeService;
use fitcoach_site::usecase::role::AdminAllowList;
use fitcoach_site::usecase::session::SessionManager;

pub const TEST_SECRET: &str = "test-session-secret";
pub const ADMIN_EMAIL: &str = "admin@fitness.com";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const CLIENT_EMAIL: &str = "client@example.com";
pub const CLIENT_PASSWORD: &str = "client-password";

// ── MockPasscodeStore ────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockPasscodeStore {
    pub records: Arc<Mutex<HashMap<String, PasscodeRecord>>>,
}

impl MockPasscodeStore {
    pub fn record(&self, email: &str) -> Option<PasscodeRecord> {
        self.records.lock().unwrap().get(email).cloned()
    }
}

impl PasscodeStore for MockPasscodeStore {
    async fn put(&self, email: &str, record: PasscodeRecord) -> Result<(), SiteError> {
        self.records
            .lock()
            .unwrap()
            .insert(email.to_owned(), record);
        Ok(())
    }

    async fn get(&self, email: &str) -> Result<Option<PasscodeRecord>, SiteError> {
        Ok(self.record(email))
    }

    async fn remove(&self, email: &str) -> Result<(), SiteError> {
        self.records.lock().unwrap().remove(email);
        Ok(())
    }

    async fn take_verified(&self, email: &str) -> Result<Option<PasscodeRecord>, SiteError> {
        let mut records = self.records.lock().unwrap();
        if !records.get(email).is_some_and(|record| record.verified) {
            return Ok(None);
        }
        Ok(records.remove(email))
    }
}

// ── CapturingDelivery ────────────────────────────────────────────────────────

/// Records every delivered `(email, code)` pair instead of sending mail.
#[derive(Clone, Default)]
pub struct CapturingDelivery {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl CapturingDelivery {
    pub fn last_code(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl CodeDelivery for CapturingDelivery {
    async fn deliver(&self, email: &str, code: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_owned(), code.to_owned()));
        Ok(())
    }
}

// ── FailingDelivery ──────────────────────────────────────────────────────────

pub struct FailingDelivery;

impl CodeDelivery for FailingDelivery {
    async fn deliver(&self, _email: &str, _code: &str) -> anyhow::Result<()> {
        anyhow::bail!("smtp unreachable")
    }
}

// ── MockProvider ─────────────────────────────────────────────────────────────

/// Identity provider that knows a fixed set of access tokens.
/// `authenticate` yields once before answering.
#[derive(Clone, Default)]
pub struct MockProvider {
    pub profiles: Arc<HashMap<String, ProviderProfile>>,
    pub revoked: Arc<Mutex<Vec<String>>>,
    pub fail_revoke: bool,
}

impl MockProvider {
    pub fn with_tokens(tokens: &[(&str, &str)]) -> Self {
        let profiles = tokens
            .iter()
            .map(|(token, email)| ((*token).to_owned(), profile(email)))
            .collect();
        Self {
            profiles: Arc::new(profiles),
            ..Self::default()
        }
    }

    pub fn failing_revoke(mut self) -> Self {
        self.fail_revoke = true;
        self
    }

    pub fn revoked_tokens(&self) -> Vec<String> {
        self.revoked.lock().unwrap().clone()
    }
}

impl IdentityProvider for MockProvider {
    async fn authenticate(&self, access_token: &str) -> Result<ProviderProfile, ProviderError> {
        // A real provider call suspends on network I/O.
        tokio::task::yield_now().await;
        self.profiles
            .get(access_token)
            .cloned()
            .ok_or(ProviderError::InvalidToken)
    }

    async fn revoke(&self, access_token: &str) -> Result<(), ProviderError> {
        self.revoked.lock().unwrap().push(access_token.to_owned());
        if self.fail_revoke {
            return Err(ProviderError::Unavailable(anyhow::anyhow!("revoke endpoint down")));
        }
        Ok(())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn profile(email: &str) -> ProviderProfile {
    ProviderProfile {
        id: format!("google-{email}"),
        email: email.to_owned(),
        name: "Test User".to_owned(),
        picture: Some("https://example.com/avatar.png".to_owned()),
    }
}

/// Argon2id PHC string with minimal cost so debug test builds stay fast.
/// Verification reads the parameters back from the string.
pub fn cheap_hash(password: &str) -> String {
    let params = Params::new(Params::MIN_M_COST, 1, 1, None).unwrap();
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &SaltString::generate(&mut OsRng))
        .unwrap()
        .to_string()
}

static ADMIN_HASH: LazyLock<String> = LazyLock::new(|| cheap_hash(ADMIN_PASSWORD));
static CLIENT_HASH: LazyLock<String> = LazyLock::new(|| cheap_hash(CLIENT_PASSWORD));

pub fn admin_account() -> UserAccount {
    UserAccount {
        id: "1".to_owned(),
        email: ADMIN_EMAIL.to_owned(),
        name: "Admin User".to_owned(),
        password_hash: ADMIN_HASH.clone(),
    }
}

pub fn client_account() -> UserAccount {
    UserAccount {
        id: "2".to_owned(),
        email: CLIENT_EMAIL.to_owned(),
        name: "Client User".to_owned(),
        password_hash: CLIENT_HASH.clone(),
    }
}

pub fn credentials() -> StaticCredentialStore {
    StaticCredentialStore::new(vec![admin_account(), client_account()])
}

pub fn admins() -> Arc<AdminAllowList> {
    Arc::new(AdminAllowList::new([ADMIN_EMAIL]))
}

pub fn passcode_service<D: CodeDelivery>(
    store: &MockPasscodeStore,
    delivery: D,
) -> PasscodeService<MockPasscodeStore, D> {
    PasscodeService {
        store: store.clone(),
        delivery,
    }
}

pub fn session_manager(
    sessions: &InMemorySessionRepository,
    provider: &MockProvider,
) -> SessionManager<InMemorySessionRepository, MockProvider, StaticCredentialStore> {
    SessionManager {
        sessions: sessions.clone(),
        provider: provider.clone(),
        credentials: credentials(),
        admins: admins(),
        secret: TEST_SECRET.to_owned(),
    }
}

/// Full application state over a fresh, existing temp data dir. Passcodes are only
/// logged and the Google endpoints point at a closed local port.
pub fn test_state() -> AppState {
    let data_dir = std::env::temp_dir().join(format!("fitcoach-site-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&data_dir).unwrap();
    let unreachable = Url::parse("http://127.0.0.1:9/").unwrap();
    AppState {
        passcodes: InMemoryPasscodeStore::new(),
        sessions: InMemorySessionRepository::new(),
        mail: MailDelivery::log_only(),
        provider: GoogleIdentityProvider::new(
            reqwest::Client::new(),
            GoogleEndpoints {
                tokeninfo: unreachable.clone(),
                userinfo: unreachable.clone(),
                revoke: unreachable,
            },
        ),
        credentials: credentials(),
        admins: admins(),
        submissions: JsonFileStore::new(data_dir.join("submissions.json")),
        transformations: JsonFileStore::new(data_dir.join("transformations.json")),
        session_secret: TEST_SECRET.to_owned(),
        cookie_domain: None,
        data_dir,
    }
}
