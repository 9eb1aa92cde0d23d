use std::path::PathBuf;

use anyhow::Context as _;
use url::Url;

use crate::infra::google::{DEFAULT_REVOKE_URL, DEFAULT_TOKENINFO_URL, DEFAULT_USERINFO_URL};

/// Site service configuration loaded from environment variables.
#[derive(Debug)]
pub struct SiteConfig {
    /// HMAC secret for signing session tokens. Env var: `SESSION_SECRET`.
    pub session_secret: String,
    /// TCP port to listen on (default 3000). Env var: `SITE_PORT`.
    pub site_port: u16,
    /// Comma-separated admin allow-list. Env var: `ADMIN_EMAILS`.
    pub admin_emails: String,
    /// Directory holding the JSON data files (default `data`). Env var: `DATA_DIR`.
    pub data_dir: PathBuf,
    /// Local account table (default `<DATA_DIR>/users.json`). Env var: `USERS_FILE`.
    pub users_file: PathBuf,
    /// Cookie domain attribute; host-only cookie when unset. Env var: `COOKIE_DOMAIN`.
    pub cookie_domain: Option<String>,
    /// Mail webhook for passcode delivery; codes are logged when unset. Env var: `MAIL_WEBHOOK_URL`.
    pub mail_webhook_url: Option<Url>,
    pub google_tokeninfo_url: Url,
    pub google_userinfo_url: Url,
    pub google_revoke_url: Url,
}

pub const DEFAULT_ADMIN_EMAILS: &str = "admin@fitness.com";

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn url_or(key: &str, default: &str) -> anyhow::Result<Url> {
    let raw = optional(key).unwrap_or_else(|| default.to_owned());
    Url::parse(&raw).with_context(|| format!("invalid {key}: {raw}"))
}

impl SiteConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = PathBuf::from(optional("DATA_DIR").unwrap_or_else(|| "data".to_owned()));
        let users_file = optional("USERS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("users.json"));
        let mail_webhook_url = optional("MAIL_WEBHOOK_URL")
            .map(|raw| Url::parse(&raw).with_context(|| format!("invalid MAIL_WEBHOOK_URL: {raw}")))
            .transpose()?;

        Ok(Self {
            session_secret: std::env::var("SESSION_SECRET").context("SESSION_SECRET")?,
            site_port: std::env::var("SITE_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            admin_emails: optional("ADMIN_EMAILS")
                .unwrap_or_else(|| DEFAULT_ADMIN_EMAILS.to_owned()),
            data_dir,
            users_file,
            cookie_domain: optional("COOKIE_DOMAIN"),
            mail_webhook_url,
            google_tokeninfo_url: url_or("GOOGLE_TOKENINFO_URL", DEFAULT_TOKENINFO_URL)?,
            google_userinfo_url: url_or("GOOGLE_USERINFO_URL", DEFAULT_USERINFO_URL)?,
            google_revoke_url: url_or("GOOGLE_REVOKE_URL", DEFAULT_REVOKE_URL)?,
        })
    }
}
