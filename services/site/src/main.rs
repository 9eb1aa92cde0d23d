use std::sync::Arc;

use anyhow::Context as _;
use tracing::info;

use fitcoach_core::tracing::init_tracing;
use fitcoach_site::config::SiteConfig;
use fitcoach_site::infra::credentials::StaticCredentialStore;
use fitcoach_site::infra::files::JsonFileStore;
use fitcoach_site::infra::google::{GoogleEndpoints, GoogleIdentityProvider};
use fitcoach_site::infra::mail::MailDelivery;
use fitcoach_site::infra::memory::{InMemoryPasscodeStore, InMemorySessionRepository};
use fitcoach_site::router::build_router;
use fitcoach_site::state::AppState;
use fitcoach_site::usecase::role::AdminAllowList;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = SiteConfig::from_env()?;

    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .context("build HTTP client")?;

    if config.mail_webhook_url.is_none() {
        info!("MAIL_WEBHOOK_URL unset, passcodes will be logged");
    }
    let mail = MailDelivery::new(http.clone(), config.mail_webhook_url.clone());
    let provider = GoogleIdentityProvider::new(
        http,
        GoogleEndpoints {
            tokeninfo: config.google_tokeninfo_url.clone(),
            userinfo: config.google_userinfo_url.clone(),
            revoke: config.google_revoke_url.clone(),
        },
    );
    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .with_context(|| format!("create data dir {}", config.data_dir.display()))?;
    let credentials = StaticCredentialStore::load(&config.users_file).await?;
    let admins = AdminAllowList::from_csv(&config.admin_emails);
    info!(admins = admins.len(), "admin allow-list loaded");

    let state = AppState {
        passcodes: InMemoryPasscodeStore::new(),
        sessions: InMemorySessionRepository::new(),
        mail,
        provider,
        credentials,
        admins: Arc::new(admins),
        submissions: JsonFileStore::new(config.data_dir.join("submissions.json")),
        transformations: JsonFileStore::new(config.data_dir.join("transformations.json")),
        session_secret: config.session_secret,
        cookie_domain: config.cookie_domain,
        data_dir: config.data_dir,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.site_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!("site listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
