use anyhow::Context as _;
use serde::Serialize;
use tracing::info;
use url::Url;

use crate::domain::repository::CodeDelivery;
use crate::domain::types::PASSCODE_TTL_SECS;

const SUBJECT: &str = "Your verification code";

#[derive(Serialize)]
struct MailMessage<'a> {
    to: &'a str,
    subject: &'a str,
    text: String,
}

/// Delivers passcodes through an HTTP mail webhook.
///
/// Without a webhook the code is written to the log instead, which is only
/// suitable for local development.
#[derive(Clone)]
pub struct MailDelivery {
    client: reqwest::Client,
    webhook: Option<Url>,
}

impl MailDelivery {
    pub fn new(client: reqwest::Client, webhook: Option<Url>) -> Self {
        Self { client, webhook }
    }

    pub fn log_only() -> Self {
        Self::new(reqwest::Client::new(), None)
    }
}

impl CodeDelivery for MailDelivery {
    async fn deliver(&self, email: &str, code: &str) -> anyhow::Result<()> {
        let Some(webhook) = &self.webhook else {
            info!(email, code, "passcode (no mail webhook configured)");
            return Ok(());
        };

        let message = MailMessage {
            to: email,
            subject: SUBJECT,
            text: format!(
                "Your verification code is {code}. It expires in {} minutes.",
                PASSCODE_TTL_SECS / 60
            ),
        };
        self.client
            .post(webhook.clone())
            .json(&message)
            .send()
            .await
            .context("send mail webhook request")?
            .error_for_status()
            .context("mail webhook rejected message")?;
        Ok(())
    }
}
