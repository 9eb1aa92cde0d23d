use anyhow::Context as _;
use serde::Deserialize;
use url::Url;

use crate::domain::repository::IdentityProvider;
use crate::domain::types::ProviderProfile;
use crate::error::ProviderError;

pub const DEFAULT_TOKENINFO_URL: &str = "https://www.googleapis.com/oauth2/v1/tokeninfo";
pub const DEFAULT_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
pub const DEFAULT_REVOKE_URL: &str = "https://oauth2.googleapis.com/revoke";

#[derive(Deserialize)]
struct TokenInfo {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct UserInfo {
    id: String,
    email: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    picture: Option<String>,
}

/// Google OAuth endpoints used to turn a client-obtained access token into a profile.
#[derive(Clone, Debug)]
pub struct GoogleEndpoints {
    pub tokeninfo: Url,
    pub userinfo: Url,
    pub revoke: Url,
}

#[derive(Clone)]
pub struct GoogleIdentityProvider {
    client: reqwest::Client,
    endpoints: GoogleEndpoints,
}

impl GoogleIdentityProvider {
    pub fn new(client: reqwest::Client, endpoints: GoogleEndpoints) -> Self {
        Self { client, endpoints }
    }

    fn with_token(base: &Url, key: &str, token: &str) -> Url {
        let mut url = base.clone();
        url.query_pairs_mut().append_pair(key, token);
        url
    }
}

fn unavailable(e: reqwest::Error, what: &'static str) -> ProviderError {
    ProviderError::Unavailable(anyhow::Error::new(e).context(what))
}

impl IdentityProvider for GoogleIdentityProvider {
    async fn authenticate(&self, access_token: &str) -> Result<ProviderProfile, ProviderError> {
        let response = self
            .client
            .get(Self::with_token(
                &self.endpoints.tokeninfo,
                "access_token",
                access_token,
            ))
            .send()
            .await
            .map_err(|e| unavailable(e, "tokeninfo request"))?;
        if response.status().is_client_error() {
            return Err(ProviderError::InvalidToken);
        }
        let info: TokenInfo = response
            .error_for_status()
            .map_err(|e| unavailable(e, "tokeninfo status"))?
            .json()
            .await
            .map_err(|e| unavailable(e, "tokeninfo body"))?;
        if info.error.is_some() {
            return Err(ProviderError::InvalidToken);
        }

        let user: UserInfo = self
            .client
            .get(self.endpoints.userinfo.clone())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| unavailable(e, "userinfo request"))?
            .error_for_status()
            .map_err(|e| unavailable(e, "userinfo status"))?
            .json()
            .await
            .map_err(|e| unavailable(e, "userinfo body"))?;

        Ok(ProviderProfile {
            id: user.id,
            email: user.email,
            name: user.name,
            picture: user.picture,
        })
    }

    async fn revoke(&self, access_token: &str) -> Result<(), ProviderError> {
        self.client
            .post(Self::with_token(&self.endpoints.revoke, "token", access_token))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .context("revoke provider token")
            .map_err(ProviderError::Unavailable)?;
        Ok(())
    }
}
