use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Identity asserted by an external provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderIdentity {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The token was checked and refused.
    #[error("{0}")]
    Rejected(String),
    /// The provider could not be asked.
    #[error("identity provider unavailable: {0:#}")]
    Unavailable(#[from] anyhow::Error),
}

/// Verifies a third-party ID token and returns who it belongs to.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, token: &str) -> Result<ProviderIdentity, ProviderError>;
}

/// Subset of Google's tokeninfo response.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenInfo {
    pub aud: String,
    pub iss: String,
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

pub(crate) fn identity_from_token_info(
    info: TokenInfo,
    client_id: &str,
) -> Result<ProviderIdentity, ProviderError> {
    if info.aud != client_id {
        return Err(ProviderError::Rejected(
            "Token has wrong audience".to_string(),
        ));
    }
    if !GOOGLE_ISSUERS.contains(&info.iss.as_str()) {
        return Err(ProviderError::Rejected("Wrong issuer".to_string()));
    }
    if info.email_verified.as_deref() == Some("false") {
        return Err(ProviderError::Rejected("Email not verified".to_string()));
    }
    let email = info
        .email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ProviderError::Rejected("Token carries no email".to_string()))?;
    Ok(ProviderIdentity {
        email,
        first_name: info.given_name.unwrap_or_default(),
        last_name: info.family_name.unwrap_or_default(),
    })
}

/// Google ID-token verification through the tokeninfo endpoint.
pub struct GoogleIdentityProvider {
    client: reqwest::Client,
    client_id: Option<String>,
}

impl GoogleIdentityProvider {
    pub fn new(client_id: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id,
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    async fn verify(&self, token: &str) -> Result<ProviderIdentity, ProviderError> {
        let Some(client_id) = self.client_id.as_deref() else {
            warn!("social login attempted without GOOGLE_CLIENT_ID");
            return Err(ProviderError::Rejected(
                "Social login is not configured".to_string(),
            ));
        };

        let resp = self
            .client
            .get(TOKENINFO_URL)
            .query(&[("id_token", token)])
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.into()))?;

        let status = resp.status();
        if status.is_client_error() {
            debug!(%status, "google refused id token");
            return Err(ProviderError::Rejected("Invalid token".to_string()));
        }
        if !status.is_success() {
            return Err(ProviderError::Unavailable(anyhow::anyhow!(
                "tokeninfo answered {status}"
            )));
        }

        let info: TokenInfo = resp
            .json()
            .await
            .map_err(|e| ProviderError::Unavailable(e.into()))?;
        identity_from_token_info(info, client_id)
    }
}
