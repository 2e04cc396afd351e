//! Client for the services behind the gateway.

use crate::config::UpstreamConfig;
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Credentials forwarded to the authentication endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: Option<String>,
}

/// Upstream errors.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("credentials rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("upstream returned {status}: {message}")]
    Failed { status: u16, message: String },

    #[error("authentication response carried no token")]
    MissingToken,
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout
        } else {
            UpstreamError::Request(e)
        }
    }
}

/// Shared HTTP client for the authentication API and the front end.
pub struct UpstreamClient {
    inner: Client,
    auth_url: Url,
    frontend_url: Option<Url>,
}

impl UpstreamClient {
    /// Build a client from configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let inner = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(format!("rolegate/{}", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(UpstreamError::ClientBuild)?;

        let frontend_url = config
            .frontend_url
            .as_deref()
            .map(Url::parse)
            .transpose()?;

        Ok(Self {
            inner,
            auth_url: Url::parse(&config.auth_url)?,
            frontend_url,
        })
    }

    /// Get the inner reqwest client.
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    pub fn frontend_url(&self) -> Option<&Url> {
        self.frontend_url.as_ref()
    }

    /// Exchange credentials for a token.
    ///
    /// 401 and 403 mean the credentials were refused; any other failure is
    /// reported as an upstream fault. The upstream's `message` field is
    /// passed through when present.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<String, UpstreamError> {
        tracing::debug!(url = %self.auth_url, "Forwarding login to upstream");
        let response = self
            .inner
            .post(self.auth_url.clone())
            .json(credentials)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<MessageBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| "Login failed".to_string());

            return Err(match status.as_u16() {
                401 | 403 => UpstreamError::Rejected {
                    status: status.as_u16(),
                    message,
                },
                code => UpstreamError::Failed {
                    status: code,
                    message,
                },
            });
        }

        let body: TokenResponse = response.json().await?;
        body.token
            .filter(|t| !t.is_empty())
            .ok_or(UpstreamError::MissingToken)
    }
}
