use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::error::TaskError;

use super::{Authenticator, Credential, TaskExecutor};

/// Scheme used by the target service for bearer tokens.
const TOKEN_SCHEME: &str = "JWT";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access: Option<String>,
}

/// Builds the shared client used by every worker.
///
/// # Errors
///
/// Returns an error when the TLS backend cannot be initialised.
pub fn build_client(request_timeout: Duration) -> Result<Client, TaskError> {
    Client::builder()
        .timeout(request_timeout)
        .build()
        .map_err(|err| TaskError::BuildClientFailed { source: err })
}

/// Resolves `path` against `base`.
///
/// # Errors
///
/// Returns an error when the joined URL is not valid.
pub fn join_url(base: &Url, path: &str) -> Result<Url, TaskError> {
    base.join(path).map_err(|err| TaskError::JoinUrl {
        base: base.to_string(),
        path: path.to_owned(),
        source: err,
    })
}

/// Fetches a token with HTTP Basic credentials and reads its `access` field.
pub struct HttpTokenAuthenticator {
    client: Client,
    url: Url,
    basic_header: String,
}

impl HttpTokenAuthenticator {
    #[must_use]
    pub fn new(client: Client, url: Url, username: &str, password: &str) -> Self {
        let pair = format!("{}:{}", username, password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(pair.as_bytes());
        Self {
            client,
            url,
            basic_header: format!("Basic {}", encoded),
        }
    }
}

#[async_trait]
impl Authenticator for HttpTokenAuthenticator {
    async fn acquire(&self) -> Result<Credential, TaskError> {
        let response = self
            .client
            .get(self.url.clone())
            .header("Authorization", &self.basic_header)
            .send()
            .await
            .map_err(|err| TaskError::credential(format!("token request failed: {}", err)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TaskError::credential(format!(
                "token endpoint {} returned {}",
                self.url,
                status.as_u16()
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|err| TaskError::credential(format!("invalid token response: {}", err)))?;
        match body.access {
            Some(token) if !token.is_empty() => {
                debug!("Acquired credential from {}", self.url);
                Ok(Credential::new(token))
            }
            Some(_) | None => Err(TaskError::credential(
                "token response did not contain an 'access' token",
            )),
        }
    }
}

/// Issues one authenticated `GET` per iteration.
pub struct HttpTaskExecutor {
    client: Client,
    url: Url,
}

impl HttpTaskExecutor {
    #[must_use]
    pub const fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl TaskExecutor for HttpTaskExecutor {
    async fn execute(&self, credential: &Credential) -> Result<(), TaskError> {
        let response = self
            .client
            .get(self.url.clone())
            .header(
                "Authorization",
                format!("{} {}", TOKEN_SCHEME, credential.token()),
            )
            .send()
            .await
            .map_err(|err| TaskError::execution(format!("request failed: {}", err)))?;

        let status = response.status();
        // Drain so the connection can be reused.
        drop(response.bytes().await);
        if status.is_success() {
            Ok(())
        } else {
            Err(TaskError::execution(format!(
                "{} returned {}",
                self.url,
                status.as_u16()
            )))
        }
    }
}
