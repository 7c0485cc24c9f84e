//! HTTP client for the remote key-value store.

use super::backend::{BackendError, KvBackend};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for a remote HTTP key-value service.
///
/// Wire contract: `GET {base}/{key}` returns the raw payload or 404,
/// `PUT {base}/{key}` stores the request body verbatim, and
/// `DELETE {base}/{key}` removes the key (404 counts as success, matching the
/// idempotent-delete contract).
pub struct RemoteKv {
    base: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl RemoteKv {
    /// Build a client for the store rooted at `base_url`.
    ///
    /// # Errors
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| BackendError::Unreachable(err.to_string()))?;
        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    fn key_url(&self, key: &str) -> String {
        format!("{}/{}", self.base, key)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Probe the store once. Any HTTP response counts as reachable; only a
    /// transport failure (refused, timed out) reports the store down.
    pub async fn ping(&self) -> bool {
        self.authorized(self.client.get(&self.base))
            .send()
            .await
            .is_ok()
    }
}

#[async_trait]
impl KvBackend for RemoteKv {
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let response = self
            .authorized(self.client.get(self.key_url(key)))
            .send()
            .await
            .map_err(|err| BackendError::Unreachable(err.to_string()))?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = response
                    .text()
                    .await
                    .map_err(|err| BackendError::Unreachable(err.to_string()))?;
                Ok(Some(body))
            }
            status => Err(BackendError::Status(status.as_u16())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        let response = self
            .authorized(self.client.put(self.key_url(key)).body(value.to_string()))
            .send()
            .await
            .map_err(|err| BackendError::Unreachable(err.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(BackendError::Status(response.status().as_u16()))
        }
    }

    async fn delete(&self, key: &str) -> Result<(), BackendError> {
        let response = self
            .authorized(self.client.delete(self.key_url(key)))
            .send()
            .await
            .map_err(|err| BackendError::Unreachable(err.to_string()))?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(()),
            status if status.is_success() => Ok(()),
            status => Err(BackendError::Status(status.as_u16())),
        }
    }
}
