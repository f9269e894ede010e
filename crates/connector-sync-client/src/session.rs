//! Credential session: one cached bearer credential, refreshed on demand.

use connector_sync_types::{Credential, ProviderConfig, Result, SyncError};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Token endpoint response body.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Owns the current access credential and renews it when it expires.
///
/// The slot is behind an async mutex held for the whole refresh, so callers
/// sharing one session trigger at most one exchange at a time and never read
/// a half-written credential.
pub struct CredentialSession {
    http: reqwest::Client,
    auth_url: String,
    audience: String,
    client_id: String,
    client_secret: String,
    slot: Mutex<Option<Credential>>,
}

impl CredentialSession {
    pub fn new(config: &ProviderConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            auth_url: config.auth_url.clone(),
            audience: config.audience.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            slot: Mutex::new(None),
        }
    }

    /// Return the cached credential if it is still valid, otherwise
    /// authenticate and cache the new one.
    ///
    /// Never retries on its own; a failed exchange surfaces as
    /// [`SyncError::Authentication`].
    pub async fn ensure_valid(&self, cancel: &CancellationToken) -> Result<Credential> {
        let mut slot = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SyncError::Cancelled),
            guard = self.slot.lock() => guard,
        };

        if let Some(credential) = slot.as_ref() {
            if credential.is_valid() {
                tracing::debug!(
                    "Using cached credential ({}s remaining)",
                    credential.remaining_seconds()
                );
                return Ok(credential.clone());
            }
        }

        tracing::debug!("Credential absent or expired, authenticating against {}", self.auth_url);
        let credential = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SyncError::Cancelled),
            result = self.exchange() => result?,
        };

        *slot = Some(credential.clone());
        Ok(credential)
    }

    /// Drop the cached credential so the next call re-authenticates.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.lock().await;
        *slot = None;
    }

    async fn exchange(&self) -> Result<Credential> {
        let params = [
            ("grant_type", "client_credentials"),
            ("audience", self.audience.as_str()),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(&self.auth_url)
            .header("Encoding", "UTF-8")
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                let transient = e.is_timeout() || e.is_connect() || e.is_request();
                SyncError::authentication(format!("error authenticating: {}", e), transient)
            })?;

        let status = response.status();
        if !status.is_success() {
            let transient =
                status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            return Err(SyncError::authentication(
                format!("error authenticating, status code: {}", status.as_u16()),
                transient,
            ));
        }

        let body = response.bytes().await.map_err(|e| {
            SyncError::authentication(
                format!("error reading authentication response: {}", e),
                e.is_timeout(),
            )
        })?;

        let token: TokenResponse = serde_json::from_slice(&body).map_err(|e| {
            SyncError::authentication(format!("error parsing authentication response: {}", e), false)
        })?;

        let credential = Credential::new(token.access_token, token.expires_in);
        tracing::info!(
            "Authenticated, credential valid until {}",
            credential.expires_at().format("%Y-%m-%d %H:%M:%S UTC")
        );
        Ok(credential)
    }
}

impl std::fmt::Debug for CredentialSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSession")
            .field("auth_url", &self.auth_url)
            .field("audience", &self.audience)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}
