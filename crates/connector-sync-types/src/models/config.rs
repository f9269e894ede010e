//! Provider configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "https://api.eu1.demo.wiz.io/graphql";
pub const DEFAULT_AUTH_URL: &str = "https://auth.demo.wiz.io/oauth/token";
pub const DEFAULT_AUDIENCE: &str = "wiz-api";

pub const ENV_CLIENT_ID: &str = "WIZ_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "WIZ_CLIENT_SECRET";
pub const ENV_API_URL: &str = "WIZ_API_URL";
pub const ENV_AUTH_URL: &str = "WIZ_AUTH_URL";

/// Configuration for retry behavior on transient errors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    #[validate(range(min = 1_u32, max = 32_u32))]
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the second attempt, in milliseconds; doubles afterwards
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: default_max_attempts(), base_delay_ms: default_base_delay_ms() }
    }
}

impl RetryConfig {
    /// Base delay as a `Duration`.
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

/// Credentials and endpoints for the remote platform.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct ProviderConfig {
    /// OAuth client identifier
    #[validate(length(min = 1_u64, message = "client_id is required"))]
    pub client_id: String,
    /// OAuth client secret
    #[validate(length(min = 1_u64, message = "client_secret is required"))]
    pub client_secret: String,
    /// GraphQL endpoint
    #[validate(url)]
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Token endpoint
    #[validate(url)]
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    /// Audience requested in the client-credentials grant
    #[validate(length(min = 1_u64))]
    #[serde(default = "default_audience")]
    pub audience: String,
    /// HTTP request timeout in seconds
    #[validate(range(min = 1_u64, max = 3600_u64))]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retry policy for remote calls
    #[serde(default)]
    #[validate(nested)]
    pub retry: RetryConfig,
}

impl ProviderConfig {
    /// Create a config with default endpoints.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_url: default_api_url(),
            auth_url: default_auth_url(),
            audience: default_audience(),
            timeout_secs: default_timeout_secs(),
            retry: RetryConfig::default(),
        }
    }

    /// Build from `WIZ_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let required = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingField { field: name.to_string() })
        };

        let mut config = Self::new(required(ENV_CLIENT_ID)?, required(ENV_CLIENT_SECRET)?);
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.is_empty() {
                config.api_url = url;
            }
        }
        if let Ok(url) = std::env::var(ENV_AUTH_URL) {
            if !url.is_empty() {
                config.auth_url = url;
            }
        }
        config.validated()
    }

    /// Parse from a JSON document and validate.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::from_json_error(&e))?;
        config.validated()
    }

    /// Validate, returning the config unchanged on success.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate().map_err(|e| ConfigError::from_validation_errors(&e))?;
        Ok(self)
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("auth_url", &self.auth_url)
            .field("audience", &self.audience)
            .field("timeout_secs", &self.timeout_secs)
            .field("retry", &self.retry)
            .finish()
    }
}

pub const fn default_max_attempts() -> u32 {
    5
}

pub const fn default_base_delay_ms() -> u64 {
    1000
}

pub const fn default_timeout_secs() -> u64 {
    120
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

fn default_audience() -> String {
    DEFAULT_AUDIENCE.to_string()
}
