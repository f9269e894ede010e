//! Access credential model.

use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;

/// Bearer credential obtained from the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl Credential {
    /// Create a credential that expires `expires_in` seconds from now.
    pub fn new(access_token: String, expires_in: i64) -> Self {
        let now = Utc::now();
        let expires_at = TimeDelta::try_seconds(expires_in)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { access_token, expires_at }
    }

    /// Create a credential with an explicit expiry instant.
    pub fn with_expiry(access_token: String, expires_at: DateTime<Utc>) -> Self {
        Self { access_token, expires_at }
    }

    /// Raw token text.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Absolute expiry instant.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Check validity at a given instant (`now < expiry`).
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Check validity against the current clock.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Get remaining validity in seconds (0 if already expired).
    pub fn remaining_seconds(&self) -> i64 {
        self.expires_at.signed_duration_since(Utc::now()).num_seconds().max(0)
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
