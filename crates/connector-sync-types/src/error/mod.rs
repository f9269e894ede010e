//! Typed error definitions for connector-sync.
//!
//! Every failure carries enough structure for the retry layer to decide
//! what to do with it without looking at message text:
//!
//! - **`Authentication`** - credential exchange failed
//! - **`Remote`** - the remote call failed, tagged with an [`ErrorKind`]
//! - **`RetriesExhausted`** - the attempt ceiling was reached on a transient failure
//! - **`Cancelled`** - the caller's cancellation fired

mod config;
mod remote;

pub use config::ConfigError;
pub use remote::ErrorKind;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the synchronization core.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum SyncError {
    /// Credential exchange failed (transport, status, or malformed body)
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Underlying cause
        message: String,
        /// Whether the cause was a transient transport or server condition
        transient: bool,
    },

    /// Remote call failed
    #[error("Remote error ({kind}): {message}")]
    Remote {
        /// Classification attached where the failure was produced
        kind: ErrorKind,
        /// Remote or transport message
        message: String,
    },

    /// Attempt ceiling reached while the failure kept being transient
    #[error("Maximum retries exceeded after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts performed
        attempts: u32,
        /// Last transient failure
        last: Box<SyncError>,
    },

    /// Caller cancellation fired during a call or a backoff wait
    #[error("Operation cancelled")]
    Cancelled,

    /// Remote answered with a payload we could not interpret
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Caller-supplied input could not be used
    #[error("Invalid {field}: {message}")]
    InvalidInput {
        /// Name of the offending field
        field: String,
        /// What was wrong with it
        message: String,
    },

    /// Provider configuration is unusable
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Standard Result type using SyncError.
pub type Result<T> = std::result::Result<T, SyncError>;

impl SyncError {
    /// Create a remote error with an explicit kind.
    pub fn remote(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Remote { kind, message: message.into() }
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>, transient: bool) -> Self {
        Self::Authentication { message: message.into(), transient }
    }

    /// Create an input error for a named field.
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput { field: field.into(), message: message.into() }
    }

    /// Check if the failure is safe to reattempt.
    ///
    /// Cancellation is never retryable, whatever the surrounding text says.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Authentication { transient, .. } => *transient,
            Self::Remote { kind, .. } => kind.is_retryable(),
            Self::RetriesExhausted { .. }
            | Self::Cancelled
            | Self::InvalidResponse(_)
            | Self::InvalidInput { .. }
            | Self::Config(_) => false,
        }
    }

    /// Check if this is (or wraps) an authentication failure.
    pub fn is_authentication(&self) -> bool {
        match self {
            Self::Authentication { .. } => true,
            Self::RetriesExhausted { last, .. } => last.is_authentication(),
            _ => false,
        }
    }

    /// Check if the caller's cancellation caused this error.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Remote kind, if this is a remote failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Remote { kind, .. } => Some(*kind),
            Self::RetriesExhausted { last, .. } => last.kind(),
            _ => None,
        }
    }
}
