//! Remote failure classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category attached to a remote failure where it is produced.
///
/// Retry decisions match on this tag instead of inspecting error text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Remote throttled the caller (HTTP 429 or a rate-limit GraphQL error)
    RateLimited,
    /// Request or upstream timed out
    Timeout,
    /// Connection was refused, reset, or dropped mid-flight
    ConnectionReset,
    /// Remote reported a temporary/transient condition
    Temporary,
    /// Remote is down or overloaded (HTTP 503)
    ServiceUnavailable,
    /// Remote rejected the input
    Validation,
    /// Resource does not exist
    NotFound,
    /// Credential lacks access to the resource
    PermissionDenied,
    /// Anything not covered above
    Other,
}

/// Marker phrases used when a remote only reports free-form text.
const MESSAGE_MARKERS: &[(&str, ErrorKind)] = &[
    ("rate limit", ErrorKind::RateLimited),
    ("too many requests", ErrorKind::RateLimited),
    ("timeout", ErrorKind::Timeout),
    ("timed out", ErrorKind::Timeout),
    ("connection reset", ErrorKind::ConnectionReset),
    ("temporary", ErrorKind::Temporary),
    ("transient", ErrorKind::Temporary),
    ("service unavailable", ErrorKind::ServiceUnavailable),
];

impl ErrorKind {
    /// Check if a failure of this kind is safe to reattempt.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::RateLimited
                | Self::Timeout
                | Self::ConnectionReset
                | Self::Temporary
                | Self::ServiceUnavailable
        )
    }

    /// Map an HTTP status code to a kind.
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimited,
            503 => Self::ServiceUnavailable,
            408 | 504 => Self::Timeout,
            502 => Self::Temporary,
            401 | 403 => Self::PermissionDenied,
            404 => Self::NotFound,
            400 | 422 => Self::Validation,
            500..=599 => Self::Temporary,
            _ => Self::Other,
        }
    }

    /// Map a GraphQL `extensions.code` value, if it is one we recognise.
    pub fn from_graphql_code(code: &str) -> Option<Self> {
        let kind = match code.to_ascii_uppercase().as_str() {
            "RATE_LIMITED" | "RATE_LIMIT_EXCEEDED" | "TOO_MANY_REQUESTS" => Self::RateLimited,
            "TIMEOUT" | "GATEWAY_TIMEOUT" => Self::Timeout,
            "SERVICE_UNAVAILABLE" => Self::ServiceUnavailable,
            "UNAUTHENTICATED" | "FORBIDDEN" | "UNAUTHORIZED" => Self::PermissionDenied,
            "NOT_FOUND" => Self::NotFound,
            "BAD_USER_INPUT" | "GRAPHQL_VALIDATION_FAILED" | "INVALID_INPUT" => Self::Validation,
            _ => return None,
        };
        Some(kind)
    }

    /// Classify free-form error text by its marker phrases.
    ///
    /// Only used at the transport boundary, where the remote gives us nothing
    /// but a message.
    pub fn from_message(message: &str) -> Self {
        let lowered = message.to_ascii_lowercase();
        MESSAGE_MARKERS
            .iter()
            .find(|(marker, _)| lowered.contains(marker))
            .map_or(Self::Other, |(_, kind)| *kind)
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::Timeout => "timeout",
            Self::ConnectionReset => "connection_reset",
            Self::Temporary => "temporary",
            Self::ServiceUnavailable => "service_unavailable",
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::PermissionDenied => "permission_denied",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
