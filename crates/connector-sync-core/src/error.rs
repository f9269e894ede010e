//! Error types for the reconciliation core.

use connector_sync_types::SyncError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Step of a reconciliation at which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcilePhase {
    Authenticate,
    FetchCurrent,
    Compare,
    Update,
}

impl fmt::Display for ReconcilePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Authenticate => "authenticate",
            Self::FetchCurrent => "fetch-current",
            Self::Compare => "compare",
            Self::Update => "update",
        };
        f.write_str(name)
    }
}

/// A failed reconciliation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("reconcile failed during {phase}: {source}")]
pub struct ReconcileError {
    pub phase: ReconcilePhase,
    #[source]
    pub source: SyncError,
}

impl ReconcileError {
    /// Attribute `source` to `phase`, except that credential failures are
    /// always reported as [`ReconcilePhase::Authenticate`].
    pub fn at(phase: ReconcilePhase, source: SyncError) -> Self {
        let phase = if source.is_authentication() { ReconcilePhase::Authenticate } else { phase };
        Self { phase, source }
    }

    pub fn is_cancelled(&self) -> bool {
        self.source.is_cancelled()
    }
}

/// Errors surfaced by the connector resource lifecycle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoreError {
    /// Remote rejected the configuration during the pre-create test.
    #[error("connector configuration test failed")]
    ConfigTestFailed,

    /// A remote call failed; `context` names the operation.
    #[error("{context}: {source}")]
    Remote {
        context: &'static str,
        #[source]
        source: SyncError,
    },

    /// Caller input or configuration could not be used.
    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

impl CoreError {
    pub fn remote(context: &'static str, source: SyncError) -> Self {
        Self::Remote { context, source }
    }

    /// Underlying sync error, if any.
    pub fn sync_error(&self) -> Option<&SyncError> {
        match self {
            Self::ConfigTestFailed => None,
            Self::Remote { source, .. } | Self::Sync(source) => Some(source),
            Self::Reconcile(err) => Some(&err.source),
        }
    }
}

/// Result type alias for resource operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use connector_sync_types::ErrorKind;

    #[test]
    fn test_authentication_reclassified() {
        let err = ReconcileError::at(
            ReconcilePhase::Update,
            SyncError::authentication("status code: 401", false),
        );
        assert_eq!(err.phase, ReconcilePhase::Authenticate);
        assert!(err.to_string().starts_with("reconcile failed during authenticate:"));
    }

    #[test]
    fn test_exhausted_authentication_reclassified() {
        let source = SyncError::RetriesExhausted {
            attempts: 5,
            last: Box::new(SyncError::authentication("connect refused", true)),
        };
        let err = ReconcileError::at(ReconcilePhase::FetchCurrent, source);
        assert_eq!(err.phase, ReconcilePhase::Authenticate);
    }

    #[test]
    fn test_remote_failure_keeps_phase() {
        let err = ReconcileError::at(
            ReconcilePhase::FetchCurrent,
            SyncError::remote(ErrorKind::NotFound, "connector not found: c-1"),
        );
        assert_eq!(err.phase, ReconcilePhase::FetchCurrent);
        assert!(err.to_string().contains("fetch-current"));
        assert!(err.to_string().contains("connector not found: c-1"));
    }

    #[test]
    fn test_resource_error_context() {
        let err = CoreError::remote("error deleting connector", SyncError::Cancelled);
        assert_eq!(err.to_string(), "error deleting connector: Operation cancelled");
        assert_eq!(err.sync_error(), Some(&SyncError::Cancelled));
    }
}
