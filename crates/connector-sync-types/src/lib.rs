//! # Connector Sync Types
//!
//! Shared vocabulary of the workspace: the error taxonomy the retry layer
//! matches on, and the data that moves between the remote and the
//! reconciler.
//!
//! - **`error`** - `SyncError` with its `ErrorKind` tag, plus `ConfigError`
//! - **`models`** - `ConfigValue` trees, the bearer `Credential`, connector
//!   projections and `ProviderConfig`
//!
//! ## Dependency graph
//!
//! ```text
//!   connector-sync-types
//!          │
//!          ├──► connector-sync-client ──┐
//!          │                            ▼
//!          └──────────────────► connector-sync-core ──► connector-sync-cli
//! ```
//!
//! Nothing here performs I/O apart from reading `WIZ_*` variables in
//! [`ProviderConfig::from_env`].

pub mod error;
pub mod models;

pub use error::{ConfigError, ErrorKind, Result, SyncError};

pub use models::{
    normalize_json, tree_from_json, ConfigTestResult, ConfigTree, ConfigValue, ConnectorSpec, ConnectorState,
    Credential, DesiredFields, ProviderConfig, RetryConfig,
};
