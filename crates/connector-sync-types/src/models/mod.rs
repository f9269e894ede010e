//! Core domain models for connector-sync.

pub mod config;
mod connector;
mod credential;
mod value;

// Re-export all models
pub use config::{ProviderConfig, RetryConfig};
pub use connector::{ConfigTestResult, ConnectorSpec, ConnectorState, DesiredFields};
pub use credential::Credential;
pub use value::{normalize_json, tree_from_json, ConfigTree, ConfigValue};
