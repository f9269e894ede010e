//! Connector resource models.

use serde::{Deserialize, Serialize};

use super::value::{normalize_json, ConfigTree, ConfigValue};

/// Declared connector, as supplied for creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectorSpec {
    /// Display name of the connector
    pub name: String,
    /// Connector type identifier (e.g. "aws", "gcp", "azure")
    #[serde(rename = "type")]
    pub connector_type: String,
    /// Authentication parameters, JSON-encoded
    pub auth_params: String,
    /// Extra configuration, JSON-encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_config: Option<String>,
}

/// Fields a caller wants the remote connector to have.
///
/// `None` means "leave as is": reconciliation copies the current value so the
/// field is never reported as changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DesiredFields {
    /// Display name (always sent)
    pub name: String,
    /// Authentication parameters, JSON-encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_params: Option<String>,
    /// Extra configuration, JSON-encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_config: Option<String>,
}

impl DesiredFields {
    /// Desired state that only renames the connector.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }
}

/// Flattened view of a connector as read back from the remote.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectorState {
    /// Remote identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Connector type identifier
    #[serde(rename = "type")]
    pub connector_type: Option<String>,
    /// Authentication parameters, normalized JSON
    pub auth_params: Option<String>,
    /// Extra configuration, normalized JSON
    pub extra_config: Option<String>,
    /// Server-reported status
    pub status: Option<String>,
    /// Whether the connector is enabled
    pub enabled: Option<bool>,
    /// Timestamp of the last activity
    pub last_activity: Option<String>,
    /// Identifier of the associated outpost
    pub outpost_id: Option<String>,
}

impl ConnectorState {
    /// Project a fetched connector tree into a flat state.
    pub fn from_tree(id: &str, tree: &ConfigTree) -> Self {
        let text = |key: &str| tree.get(key).and_then(ConfigValue::as_text).map(str::to_string);
        let encoded = |key: &str| match tree.get(key)? {
            ConfigValue::Null => None,
            ConfigValue::Text(raw) => Some(normalize_json(raw)),
            value => Some(value.to_canonical_json()),
        };

        Self {
            id: text("id").unwrap_or_else(|| id.to_string()),
            name: text("name").unwrap_or_default(),
            connector_type: tree
                .get("type")
                .and_then(ConfigValue::as_mapping)
                .and_then(|t| t.get("id"))
                .and_then(ConfigValue::as_text)
                .map(str::to_string),
            auth_params: encoded("authParams"),
            extra_config: encoded("extraConfig"),
            status: text("status"),
            enabled: tree.get("enabled").and_then(ConfigValue::as_bool),
            last_activity: text("lastActivity"),
            outpost_id: tree
                .get("outpost")
                .and_then(ConfigValue::as_mapping)
                .and_then(|o| o.get("id"))
                .and_then(ConfigValue::as_text)
                .map(str::to_string),
        }
    }
}

/// Result of testing a connector configuration without creating it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigTestResult {
    /// Synthetic identifier: `<type>-<connector id>`
    pub id: String,
    /// Whether the remote accepted the configuration
    pub success: bool,
}
