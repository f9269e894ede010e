//! Connector client: [`ConnectorRemote`] over the GraphQL transport.

use async_trait::async_trait;
use connector_sync_types::{
    ConfigError, ConfigTree, ConfigValue, ErrorKind, ProviderConfig, Result, RetryConfig,
    SyncError,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::queries;
use crate::remote::ConnectorRemote;
use crate::session::CredentialSession;
use crate::transport::GraphqlTransport;

/// Talks to the connector API of the remote platform.
#[derive(Debug, Clone)]
pub struct ConnectorClient {
    transport: GraphqlTransport,
    retry: RetryConfig,
}

impl ConnectorClient {
    /// Validate `config` and build a client with its own session.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let config = config.clone().validated()?;
        let http = reqwest::Client::builder().timeout(config.timeout()).build().map_err(|e| {
            ConfigError::ValidationError { field: "http".to_string(), message: e.to_string() }
        })?;
        let session = Arc::new(CredentialSession::new(&config, http.clone()));
        Ok(Self::with_session(&config, http, session))
    }

    /// Build a client that shares an existing session.
    pub fn with_session(
        config: &ProviderConfig,
        http: reqwest::Client,
        session: Arc<CredentialSession>,
    ) -> Self {
        Self {
            transport: GraphqlTransport::new(http, config.api_url.clone(), session),
            retry: config.retry,
        }
    }

    pub fn session(&self) -> &Arc<CredentialSession> {
        self.transport.session()
    }

    /// Retry policy callers should apply around this client's calls.
    pub fn retry_config(&self) -> RetryConfig {
        self.retry
    }
}

#[async_trait]
impl ConnectorRemote for ConnectorClient {
    async fn fetch_current(&self, cancel: &CancellationToken, id: &str) -> Result<ConfigTree> {
        let variables = json!({ "connectorId": id });
        let data = self
            .transport
            .execute(cancel, "GetConnector", queries::GET_CONNECTOR, &variables)
            .await?;

        match data.get("connector") {
            Some(ConfigValue::Mapping(connector)) => Ok(connector.clone()),
            None | Some(ConfigValue::Null) => Err(SyncError::remote(
                ErrorKind::NotFound,
                format!("connector not found: {}", id),
            )),
            Some(_) => Err(SyncError::InvalidResponse("invalid connector data format".to_string())),
        }
    }

    async fn test_config(
        &self,
        cancel: &CancellationToken,
        connector_type: &str,
        auth_params: &ConfigTree,
        extra_config: Option<&ConfigTree>,
        id: Option<&str>,
    ) -> Result<bool> {
        let mut variables = Map::new();
        variables.insert("type".to_string(), Value::from(connector_type));
        variables.insert("authParams".to_string(), tree_to_json(auth_params));
        if let Some(extra) = extra_config {
            variables.insert("extraConfig".to_string(), tree_to_json(extra));
        }
        if let Some(id) = id.filter(|id| !id.is_empty()) {
            variables.insert("id".to_string(), Value::from(id));
        }

        let data = self
            .transport
            .execute(
                cancel,
                "TestConnectorConfig",
                queries::TEST_CONNECTOR_CONFIG,
                &Value::Object(variables),
            )
            .await?;

        lookup(&data, &["testConnectorConfig", "success"])
            .and_then(ConfigValue::as_bool)
            .ok_or_else(|| {
                SyncError::InvalidResponse("testConnectorConfig.success missing".to_string())
            })
    }

    async fn create(
        &self,
        cancel: &CancellationToken,
        name: &str,
        connector_type: &str,
        auth_params: &ConfigTree,
        extra_config: Option<&ConfigTree>,
    ) -> Result<String> {
        let mut input = Map::new();
        input.insert("name".to_string(), Value::from(name));
        input.insert("type".to_string(), Value::from(connector_type));
        input.insert("authParams".to_string(), tree_to_json(auth_params));
        if let Some(extra) = extra_config {
            input.insert("extraConfig".to_string(), tree_to_json(extra));
        }

        let data = self
            .transport
            .execute(
                cancel,
                "CreateConnector",
                queries::CREATE_CONNECTOR,
                &json!({ "input": input }),
            )
            .await?;

        let id = lookup(&data, &["createConnector", "connector", "id"])
            .and_then(ConfigValue::as_text)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SyncError::InvalidResponse("createConnector returned no id".to_string()))?;

        tracing::info!("Created connector {} ({})", id, name);
        Ok(id.to_string())
    }

    async fn update(
        &self,
        cancel: &CancellationToken,
        id: &str,
        name: &str,
        auth_params: Option<&ConfigTree>,
        extra_config: Option<&ConfigTree>,
    ) -> Result<()> {
        let mut patch = Map::new();
        patch.insert("name".to_string(), Value::from(name));
        if let Some(auth) = auth_params {
            patch.insert("authParams".to_string(), tree_to_json(auth));
        }
        if let Some(extra) = extra_config {
            patch.insert("extraConfig".to_string(), tree_to_json(extra));
        }

        let variables = json!({ "input": { "id": id, "patch": patch } });
        self.transport
            .execute(cancel, "UpdateConnector", queries::UPDATE_CONNECTOR, &variables)
            .await?;
        Ok(())
    }

    async fn delete(&self, cancel: &CancellationToken, id: &str) -> Result<()> {
        let variables = json!({ "input": { "id": id } });
        self.transport
            .execute(cancel, "DeleteConnector", queries::DELETE_CONNECTOR, &variables)
            .await?;
        tracing::info!("Deleted connector {}", id);
        Ok(())
    }
}

fn tree_to_json(tree: &ConfigTree) -> Value {
    Value::from(ConfigValue::Mapping(tree.clone()))
}

fn lookup<'a>(tree: &'a ConfigTree, keys: &[&str]) -> Option<&'a ConfigValue> {
    let (last, parents) = keys.split_last()?;
    let mut current = tree;
    for key in parents {
        current = current.get(*key)?.as_mapping()?;
    }
    current.get(*last)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use connector_sync_types::tree_from_json;

    #[test]
    fn test_lookup_nested() {
        let tree = tree_from_json(json!({"a": {"b": {"c": "deep"}}})).unwrap();
        assert_eq!(lookup(&tree, &["a", "b", "c"]).and_then(ConfigValue::as_text), Some("deep"));
        assert!(lookup(&tree, &["a", "x", "c"]).is_none());
        assert!(lookup(&tree, &[]).is_none());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = ConnectorClient::new(&ProviderConfig::new("", "secret")).unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
    }

    #[test]
    fn test_retry_config_carried() {
        let mut config = ProviderConfig::new("id", "secret");
        config.retry.max_attempts = 2;
        let client = ConnectorClient::new(&config).unwrap();
        assert_eq!(client.retry_config().max_attempts, 2);
    }
}
