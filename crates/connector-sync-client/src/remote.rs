use async_trait::async_trait;
use connector_sync_types::{ConfigTree, Result};
use tokio_util::sync::CancellationToken;

/// Remote operations on a single connector.
///
/// Each method performs one attempt; callers decide whether to wrap it in an
/// [`Invoker`](crate::Invoker). Implementations authenticate on their own.
#[async_trait]
pub trait ConnectorRemote: Send + Sync {
    /// Fetch the connector as a config tree. A missing connector fails with
    /// a `NotFound` remote error.
    async fn fetch_current(&self, cancel: &CancellationToken, id: &str) -> Result<ConfigTree>;

    async fn test_config(
        &self,
        cancel: &CancellationToken,
        connector_type: &str,
        auth_params: &ConfigTree,
        extra_config: Option<&ConfigTree>,
        id: Option<&str>,
    ) -> Result<bool>;

    /// Create a connector and return its id.
    async fn create(
        &self,
        cancel: &CancellationToken,
        name: &str,
        connector_type: &str,
        auth_params: &ConfigTree,
        extra_config: Option<&ConfigTree>,
    ) -> Result<String>;

    /// Patch name and, when given, auth params and extra config.
    async fn update(
        &self,
        cancel: &CancellationToken,
        id: &str,
        name: &str,
        auth_params: Option<&ConfigTree>,
        extra_config: Option<&ConfigTree>,
    ) -> Result<()>;

    async fn delete(&self, cancel: &CancellationToken, id: &str) -> Result<()>;
}
