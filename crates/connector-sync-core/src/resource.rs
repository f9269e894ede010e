//! Connector resource lifecycle: create, read, update, delete, and the
//! stand-alone configuration test.

use connector_sync_client::{ConnectorRemote, Invoker};
use connector_sync_types::{ConfigTestResult, ConnectorSpec, ConnectorState, DesiredFields};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::compare::IgnoreSet;
use crate::error::{CoreError, CoreResult};
use crate::json::{parse_object, parse_optional_object};
use crate::reconcile::{ReconcileOutcome, Reconciler};

/// Result of [`ConnectorResource::update`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    pub outcome: ReconcileOutcome,
    pub state: ConnectorState,
}

/// Manages one kind of remote object, the connector.
///
/// Reads and configuration tests are retried through the invoker. Create and
/// delete are sent once; create is not idempotent.
#[derive(Debug, Clone)]
pub struct ConnectorResource<R> {
    reconciler: Reconciler<R>,
    ignore: IgnoreSet,
}

impl<R: ConnectorRemote> ConnectorResource<R> {
    /// Resource using the standard ignore set.
    pub fn new(remote: R, invoker: Invoker) -> Self {
        Self { reconciler: Reconciler::new(remote, invoker), ignore: IgnoreSet::standard() }
    }

    #[must_use]
    pub fn with_ignore_set(mut self, ignore: IgnoreSet) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn reconciler(&self) -> &Reconciler<R> {
        &self.reconciler
    }

    /// Test the configuration, then create. Returns the new id.
    pub async fn create(&self, cancel: &CancellationToken, spec: &ConnectorSpec) -> CoreResult<String> {
        let auth_params = parse_object("auth_params", &spec.auth_params)?;
        let extra_config = parse_optional_object("extra_config", spec.extra_config.as_deref())?;

        let remote = self.reconciler.remote();
        let success = self
            .reconciler
            .invoker()
            .invoke(cancel, || {
                remote.test_config(
                    cancel,
                    &spec.connector_type,
                    &auth_params,
                    extra_config.as_ref(),
                    None,
                )
            })
            .await
            .map_err(|e| CoreError::remote("error testing connector configuration", e))?;

        if !success {
            return Err(CoreError::ConfigTestFailed);
        }

        remote
            .create(cancel, &spec.name, &spec.connector_type, &auth_params, extra_config.as_ref())
            .await
            .map_err(|e| CoreError::remote("error creating connector", e))
    }

    pub async fn read(&self, cancel: &CancellationToken, id: &str) -> CoreResult<ConnectorState> {
        let remote = self.reconciler.remote();
        let tree = self
            .reconciler
            .invoker()
            .invoke(cancel, || remote.fetch_current(cancel, id))
            .await
            .map_err(|e| CoreError::remote("error getting connector", e))?;
        Ok(ConnectorState::from_tree(id, &tree))
    }

    /// Reconcile towards `fields`, then read back the resulting state.
    pub async fn update(
        &self,
        cancel: &CancellationToken,
        id: &str,
        fields: &DesiredFields,
    ) -> CoreResult<UpdateReport> {
        let outcome = self.reconciler.reconcile(cancel, id, fields, &self.ignore).await?;
        let state = self.read(cancel, id).await?;
        Ok(UpdateReport { outcome, state })
    }

    pub async fn delete(&self, cancel: &CancellationToken, id: &str) -> CoreResult<()> {
        self.reconciler
            .remote()
            .delete(cancel, id)
            .await
            .map_err(|e| CoreError::remote("error deleting connector", e))
    }

    /// Test a configuration without creating anything.
    ///
    /// `id` names an existing connector to test against; the result id is
    /// `<type>-<id>` (empty id when none was given).
    pub async fn test_connector_config(
        &self,
        cancel: &CancellationToken,
        connector_type: &str,
        auth_params: &str,
        extra_config: Option<&str>,
        id: Option<&str>,
    ) -> CoreResult<ConfigTestResult> {
        let auth_params = parse_object("auth_params", auth_params)?;
        let extra_config = parse_optional_object("extra_config", extra_config)?;

        let remote = self.reconciler.remote();
        let success = self
            .reconciler
            .invoker()
            .invoke(cancel, || {
                remote.test_config(cancel, connector_type, &auth_params, extra_config.as_ref(), id)
            })
            .await
            .map_err(|e| CoreError::remote("error testing connector configuration", e))?;

        Ok(ConfigTestResult {
            id: format!("{}-{}", connector_type, id.unwrap_or_default()),
            success,
        })
    }
}
