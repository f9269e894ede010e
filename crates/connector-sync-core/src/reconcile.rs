//! Reconciler: fetch, compare, and update only when something changed.
//!
//! ```text
//! Start ──fetch──► FetchedCurrent ──compare──► Compared ─┬─► NoOpDone
//!                                                        └─► Updating ──► Done
//! any step ──error──► Failed(phase)
//! ```
//!
//! Fetch and update run through the [`Invoker`], so transient failures are
//! retried inside their phase. Nothing is mutated before the comparison says
//! it has to be.

use connector_sync_client::{ConnectorRemote, Invoker};
use connector_sync_types::{ConfigTree, ConfigValue, DesiredFields, Result};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::compare::{compare, IgnoreSet};
use crate::diff::format_diff;
use crate::error::{ReconcileError, ReconcilePhase};
use crate::json::parse_optional_object;

const NAME: &str = "name";
const AUTH_PARAMS: &str = "authParams";
const EXTRA_CONFIG: &str = "extraConfig";

/// Successful reconciliation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// Remote already matched; no mutating call was made.
    NoOp,
    /// An update was sent for these paths.
    Updated { changed_paths: Vec<String> },
}

impl ReconcileOutcome {
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }

    pub fn changed_paths(&self) -> &[String] {
        match self {
            Self::NoOp => &[],
            Self::Updated { changed_paths } => changed_paths,
        }
    }
}

/// Desired tree plus the parsed objects to send if an update is needed.
#[derive(Debug, Clone, PartialEq)]
pub struct DesiredState {
    pub tree: ConfigTree,
    pub auth_params: Option<ConfigTree>,
    pub extra_config: Option<ConfigTree>,
}

impl DesiredState {
    /// Build the desired tree: `name` always, JSON fields from the caller
    /// when supplied, otherwise copied from `current` so they compare equal.
    pub fn build(current: &ConfigTree, fields: &DesiredFields) -> Result<Self> {
        let auth_params = parse_optional_object("auth_params", fields.auth_params.as_deref())?;
        let extra_config = parse_optional_object("extra_config", fields.extra_config.as_deref())?;

        let mut tree = ConfigTree::new();
        tree.insert(NAME.to_string(), ConfigValue::from(fields.name.as_str()));

        for (key, supplied) in [(AUTH_PARAMS, &auth_params), (EXTRA_CONFIG, &extra_config)] {
            let value = match supplied {
                Some(parsed) => Some(ConfigValue::Mapping(parsed.clone())),
                None => current.get(key).cloned(),
            };
            if let Some(value) = value {
                tree.insert(key.to_string(), value);
            }
        }

        Ok(Self { tree, auth_params, extra_config })
    }
}

/// Drives one connector towards a desired state.
#[derive(Debug, Clone)]
pub struct Reconciler<R> {
    remote: R,
    invoker: Invoker,
}

impl<R: ConnectorRemote> Reconciler<R> {
    pub fn new(remote: R, invoker: Invoker) -> Self {
        Self { remote, invoker }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn invoker(&self) -> Invoker {
        self.invoker
    }

    pub async fn reconcile(
        &self,
        cancel: &CancellationToken,
        id: &str,
        fields: &DesiredFields,
        ignore: &IgnoreSet,
    ) -> std::result::Result<ReconcileOutcome, ReconcileError> {
        let current = self
            .invoker
            .invoke(cancel, || self.remote.fetch_current(cancel, id))
            .await
            .map_err(|e| ReconcileError::at(ReconcilePhase::FetchCurrent, e))?;
        tracing::debug!("Fetched connector {} ({} fields)", id, current.len());

        let desired = DesiredState::build(&current, fields)
            .map_err(|e| ReconcileError::at(ReconcilePhase::Compare, e))?;

        let comparison = compare(&current, &desired.tree, ignore);
        if comparison.is_equivalent() {
            tracing::info!("No changes detected for connector {}", id);
            return Ok(ReconcileOutcome::NoOp);
        }

        tracing::info!(
            "Updating connector {} with changes: {}",
            id,
            format_diff(&current, &desired.tree)
        );

        self.invoker
            .invoke(cancel, || {
                self.remote.update(
                    cancel,
                    id,
                    &fields.name,
                    desired.auth_params.as_ref(),
                    desired.extra_config.as_ref(),
                )
            })
            .await
            .map_err(|e| ReconcileError::at(ReconcilePhase::Update, e))?;

        Ok(ReconcileOutcome::Updated { changed_paths: comparison.changed_paths })
    }
}
