//! GraphQL transport: one authenticated POST per operation.
//!
//! Failures are classified here, where the HTTP status, transport error and
//! GraphQL `extensions.code` are still available. Nothing downstream looks at
//! message text.

use connector_sync_types::{tree_from_json, ConfigTree, ErrorKind, Result, SyncError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::session::CredentialSession;

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: &'a Value,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    extensions: Option<GraphqlErrorExtensions>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorExtensions {
    #[serde(default)]
    code: Option<String>,
}

/// Posts queries and mutations to the GraphQL endpoint with a bearer
/// credential from the shared session.
#[derive(Debug, Clone)]
pub struct GraphqlTransport {
    http: reqwest::Client,
    api_url: String,
    session: Arc<CredentialSession>,
}

impl GraphqlTransport {
    pub fn new(http: reqwest::Client, api_url: impl Into<String>, session: Arc<CredentialSession>) -> Self {
        Self { http, api_url: api_url.into(), session }
    }

    pub fn session(&self) -> &Arc<CredentialSession> {
        &self.session
    }

    /// Execute one operation and return its `data` object.
    pub async fn execute(
        &self,
        cancel: &CancellationToken,
        operation: &str,
        query: &str,
        variables: &Value,
    ) -> Result<ConfigTree> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(SyncError::Cancelled),
            result = self.execute_once(cancel, operation, query, variables) => result,
        }
    }

    async fn execute_once(
        &self,
        cancel: &CancellationToken,
        operation: &str,
        query: &str,
        variables: &Value,
    ) -> Result<ConfigTree> {
        let credential = self.session.ensure_valid(cancel).await?;

        tracing::debug!("GraphQL {} -> {}", operation, self.api_url);

        let response = self
            .http
            .post(&self.api_url)
            .header("Authorization", credential.bearer())
            .json(&GraphqlRequest { query, variables })
            .send()
            .await
            .map_err(|e| transport_error(operation, &e))?;

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                // Token was revoked or rotated server-side.
                self.session.invalidate().await;
            }
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::remote(
                ErrorKind::from_status(status.as_u16()),
                format!(
                    "{}: graphql: server returned a non-200 status code: {} {}",
                    operation,
                    status.as_u16(),
                    body.trim()
                ),
            ));
        }

        let body = response.bytes().await.map_err(|e| transport_error(operation, &e))?;
        let parsed: GraphqlResponse = serde_json::from_slice(&body).map_err(|e| {
            SyncError::InvalidResponse(format!("{}: decoding response: {}", operation, e))
        })?;

        if let Some(err) = graphql_error(operation, &parsed.errors) {
            return Err(err);
        }

        parsed.data.and_then(tree_from_json).ok_or_else(|| {
            SyncError::InvalidResponse(format!("{}: response carried no data object", operation))
        })
    }
}

fn transport_error(operation: &str, err: &reqwest::Error) -> SyncError {
    let kind = if err.is_timeout() {
        ErrorKind::Timeout
    } else if err.is_connect() || err.is_request() {
        ErrorKind::ConnectionReset
    } else {
        ErrorKind::from_message(&err.to_string())
    };
    SyncError::remote(kind, format!("{}: {}", operation, err))
}

/// Fold GraphQL-level errors into one remote error, classified by the first
/// one that carries a recognised code.
fn graphql_error(operation: &str, errors: &[GraphqlError]) -> Option<SyncError> {
    let first = errors.first()?;

    let coded = errors.iter().find_map(|e| {
        e.extensions.as_ref().and_then(|ext| ext.code.as_deref()).and_then(ErrorKind::from_graphql_code)
    });
    let kind = coded.unwrap_or_else(|| ErrorKind::from_message(&first.message));

    let message = errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; ");
    Some(SyncError::remote(kind, format!("{}: graphql: {}", operation, message)))
}
