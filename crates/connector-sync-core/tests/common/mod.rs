#![allow(dead_code, reason = "each test binary uses a different subset")]
#![allow(clippy::expect_used, reason = "a poisoned lock in the fixture is a test failure")]

use async_trait::async_trait;
use connector_sync_client::ConnectorRemote;
use connector_sync_types::{tree_from_json, ConfigTree, ConfigValue, ErrorKind, Result, SyncError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCall {
    pub id: String,
    pub name: String,
    pub auth_params: Option<ConfigTree>,
    pub extra_config: Option<ConfigTree>,
}

/// In-memory connector store with scripted failures.
#[derive(Debug, Default)]
pub struct FakeRemote {
    pub connector: Mutex<Option<ConfigTree>>,
    pub fetch_failures: Mutex<VecDeque<SyncError>>,
    pub update_failures: Mutex<VecDeque<SyncError>>,
    pub test_result: Mutex<Option<bool>>,
    pub fetches: AtomicU32,
    pub tests: AtomicU32,
    pub creates: AtomicU32,
    pub deletes: AtomicU32,
    pub updates: Mutex<Vec<UpdateCall>>,
}

impl FakeRemote {
    pub fn with_connector(value: serde_json::Value) -> Self {
        let remote = Self::default();
        *remote.connector.lock().expect("lock") = tree_from_json(value);
        remote
    }

    pub fn fail_fetch(&self, err: SyncError) {
        self.fetch_failures.lock().expect("lock").push_back(err);
    }

    pub fn fail_update(&self, err: SyncError) {
        self.update_failures.lock().expect("lock").push_back(err);
    }

    pub fn set_test_result(&self, success: bool) {
        *self.test_result.lock().expect("lock") = Some(success);
    }

    pub fn fetch_count(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> Vec<UpdateCall> {
        self.updates.lock().expect("lock").clone()
    }
}

pub fn production_connector() -> serde_json::Value {
    serde_json::json!({
        "id": "c-1",
        "name": "prod-aws",
        "status": "CONNECTED",
        "enabled": true,
        "lastActivity": "2024-05-01T10:00:00Z",
        "authParams": { "customerRoleARN": "arn:aws:iam::1:role/wiz", "externalId": "ext" },
        "extraConfig": { "regions": ["us-east-1"] },
        "outpost": { "id": "o-1" },
        "config": { "region": "us-east-1" },
        "type": { "id": "aws", "name": "AWS" }
    })
}

#[async_trait]
impl ConnectorRemote for FakeRemote {
    async fn fetch_current(&self, _cancel: &CancellationToken, id: &str) -> Result<ConfigTree> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fetch_failures.lock().expect("lock").pop_front() {
            return Err(err);
        }
        self.connector
            .lock()
            .expect("lock")
            .clone()
            .ok_or_else(|| SyncError::remote(ErrorKind::NotFound, format!("connector not found: {}", id)))
    }

    async fn test_config(
        &self,
        _cancel: &CancellationToken,
        _connector_type: &str,
        _auth_params: &ConfigTree,
        _extra_config: Option<&ConfigTree>,
        _id: Option<&str>,
    ) -> Result<bool> {
        self.tests.fetch_add(1, Ordering::SeqCst);
        Ok(self.test_result.lock().expect("lock").unwrap_or(true))
    }

    async fn create(
        &self,
        _cancel: &CancellationToken,
        name: &str,
        connector_type: &str,
        auth_params: &ConfigTree,
        extra_config: Option<&ConfigTree>,
    ) -> Result<String> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let mut tree = ConfigTree::new();
        tree.insert("id".to_string(), ConfigValue::from("new-1"));
        tree.insert("name".to_string(), ConfigValue::from(name));
        tree.insert("authParams".to_string(), ConfigValue::Mapping(auth_params.clone()));
        tree.insert(
            "extraConfig".to_string(),
            extra_config.cloned().map_or(ConfigValue::Null, ConfigValue::Mapping),
        );
        let mut kind = ConfigTree::new();
        kind.insert("id".to_string(), ConfigValue::from(connector_type));
        tree.insert("type".to_string(), ConfigValue::Mapping(kind));
        *self.connector.lock().expect("lock") = Some(tree);
        Ok("new-1".to_string())
    }

    async fn update(
        &self,
        _cancel: &CancellationToken,
        id: &str,
        name: &str,
        auth_params: Option<&ConfigTree>,
        extra_config: Option<&ConfigTree>,
    ) -> Result<()> {
        self.updates.lock().expect("lock").push(UpdateCall {
            id: id.to_string(),
            name: name.to_string(),
            auth_params: auth_params.cloned(),
            extra_config: extra_config.cloned(),
        });
        if let Some(err) = self.update_failures.lock().expect("lock").pop_front() {
            return Err(err);
        }

        let mut guard = self.connector.lock().expect("lock");
        if let Some(connector) = guard.as_mut() {
            connector.insert("name".to_string(), ConfigValue::from(name));
            if let Some(auth) = auth_params {
                connector.insert("authParams".to_string(), ConfigValue::Mapping(auth.clone()));
            }
            if let Some(extra) = extra_config {
                connector.insert("extraConfig".to_string(), ConfigValue::Mapping(extra.clone()));
            }
        }
        Ok(())
    }

    async fn delete(&self, _cancel: &CancellationToken, _id: &str) -> Result<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        *self.connector.lock().expect("lock") = None;
        Ok(())
    }
}
