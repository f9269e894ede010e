//! GraphQL documents for the connector operations.

pub const TEST_CONNECTOR_CONFIG: &str = r#"
query TestConnectorConfig($type: ID!, $authParams: JSON!, $extraConfig: JSON, $id: String) {
  testConnectorConfig(
    type: $type
    authParams: $authParams
    extraConfig: $extraConfig
    id: $id
  ) {
    success
  }
}
"#;

pub const CREATE_CONNECTOR: &str = r#"
mutation CreateConnector($input: CreateConnectorInput!) {
  createConnector(input: $input) {
    connector {
      id
      name
      authParams
      type {
        id
      }
      extraConfig
      outpost {
        id
      }
    }
  }
}
"#;

/// Fetch a connector with everything the projection needs. Cloud-specific
/// `config` fragments are requested so the computed block is visible to the
/// diff log, even though comparison ignores it.
pub const GET_CONNECTOR: &str = r#"
query GetConnector($connectorId: ID!) {
  connector(id: $connectorId) {
    id
    name
    status
    enabled
    lastActivity
    authParams
    extraConfig
    outpost {
      id
    }
    config {
      ... on ConnectorConfigAWS {
        region
        customerRoleARN
      }
      ... on ConnectorConfigGCP {
        isManagedIdentity
        projects
        excludedProjects
        organizationId: organization_id
        projectId: project_id
        auditLogMonitorEnabled
      }
      ... on ConnectorConfigAzure {
        excludedSubscriptions
        includedSubscriptions
        auditLogMonitorEnabled
        environment
        tenantId
        subscriptionId
        isManagedIdentity
      }
    }
    type {
      id
      name
    }
  }
}
"#;

pub const UPDATE_CONNECTOR: &str = r#"
mutation UpdateConnector($input: UpdateConnectorInput!) {
  updateConnector(input: $input) {
    connector {
      id
      name
      status
      enabled
      lastActivity
      extraConfig
    }
  }
}
"#;

pub const DELETE_CONNECTOR: &str = r#"
mutation DeleteConnector($input: DeleteConnectorInput!) {
  deleteConnector(input: $input) {
    _stub
  }
}
"#;
