use anyhow::{Context, Result};
use connector_sync_client::{ConnectorClient, Invoker};
use connector_sync_core::{ConnectorResource, IgnoreSet};
use connector_sync_types::{ConnectorSpec, DesiredFields, ProviderConfig};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::cli::Commands;

pub async fn run(config: &ProviderConfig, command: Commands, cancel: &CancellationToken) -> Result<()> {
    let client = ConnectorClient::new(config).context("invalid provider configuration")?;
    let resource = ConnectorResource::new(client, Invoker::from_config(&config.retry));

    match command {
        Commands::Create { name, connector_type, auth_params, extra_config } => {
            let spec = ConnectorSpec { name, connector_type, auth_params, extra_config };
            let id = resource.create(cancel, &spec).await?;
            let state = resource.read(cancel, &id).await?;
            print_json(&state)
        },
        Commands::Read { id } => {
            let state = resource.read(cancel, &id).await?;
            print_json(&state)
        },
        Commands::Apply { id, name, auth_params, extra_config, ignore } => {
            let fields = DesiredFields { name, auth_params, extra_config };
            let resource = if ignore.is_empty() {
                resource
            } else {
                resource.with_ignore_set(ignore.into_iter().collect::<IgnoreSet>())
            };
            let report = resource.update(cancel, &id, &fields).await?;
            print_json(&report)
        },
        Commands::Delete { id } => {
            resource.delete(cancel, &id).await?;
            tracing::info!("Connector {} deleted", id);
            Ok(())
        },
        Commands::TestConfig { connector_type, auth_params, extra_config, id } => {
            let result = resource
                .test_connector_config(
                    cancel,
                    &connector_type,
                    &auth_params,
                    extra_config.as_deref(),
                    id.as_deref(),
                )
                .await?;
            print_json(&result)
        },
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
