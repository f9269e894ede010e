use clap::{Args, Parser, Subcommand};
use connector_sync_types::{ProviderConfig, RetryConfig};

#[derive(Parser)]
#[command(
    name = "connector-sync",
    about = "Keep security-platform connectors in sync with a declared configuration",
    version = env!("CARGO_PKG_VERSION"),
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub provider: ProviderArgs,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG applies otherwise
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct ProviderArgs {
    #[arg(long, env = "WIZ_CLIENT_ID", help = "OAuth client ID")]
    pub client_id: String,

    #[arg(long, env = "WIZ_CLIENT_SECRET", hide_env_values = true, help = "OAuth client secret")]
    pub client_secret: String,

    #[arg(
        long,
        env = "WIZ_API_URL",
        default_value = "https://api.eu1.demo.wiz.io/graphql",
        help = "GraphQL API endpoint"
    )]
    pub api_url: String,

    #[arg(
        long,
        env = "WIZ_AUTH_URL",
        default_value = "https://auth.demo.wiz.io/oauth/token",
        help = "OAuth token endpoint"
    )]
    pub auth_url: String,

    #[arg(long, default_value = "120", help = "HTTP timeout in seconds")]
    pub timeout_secs: u64,

    #[arg(long, default_value = "5", help = "Attempts per remote call, including the first")]
    pub max_attempts: u32,

    #[arg(long, default_value = "1000", help = "Initial retry backoff in milliseconds")]
    pub base_delay_ms: u64,
}

impl ProviderArgs {
    pub fn to_config(&self) -> ProviderConfig {
        let mut config = ProviderConfig::new(&self.client_id, &self.client_secret);
        config.api_url.clone_from(&self.api_url);
        config.auth_url.clone_from(&self.auth_url);
        config.timeout_secs = self.timeout_secs;
        config.retry =
            RetryConfig { max_attempts: self.max_attempts, base_delay_ms: self.base_delay_ms };
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Test a connector configuration, then create the connector")]
    Create {
        #[arg(long, help = "Connector display name")]
        name: String,

        #[arg(long = "type", help = "Connector type (aws, gcp, azure, ...)")]
        connector_type: String,

        #[arg(long, help = "Authentication parameters as a JSON object")]
        auth_params: String,

        #[arg(long, help = "Extra configuration as a JSON object")]
        extra_config: Option<String>,
    },

    #[command(about = "Show a connector's current state")]
    Read {
        #[arg(help = "Connector ID")]
        id: String,
    },

    #[command(about = "Reconcile a connector towards the given fields")]
    Apply {
        #[arg(help = "Connector ID")]
        id: String,

        #[arg(long, help = "Desired display name")]
        name: String,

        #[arg(long, help = "Desired authentication parameters (JSON); unchanged if omitted")]
        auth_params: Option<String>,

        #[arg(long, help = "Desired extra configuration (JSON); unchanged if omitted")]
        extra_config: Option<String>,

        #[arg(
            long = "ignore",
            value_name = "FIELD",
            help = "Field to skip when comparing (repeatable); replaces the standard set"
        )]
        ignore: Vec<String>,
    },

    #[command(about = "Delete a connector")]
    Delete {
        #[arg(help = "Connector ID")]
        id: String,
    },

    #[command(about = "Test a connector configuration without creating anything")]
    TestConfig {
        #[arg(long = "type", help = "Connector type (aws, gcp, azure, ...)")]
        connector_type: String,

        #[arg(long, help = "Authentication parameters as a JSON object")]
        auth_params: String,

        #[arg(long, help = "Extra configuration as a JSON object")]
        extra_config: Option<String>,

        #[arg(long, help = "Existing connector to test against")]
        id: Option<String>,
    },
}
