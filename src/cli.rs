use clap::Parser;

use crate::errors::ToolError;
use crate::services::config::{BrokerConfig, ConfigOverrides};

/// Command-line flags take precedence over `AMQ_*` environment variables.
#[derive(Debug, Parser)]
#[command(name = "amq-jolokia", version, about = "MCP bridge to the AMQ broker Jolokia API")]
pub struct Cli {
    /// Broker host (AMQ_HOST).
    #[arg(long)]
    pub host: Option<String>,
    /// Broker console port (AMQ_PORT).
    #[arg(long)]
    pub port: Option<u16>,
    /// Broker name used in MBean object names (AMQ_BROKER_NAME).
    #[arg(long)]
    pub broker_name: Option<String>,
    /// Value sent in the Origin header (AMQ_ORIGIN).
    #[arg(long)]
    pub origin: Option<String>,
    /// Per-request timeout in milliseconds (AMQ_TIMEOUT_MS).
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            broker_name: self.broker_name.clone(),
            origin: self.origin.clone(),
            request_timeout_ms: self.timeout_ms,
        }
    }

    pub fn resolve_config(&self) -> Result<BrokerConfig, ToolError> {
        BrokerConfig::from_env()?.with_overrides(self.overrides())
    }
}
